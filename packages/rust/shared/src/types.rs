//! Core domain types for channel catalogs.

// ---------------------------------------------------------------------------
// CandidateLink
// ---------------------------------------------------------------------------

/// A detail-page link found on a listing page that passed the member filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    /// The `href` exactly as it appeared on the listing page (usually relative).
    pub href: String,
    /// Member count shown next to the link at discovery time.
    pub members: i64,
}

// ---------------------------------------------------------------------------
// DetailRecord
// ---------------------------------------------------------------------------

/// One channel as read from its detail page.
///
/// Equality and hashing cover all three fields, so two records only collapse
/// when handle, name and member count all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailRecord {
    /// Canonical `@handle` form of the channel link.
    pub handle: String,
    /// Display name from the page header.
    pub name: String,
    /// Member count at the time of the visit.
    pub members: i64,
}

impl DetailRecord {
    pub fn new(handle: impl Into<String>, name: impl Into<String>, members: i64) -> Self {
        Self {
            handle: handle.into(),
            name: name.into(),
            members,
        }
    }
}
