//! Listing crawler, detail extraction, and request pacing.
//!
//! This crate provides:
//! - [`fetch`]: the [`PageFetcher`] seam and its `reqwest` implementation
//! - [`listing`] / [`detail`]: HTML extractors for listing and detail pages
//! - [`engine`]: the sequential [`Crawler`] (pagination + record collection)
//! - [`pacing`]: randomized politeness delays
//! - [`progress`]: the [`ProgressReporter`] observer

pub mod detail;
pub mod engine;
pub mod fetch;
mod html;
pub mod listing;
pub mod pacing;
pub mod progress;

#[cfg(test)]
pub(crate) mod testing;

pub use detail::{DEEP_LINK_PREFIX, canonical_handle, extract_detail};
pub use engine::{CrawlOutcome, Crawler, ListingPage};
pub use fetch::{HttpFetcher, PageFetcher};
pub use listing::extract_listing;
pub use pacing::Pacer;
pub use progress::{ProgressReporter, SilentProgress};
