//! Progress observer injected into the crawler.

/// Progress callback for reporting crawl status to a UI.
///
/// Purely observational: nothing a reporter does changes the crawl result.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each listing page has been merged.
    fn listing_page(&self, page_num: u32, new_links: usize, total_links: usize);
    /// Called after each detail page, whether or not it produced a record.
    fn detail_visited(&self, url: &str, current: usize, total: usize);
    /// Called once when the whole run has finished.
    fn finish(&self) {}
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn listing_page(&self, _page_num: u32, _new_links: usize, _total_links: usize) {}
    fn detail_visited(&self, _url: &str, _current: usize, _total: usize) {}
}
