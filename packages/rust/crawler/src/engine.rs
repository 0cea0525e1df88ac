//! Sequential listing crawler and detail collector.
//!
//! The crawler walks `?page=1, 2, ...` of a category listing until a page adds
//! no new link, then visits every collected link in discovery order and
//! extracts one record per detail page. Every request is preceded by the
//! pacer's delay; nothing runs concurrently.

use std::collections::HashSet;
use std::sync::Arc;

use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

use tgcatalog_shared::{CatalogError, CrawlConfig, DetailRecord, Result};

use crate::detail::extract_detail;
use crate::fetch::PageFetcher;
use crate::listing::extract_listing;
use crate::pacing::Pacer;
use crate::progress::{ProgressReporter, SilentProgress};

// ---------------------------------------------------------------------------
// CrawlOutcome
// ---------------------------------------------------------------------------

/// Summary of a completed listing crawl.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Absolute detail-page URLs, unique, in discovery order.
    pub urls: Vec<Url>,
    /// Number of listing pages fetched.
    pub pages_visited: u32,
    /// Whether the crawl ended because `max_pages` was reached.
    pub stopped_by_cap: bool,
}

/// One page of a category listing.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub page_num: u32,
    pub url: Url,
}

impl ListingPage {
    /// Build `{category_url}?page={page_num}`.
    pub fn new(category_url: &Url, page_num: u32) -> Self {
        let mut url = category_url.clone();
        url.query_pairs_mut()
            .append_pair("page", &page_num.to_string());
        Self { page_num, url }
    }
}

/// Insertion-ordered set of discovered URLs.
#[derive(Default)]
struct CrawlState {
    urls: Vec<Url>,
    seen: HashSet<String>,
}

impl CrawlState {
    /// Returns `true` if the URL was not seen before.
    fn insert(&mut self, url: Url) -> bool {
        if !self.seen.insert(url.as_str().to_string()) {
            return false;
        }
        self.urls.push(url);
        true
    }

    fn len(&self) -> usize {
        self.urls.len()
    }
}

// ---------------------------------------------------------------------------
// Crawler
// ---------------------------------------------------------------------------

/// Sequential, paced channel crawler.
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
    pacer: Pacer,
    progress: Arc<dyn ProgressReporter>,
}

impl Crawler {
    /// Create a crawler with pacing taken from `config` and no progress output.
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        let pacer = Pacer::from_config(&config);
        Self {
            config,
            fetcher,
            pacer,
            progress: Arc::new(SilentProgress),
        }
    }

    /// Report progress to the given observer.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Replace the pacing policy.
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Paginate `category_url` and collect qualifying detail-page URLs.
    ///
    /// Stops on the first page that contributes no new URL, or when
    /// `max_pages` (if non-zero) has been fetched.
    #[instrument(skip_all, fields(category_url = %category_url))]
    pub async fn crawl_listing(&self, category_url: &Url) -> Result<CrawlOutcome> {
        info!(
            minimum_members = self.config.minimum_members,
            max_pages = self.config.max_pages,
            "starting listing crawl"
        );

        let mut state = CrawlState::default();
        let mut pages_visited: u32 = 0;
        let mut stopped_by_cap = false;
        let mut page_num: u32 = 1;

        loop {
            if self.config.max_pages > 0 && page_num > self.config.max_pages {
                warn!(
                    max_pages = self.config.max_pages,
                    "page cap reached before the listing ran dry"
                );
                stopped_by_cap = true;
                break;
            }

            let page = ListingPage::new(category_url, page_num);
            info!(url = %page.url, "loading listing page");

            let body = self.fetch_paced(&page.url).await?;
            pages_visited += 1;

            let links = {
                let doc = Html::parse_document(&body);
                extract_listing(&doc, self.config.minimum_members, page.url.as_str())?
            };

            let before = state.len();
            for link in &links {
                let url = self.absolutize(&link.href)?;
                if state.insert(url) {
                    debug!(href = %link.href, members = link.members, "new channel link");
                }
            }
            let added = state.len() - before;

            info!(
                page_num,
                page_links = links.len(),
                added,
                total = state.len(),
                "processed listing page"
            );
            self.progress.listing_page(page_num, added, state.len());

            if added == 0 {
                break;
            }
            page_num += 1;
        }

        info!(
            links = state.len(),
            pages_visited, stopped_by_cap, "listing crawl completed"
        );

        Ok(CrawlOutcome {
            urls: state.urls,
            pages_visited,
            stopped_by_cap,
        })
    }

    /// Visit each detail page in order and collect unique records.
    ///
    /// Pages without a recognizable channel card are skipped; a record equal
    /// in all fields to one already collected is dropped.
    #[instrument(skip_all, fields(urls = urls.len()))]
    pub async fn collect_records(&self, urls: Vec<Url>) -> Result<Vec<DetailRecord>> {
        let total = urls.len();
        let mut records: Vec<DetailRecord> = Vec::new();
        let mut seen: HashSet<DetailRecord> = HashSet::new();
        let mut skipped: usize = 0;

        for (index, url) in urls.into_iter().enumerate() {
            info!(%url, "extracting channel details");

            let body = self.fetch_paced(&url).await?;
            let record = {
                let doc = Html::parse_document(&body);
                extract_detail(&doc, url.as_str())?
            };

            match record {
                Some(record) => {
                    if seen.insert(record.clone()) {
                        records.push(record);
                    } else {
                        debug!(handle = %record.handle, "duplicate record, skipping");
                    }
                }
                None => skipped += 1,
            }

            self.progress.detail_visited(url.as_str(), index + 1, total);
        }

        info!(records = records.len(), skipped, "detail extraction completed");
        Ok(records)
    }

    async fn fetch_paced(&self, url: &Url) -> Result<String> {
        self.pacer.wait().await;
        self.fetcher.fetch(url).await
    }

    fn absolutize(&self, href: &str) -> Result<Url> {
        self.config
            .site_root
            .join(href)
            .map_err(|e| CatalogError::parse(format!("invalid channel link '{href}': {e}")))
    }
}
