//! End-to-end run: category listing → detail pages → spreadsheet.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use tgcatalog_crawler::{Crawler, PageFetcher, ProgressReporter};
use tgcatalog_shared::{CrawlConfig, Result};

/// Configuration for one `run_category` invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Free-text label naming the sheet and file and tagging every row.
    pub category: String,
    /// Directory the workbook is written to.
    pub output_dir: PathBuf,
    /// Crawl configuration (target URLs, threshold, pacing, cap).
    pub crawl: CrawlConfig,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunResult {
    /// Path of the written workbook.
    pub output_path: PathBuf,
    /// Number of listing pages fetched.
    pub pages_visited: u32,
    /// Whether pagination was cut short by `max_pages`.
    pub stopped_by_cap: bool,
    /// Unique detail links discovered.
    pub link_count: usize,
    /// Unique records written.
    pub record_count: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Run the full pipeline for one category.
///
/// 1. Crawl listing pages until one adds no new link
/// 2. Visit each link and extract its record
/// 3. Write all records to `<output_dir>/<category>_channels.xlsx`
///
/// Nothing is written if any step fails.
#[instrument(skip_all, fields(category = %config.category, url = %config.crawl.category_url))]
pub async fn run_category(
    config: &RunConfig,
    fetcher: Arc<dyn PageFetcher>,
    progress: Arc<dyn ProgressReporter>,
) -> Result<RunResult> {
    let start = Instant::now();

    tgcatalog_artifacts::check_category(&config.category)?;

    info!("starting category run");

    let crawler = Crawler::new(config.crawl.clone(), fetcher).with_progress(progress.clone());

    // --- Phase 1: Listing pages ---
    progress.phase("Crawling listing pages");
    let outcome = crawler.crawl_listing(&config.crawl.category_url).await?;
    if outcome.stopped_by_cap {
        warn!(
            pages = outcome.pages_visited,
            "listing crawl stopped by page cap; results may be incomplete"
        );
    }
    let link_count = outcome.urls.len();
    info!(links = link_count, "link collection finished, extracting channel details");

    // --- Phase 2: Detail pages ---
    progress.phase("Extracting channel details");
    let records = crawler.collect_records(outcome.urls).await?;
    info!(records = records.len(), "unique channels found");

    // --- Phase 3: Table ---
    progress.phase("Writing table");
    let output_path = tgcatalog_artifacts::write_table(&records, &config.category, &config.output_dir)?;

    let result = RunResult {
        output_path,
        pages_visited: outcome.pages_visited,
        stopped_by_cap: outcome.stopped_by_cap,
        link_count,
        record_count: records.len(),
        elapsed: start.elapsed(),
    };

    info!(
        pages = result.pages_visited,
        links = result.link_count,
        records = result.record_count,
        path = %result.output_path.display(),
        duration_ms = result.elapsed.as_millis(),
        "category run completed"
    );
    progress.finish();

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tgcatalog_crawler::{HttpFetcher, SilentProgress};
    use tgcatalog_shared::CatalogError;
    use url::Url;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn listing(entries: &[(&str, i64)]) -> String {
        let items: String = entries
            .iter()
            .map(|(href, members)| {
                format!(
                    r#"<div class="tg-channel"><div class="tg-channel-link"><a href="{href}">c</a></div><span class="tg-user-count">{members}</span></div>"#
                )
            })
            .collect();
        format!("<html><body>{items}</body></html>")
    }

    fn detail(domain: &str, name: &str, members: i64) -> String {
        format!(
            r#"<html><body><div class="tg-channel-wrapper is-detail">
                <a class="app" href="tg://resolve?domain={domain}">open</a>
                <h1 class="tg-channel-header">{name}</h1>
                <span class="tg-user-count">{members}</span>
            </div></body></html>"#
        )
    }

    async fn mount_page(server: &MockServer, page: &str, body: String, hits: u64) {
        Mock::given(method("GET"))
            .and(path("/categories/it"))
            .and(query_param("page", page))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(hits)
            .mount(server)
            .await;
    }

    async fn mount_detail(server: &MockServer, route: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
    }

    fn run_config(server: &MockServer, output_dir: PathBuf) -> RunConfig {
        let root = Url::parse(&server.uri()).unwrap();
        RunConfig {
            category: "IT".into(),
            output_dir,
            crawl: CrawlConfig {
                category_url: root.join("/categories/it").unwrap(),
                site_root: root,
                minimum_members: 1000,
                delay_min_ms: 0,
                delay_max_ms: 0,
                max_pages: 0,
                request_timeout_secs: 5,
            },
        }
    }

    #[tokio::test]
    async fn run_writes_workbook_for_mock_site() {
        let server = MockServer::start().await;

        mount_page(&server, "1", listing(&[("/channel/a", 1500), ("/channel/b", 500)]), 1).await;
        mount_page(&server, "2", listing(&[("/channel/a", 1500), ("/channel/c", 2000)]), 1).await;
        mount_page(&server, "3", listing(&[]), 1).await;
        mount_page(&server, "4", listing(&[("/channel/d", 9000)]), 0).await;
        mount_detail(&server, "/channel/a", detail("alpha", "Alpha", 1500)).await;
        mount_detail(&server, "/channel/c", detail("gamma", "Gamma", 2000)).await;

        let dir = tempfile::tempdir().unwrap();
        let config = run_config(&server, dir.path().to_path_buf());
        let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5)).unwrap());

        let result = run_category(&config, fetcher, Arc::new(SilentProgress))
            .await
            .unwrap();

        assert_eq!(result.pages_visited, 3);
        assert_eq!(result.link_count, 2);
        assert_eq!(result.record_count, 2);
        assert!(!result.stopped_by_cap);
        assert_eq!(result.output_path, dir.path().join("IT_channels.xlsx"));
        assert!(result.output_path.exists());
    }

    #[tokio::test]
    async fn failed_run_writes_nothing() {
        let server = MockServer::start().await;

        mount_page(&server, "1", listing(&[("/channel/a", 1500)]), 1).await;
        Mock::given(method("GET"))
            .and(path("/categories/it"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = run_config(&server, dir.path().to_path_buf());
        let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5)).unwrap());

        let err = run_category(&config, fetcher, Arc::new(SilentProgress))
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Network(_)));
        assert!(!dir.path().join("IT_channels.xlsx").exists());
    }

    #[tokio::test]
    async fn empty_category_label_is_rejected() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let mut config = run_config(&server, dir.path().to_path_buf());
        config.category = "   ".into();
        let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5)).unwrap());

        let err = run_category(&config, fetcher, Arc::new(SilentProgress))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Config { .. }));
    }

    #[tokio::test]
    async fn long_label_with_apostrophe_runs_to_completion() {
        let server = MockServer::start().await;
        mount_page(&server, "1", listing(&[("/channel/a", 1500)]), 1).await;
        mount_page(&server, "2", listing(&[("/channel/a", 1500)]), 1).await;
        mount_detail(&server, "/channel/a", detail("alpha", "Alpha", 1500)).await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = run_config(&server, dir.path().to_path_buf());
        config.category = format!("{}'tail", "a".repeat(30));
        let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5)).unwrap());

        let result = run_category(&config, fetcher, Arc::new(SilentProgress))
            .await
            .unwrap();
        assert_eq!(result.record_count, 1);
        assert!(result.output_path.exists());
    }

    #[tokio::test]
    async fn blank_label_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = run_config(&server, dir.path().to_path_buf());
        config.category = String::new();
        let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5)).unwrap());

        assert!(run_category(&config, fetcher, Arc::new(SilentProgress)).await.is_err());
    }
}
