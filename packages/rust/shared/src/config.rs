//! Application configuration for tgcatalog.
//!
//! User config lives at `~/.tgcatalog/tgcatalog.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{CatalogError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "tgcatalog.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".tgcatalog";

// ---------------------------------------------------------------------------
// Config structs (matching tgcatalog.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Crawl target and politeness settings.
    #[serde(default)]
    pub crawl: CrawlSection,

    /// Where spreadsheets are written.
    #[serde(default)]
    pub output: OutputSection,

    /// Log file settings.
    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[crawl]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlSection {
    /// Origin that relative channel links are resolved against.
    #[serde(default = "default_site_root")]
    pub site_root: String,

    /// Category listing to paginate through.
    #[serde(default = "default_category_url")]
    pub category_url: String,

    /// Channels must have strictly more members than this to be collected.
    #[serde(default = "default_minimum_members")]
    pub minimum_members: i64,

    /// Lower bound of the random delay before each request.
    #[serde(default = "default_delay_min_ms")]
    pub delay_min_ms: u64,

    /// Upper bound of the random delay before each request.
    #[serde(default = "default_delay_max_ms")]
    pub delay_max_ms: u64,

    /// Hard stop for pagination; `0` disables the cap.
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            site_root: default_site_root(),
            category_url: default_category_url(),
            minimum_members: default_minimum_members(),
            delay_min_ms: default_delay_min_ms(),
            delay_max_ms: default_delay_max_ms(),
            max_pages: default_max_pages(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_site_root() -> String {
    "https://tgramsearch.com".into()
}
fn default_category_url() -> String {
    "https://tgramsearch.com/categories/it".into()
}
fn default_minimum_members() -> i64 {
    1000
}
fn default_delay_min_ms() -> u64 {
    1000
}
fn default_delay_max_ms() -> u64 {
    3000
}
fn default_max_pages() -> u32 {
    500
}
fn default_request_timeout_secs() -> u64 {
    30
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Directory the `<category>_channels.xlsx` file is written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}

/// `[logging]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Plain-text log file, truncated at the start of every run.
    #[serde(default = "default_log_file")]
    pub file: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

fn default_log_file() -> String {
    "tgcatalog.log".into()
}

// ---------------------------------------------------------------------------
// Crawl config (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime crawl configuration, validated and merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Origin used to absolutize listing links.
    pub site_root: Url,
    /// Category listing root; `?page=N` is appended per page.
    pub category_url: Url,
    /// Strict lower bound on member count.
    pub minimum_members: i64,
    /// Lower bound of the pre-request delay in ms.
    pub delay_min_ms: u64,
    /// Upper bound of the pre-request delay in ms.
    pub delay_max_ms: u64,
    /// Pagination cap (`0` = unbounded).
    pub max_pages: u32,
    /// HTTP timeout in seconds.
    pub request_timeout_secs: u64,
}

impl CrawlConfig {
    /// Check the invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.delay_min_ms > self.delay_max_ms {
            return Err(CatalogError::config(format!(
                "delay_min_ms ({}) must not exceed delay_max_ms ({})",
                self.delay_min_ms, self.delay_max_ms
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CatalogError::config("request_timeout_secs must be positive"));
        }
        Ok(())
    }
}

impl TryFrom<&AppConfig> for CrawlConfig {
    type Error = CatalogError;

    fn try_from(config: &AppConfig) -> Result<Self> {
        let crawl = &config.crawl;
        let crawl_config = Self {
            site_root: parse_url("site_root", &crawl.site_root)?,
            category_url: parse_url("category_url", &crawl.category_url)?,
            minimum_members: crawl.minimum_members,
            delay_min_ms: crawl.delay_min_ms,
            delay_max_ms: crawl.delay_max_ms,
            max_pages: crawl.max_pages,
            request_timeout_secs: crawl.request_timeout_secs,
        };
        crawl_config.validate()?;
        Ok(crawl_config)
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| CatalogError::config(format!("invalid {key} '{value}': {e}")))
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.tgcatalog/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CatalogError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.tgcatalog/tgcatalog.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| CatalogError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CatalogError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CatalogError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CatalogError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("category_url"));
        assert!(toml_str.contains("minimum_members = 1000"));
        assert!(toml_str.contains("tgcatalog.log"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[crawl]
minimum_members = 5000
max_pages = 0

[output]
dir = "/tmp/catalogs"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.crawl.minimum_members, 5000);
        assert_eq!(config.crawl.max_pages, 0);
        assert_eq!(config.crawl.delay_min_ms, 1000);
        assert_eq!(config.crawl.site_root, "https://tgramsearch.com");
        assert_eq!(config.output.dir, "/tmp/catalogs");
        assert_eq!(config.logging.file, "tgcatalog.log");
    }

    #[test]
    fn crawl_config_from_app_config() {
        let app = AppConfig::default();
        let crawl = CrawlConfig::try_from(&app).expect("defaults are valid");
        assert_eq!(crawl.minimum_members, 1000);
        assert_eq!(crawl.delay_min_ms, 1000);
        assert_eq!(crawl.delay_max_ms, 3000);
        assert_eq!(crawl.max_pages, 500);
        assert_eq!(
            crawl.category_url.as_str(),
            "https://tgramsearch.com/categories/it"
        );
    }

    #[test]
    fn crawl_config_rejects_inverted_delays() {
        let mut app = AppConfig::default();
        app.crawl.delay_min_ms = 5000;
        app.crawl.delay_max_ms = 100;
        let err = CrawlConfig::try_from(&app).unwrap_err();
        assert!(err.to_string().contains("delay_min_ms"));
    }

    #[test]
    fn crawl_config_rejects_bad_url() {
        let mut app = AppConfig::default();
        app.crawl.category_url = "not a url".into();
        let err = CrawlConfig::try_from(&app).unwrap_err();
        assert!(err.to_string().contains("category_url"));
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/tgcatalog.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
