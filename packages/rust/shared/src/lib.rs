//! Shared types, error model, and configuration for tgcatalog.
//!
//! This crate is the foundation depended on by all other tgcatalog crates.
//! It provides:
//! - [`CatalogError`]: the unified error type
//! - Domain types ([`CandidateLink`], [`DetailRecord`])
//! - Configuration ([`AppConfig`], [`CrawlConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CrawlConfig, CrawlSection, LoggingSection, OutputSection, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{CatalogError, Result};
pub use types::{CandidateLink, DetailRecord};
