//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::ProgressBar;
use tgcatalog_core::pipeline::{RunConfig, run_category};
use tgcatalog_crawler::HttpFetcher;
use tgcatalog_shared::{AppConfig, CrawlConfig, init_config, load_config, load_config_from};
use tracing::info;
use url::Url;

use crate::progress::{CliProgress, SuspendingWriter};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// tgcatalog: collect Telegram channel directories into spreadsheets.
#[derive(Parser)]
#[command(
    name = "tgcatalog",
    version,
    about = "Crawl a Telegram channel directory category and export it to a spreadsheet.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file to use instead of ~/.tgcatalog/tgcatalog.toml.
    #[arg(long, global = true, env = "TGCATALOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl a category and write `<category>_channels.xlsx`.
    Run {
        /// Category label for the sheet, file name and rows (prompted if omitted).
        #[arg(short, long)]
        category: Option<String>,

        /// Category listing URL (defaults to the configured one).
        #[arg(short, long)]
        url: Option<String>,

        /// Keep channels with strictly more members than this.
        #[arg(long)]
        min_members: Option<i64>,

        /// Stop paginating after this many listing pages (0 = no cap).
        #[arg(long)]
        max_pages: Option<u32>,

        /// Output directory for the workbook.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Config + tracing setup
// ---------------------------------------------------------------------------

/// Load the config named by `--config`, or the default one.
pub(crate) fn load_app_config(cli: &Cli) -> Result<AppConfig> {
    let config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Initialize tracing based on CLI flags.
///
/// Console output goes through `bar` so it never draws over the progress
/// display. `run` additionally mirrors every event into the configured log file.
pub(crate) fn init_tracing(cli: &Cli, config: &AppConfig, bar: &ProgressBar) -> Result<()> {
    use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

    let filter = match cli.verbose {
        0 => "tgcatalog=info",
        1 => "tgcatalog=debug",
        _ => "tgcatalog=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    let console_writer = SuspendingWriter::new(bar.clone(), std::io::stderr);
    let console = match cli.log_format {
        LogFormat::Text => fmt::layer()
            .with_target(false)
            .with_writer(console_writer)
            .boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(console_writer).boxed(),
    };

    let log_file = match cli.command {
        Command::Run { .. } => {
            let path = &config.logging.file;
            let file = std::fs::File::create(path)
                .wrap_err_with(|| format!("cannot create log file '{path}'"))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        Command::Config { .. } => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(log_file)
        .with(env_filter)
        .init();

    Ok(())
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli, config: AppConfig, bar: ProgressBar) -> Result<()> {
    match cli.command {
        Command::Run {
            category,
            url,
            min_members,
            max_pages,
            out,
        } => {
            cmd_run(
                &config,
                category,
                url.as_deref(),
                min_members,
                max_pages,
                out,
                bar,
            )
            .await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(&config).await,
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_run(
    config: &AppConfig,
    category: Option<String>,
    url: Option<&str>,
    min_members: Option<i64>,
    max_pages: Option<u32>,
    out: Option<PathBuf>,
    bar: ProgressBar,
) -> Result<()> {
    let mut crawl = CrawlConfig::try_from(config)?;

    if let Some(url) = url {
        crawl.category_url = Url::parse(url).map_err(|e| eyre!("invalid URL '{url}': {e}"))?;
    }
    if let Some(min_members) = min_members {
        crawl.minimum_members = min_members;
    }
    if let Some(max_pages) = max_pages {
        crawl.max_pages = max_pages;
    }

    let category = match category {
        Some(label) => label.trim().to_string(),
        None => prompt_category()?,
    };

    let output_dir = out.unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(
        crawl.request_timeout_secs,
    ))?);

    let run_config = RunConfig {
        category,
        output_dir,
        crawl,
    };

    info!(
        category = %run_config.category,
        url = %run_config.crawl.category_url,
        minimum_members = run_config.crawl.minimum_members,
        "starting channel collection"
    );

    let reporter = Arc::new(CliProgress::new(bar));
    let result = run_category(&run_config, fetcher, reporter).await?;

    println!();
    println!("  Channel table written!");
    println!("  Category: {}", run_config.category);
    println!("  Pages:    {}", result.pages_visited);
    println!("  Links:    {}", result.link_count);
    println!("  Channels: {}", result.record_count);
    println!("  File:     {}", result.output_path.display());
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    if result.stopped_by_cap {
        println!("  Note:     page cap reached, listing may be incomplete");
    }
    println!();

    Ok(())
}

/// Ask for the category label on the terminal.
fn prompt_category() -> Result<String> {
    let label = dialoguer::Input::<String>::new()
        .with_prompt("Category name")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            if input.trim().is_empty() {
                Err("category name must not be empty")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .wrap_err("failed to read category name")?;
    Ok(label.trim().to_string())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}
