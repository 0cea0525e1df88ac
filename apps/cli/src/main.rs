//! tgcatalog CLI: collect Telegram channel listings into a spreadsheet.
//!
//! Crawls a paginated category directory, visits every channel above the
//! member threshold, and writes the results to `<category>_channels.xlsx`.

mod commands;
mod progress;

use clap::Parser;
use color_eyre::eyre::Result;
use indicatif::ProgressBar;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let config = commands::load_app_config(&cli)?;
    // Shared by the console log writer and the run's progress display.
    let bar = ProgressBar::hidden();
    commands::init_tracing(&cli, &config, &bar)?;
    commands::run(cli, config, bar).await
}
