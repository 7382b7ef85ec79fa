//! mdmatch - match an article title export against a Markdown folder
//!
//! Writes the title table back out as xlsx with the matched file name and
//! content appended to every row.

use anyhow::{Context, Result};
use clap::Parser;
use mdmatch::config::{config_path, Config};
use mdmatch::MdMatchError;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Folder holding the article files
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// CSV export with the article titles
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Spreadsheet to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of key characters compared
    #[arg(short = 'l', long)]
    match_len: Option<usize>,

    /// Also write the run summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    init_config: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Setup logging
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ Aborted: {:#}", e);
            if e
                .downcast_ref::<MdMatchError>()
                .is_some_and(MdMatchError::is_table_failure)
            {
                error!("   The table must be UTF-8 or GBK CSV with a header row.");
                error!("   No report was written.");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) if args.init_config && !path.exists() => Config::default(),
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(dir) = args.source_dir {
        config.source_dir = dir;
    }
    if let Some(table) = args.table {
        config.table_path = table;
    }
    if let Some(output) = args.output {
        config.output_path = output;
    }
    if let Some(len) = args.match_len {
        config.match_len = len;
    }

    if args.init_config {
        let path = args.config.unwrap_or_else(config_path);
        config.validate()?;
        config
            .save_to(&path)
            .with_context(|| format!("writing config to {}", path.display()))?;
        info!("📝 Config written to {}", path.display());
        return Ok(());
    }

    info!("🔎 mdmatch v{} starting...", env!("CARGO_PKG_VERSION"));
    let report = mdmatch::run(&config)?;

    if let Some(path) = args.summary_json {
        report
            .summary
            .save_json(&path)
            .with_context(|| format!("writing summary to {}", path.display()))?;
        info!("📝 Summary written to {}", path.display());
    }

    info!("✅ Done: {}", report.output_path.display());
    Ok(())
}
