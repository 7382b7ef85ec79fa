//! End-to-end reconciliation run
//!
//! Load the table, scan the folder, match, summarize, write. Both inputs are
//! fully read before anything is written, so a failed load never leaves a
//! partial spreadsheet behind.

use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::core::{KeyNormalizer, Matcher};
use crate::error::MdResult;
use crate::library::ArticleLibrary;
use crate::records::{load_records, ColumnPolicy};
use crate::report::{augment, write_xlsx, Summary};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: Summary,
    pub output_path: PathBuf,
}

pub fn run(config: &Config) -> MdResult<RunReport> {
    config.validate()?;
    let normalizer = KeyNormalizer::new(config.bare_extension(), config.match_len);

    info!("=== Step 1: load table and drop duplicate titles ===");
    let policy = ColumnPolicy::from_config(config);
    let loaded = load_records(&config.table_path, &policy)?;

    info!("=== Step 2: scan article files ===");
    let library =
        ArticleLibrary::scan_directory(&config.source_dir, config.bare_extension(), &normalizer)?;

    info!("=== Step 3: match titles to files ===");
    let mut matcher = Matcher::new(&library, &normalizer);
    let results = matcher.match_table(&loaded.table, &loaded.title_column);
    let used = matcher.into_used();
    info!(
        "🔗 {} of {} rows matched",
        results.matched_count(),
        loaded.table.len()
    );

    let summary = Summary::build(&loaded, &library, &results, &used);
    summary.log(config.unmatched_preview);

    let report = augment(
        &loaded.table,
        &results.assignments,
        &library,
        &config.file_name_header,
        &config.content_header,
    );
    write_xlsx(&report, &config.output_path)?;

    Ok(RunReport {
        summary,
        output_path: config.output_path.clone(),
    })
}
