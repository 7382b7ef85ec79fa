//! Title record loading
//!
//! Reads the exported article table, decides which column carries the
//! title and drops repeated titles.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::error::{MdMatchError, MdResult};
use crate::utils::{decode_text, TextEncoding};

/// One way of locating the title column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnStrategy {
    /// Exact header match
    Named(String),
    /// Zero-based column position
    Position(usize),
}

impl ColumnStrategy {
    fn resolve(&self, headers: &[String]) -> Option<usize> {
        match self {
            ColumnStrategy::Named(name) => headers.iter().position(|h| h == name),
            ColumnStrategy::Position(index) => (*index < headers.len()).then_some(*index),
        }
    }
}

/// Ordered list of strategies; the first one that resolves wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPolicy {
    strategies: Vec<ColumnStrategy>,
}

impl ColumnPolicy {
    pub fn new(strategies: Vec<ColumnStrategy>) -> Self {
        Self { strategies }
    }

    /// Named labels from the config, then the positional fallback
    pub fn from_config(config: &Config) -> Self {
        let mut strategies: Vec<ColumnStrategy> = config
            .title_columns
            .iter()
            .cloned()
            .map(ColumnStrategy::Named)
            .collect();
        strategies.push(ColumnStrategy::Position(config.fallback_column));
        Self { strategies }
    }

    pub fn strategies(&self) -> &[ColumnStrategy] {
        &self.strategies
    }

    pub fn resolve(&self, headers: &[String]) -> Option<TitleColumn> {
        self.strategies.iter().find_map(|strategy| {
            strategy.resolve(headers).map(|index| TitleColumn {
                index,
                name: headers[index].clone(),
                strategy: strategy.clone(),
            })
        })
    }
}

impl Default for ColumnPolicy {
    fn default() -> Self {
        Self::new(vec![
            ColumnStrategy::Named("标题".to_string()),
            ColumnStrategy::Named("Title".to_string()),
            ColumnStrategy::Position(1),
        ])
    }
}

/// The resolved title column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleColumn {
    pub index: usize,
    pub name: String,
    /// Strategy that picked this column
    pub strategy: ColumnStrategy,
}

/// One data row of the input table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleRecord {
    /// Zero-based position among the data rows of the input file
    pub row_index: usize,
    /// Every cell of the row, padded to the header width
    pub fields: Vec<String>,
}

impl TitleRecord {
    /// Row number as a spreadsheet shows it (header is row 1)
    pub fn display_row(&self) -> usize {
        self.row_index + 2
    }

    /// Title cell, `None` when the cell is empty
    pub fn title(&self, column: &TitleColumn) -> Option<&str> {
        self.fields
            .get(column.index)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// In-memory copy of the input table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    pub headers: Vec<String>,
    pub records: Vec<TitleRecord>,
}

impl RecordTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keep the first row for each distinct title; returns how many rows were dropped
    pub fn dedup_by_title(&mut self, column: &TitleColumn) -> usize {
        let before = self.records.len();
        let mut seen: HashSet<String> = HashSet::new();
        self.records.retain(|record| {
            let value = record.fields.get(column.index).cloned().unwrap_or_default();
            seen.insert(value)
        });
        before - self.records.len()
    }
}

/// Result of loading the input table
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: RecordTable,
    pub title_column: TitleColumn,
    pub encoding: TextEncoding,
    pub duplicates_removed: usize,
}

/// Read, decode, parse and deduplicate the table at `path`
pub fn load_records(path: &Path, policy: &ColumnPolicy) -> MdResult<LoadedTable> {
    let bytes = std::fs::read(path)
        .map_err(|e| MdMatchError::TableRead(format!("{}: {}", path.display(), e)))?;
    let (text, encoding) = decode_text(&bytes)?;

    let (mut table, title_column) = parse_records(&text, policy)?;
    let duplicates_removed = table.dedup_by_title(&title_column);

    info!(
        "📄 Table ready: {} rows, {} (title column '{}', {} duplicates dropped)",
        table.len(),
        encoding.label(),
        title_column.name,
        duplicates_removed
    );

    Ok(LoadedTable {
        table,
        title_column,
        encoding,
        duplicates_removed,
    })
}

/// Parse CSV text with a header row and resolve the title column
pub fn parse_records(text: &str, policy: &ColumnPolicy) -> MdResult<(RecordTable, TitleColumn)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    // Blank header cells get the same placeholder a spreadsheet export shows
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, name)| match name {
            "" => format!("Unnamed: {}", index),
            _ => name.to_string(),
        })
        .collect();
    if headers.is_empty() {
        return Err(MdMatchError::TableRead("missing header row".into()));
    }

    let title_column = policy.resolve(&headers).ok_or_else(|| {
        MdMatchError::TitleColumn(format!(
            "no column satisfies {:?} in headers {:?}",
            policy.strategies(),
            headers
        ))
    })?;

    let mut records = Vec::new();
    for (row_index, row) in reader.records().enumerate() {
        let row = row?;
        if row.len() > headers.len() {
            return Err(MdMatchError::TableRead(format!(
                "row {}: expected {} fields, saw {}",
                row_index + 2,
                headers.len(),
                row.len()
            )));
        }
        let mut fields: Vec<String> = row.iter().map(str::to_string).collect();
        fields.resize(headers.len(), String::new());
        records.push(TitleRecord { row_index, fields });
    }

    Ok((RecordTable { headers, records }, title_column))
}
