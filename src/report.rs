//! Run summary and spreadsheet output

use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

use crate::core::{MatchResults, UnmatchedTitle};
use crate::error::{MdMatchError, MdResult};
use crate::library::{ArticleLibrary, FileId};
use crate::records::{LoadedTable, RecordTable};

/// Longest string an xlsx cell can hold
pub const MAX_CELL_CHARS: usize = 32_767;

/// Counts and leftovers of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_records: usize,
    /// `utf-8` or `gbk`
    pub table_encoding: &'static str,
    pub duplicates_removed: usize,
    pub total_files: usize,
    pub used_files: usize,
    pub distinct_keys: usize,
    pub collision_buckets: usize,
    pub unmatched: Vec<UnmatchedTitle>,
    /// Scanned files no title was matched to, in scan order
    pub unused_files: Vec<String>,
}

impl Summary {
    pub fn build(
        loaded: &LoadedTable,
        library: &ArticleLibrary,
        results: &MatchResults,
        used: &BTreeSet<FileId>,
    ) -> Self {
        let unused_files = library
            .files()
            .iter()
            .enumerate()
            .filter(|(id, _)| !used.contains(id))
            .map(|(_, file)| file.name.clone())
            .collect();

        Self {
            total_records: loaded.table.len(),
            table_encoding: loaded.encoding.label(),
            duplicates_removed: loaded.duplicates_removed,
            total_files: library.len(),
            used_files: used.len(),
            distinct_keys: library.index().key_count(),
            collision_buckets: library.index().collisions().count(),
            unmatched: results.unmatched.clone(),
            unused_files,
        }
    }

    pub fn unmatched_count(&self) -> usize {
        self.unmatched.len()
    }

    pub fn unused_count(&self) -> usize {
        self.unused_files.len()
    }

    /// Print counts, the first `preview` unmatched titles and every unused file
    pub fn log(&self, preview: usize) {
        for line in self.lines(preview) {
            info!("{}", line);
        }
    }

    /// Console lines for `log`; unmatched titles past `preview` collapse to `...`
    pub fn lines(&self, preview: usize) -> Vec<String> {
        let mut lines = vec![
            "=".repeat(40),
            format!(
                " Table rows:   {} ({}, {} duplicates dropped)",
                self.total_records, self.table_encoding, self.duplicates_removed
            ),
            format!(" Files found:  {}", self.total_files),
            format!(" Files used:   {}", self.used_files),
            "=".repeat(40),
        ];

        if self.unmatched.is_empty() {
            lines.push("✅ Every table row found a file.".to_string());
        } else {
            lines.push(format!(
                "❓ {} table rows have no matching file:",
                self.unmatched_count()
            ));
            for entry in self.unmatched.iter().take(preview) {
                lines.push(format!(
                    "   row [{}] title: {}",
                    entry.display_row, entry.title
                ));
            }
            if self.unmatched_count() > preview {
                lines.push("   ...".to_string());
            }
        }

        if self.unused_files.is_empty() {
            lines.push("✅ Every file was used.".to_string());
        } else {
            lines.push(format!(
                "📭 {} files are not referenced by the table:",
                self.unused_count()
            ));
            if self.collision_buckets > 0 {
                lines.push(format!(
                    "   ({} keys are shared by several files; only the first of each can match)",
                    self.collision_buckets
                ));
            }
            for name in &self.unused_files {
                lines.push(format!("   - {}", name));
            }
        }

        lines
    }

    pub fn save_json(&self, path: &Path) -> MdResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// The input table with the match columns applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Add (or overwrite) the file name and content columns.
///
/// `assignments` holds one entry per table row; `None` leaves both cells empty.
pub fn augment(
    table: &RecordTable,
    assignments: &[Option<FileId>],
    library: &ArticleLibrary,
    file_name_header: &str,
    content_header: &str,
) -> ReportTable {
    let mut headers = table.headers.clone();
    let name_col = column_slot(&mut headers, file_name_header);
    let content_col = column_slot(&mut headers, content_header);

    let rows = table
        .records
        .iter()
        .zip(assignments.iter().chain(std::iter::repeat(&None)))
        .map(|(record, assignment)| {
            let mut row = record.fields.clone();
            row.resize(headers.len(), String::new());
            let (name, content) = assignment
                .and_then(|id| library.file(id))
                .map(|file| (file.name.clone(), file.content.clone()))
                .unwrap_or_default();
            row[name_col] = name;
            row[content_col] = content;
            row
        })
        .collect();

    ReportTable { headers, rows }
}

fn column_slot(headers: &mut Vec<String>, name: &str) -> usize {
    match headers.iter().position(|h| h == name) {
        Some(index) => index,
        None => {
            headers.push(name.to_string());
            headers.len() - 1
        }
    }
}

/// Write `report` as a single-sheet xlsx file, replacing any existing file
pub fn write_xlsx(report: &ReportTable, path: &Path) -> MdResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut workbook = Workbook::new();
    // Fixed timestamp keeps repeated runs byte-identical
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    let properties = DocProperties::new().set_creation_datetime(&created);
    workbook.set_properties(&properties);

    let worksheet = workbook.add_worksheet();
    for (col, header) in report.headers.iter().enumerate() {
        worksheet.write_string(0, col_num(col)?, header.as_str())?;
    }

    for (row_index, row) in report.rows.iter().enumerate() {
        let row_num = u32::try_from(row_index + 1)
            .map_err(|_| MdMatchError::Report(format!("too many rows: {}", row_index + 1)))?;
        for (col, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let text = clamp_cell(value);
            if let Cow::Owned(_) = text {
                warn!(
                    "✂️ Row {} column '{}' truncated to {} characters",
                    row_index + 2,
                    report.headers.get(col).map(String::as_str).unwrap_or("?"),
                    MAX_CELL_CHARS
                );
            }
            worksheet.write_string(row_num, col_num(col)?, &*text)?;
        }
    }

    workbook.save(path)?;
    info!("💾 Report saved: {}", path.display());
    Ok(())
}

fn col_num(col: usize) -> MdResult<u16> {
    u16::try_from(col).map_err(|_| MdMatchError::Report(format!("too many columns: {}", col)))
}

/// Cut `text` to the xlsx cell limit, borrowing when it already fits
pub fn clamp_cell(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((byte_index, _)) => Cow::Owned(text[..byte_index].to_string()),
        None => Cow::Borrowed(text),
    }
}
