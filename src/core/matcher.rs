//! Title to file matching
//!
//! Each title is keyed with the same normalizer as the file names and looked
//! up in the key index. The first file of a bucket always wins; later files
//! sharing the key are never handed out, even when the first one is already
//! used by another title.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use super::KeyNormalizer;
use crate::library::{ArticleLibrary, FileId};
use crate::records::{RecordTable, TitleColumn};

/// A title without any file sharing its key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedTitle {
    pub display_row: usize,
    pub title: String,
}

/// Per-row outcome of a matching pass
#[derive(Debug, Clone, Default)]
pub struct MatchResults {
    /// One entry per table row, in row order
    pub assignments: Vec<Option<FileId>>,
    pub unmatched: Vec<UnmatchedTitle>,
}

impl MatchResults {
    pub fn matched_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.is_some()).count()
    }
}

/// Resolves titles against a library and remembers which files were used
pub struct Matcher<'a> {
    library: &'a ArticleLibrary,
    normalizer: &'a KeyNormalizer,
    used: BTreeSet<FileId>,
}

impl<'a> Matcher<'a> {
    pub fn new(library: &'a ArticleLibrary, normalizer: &'a KeyNormalizer) -> Self {
        Self {
            library,
            normalizer,
            used: BTreeSet::new(),
        }
    }

    /// Pick the file for one title and mark it used
    pub fn resolve(&mut self, title: Option<&str>) -> Option<FileId> {
        let key = self.normalizer.key(title);
        let candidates = self.library.index().candidates(&key)?;
        let chosen = *candidates.first()?;
        if candidates.len() > 1 {
            debug!(
                "Key '{}' has {} candidates, taking the first",
                key,
                candidates.len()
            );
        }
        self.used.insert(chosen);
        Some(chosen)
    }

    /// Match every row of `table` in order
    pub fn match_table(&mut self, table: &RecordTable, column: &TitleColumn) -> MatchResults {
        let mut results = MatchResults::default();
        for record in &table.records {
            let title = record.title(column);
            let assignment = self.resolve(title);
            if assignment.is_none() {
                results.unmatched.push(UnmatchedTitle {
                    display_row: record.display_row(),
                    title: title.unwrap_or_default().to_string(),
                });
            }
            results.assignments.push(assignment);
        }
        results
    }

    /// Files handed out to at least one title
    pub fn used(&self) -> &BTreeSet<FileId> {
        &self.used
    }

    pub fn into_used(self) -> BTreeSet<FileId> {
        self.used
    }
}
