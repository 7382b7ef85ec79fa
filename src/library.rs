use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::core::KeyNormalizer;
use crate::error::{MdMatchError, MdResult};

/// Position of a file in scan order
pub type FileId = usize;

/// A scanned article file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFile {
    pub name: String,
    pub content: String,
    pub key: String,
}

/// Match key -> files sharing that key, in scan order
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    buckets: BTreeMap<String, Vec<FileId>>,
}

impl KeyIndex {
    fn insert(&mut self, key: String, id: FileId) {
        self.buckets.entry(key).or_default().push(id);
    }

    pub fn candidates(&self, key: &str) -> Option<&[FileId]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Buckets holding more than one file
    pub fn collisions(&self) -> impl Iterator<Item = (&str, &[FileId])> {
        self.buckets
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(key, ids)| (key.as_str(), ids.as_slice()))
    }
}

/// All article files of the source directory, with their key index
#[derive(Debug, Clone, Default)]
pub struct ArticleLibrary {
    files: Vec<ArticleFile>,
    by_name: HashMap<String, FileId>,
    index: KeyIndex,
}

impl ArticleLibrary {
    /// Build from already-read `(name, content)` pairs, keeping their order
    pub fn from_entries<I>(entries: I, normalizer: &KeyNormalizer) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut library = Self::default();
        for (name, content) in entries {
            library.push(name, content, normalizer);
        }
        library
    }

    fn push(&mut self, name: String, content: String, normalizer: &KeyNormalizer) {
        let id = self.files.len();
        let key = normalizer.key_str(&name);
        self.index.insert(key.clone(), id);
        self.by_name.insert(name.clone(), id);
        self.files.push(ArticleFile { name, content, key });
    }

    /// Read every `*.{extension}` file directly inside `root_path`.
    ///
    /// A missing directory is an error; an unreadable file is logged and left out.
    pub fn scan_directory(
        root_path: &Path,
        extension: &str,
        normalizer: &KeyNormalizer,
    ) -> MdResult<Self> {
        if !root_path.is_dir() {
            return Err(MdMatchError::SourceDirMissing(root_path.to_path_buf()));
        }

        let suffix = format!(".{}", extension.trim_start_matches('.').to_lowercase());
        let mut library = Self::default();

        for entry in WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("⚠️ Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let Some(name) = entry.file_name().to_str() else {
                warn!(
                    "⚠️ Skipping non UTF-8 file name: {}",
                    entry.file_name().to_string_lossy()
                );
                continue;
            };
            if !name.to_lowercase().ends_with(&suffix) {
                continue;
            }

            match std::fs::read_to_string(entry.path()) {
                Ok(content) => library.push(name.to_string(), content, normalizer),
                Err(e) => warn!("⚠️ Failed to read {}: {}", name, e),
            }
        }

        info!(
            "📚 Scanned {}: {} files, {} distinct keys",
            root_path.display(),
            library.len(),
            library.index.key_count()
        );
        for (key, ids) in library.index.collisions() {
            warn!(
                "🔀 Key '{}' is shared by {} files; only '{}' can be matched",
                key,
                ids.len(),
                library.files[ids[0]].name
            );
            for &id in &ids[1..] {
                debug!("   shadowed: {}", library.files[id].name);
            }
        }

        Ok(library)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[ArticleFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> Option<&ArticleFile> {
        self.files.get(id)
    }

    /// File names in scan order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn content(&self, name: &str) -> Option<&str> {
        self.by_name
            .get(name)
            .map(|&id| self.files[id].content.as_str())
    }

    pub fn index(&self) -> &KeyIndex {
        &self.index
    }
}
