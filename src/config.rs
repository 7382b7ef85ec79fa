use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::DEFAULT_MATCH_LEN;
use crate::error::{MdMatchError, MdResult};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Inputs
    pub source_dir: PathBuf,
    pub table_path: PathBuf,
    pub extension: String,

    // Output
    pub output_path: PathBuf,
    pub file_name_header: String,
    pub content_header: String,

    // Matching
    pub match_len: usize,
    /// Header labels tried in order before the positional fallback
    pub title_columns: Vec<String>,
    pub fallback_column: usize,

    // Diagnostics
    pub unmatched_preview: usize,
}

impl Default for Config {
    fn default() -> Self {
        let downloads = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            source_dir: downloads.join("articles"),
            table_path: downloads.join("articles.csv"),
            extension: "md".to_string(),
            output_path: PathBuf::from("output.xlsx"),
            file_name_header: "Markdown文件名".to_string(),
            content_header: "Markdown内容".to_string(),
            match_len: DEFAULT_MATCH_LEN,
            title_columns: vec!["标题".to_string(), "Title".to_string()],
            fallback_column: 1,
            unmatched_preview: 10,
        }
    }
}

impl Config {
    /// Load config from the default location, or fall back to defaults
    pub fn load() -> MdResult<Self> {
        let config_path = config_path();

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Load config from an explicitly chosen file. Unlike `load`, a bad file is an error.
    pub fn load_from(path: &Path) -> MdResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            MdMatchError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| MdMatchError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> MdResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> MdResult<()> {
        if self.match_len == 0 {
            return Err(MdMatchError::Config("match_len must be at least 1".into()));
        }
        if self.extension.trim_start_matches('.').is_empty() {
            return Err(MdMatchError::Config("extension must not be empty".into()));
        }
        if self.file_name_header == self.content_header {
            return Err(MdMatchError::Config(
                "file_name_header and content_header must differ".into(),
            ));
        }
        Ok(())
    }

    /// Extension without a leading dot, e.g. `md`
    pub fn bare_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mdmatch")
        .join("config.json")
}
