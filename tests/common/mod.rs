use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use mdmatch::Config;

/// Temporary workspace holding an article folder, a CSV export and an output path
pub struct TestContext {
    pub temp_dir: TempDir,
    pub source_dir: PathBuf,
    pub table_path: PathBuf,
    pub output_path: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let source_dir = temp_dir.path().join("articles");
        fs::create_dir_all(&source_dir).expect("Failed to create articles dir");

        let table_path = temp_dir.path().join("export.csv");
        let output_path = temp_dir.path().join("out").join("output.xlsx");

        Self {
            temp_dir,
            source_dir,
            table_path,
            output_path,
        }
    }

    pub fn add_article(&self, name: &str, content: &str) {
        fs::write(self.source_dir.join(name), content).expect("Failed to write article");
    }

    pub fn write_table(&self, csv: &str) {
        fs::write(&self.table_path, csv).expect("Failed to write table");
    }

    pub fn write_table_bytes(&self, bytes: &[u8]) {
        fs::write(&self.table_path, bytes).expect("Failed to write table");
    }

    pub fn config(&self) -> Config {
        Config {
            source_dir: self.source_dir.clone(),
            table_path: self.table_path.clone(),
            output_path: self.output_path.clone(),
            ..Config::default()
        }
    }
}
