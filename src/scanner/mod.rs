//! Log file discovery.
//!
//! This module lists the benchmark logs in a results directory,
//! filtered by extension and sorted by file name.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Scanner for one results directory.
#[derive(Debug, Clone)]
pub struct LogScanner {
    dir: PathBuf,
    extension: String,
}

impl LogScanner {
    /// Create a scanner for `dir` matching files ending in `.<extension>`.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// List matching files directly inside the directory.
    ///
    /// A missing directory is not an error; it just has no logs.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            warn!("Results directory not found: {}", self.dir.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Cannot read entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.matches(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} logs in {}", files.len(), self.dir.display());
        Ok(files)
    }

    /// Check if a path has the configured extension.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }
}
