use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the per-source download log
pub const DOWNLOAD_LOG_FILE: &str = ".download_log.json";

/// On-disk shape of the download log
#[derive(Debug, Default, Serialize, Deserialize)]
struct LogFile {
    #[serde(default)]
    processed_urls: Vec<String>,
}

/// Set of post URLs already rendered for one source
///
/// URLs are compared as exact strings; no normalization happens beyond what
/// archive discovery already applied.
#[derive(Debug, Clone)]
pub struct DownloadLog {
    path: PathBuf,
    processed: BTreeSet<String>,
}

impl DownloadLog {
    /// Creates an empty log bound to `path` without touching the disk
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            processed: BTreeSet::new(),
        }
    }

    /// Loads the log at `path`
    ///
    /// A missing file yields an empty set. An unreadable or malformed file
    /// also yields an empty set with a warning; it never blocks a run.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No download log at {}, starting empty", path.display());
                return Self::empty(path);
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read download log {}: {}. Starting fresh for this source.",
                    path.display(),
                    e
                );
                return Self::empty(path);
            }
        };

        match serde_json::from_str::<LogFile>(&content) {
            Ok(file) => Self {
                path,
                processed: file.processed_urls.into_iter().collect(),
            },
            Err(e) => {
                tracing::warn!(
                    "Could not parse download log {}: {}. Starting fresh for this source.",
                    path.display(),
                    e
                );
                Self::empty(path)
            }
        }
    }

    /// Returns true if `url` has already been processed
    pub fn contains(&self, url: &str) -> bool {
        self.processed.contains(url)
    }

    /// Adds `url` to the set and rewrites the whole log file
    pub fn record(&mut self, url: &str) -> io::Result<()> {
        self.processed.insert(url.to_string());
        self.save()
    }

    /// Writes the full set to disk, creating the parent directory if needed
    pub fn save(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = LogFile {
            processed_urls: self.processed.iter().cloned().collect(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, json)
    }

    pub fn len(&self) -> usize {
        self.processed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processed.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterates over the processed URLs in sorted order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.processed.iter().map(String::as_str)
    }
}
