//! Bounded list of recently viewed URLs.
//!
//! The list is a plain value: load it, hand it to whoever handles the
//! request, and save what comes back. Persisted as one URL per line.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::Result;
use crate::urls::looks_like_url;

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 5;

/// Recently used URLs, oldest first, most recent last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlHistory {
    entries: Vec<String>,
}

impl UrlHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a history from entries in oldest-to-newest order.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut history = Self::new();
        for entry in entries {
            history.push(entry);
        }
        history
    }

    /// Records a use of `url`.
    ///
    /// An existing equal entry moves to the end instead of being duplicated;
    /// the oldest entries fall off once [`HISTORY_CAPACITY`] is exceeded.
    pub fn push(&mut self, url: impl Into<String>) {
        let url = url.into();
        let url = url.trim();
        if url.is_empty() {
            return;
        }

        self.entries.retain(|entry| entry != url);
        self.entries.push(url.to_string());

        if self.entries.len() > HISTORY_CAPACITY {
            let excess = self.entries.len() - HISTORY_CAPACITY;
            self.entries.drain(..excess);
        }
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// The most recently used entry.
    pub fn latest(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads history from `path`. A missing file is an empty history.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(err) => return Err(err.into()),
        };

        let history = Self::from_entries(content.lines().filter(|line| !line.trim().is_empty()));
        debug!(path = %path.display(), entries = history.len(), "loaded history");
        Ok(history)
    }

    /// Writes history to `path`, creating parent directories as needed.
    ///
    /// Entries that do not look like http(s) URLs are silently left out.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut content = String::new();
        for entry in self.entries.iter().filter(|entry| looks_like_url(entry)) {
            content.push_str(entry);
            content.push('\n');
        }

        fs::write(path, content)?;
        debug!(path = %path.display(), "saved history");
        Ok(())
    }
}

/// Default history location under the platform data directory.
pub fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("aaview").join("history.txt"))
}
