// Local store - history, favorites and settings as JSON files
//
// Reads never fail: a missing, unreadable or corrupt file reads as empty
// (or default settings). Writes report `StorageError` and callers decide
// whether to surface it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::downloader::models::{DownloadHistoryEntry, MediaInfo};

pub const HISTORY_FILE: &str = "media-downloader-history.json";
pub const FAVORITES_FILE: &str = "media-downloader-favorites.json";
pub const SETTINGS_FILE: &str = "media-downloader-settings.json";

/// Maximum number of history entries kept
pub const HISTORY_CAP: usize = 100;

lazy_static::lazy_static! {
    static ref HEX_COLOR_RE: Regex = Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").unwrap();
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => f.write_str("light"),
            Self::Dark => f.write_str("dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(StorageError::InvalidSetting(format!(
                "theme must be light or dark, got {}",
                other
            ))),
        }
    }
}

/// User preferences; unknown or missing keys fall back to the defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub language: String,
    pub theme: Theme,
    pub primary_color: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            theme: Theme::Light,
            primary_color: "#6366F1".to_string(),
        }
    }
}

impl AppSettings {
    /// Set one field by its CLI/JSON key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match key {
            "language" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(StorageError::InvalidSetting("language is empty".to_string()));
                }
                self.language = value.to_string();
            }
            "theme" => self.theme = value.parse()?,
            "primaryColor" | "primary-color" | "primary_color" => {
                if !HEX_COLOR_RE.is_match(value.trim()) {
                    return Err(StorageError::InvalidSetting(format!(
                        "primaryColor must be a hex color like #6366F1, got {}",
                        value
                    )));
                }
                self.primary_color = value.trim().to_string();
            }
            other => {
                return Err(StorageError::InvalidSetting(format!("unknown key {}", other)));
            }
        }
        Ok(())
    }
}

/// JSON-file store rooted at the data directory
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.dir.join(file);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("[Store] Failed to read {}: {}", path.display(), e);
                }
                return T::default();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("[Store] Ignoring corrupt {}: {}", path.display(), e);
            T::default()
        })
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StorageError> {
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Encode {
            path: path.clone(),
            source,
        })?;

        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&path, json))
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        debug!("[Store] Wrote {}", path.display());
        Ok(())
    }

    // History

    /// Newest first
    pub fn history(&self) -> Vec<DownloadHistoryEntry> {
        self.read(HISTORY_FILE)
    }

    /// Prepend `entry`, replacing any entry with the same id, keeping at most
    /// [`HISTORY_CAP`] entries
    pub fn add_history(&self, entry: DownloadHistoryEntry) -> Result<(), StorageError> {
        let mut history = self.history();
        history.retain(|h| h.id != entry.id);
        history.insert(0, entry);
        history.truncate(HISTORY_CAP);
        self.write(HISTORY_FILE, &history)
    }

    /// Returns whether an entry was removed
    pub fn remove_history(&self, id: &str) -> Result<bool, StorageError> {
        let mut history = self.history();
        let before = history.len();
        history.retain(|h| h.id != id);
        if history.len() == before {
            return Ok(false);
        }
        self.write(HISTORY_FILE, &history)?;
        Ok(true)
    }

    pub fn clear_history(&self) -> Result<(), StorageError> {
        self.write::<[DownloadHistoryEntry]>(HISTORY_FILE, &[])
    }

    // Favorites

    /// Newest first
    pub fn favorites(&self) -> Vec<MediaInfo> {
        self.read(FAVORITES_FILE)
    }

    /// Prepend `media`; an existing favorite with the same id is replaced
    pub fn add_favorite(&self, media: MediaInfo) -> Result<(), StorageError> {
        let mut favorites = self.favorites();
        favorites.retain(|f| f.id != media.id);
        favorites.insert(0, media);
        self.write(FAVORITES_FILE, &favorites)
    }

    pub fn remove_favorite(&self, id: &str) -> Result<bool, StorageError> {
        let mut favorites = self.favorites();
        let before = favorites.len();
        favorites.retain(|f| f.id != id);
        if favorites.len() == before {
            return Ok(false);
        }
        self.write(FAVORITES_FILE, &favorites)?;
        Ok(true)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites().iter().any(|f| f.id == id)
    }

    /// Add or remove; returns whether `media` is a favorite afterwards
    pub fn toggle_favorite(&self, media: MediaInfo) -> Result<bool, StorageError> {
        if self.is_favorite(&media.id) {
            self.remove_favorite(&media.id)?;
            Ok(false)
        } else {
            self.add_favorite(media)?;
            Ok(true)
        }
    }

    // Settings

    pub fn settings(&self) -> AppSettings {
        self.read(SETTINGS_FILE)
    }

    pub fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        self.write(SETTINGS_FILE, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::{DownloadFormat, DownloadStatus, MediaKind, Quality};
    use crate::downloader::platforms::Platform;
    use pretty_assertions::assert_eq;

    fn media(id: &str) -> MediaInfo {
        MediaInfo {
            id: id.to_string(),
            title: format!("Clip {}", id),
            thumbnail: String::new(),
            duration: "1:00".to_string(),
            platform: Platform::Youtube,
            url: format!("https://youtu.be/{}", id),
            description: None,
            author: None,
            views: None,
            upload_date: None,
            synthetic: false,
        }
    }

    fn entry(id: &str, status: DownloadStatus) -> DownloadHistoryEntry {
        DownloadHistoryEntry {
            id: id.to_string(),
            media_info: media(id),
            format: DownloadFormat::new(MediaKind::Video, Quality::Hd, "mp4", "~50MB"),
            downloaded_at: "2024-05-01T10:00:00Z".to_string(),
            status,
            file_size: None,
            download_url: None,
            error: None,
        }
    }

    #[test]
    fn test_history_dedup_keeps_most_recent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        store.add_history(entry("a", DownloadStatus::Failed)).unwrap();
        store.add_history(entry("b", DownloadStatus::Completed)).unwrap();
        store.add_history(entry("a", DownloadStatus::Completed)).unwrap();

        let history = store.history();
        let ids: Vec<&str> = history.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(history[0].status, DownloadStatus::Completed);
    }

    #[test]
    fn test_history_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        for i in 0..105 {
            store.add_history(entry(&i.to_string(), DownloadStatus::Completed)).unwrap();
        }

        let history = store.history();
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].id, "104");
        assert_eq!(history[99].id, "5");
    }

    #[test]
    fn test_remove_and_clear_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.add_history(entry("a", DownloadStatus::Completed)).unwrap();
        store.add_history(entry("b", DownloadStatus::Completed)).unwrap();

        assert!(store.remove_history("a").unwrap());
        assert!(!store.remove_history("missing").unwrap());
        assert_eq!(store.history().len(), 1);

        store.clear_history().unwrap();
        assert!(store.history().is_empty());
    }

    #[test]
    fn test_corrupt_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(HISTORY_FILE), "{not json").unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "[]").unwrap();
        let store = LocalStore::new(dir.path());

        assert!(store.history().is_empty());
        assert!(store.favorites().is_empty());
        assert_eq!(store.settings(), AppSettings::default());
    }

    #[test]
    fn test_favorites_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        assert!(store.toggle_favorite(media("x")).unwrap());
        store.add_favorite(media("y")).unwrap();
        assert!(store.is_favorite("x"));
        assert_eq!(store.favorites()[0].id, "y");

        assert!(!store.toggle_favorite(media("x")).unwrap());
        assert!(!store.is_favorite("x"));
        assert_eq!(store.favorites().len(), 1);
    }

    #[test]
    fn test_partial_settings_merge_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), r#"{"theme":"dark"}"#).unwrap();
        let store = LocalStore::new(dir.path());

        let settings = store.settings();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.primary_color, "#6366F1");
        assert_eq!(settings.language, "en");
    }

    #[test]
    fn test_settings_set_validates() {
        let mut settings = AppSettings::default();

        settings.set("theme", "Dark").unwrap();
        settings.set("primaryColor", "#10B981").unwrap();
        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.primary_color, "#10B981");

        assert!(settings.set("theme", "blue").is_err());
        assert!(settings.set("primaryColor", "red").is_err());
        assert!(settings.set("volume", "11").is_err());
    }
}
