// Common data models for resolvers, sessions and the local store

use std::fmt;

use serde::{Deserialize, Serialize};

use super::platforms::Platform;

/// Title providers hand back when they know nothing; never accepted as a result
pub const PLACEHOLDER_TITLE: &str = "Media Content";

/// Normalized description of the content behind a URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub duration: String,
    pub platform: Platform,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_date: Option<String>,
    /// Some fields were generated rather than read from a provider
    #[serde(default)]
    pub synthetic: bool,
}

impl MediaInfo {
    /// Whether a resolver may stop at this result
    pub fn has_real_title(&self) -> bool {
        let title = self.title.trim();
        !title.is_empty() && title != PLACEHOLDER_TITLE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Image => "image",
        }
    }

    /// MIME type of the files we produce for this kind
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Video => "video/mp4",
            Self::Audio => "audio/mpeg",
            Self::Image => "image/jpeg",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Hd,
    Sd,
    High,
    Medium,
    Low,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hd => "hd",
            Self::Sd => "sd",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable (type, quality, extension) combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadFormat {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub quality: Quality,
    pub extension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl DownloadFormat {
    pub fn new(kind: MediaKind, quality: Quality, extension: &str, size: &str) -> Self {
        Self {
            kind,
            quality,
            extension: extension.to_string(),
            size: Some(size.to_string()),
            url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Completed,
    Failed,
    Pending,
}

/// Persisted record of one download attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadHistoryEntry {
    pub id: String,
    pub media_info: MediaInfo,
    pub format: DownloadFormat,
    /// RFC 3339 timestamp
    pub downloaded_at: String,
    pub status: DownloadStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DownloadHistoryEntry {
    pub fn downloaded_at(&self) -> Option<time::OffsetDateTime> {
        time::OffsetDateTime::parse(
            &self.downloaded_at,
            &time::format_description::well_known::Rfc3339,
        )
        .ok()
    }
}

/// Where a download session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadState {
    Preparing,
    Downloading,
    Completed,
    Error,
}

/// Download progress information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub percent: f32,
    pub status: DownloadState,
}

/// Outcome of download resolution
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedResource {
    /// A provider handed us a direct link
    Remote { url: String, mime: String },
    /// Every provider failed; a labeled demonstration file
    Placeholder {
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

impl ResolvedResource {
    /// URL for remote resources, `data:` URL for placeholders
    pub fn locator(&self) -> String {
        use base64::Engine;

        match self {
            Self::Remote { url, .. } => url.clone(),
            Self::Placeholder { mime, bytes, .. } => format!(
                "data:{};base64,{}",
                mime,
                base64::engine::general_purpose::STANDARD.encode(bytes)
            ),
        }
    }

    pub fn mime(&self) -> &str {
        match self {
            Self::Remote { mime, .. } | Self::Placeholder { mime, .. } => mime,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }
}

/// Network configuration for providers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// HTTP or SOCKS5 proxy URL (e.g., "socks5://127.0.0.1:1080")
    pub proxy: Option<String>,

    /// Per-request timeout in seconds
    pub timeout: Option<u32>,

    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: Some(30),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
        }
    }
}
