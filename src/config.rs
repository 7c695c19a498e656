// Application configuration - provider endpoints, timeouts and directories
//
// Loaded once at startup from `<config dir>/media-downloader/config.json`
// (missing file → defaults) and passed by reference to whatever needs it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::downloader::models::NetworkConfig;
use crate::downloader::platforms::Platform;

pub const APP_DIR_NAME: &str = "media-downloader";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Third-party endpoints used by the extraction and download strategies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Multi-platform extraction/download API (JSON POST)
    pub cobalt: String,
    /// Hosted yt-dlp download API (JSON POST)
    pub ytdlp: String,
    /// SaveFrom analyzer (form POST)
    pub savefrom: String,
    /// Secondary embed API
    pub noembed: String,
    /// Platform-specific info APIs, queried with `?url=…&format=json`
    pub platform_apis: HashMap<Platform, Vec<String>>,
    /// Platform oEmbed endpoints
    pub oembed: HashMap<Platform, String>,
    /// CORS-style proxies; the encoded target URL is appended
    pub proxies: Vec<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        let platform_apis = HashMap::from([
            (
                Platform::Youtube,
                vec!["https://noembed.com/embed".to_string()],
            ),
            (
                Platform::Tiktok,
                vec![
                    "https://musicaldown.com/download".to_string(),
                    "https://snaptik.app/abc.php".to_string(),
                ],
            ),
            (
                Platform::Instagram,
                vec![
                    "https://instaloader.github.io/api/instagram".to_string(),
                    "https://inflact.com/downloader/instagram/photo/".to_string(),
                ],
            ),
            (
                Platform::Facebook,
                vec![
                    "https://graph.facebook.com/v18.0/oembed_video".to_string(),
                    "https://fbdown.net/download.php".to_string(),
                ],
            ),
            (
                Platform::Twitter,
                vec![
                    "https://twittervideodownloader.com/api/twitter".to_string(),
                    "https://twdown.net/download.php".to_string(),
                ],
            ),
            (
                Platform::Pinterest,
                vec![
                    "https://pindown.net/download.php".to_string(),
                    "https://pindl.net/api/download".to_string(),
                ],
            ),
            (
                Platform::Whatsapp,
                vec![
                    "https://whatsapp-status-downloader.com/api".to_string(),
                    "https://watools.io/api/download".to_string(),
                    "https://whatsave.info/api/download".to_string(),
                ],
            ),
        ]);

        let oembed = HashMap::from([
            (Platform::Youtube, "https://www.youtube.com/oembed".to_string()),
            (Platform::Tiktok, "https://www.tiktok.com/oembed".to_string()),
            (Platform::Instagram, "https://api.instagram.com/oembed".to_string()),
            (Platform::Twitter, "https://publish.twitter.com/oembed".to_string()),
            (
                Platform::Pinterest,
                "https://www.pinterest.com/resource/oembed/".to_string(),
            ),
        ]);

        Self {
            cobalt: "https://co.wuk.sh/api/json".to_string(),
            ytdlp: "https://ytdlp-web.herokuapp.com/api/download".to_string(),
            savefrom: "https://sfrom.net/mates/en/analyze/ajax".to_string(),
            noembed: "https://noembed.com/embed".to_string(),
            platform_apis,
            oembed,
            proxies: vec![
                "https://api.allorigins.win/get?url=".to_string(),
                "https://cors-anywhere.herokuapp.com/".to_string(),
                "https://api.codetabs.com/v1/proxy?quest=".to_string(),
            ],
        }
    }
}

impl Endpoints {
    /// Every endpoint pointing at one base URL, for local test servers
    pub fn all_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let platform_apis = Platform::all()
            .iter()
            .map(|p| (*p, vec![format!("{}/{}/info", base, p)]))
            .collect();
        let oembed = Platform::all()
            .iter()
            .filter(|p| **p != Platform::Facebook && **p != Platform::Whatsapp)
            .map(|p| (*p, format!("{}/{}/oembed", base, p)))
            .collect();

        Self {
            cobalt: format!("{}/cobalt", base),
            ytdlp: format!("{}/ytdlp", base),
            savefrom: format!("{}/savefrom", base),
            noembed: format!("{}/noembed", base),
            platform_apis,
            oembed,
            proxies: vec![format!("{}/proxy?url=", base)],
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: NetworkConfig,
    pub endpoints: Endpoints,
    /// Bounded wait per metadata strategy
    pub metadata_timeout_secs: u64,
    /// Bounded wait per download strategy
    pub download_timeout_secs: u64,
    /// Where downloaded files are saved
    pub output_dir: PathBuf,
    /// Where history, favorites and settings live
    pub data_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            endpoints: Endpoints::default(),
            metadata_timeout_secs: 8,
            download_timeout_secs: 10,
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            data_dir: dirs::data_dir()
                .map(|d| d.join(APP_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME)),
        }
    }
}

impl AppConfig {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join(CONFIG_FILE))
    }

    /// Load config from `path` (or the default location).
    ///
    /// A missing file yields defaults; an unreadable or corrupt one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Ok(Self::default()),
        };

        if !path.exists() {
            tracing::debug!("[Config] No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("[Config] Loaded {}", path.display());
        Ok(config)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        if proxy.is_some() {
            self.network.proxy = proxy;
        }
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_timeouts(mut self, metadata_secs: u64, download_secs: u64) -> Self {
        self.metadata_timeout_secs = metadata_secs;
        self.download_timeout_secs = download_secs;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = dir;
        self
    }
}
