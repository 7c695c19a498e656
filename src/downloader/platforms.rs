// Platform registry - supported services, their capabilities and URL detection

use std::fmt;
use std::str::FromStr;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::errors::DownloadError;

/// Supported source services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Tiktok,
    Facebook,
    Pinterest,
    Twitter,
    Whatsapp,
    Instagram,
}

/// Media kinds a platform can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub video: bool,
    pub audio: bool,
    pub image: bool,
}

/// Display metadata and capabilities for a platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformConfig {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub supports: Capabilities,
}

const ALL: [Platform; 7] = [
    Platform::Youtube,
    Platform::Tiktok,
    Platform::Facebook,
    Platform::Pinterest,
    Platform::Twitter,
    Platform::Whatsapp,
    Platform::Instagram,
];

const ALL_MEDIA: Capabilities = Capabilities {
    video: true,
    audio: true,
    image: true,
};

static YOUTUBE: PlatformConfig = PlatformConfig {
    name: "YouTube",
    icon: "ri-youtube-fill",
    color: "text-red-500",
    supports: ALL_MEDIA,
};

static TIKTOK: PlatformConfig = PlatformConfig {
    name: "TikTok",
    icon: "ri-tiktok-fill",
    color: "text-black",
    supports: ALL_MEDIA,
};

static FACEBOOK: PlatformConfig = PlatformConfig {
    name: "Facebook",
    icon: "ri-facebook-fill",
    color: "text-blue-600",
    supports: ALL_MEDIA,
};

static PINTEREST: PlatformConfig = PlatformConfig {
    name: "Pinterest",
    icon: "ri-pinterest-fill",
    color: "text-red-600",
    supports: Capabilities {
        video: true,
        audio: false,
        image: true,
    },
};

static TWITTER: PlatformConfig = PlatformConfig {
    name: "X (Twitter)",
    icon: "ri-twitter-x-fill",
    color: "text-black",
    supports: ALL_MEDIA,
};

static WHATSAPP: PlatformConfig = PlatformConfig {
    name: "WhatsApp",
    icon: "ri-whatsapp-fill",
    color: "text-green-500",
    supports: ALL_MEDIA,
};

static INSTAGRAM: PlatformConfig = PlatformConfig {
    name: "Instagram",
    icon: "ri-instagram-fill",
    color: "text-pink-500",
    supports: ALL_MEDIA,
};

// Optional scheme, any subdomains, the platform domain, then port/path/query/fragment or end.
macro_rules! host_pattern {
    ($domains:expr) => {
        Regex::new(&format!(
            r"(?i)^(?:https?://)?(?:[a-z0-9-]+\.)*(?:{})(?::\d+)?(?:[/?#]|$)",
            $domains
        ))
        .unwrap()
    };
}

lazy_static::lazy_static! {
    /// Ordered detection table, first match wins
    static ref PATTERNS: Vec<(Platform, Regex)> = vec![
        (Platform::Youtube, host_pattern!(r"youtube\.com|youtu\.be|youtube-nocookie\.com")),
        (Platform::Tiktok, host_pattern!(r"tiktok\.com")),
        (Platform::Facebook, host_pattern!(r"facebook\.com|fb\.watch|fb\.com")),
        (Platform::Pinterest, host_pattern!(r"pinterest\.[a-z]{2,3}(?:\.[a-z]{2})?|pin\.it")),
        (Platform::Twitter, host_pattern!(r"twitter\.com|x\.com")),
        (Platform::Whatsapp, host_pattern!(r"whatsapp\.com|wa\.me")),
        (Platform::Instagram, host_pattern!(r"instagram\.com|instagr\.am")),
    ];
}

impl Platform {
    /// Every platform, in detection order
    pub fn all() -> &'static [Platform] {
        &ALL
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
            Self::Facebook => "facebook",
            Self::Pinterest => "pinterest",
            Self::Twitter => "twitter",
            Self::Whatsapp => "whatsapp",
            Self::Instagram => "instagram",
        }
    }

    pub fn config(&self) -> &'static PlatformConfig {
        config_for(*self)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DownloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL.iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| DownloadError::UnsupportedPlatform(s.to_string()))
    }
}

/// Detect the platform a raw URL string belongs to
pub fn classify(url: &str) -> Option<Platform> {
    let url = url.trim();
    PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(url))
        .map(|(platform, _)| *platform)
}

/// Display metadata and capabilities for a platform
pub fn config_for(platform: Platform) -> &'static PlatformConfig {
    match platform {
        Platform::Youtube => &YOUTUBE,
        Platform::Tiktok => &TIKTOK,
        Platform::Facebook => &FACEBOOK,
        Platform::Pinterest => &PINTEREST,
        Platform::Twitter => &TWITTER,
        Platform::Whatsapp => &WHATSAPP,
        Platform::Instagram => &INSTAGRAM,
    }
}
