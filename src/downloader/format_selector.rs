// FormatSelector - which (type, quality, extension) combinations a platform offers
//
// The offered list is derived purely from the platform capability set:
// - video: HD then SD mp4
// - audio: one high quality mp3
// - image: one high quality jpg

use super::errors::DownloadError;
use super::models::{DownloadFormat, MediaKind, Quality};
use super::platforms::PlatformConfig;

pub struct FormatSelector;

impl FormatSelector {
    /// Build the ordered format list for a platform
    pub fn available_formats(config: &PlatformConfig) -> Vec<DownloadFormat> {
        let mut formats = Vec::new();

        if config.supports.video {
            formats.push(DownloadFormat::new(MediaKind::Video, Quality::Hd, "mp4", "~50MB"));
            formats.push(DownloadFormat::new(MediaKind::Video, Quality::Sd, "mp4", "~25MB"));
        }

        if config.supports.audio {
            formats.push(DownloadFormat::new(MediaKind::Audio, Quality::High, "mp3", "~8MB"));
        }

        if config.supports.image {
            formats.push(DownloadFormat::new(MediaKind::Image, Quality::High, "jpg", "~2MB"));
        }

        formats
    }

    /// Label shown next to a format
    pub fn quality_label(format: &DownloadFormat) -> &'static str {
        match format.quality {
            Quality::Hd => "HD (1080p)",
            Quality::Sd => "SD (720p)",
            Quality::High => "High quality",
            Quality::Medium => "Medium quality",
            Quality::Low => "Low quality",
        }
    }

    /// Selector string for a format, e.g. "video-hd"
    pub fn selector(format: &DownloadFormat) -> String {
        format!("{}-{}", format.kind, format.quality)
    }

    /// Find a format by selector: "video-hd", "video", "audio-high", "mp3"...
    ///
    /// A bare type or extension picks the first matching entry.
    pub fn find_format(
        formats: &[DownloadFormat],
        selector: &str,
    ) -> Result<DownloadFormat, DownloadError> {
        let wanted = selector.trim().to_lowercase();

        formats
            .iter()
            .find(|f| Self::selector(f) == wanted)
            .or_else(|| formats.iter().find(|f| f.kind.as_str() == wanted))
            .or_else(|| formats.iter().find(|f| f.extension == wanted))
            .cloned()
            .ok_or_else(|| {
                let offered: Vec<String> = formats.iter().map(Self::selector).collect();
                DownloadError::UnknownFormat(format!(
                    "'{}' (available: {})",
                    selector,
                    offered.join(", ")
                ))
            })
    }

    /// Default pick when the user has no preference
    pub fn recommend(formats: &[DownloadFormat]) -> Option<&DownloadFormat> {
        formats.first()
    }
}
