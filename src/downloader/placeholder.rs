// Placeholder files - produced when no backend yields a real link
//
// A real format header followed by a plain-text footer that says what the
// file is. Players will refuse it; a text viewer explains it.

use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use url::Url;

use super::models::{DownloadFormat, MediaKind, ResolvedResource};
use super::utils::{extract_title_from_url, sanitize_filename};

const MP4_HEADER: [u8; 48] = [
    0x00, 0x00, 0x00, 0x20, 0x66, 0x74, 0x79, 0x70, 0x69, 0x73, 0x6F, 0x6D, 0x00, 0x00, 0x02, 0x00,
    0x69, 0x73, 0x6F, 0x6D, 0x69, 0x73, 0x6F, 0x32, 0x61, 0x76, 0x63, 0x31, 0x6D, 0x70, 0x34, 0x31,
    0x00, 0x00, 0x00, 0x08, 0x66, 0x72, 0x65, 0x65, 0x00, 0x00, 0x02, 0x8F, 0x6D, 0x64, 0x61, 0x74,
];

// MPEG frame header, then an ID3v2.3 tag opening a TIT2 frame
const MP3_HEADER: [u8; 32] = [
    0xFF, 0xFB, 0x90, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x49, 0x44, 0x33, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x54, 0x49, 0x54, 0x32, 0x00, 0x00,
];

// SOI + JFIF APP0, then a COM segment
const JPEG_HEADER: [u8; 32] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x01, 0x00, 0x48,
    0x00, 0x48, 0x00, 0x00, 0xFF, 0xFE, 0x00, 0x13, 0x43, 0x72, 0x65, 0x61, 0x74, 0x65, 0x64, 0x20,
];

fn header(kind: MediaKind) -> &'static [u8] {
    match kind {
        MediaKind::Video => &MP4_HEADER,
        MediaKind::Audio => &MP3_HEADER,
        MediaKind::Image => &JPEG_HEADER,
    }
}

fn kind_label(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Video => "Video",
        MediaKind::Audio => "Audio",
        MediaKind::Image => "Image",
    }
}

/// Second-level label of the URL host: `www.youtube.com` → `youtube`
pub fn host_label(raw: &str) -> String {
    Url::parse(raw.trim())
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .and_then(|host| {
            let parts: Vec<&str> = host.split('.').collect();
            match parts.len() {
                0 => None,
                1 => Some(parts[0].to_string()),
                n => Some(parts[n - 2].to_string()),
            }
        })
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| "media".to_string())
}

/// Build the labeled stand-in file for `url` in `format`
pub fn generate(url: &str, format: &DownloadFormat, title: Option<&str>) -> ResolvedResource {
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| extract_title_from_url(url));
    let platform = host_label(url);
    let generated = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    let label = kind_label(format.kind);

    let footer = format!(
        "\nMediaDownloader - {label} Download\n\
         ================================\n\
         Title: {title}\n\
         Source: {url}\n\
         Platform: {platform}\n\
         Format: {ext}\n\
         Quality: {quality}\n\
         Generated: {generated}\n\
         \n\
         This is a demonstration {kind} file, not the requested media.\n\
         No download provider returned a direct link for this content.\n",
        ext = format.extension,
        quality = format.quality,
        kind = format.kind,
    );

    let mut bytes = header(format.kind).to_vec();
    bytes.extend_from_slice(footer.as_bytes());

    ResolvedResource::Placeholder {
        file_name: format!("{}_{}.{}", sanitize_filename(&title), platform, format.extension),
        mime: format.kind.mime().to_string(),
        bytes,
    }
}
