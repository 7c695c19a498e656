// Synthetic metadata - used to fill gaps in provider answers and as the
// last resort when every extractor failed.
//
// Everything produced here is demo data. Records touched by these
// generators carry `synthetic: true`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::downloader::models::{MediaInfo, PLACEHOLDER_TITLE};
use crate::downloader::platforms::Platform;
use crate::downloader::utils::{encode_component, extract_id, extract_title_from_url, random_token};

/// Fields a provider may or may not have supplied
#[derive(Debug, Default, Clone)]
pub struct ProviderFields {
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub views: Option<String>,
    pub upload_date: Option<String>,
}

impl ProviderFields {
    pub fn from_json(value: &serde_json::Value) -> Self {
        use crate::downloader::utils::json_str;

        Self {
            title: json_str(value, &["title"]),
            thumbnail: json_str(value, &["thumbnail", "thumbnail_url"]),
            duration: json_str(value, &["duration"]),
            description: json_str(value, &["description"]),
            author: json_str(value, &["author", "author_name", "uploader"]),
            views: json_str(value, &["views", "view_count"]),
            upload_date: json_str(value, &["uploadDate", "upload_date"]),
        }
    }
}

/// Build a MediaInfo from provider fields, generating whatever is missing
pub fn normalize(url: &str, platform: Platform, fields: ProviderFields) -> MediaInfo {
    let synthetic = fields.title.is_none()
        || fields.thumbnail.is_none()
        || fields.duration.is_none()
        || fields.author.is_none()
        || fields.views.is_none();

    MediaInfo {
        id: extract_id(url),
        title: fields.title.unwrap_or_else(|| extract_title_from_url(url)),
        thumbnail: fields.thumbnail.unwrap_or_else(|| synthetic_thumbnail(platform)),
        duration: fields.duration.unwrap_or_else(|| synthetic_duration(platform)),
        platform,
        url: url.to_string(),
        description: Some(
            fields
                .description
                .unwrap_or_else(|| format!("Content from {}", platform)),
        ),
        author: Some(fields.author.unwrap_or_else(|| synthetic_author(platform))),
        views: Some(fields.views.unwrap_or_else(|| synthetic_views(platform))),
        upload_date: Some(fields.upload_date.unwrap_or_else(|| "Recently".to_string())),
        synthetic,
    }
}

struct PlatformFlavor {
    title_prefix: &'static str,
    author: &'static str,
    description: &'static str,
}

fn flavor(platform: Platform) -> PlatformFlavor {
    let (title_prefix, author, description) = match platform {
        Platform::Youtube => ("YouTube Video", "YouTube Creator", "YouTube video content"),
        Platform::Tiktok => ("TikTok Video", "@creator", "TikTok video content"),
        Platform::Instagram => ("Instagram Post", "@user", "Instagram content"),
        Platform::Facebook => ("Facebook Post", "Facebook User", "Facebook content"),
        Platform::Twitter => ("Twitter Post", "@user", "Twitter content"),
        Platform::Pinterest => ("Pinterest Pin", "Pinterest User", "Pinterest content"),
        Platform::Whatsapp => ("WhatsApp Status", "Contact", "WhatsApp status content"),
    };

    PlatformFlavor {
        title_prefix,
        author,
        description,
    }
}

/// Last-resort record when every extractor failed. Never panics.
pub fn synthesize(url: &str, platform: Platform) -> MediaInfo {
    let id = extract_id(url);
    let title = extract_title_from_url(url);
    let flavor = flavor(platform);

    let title = if title != PLACEHOLDER_TITLE {
        title
    } else {
        format!("{} - {}", flavor.title_prefix, id)
    };

    MediaInfo {
        id,
        title,
        thumbnail: synthetic_thumbnail(platform),
        duration: synthetic_duration(platform),
        platform,
        url: url.to_string(),
        description: Some(flavor.description.to_string()),
        author: Some(flavor.author.to_string()),
        views: Some(synthetic_views(platform)),
        upload_date: Some("Recently".to_string()),
        synthetic: true,
    }
}

fn pick(options: &[&'static str]) -> String {
    options
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("0:30")
        .to_string()
}

pub fn synthetic_duration(platform: Platform) -> String {
    match platform {
        Platform::Youtube => pick(&["2:15", "5:42", "8:33", "12:07", "3:28"]),
        Platform::Tiktok => pick(&["0:15", "0:30", "0:45", "1:00", "0:25"]),
        Platform::Facebook => pick(&["1:45", "3:20", "2:50", "4:15", "1:30"]),
        Platform::Pinterest => pick(&["0:30", "1:15", "2:00", "0:45", "1:45"]),
        Platform::Twitter => pick(&["0:20", "0:35", "1:10", "0:50", "1:25"]),
        Platform::Whatsapp => pick(&["0:10", "0:15", "0:20", "0:25", "0:30"]),
        Platform::Instagram => pick(&["0:30", "1:00", "1:30", "2:00", "0:45"]),
    }
}

pub fn synthetic_author(platform: Platform) -> String {
    match platform {
        Platform::Youtube => pick(&[
            "Creator Studio",
            "YouTube Channel",
            "Content Creator",
            "Video Creator",
        ]),
        Platform::Tiktok => pick(&["@creator", "@user", "@tiktoker", "@content"]),
        Platform::Facebook => pick(&["Page Admin", "Facebook User", "Content Creator", "Page"]),
        Platform::Pinterest => pick(&["Pinterest User", "Creator", "Pinner", "User"]),
        Platform::Twitter => pick(&["@user", "@creator", "@tweet", "@content"]),
        Platform::Whatsapp => pick(&["Contact", "User", "Friend", "Group"]),
        Platform::Instagram => pick(&["@user", "@creator", "@instagram", "@content"]),
    }
}

pub fn synthetic_views(platform: Platform) -> String {
    let mut rng = rand::thread_rng();
    let base: u32 = rng.gen_range(1..=999);

    if platform == Platform::Whatsapp {
        return format!("{} views", base);
    }

    let multiplier = ["", "K", "M"].choose(&mut rng).copied().unwrap_or("");
    let noun = if platform == Platform::Pinterest { "saves" } else { "views" };
    format!("{}{} {}", base, multiplier, noun)
}

pub fn synthetic_thumbnail(platform: Platform) -> String {
    let query = match platform {
        Platform::Youtube => "youtube video thumbnail vibrant colors",
        Platform::Tiktok => "tiktok vertical video thumbnail colorful gradient",
        Platform::Facebook => "facebook video post thumbnail blue accents",
        Platform::Pinterest => "pinterest pin aesthetic vertical image",
        Platform::Twitter => "twitter video thumbnail clean social design",
        Platform::Whatsapp => "whatsapp status thumbnail green mobile",
        Platform::Instagram => "instagram square post thumbnail",
    };
    let portrait = matches!(platform, Platform::Pinterest | Platform::Tiktok);
    let (height, orientation) = if portrait { (800, "portrait") } else { (360, "landscape") };

    format!(
        "https://mediadownloader.com/api/search-image?query={}&width=640&height={}&seq={}&orientation={}",
        encode_component(query),
        height,
        random_token(),
        orientation
    )
}
