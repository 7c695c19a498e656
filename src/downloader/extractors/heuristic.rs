// URL heuristics - metadata from link structure alone, no network

use async_trait::async_trait;
use regex::Regex;
use url::Url;

use super::fallback::{normalize, ProviderFields};
use super::traits::{ExtractContext, InfoExtractor};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaInfo;
use crate::downloader::utils::extract_title_from_url;

lazy_static::lazy_static! {
    static ref TIKTOK_RE: Regex = Regex::new(r"/@([^/]+)/video/(\d+)").unwrap();
    static ref INSTAGRAM_RE: Regex = Regex::new(r"/p/([A-Za-z0-9_-]+)").unwrap();
}

pub struct UrlHeuristicExtractor;

/// Title and author readable straight from the URL
pub fn fields_from_url(raw: &str) -> ProviderFields {
    let mut fields = ProviderFields::default();

    if let Ok(url) = Url::parse(raw.trim()) {
        let host = url.host_str().unwrap_or("").to_lowercase();
        let path = url.path();

        if host.contains("youtube.com") {
            if let Some((_, id)) = url.query_pairs().find(|(k, _)| k == "v") {
                fields.title = Some(format!("YouTube Video {}", id));
            }
        } else if host.contains("tiktok.com") {
            if let Some(caps) = TIKTOK_RE.captures(path) {
                fields.author = Some(format!("@{}", &caps[1]));
                fields.title = Some(format!("TikTok Video {}", &caps[2]));
            }
        } else if host.contains("instagram.com") {
            if let Some(caps) = INSTAGRAM_RE.captures(path) {
                fields.title = Some(format!("Instagram Post {}", &caps[1]));
            }
        }
    }

    if fields.title.is_none() {
        fields.title = Some(extract_title_from_url(raw));
    }

    fields
}

#[async_trait]
impl InfoExtractor for UrlHeuristicExtractor {
    fn name(&self) -> &'static str {
        "url-heuristic"
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<MediaInfo, DownloadError> {
        Ok(normalize(ctx.url, ctx.platform, fields_from_url(ctx.url)))
    }
}
