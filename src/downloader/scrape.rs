// Page scraping through CORS-style proxies
//
// Proxies either wrap the page in a JSON envelope (`contents` or `data`)
// or return the raw body. Both are accepted.

use regex::Regex;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::errors::DownloadError;
use super::models::MediaKind;
use super::utils::encode_component;

lazy_static::lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").unwrap();
    static ref OG_TITLE_RE: Regex =
        Regex::new(r#"(?i)<meta[^>]*property=["']og:title["'][^>]*content=["']([^"']+)["']"#).unwrap();
    static ref DESCRIPTION_RE: Regex =
        Regex::new(r#"(?i)<meta[^>]*name=["']description["'][^>]*content=["']([^"']+)["']"#).unwrap();
    static ref AUTHOR_RE: Regex =
        Regex::new(r#"(?i)<meta[^>]*name=["']author["'][^>]*content=["']([^"']+)["']"#).unwrap();
    static ref OG_IMAGE_RE: Regex =
        Regex::new(r#"(?i)<meta[^>]*property=["']og:image["'][^>]*content=["']([^"']+)["']"#).unwrap();
    static ref VIDEO_URL_RE: Regex =
        Regex::new(r#"(?i)https?://[^>\s<"']+\.(?:mp4|webm|avi|mov|wmv|flv|mkv)"#).unwrap();
    static ref AUDIO_URL_RE: Regex =
        Regex::new(r#"(?i)https?://[^>\s<"']+\.(?:mp3|wav|aac|ogg|flac|m4a)"#).unwrap();
    static ref IMAGE_URL_RE: Regex =
        Regex::new(r#"(?i)https?://[^>\s<"']+\.(?:jpg|jpeg|png|gif|webp|bmp)"#).unwrap();
}

/// Metadata found in a page's head
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HtmlMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
}

/// Fetch `url` through each proxy in turn; first non-empty body wins
pub async fn fetch_via_proxies(
    client: &reqwest::Client,
    proxies: &[String],
    url: &str,
    cancel: &CancellationToken,
) -> Result<String, DownloadError> {
    if proxies.is_empty() {
        return Err(DownloadError::NotSupported("no proxies configured".to_string()));
    }

    for proxy in proxies {
        if cancel.is_cancelled() {
            return Err(DownloadError::Cancelled);
        }

        let target = format!("{}{}", proxy, encode_component(url));
        match fetch_page(client, &target).await {
            Ok(body) if !body.trim().is_empty() => return Ok(body),
            Ok(_) => debug!("[Proxy] {} returned an empty page", proxy),
            Err(e) => debug!("[Proxy] {} failed: {}", proxy, e),
        }
    }

    Err(DownloadError::NoResult("All proxy methods failed".to_string()))
}

async fn fetch_page(client: &reqwest::Client, target: &str) -> Result<String, DownloadError> {
    let response = client.get(target).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::HttpStatus(status.as_u16()));
    }

    let body = response.text().await?;
    Ok(unwrap_envelope(body))
}

fn unwrap_envelope(body: String) -> String {
    match serde_json::from_str::<Value>(&body) {
        Ok(json) => ["contents", "data"]
            .iter()
            .find_map(|key| json[*key].as_str().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => body,
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

fn first_capture(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
        .filter(|s| !s.is_empty())
}

/// Pull title, description, author and preview image out of raw HTML
pub fn extract_html_metadata(html: &str) -> HtmlMetadata {
    HtmlMetadata {
        title: first_capture(&OG_TITLE_RE, html).or_else(|| first_capture(&TITLE_RE, html)),
        description: first_capture(&DESCRIPTION_RE, html),
        author: first_capture(&AUTHOR_RE, html),
        image: first_capture(&OG_IMAGE_RE, html),
    }
}

/// Direct media links of the given kind, in page order
pub fn extract_media_urls(content: &str, kind: MediaKind) -> Vec<String> {
    let re: &Regex = match kind {
        MediaKind::Video => &VIDEO_URL_RE,
        MediaKind::Audio => &AUDIO_URL_RE,
        MediaKind::Image => &IMAGE_URL_RE,
    };

    re.find_iter(content).map(|m| m.as_str().to_string()).collect()
}
