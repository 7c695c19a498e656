// Helper functions for strategy implementations

use std::future::Future;
use std::time::Duration;

use rand::distributions::Alphanumeric;
use rand::Rng;
use regex::Regex;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use super::errors::DownloadError;
use super::models::{NetworkConfig, PLACEHOLDER_TITLE};

lazy_static::lazy_static! {
    static ref EXTENSION_RE: Regex = Regex::new(r"\.[^/.]+$").unwrap();
    static ref WORD_START_RE: Regex = Regex::new(r"\b\w").unwrap();
    static ref DIGIT_RUN_RE: Regex = Regex::new(r"\d+").unwrap();
    static ref NON_WORD_RE: Regex = Regex::new(r"[^\w\s-]").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref TIKTOK_VIDEO_RE: Regex = Regex::new(r"/video/(\d+)").unwrap();
    static ref INSTAGRAM_POST_RE: Regex = Regex::new(r"/p/([A-Za-z0-9_-]+)").unwrap();
    static ref FACEBOOK_VIDEO_RE: Regex = Regex::new(r"/videos/(\d+)").unwrap();
    static ref TWITTER_STATUS_RE: Regex = Regex::new(r"/status/(\d+)").unwrap();
    static ref PINTEREST_PIN_RE: Regex = Regex::new(r"/pin/(\d+)").unwrap();
}

/// Run one provider attempt with a bounded wait.
///
/// The attempt gets a child of `parent`; when the timer or the parent wins,
/// the attempt future is dropped (aborting its in-flight request) and its
/// token is cancelled so nothing keeps running unobserved.
pub async fn run_with_timeout<T, F, Fut>(
    timeout: Duration,
    parent: &CancellationToken,
    attempt: F,
) -> Result<T, DownloadError>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<T, DownloadError>>,
{
    let token = parent.child_token();
    let fut = attempt(token.clone());

    let result = tokio::select! {
        biased;
        _ = parent.cancelled() => Err(DownloadError::Cancelled),
        res = fut => res,
        _ = tokio::time::sleep(timeout) => Err(DownloadError::NetworkTimeout),
    };

    token.cancel();
    result
}

/// Build the shared HTTP client from network settings
pub fn build_client(config: &NetworkConfig) -> Result<reqwest::Client, DownloadError> {
    let mut builder = client_builder(config)?;

    if let Some(secs) = config.timeout {
        builder = builder.timeout(Duration::from_secs(u64::from(secs)));
    }

    finish(builder)
}

/// Client for fetching media files.
///
/// `timeout` only bounds connecting here; a whole-request limit would cut
/// off any transfer that outlasts a provider API call.
pub fn build_media_client(config: &NetworkConfig) -> Result<reqwest::Client, DownloadError> {
    let mut builder = client_builder(config)?;

    if let Some(secs) = config.timeout {
        builder = builder.connect_timeout(Duration::from_secs(u64::from(secs)));
    }

    finish(builder)
}

fn client_builder(config: &NetworkConfig) -> Result<reqwest::ClientBuilder, DownloadError> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());

    if let Some(proxy_url) = config.proxy.as_deref() {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| DownloadError::InvalidUrl(format!("proxy {}: {}", proxy_url, e)))?;
        builder = builder.proxy(proxy);
    }

    Ok(builder)
}

fn finish(builder: reqwest::ClientBuilder) -> Result<reqwest::Client, DownloadError> {
    builder
        .build()
        .map_err(|e| DownloadError::Network(format!("Failed to build HTTP client: {}", e)))
}

/// Check a non-success status and parse the body as JSON
pub async fn read_json(response: reqwest::Response) -> Result<Value, DownloadError> {
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::HttpStatus(status.as_u16()));
    }

    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

/// GET a URL expecting a JSON body
pub async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value, DownloadError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?;
    read_json(response).await
}

/// First non-empty string (or number) among `keys`
pub fn json_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match &value[*key] {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Percent-encode a value for a query string
pub fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Reject input that is not an http(s) URL
pub fn validate_url(input: &str) -> Result<String, DownloadError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if trimmed.is_empty() {
        return Err(DownloadError::InvalidUrl(
            "Invalid URL. Please enter a valid URL.".to_string(),
        ));
    }

    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(DownloadError::InvalidUrl(trimmed.to_string()));
    }

    Ok(trimmed.to_string())
}

/// Random 9-character lowercase token
pub fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect()
}

fn last_segment(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|s| s.to_string())
}

fn capture(re: &Regex, path: &str) -> String {
    re.captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Derive a content id from recognizable URL structure
pub fn extract_id(raw: &str) -> String {
    let url = match Url::parse(raw.trim()) {
        Ok(u) => u,
        Err(_) => return random_token(),
    };
    let host = url.host_str().unwrap_or("").to_lowercase();
    let path = url.path();

    let id = if host.contains("youtube.com") {
        url.query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
            .or_else(|| last_segment(&url))
            .unwrap_or_default()
    } else if host.contains("youtu.be") {
        last_segment(&url).unwrap_or_default()
    } else if host.contains("tiktok.com") {
        capture(&TIKTOK_VIDEO_RE, path)
    } else if host.contains("instagram.com") {
        capture(&INSTAGRAM_POST_RE, path)
    } else if host.contains("facebook.com") {
        capture(&FACEBOOK_VIDEO_RE, path)
    } else if host.contains("twitter.com") || host == "x.com" || host.ends_with(".x.com") {
        capture(&TWITTER_STATUS_RE, path)
    } else if host.contains("pinterest.") {
        capture(&PINTEREST_PIN_RE, path)
    } else {
        last_segment(&url).unwrap_or_default()
    };

    if id.is_empty() {
        last_segment(&url).unwrap_or_else(random_token)
    } else {
        id
    }
}

/// Human-readable title from the last URL path segment
pub fn extract_title_from_url(raw: &str) -> String {
    let segment = match Url::parse(raw.trim()).ok().as_ref().and_then(last_segment) {
        Some(s) => s,
        None => return PLACEHOLDER_TITLE.to_string(),
    };

    let spaced = segment.replace(|c: char| c == '-' || c == '_', " ");
    let stripped = EXTENSION_RE.replace(&spaced, "");
    let capitalized = WORD_START_RE.replace_all(&stripped, |caps: &regex::Captures| {
        caps[0].to_uppercase()
    });
    let title = DIGIT_RUN_RE.replace_all(&capitalized, |caps: &regex::Captures| {
        if caps[0].len() > 8 {
            "Video".to_string()
        } else {
            caps[0].to_string()
        }
    });

    let title = title.trim();
    if title.chars().count() > 3 {
        title.to_string()
    } else {
        PLACEHOLDER_TITLE.to_string()
    }
}

/// File-system safe name from a media title (without extension)
pub fn sanitize_filename(title: &str) -> String {
    let truncated: String = title.chars().take(50).collect();
    let cleaned = NON_WORD_RE.replace_all(&truncated, "");
    let joined = WHITESPACE_RE.replace_all(cleaned.trim(), "_");

    if joined.is_empty() {
        "download".to_string()
    } else {
        joined.into_owned()
    }
}

/// Format byte count for display
pub fn human_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    if mb >= 1024.0 {
        format!("{:.1} GB", mb / 1024.0)
    } else if mb >= 1.0 {
        format!("{:.0} MB", mb)
    } else if kb >= 1.0 {
        format!("{:.1} KB", kb)
    } else {
        format!("{} B", bytes)
    }
}
