// Cobalt multi-platform API - used for both metadata and direct links

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::downloader::errors::DownloadError;
use crate::downloader::models::{MediaKind, Quality};
use crate::downloader::traits::{DownloadContext, DownloaderBackend};
use crate::downloader::utils::{json_str, read_json};

/// POST a cobalt request; only `status == "success"` answers are accepted
pub(crate) async fn request_cobalt(
    client: &reqwest::Client,
    endpoint: &str,
    url: &str,
    video_quality: &str,
    audio_format: &str,
) -> Result<Value, DownloadError> {
    let body = json!({
        "url": url,
        "vCodec": "h264",
        "vQuality": video_quality,
        "aFormat": audio_format,
        "filenamePattern": "classic",
    });

    let response = client
        .post(endpoint)
        .header("Accept", "application/json")
        .json(&body)
        .send()
        .await?;
    let data = read_json(response).await?;

    match json_str(&data, &["status"]).as_deref() {
        Some("success") => Ok(data),
        other => Err(DownloadError::NoResult(format!(
            "cobalt returned status {}",
            other.unwrap_or("<none>")
        ))),
    }
}

fn video_quality(quality: Quality) -> &'static str {
    match quality {
        Quality::Hd | Quality::High => "1080",
        Quality::Sd | Quality::Medium => "720",
        Quality::Low => "480",
    }
}

pub struct CobaltBackend;

#[async_trait]
impl DownloaderBackend for CobaltBackend {
    fn name(&self) -> &'static str {
        "cobalt"
    }

    async fn resolve(&self, ctx: &DownloadContext<'_>) -> Result<String, DownloadError> {
        let audio_format = if ctx.format.kind == MediaKind::Audio && ctx.format.extension == "mp3" {
            "mp3"
        } else {
            "best"
        };

        let data = request_cobalt(
            ctx.client,
            &ctx.endpoints.cobalt,
            ctx.url,
            video_quality(ctx.format.quality),
            audio_format,
        )
        .await?;

        json_str(&data, &["url"])
            .ok_or_else(|| DownloadError::NoResult("No download URL in response".to_string()))
    }
}
