// Hosted yt-dlp API backend

use async_trait::async_trait;
use serde_json::json;

use crate::downloader::errors::DownloadError;
use crate::downloader::traits::{DownloadContext, DownloaderBackend};
use crate::downloader::utils::{json_str, read_json};

pub struct YtdlpWebBackend;

#[async_trait]
impl DownloaderBackend for YtdlpWebBackend {
    fn name(&self) -> &'static str {
        "ytdlp-web"
    }

    async fn resolve(&self, ctx: &DownloadContext<'_>) -> Result<String, DownloadError> {
        let body = json!({
            "url": ctx.url,
            "format": ctx.format.extension,
            "quality": ctx.format.quality,
        });

        let response = ctx.client.post(&ctx.endpoints.ytdlp).json(&body).send().await?;
        let data = read_json(response).await?;

        json_str(&data, &["url"]).ok_or_else(|| {
            DownloadError::NoResult("No download URL in yt-dlp response".to_string())
        })
    }
}
