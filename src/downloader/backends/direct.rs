// Direct link check - the URL itself may already point at the media

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::downloader::errors::DownloadError;
use crate::downloader::traits::{DownloadContext, DownloaderBackend};

pub struct DirectBackend;

#[async_trait]
impl DownloaderBackend for DirectBackend {
    fn name(&self) -> &'static str {
        "direct"
    }

    async fn resolve(&self, ctx: &DownloadContext<'_>) -> Result<String, DownloadError> {
        let response = ctx.client.head(ctx.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if content_type.contains(ctx.format.kind.as_str()) {
            Ok(ctx.url.to_string())
        } else {
            Err(DownloadError::NotSupported(format!(
                "Not a direct media URL ({})",
                if content_type.is_empty() { "no content type" } else { content_type }
            )))
        }
    }
}
