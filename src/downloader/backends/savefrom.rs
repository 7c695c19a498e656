// SaveFrom analyzer backend - form-encoded POST

use async_trait::async_trait;

use crate::downloader::errors::DownloadError;
use crate::downloader::traits::{DownloadContext, DownloaderBackend};
use crate::downloader::utils::{json_str, read_json};

pub struct SaveFromBackend;

#[async_trait]
impl DownloaderBackend for SaveFromBackend {
    fn name(&self) -> &'static str {
        "savefrom"
    }

    async fn resolve(&self, ctx: &DownloadContext<'_>) -> Result<String, DownloadError> {
        let response = ctx
            .client
            .post(&ctx.endpoints.savefrom)
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&[("url", ctx.url), ("format", ctx.format.extension.as_str())])
            .send()
            .await?;
        let data = read_json(response).await?;

        json_str(&data, &["url"]).ok_or_else(|| {
            DownloadError::NoResult("No download URL in SaveFrom response".to_string())
        })
    }
}
