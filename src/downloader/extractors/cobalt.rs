use async_trait::async_trait;

use super::fallback::{normalize, ProviderFields};
use super::traits::{ExtractContext, InfoExtractor};
use crate::downloader::backends::cobalt::request_cobalt;
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaInfo;

pub struct CobaltExtractor;

#[async_trait]
impl InfoExtractor for CobaltExtractor {
    fn name(&self) -> &'static str {
        "cobalt"
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<MediaInfo, DownloadError> {
        let data = request_cobalt(ctx.client, &ctx.endpoints.cobalt, ctx.url, "720", "mp3").await?;

        Ok(normalize(ctx.url, ctx.platform, ProviderFields::from_json(&data)))
    }
}
