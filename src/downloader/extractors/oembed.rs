// oEmbed-style extractors: the platform's own oEmbed endpoint and noembed.com

use async_trait::async_trait;

use super::fallback::{normalize, ProviderFields};
use super::traits::{ExtractContext, InfoExtractor};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaInfo;
use crate::downloader::utils::{encode_component, get_json, json_str};

/// `<endpoint>?url=<encoded>&format=json`, respecting an existing query
pub(crate) fn with_url_query(endpoint: &str, url: &str) -> String {
    let sep = if endpoint.contains('?') { '&' } else { '?' };
    format!("{}{}url={}&format=json", endpoint, sep, encode_component(url))
}

pub struct OEmbedExtractor;

#[async_trait]
impl InfoExtractor for OEmbedExtractor {
    fn name(&self) -> &'static str {
        "oembed"
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<MediaInfo, DownloadError> {
        let endpoint = ctx.endpoints.oembed.get(&ctx.platform).ok_or_else(|| {
            DownloadError::NotSupported(format!("no oEmbed endpoint for {}", ctx.platform))
        })?;

        let data = get_json(ctx.client, &with_url_query(endpoint, ctx.url)).await?;

        Ok(normalize(ctx.url, ctx.platform, ProviderFields::from_json(&data)))
    }
}

pub struct NoEmbedExtractor;

#[async_trait]
impl InfoExtractor for NoEmbedExtractor {
    fn name(&self) -> &'static str {
        "noembed"
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<MediaInfo, DownloadError> {
        let endpoint = format!(
            "{}?url={}",
            ctx.endpoints.noembed,
            encode_component(ctx.url)
        );

        let data = get_json(ctx.client, &endpoint).await?;

        // noembed answers 200 with an error field for unknown URLs
        if let Some(error) = json_str(&data, &["error"]) {
            return Err(DownloadError::NoResult(error));
        }

        Ok(normalize(ctx.url, ctx.platform, ProviderFields::from_json(&data)))
    }
}
