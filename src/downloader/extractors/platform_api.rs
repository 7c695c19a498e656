// Platform-specific info APIs, tried in the order configured for the platform

use async_trait::async_trait;
use tracing::debug;

use super::fallback::{normalize, ProviderFields};
use super::oembed::with_url_query;
use super::traits::{ExtractContext, InfoExtractor};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaInfo;
use crate::downloader::utils::{get_json, json_str};

pub struct PlatformApiExtractor;

#[async_trait]
impl InfoExtractor for PlatformApiExtractor {
    fn name(&self) -> &'static str {
        "platform-api"
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<MediaInfo, DownloadError> {
        let apis = ctx
            .endpoints
            .platform_apis
            .get(&ctx.platform)
            .filter(|apis| !apis.is_empty())
            .ok_or_else(|| {
                DownloadError::NotSupported(format!("no platform API for {}", ctx.platform))
            })?;

        for api in apis {
            ctx.check_cancelled()?;

            match get_json(ctx.client, &with_url_query(api, ctx.url)).await {
                // some APIs answer 200 with an error field for unknown URLs
                Ok(data) => match json_str(&data, &["error"]) {
                    Some(error) => debug!("[platform-api] {} refused: {}", api, error),
                    None => {
                        let fields = ProviderFields::from_json(&data);
                        return Ok(normalize(ctx.url, ctx.platform, fields));
                    }
                },
                Err(e) => {
                    debug!("[platform-api] {} failed: {}", api, e);
                }
            }
        }

        Err(DownloadError::NoResult(
            "All platform-specific APIs failed".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::downloader::platforms::Platform;
    use httpmock::prelude::*;
    use serde_json::json;
    use tokio_util::sync::CancellationToken;

    async fn extract(body: serde_json::Value) -> Result<MediaInfo, DownloadError> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/youtube/info");
                then.status(200).json_body(body);
            })
            .await;

        let endpoints = Endpoints::all_at(&server.base_url());
        let client = reqwest::Client::new();
        let ctx = ExtractContext {
            url: "https://www.youtube.com/watch?v=abc123",
            platform: Platform::Youtube,
            client: &client,
            endpoints: &endpoints,
            cancel: CancellationToken::new(),
        };

        PlatformApiExtractor.extract(&ctx).await
    }

    #[tokio::test]
    async fn test_error_body_is_not_a_result() {
        let err = extract(json!({ "error": "no matching providers found" }))
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::NoResult(_)));
    }

    #[tokio::test]
    async fn test_titled_body_is_normalized() {
        let info = extract(json!({ "title": "Lake Swim", "author_name": "Coach" }))
            .await
            .unwrap();
        assert_eq!(info.title, "Lake Swim");
        assert_eq!(info.id, "abc123");
    }
}
