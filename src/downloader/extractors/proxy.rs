// Page scraping through CORS proxies - last network-backed extractor

use async_trait::async_trait;

use super::fallback::{normalize, ProviderFields};
use super::traits::{ExtractContext, InfoExtractor};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaInfo;
use crate::downloader::scrape::{extract_html_metadata, fetch_via_proxies};

pub struct ProxyScrapeExtractor;

#[async_trait]
impl InfoExtractor for ProxyScrapeExtractor {
    fn name(&self) -> &'static str {
        "proxy-scrape"
    }

    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<MediaInfo, DownloadError> {
        let proxies = &ctx.endpoints.proxies;
        let html = fetch_via_proxies(ctx.client, proxies, ctx.url, &ctx.cancel).await?;
        let meta = extract_html_metadata(&html);

        if meta.title.is_none() {
            return Err(DownloadError::ParseError("no title in page".to_string()));
        }

        let fields = ProviderFields {
            title: meta.title,
            thumbnail: meta.image,
            description: meta.description,
            author: meta.author,
            ..Default::default()
        };

        Ok(normalize(ctx.url, ctx.platform, fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::downloader::platforms::Platform;
    use httpmock::prelude::*;
    use tokio_util::sync::CancellationToken;

    #[tokio::test]
    async fn test_scrapes_title_from_json_envelope() {
        let server = MockServer::start_async().await;
        let page = concat!(
            r#"<html><head><meta property="og:title" content="Sunset Timelapse">"#,
            r#"<meta name="author" content="Sky Cam"></head></html>"#,
        );
        server
            .mock_async(|when, then| {
                when.method(GET).path("/proxy");
                then.status(200)
                    .json_body(serde_json::json!({ "contents": page }));
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

        let info = ProxyScrapeExtractor.extract(&ctx).await.unwrap();
        assert_eq!(info.title, "Sunset Timelapse");
        assert_eq!(info.author.as_deref(), Some("Sky Cam"));
        // duration and views were never in the page
        assert!(info.synthetic);
    }

    #[tokio::test]
    async fn test_page_without_title_fails() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/proxy");
                then.status(200).body("<html><body>nothing here</body></html>");
            })
            .await;

        let endpoints = Endpoints::all_at(&server.base_url());
        let client = reqwest::Client::new();
        let ctx = ExtractContext {
            url: "https://tiktok.com/@x/video/42",
            platform: Platform::Tiktok,
            client: &client,
            endpoints: &endpoints,
            cancel: CancellationToken::new(),
        };

        assert!(ProxyScrapeExtractor.extract(&ctx).await.is_err());
    }
}
