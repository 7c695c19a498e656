// Proxy scraping backend - first media link of the requested kind in the page

use async_trait::async_trait;

use crate::downloader::errors::DownloadError;
use crate::downloader::scrape::{extract_media_urls, fetch_via_proxies};
use crate::downloader::traits::{DownloadContext, DownloaderBackend};

pub struct ProxyScrapeBackend;

#[async_trait]
impl DownloaderBackend for ProxyScrapeBackend {
    fn name(&self) -> &'static str {
        "proxy-scrape"
    }

    async fn resolve(&self, ctx: &DownloadContext<'_>) -> Result<String, DownloadError> {
        let proxies = &ctx.endpoints.proxies;
        let page = fetch_via_proxies(ctx.client, proxies, ctx.url, &ctx.cancel).await?;

        extract_media_urls(&page, ctx.format.kind)
            .into_iter()
            .next()
            .ok_or_else(|| {
                DownloadError::NoResult(format!("No {} links in page", ctx.format.kind))
            })
    }
}
