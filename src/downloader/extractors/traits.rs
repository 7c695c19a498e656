// InfoExtractor trait and the context each attempt receives

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::Endpoints;
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaInfo;
use crate::downloader::platforms::Platform;

/// Everything one extraction attempt may use
pub struct ExtractContext<'a> {
    pub url: &'a str,
    pub platform: Platform,
    pub client: &'a reqwest::Client,
    pub endpoints: &'a Endpoints,
    /// Cancelled once the attempt has timed out or been abandoned
    pub cancel: CancellationToken,
}

impl ExtractContext<'_> {
    /// Bail out between sub-requests of an abandoned attempt
    pub fn check_cancelled(&self) -> Result<(), DownloadError> {
        if self.cancel.is_cancelled() {
            Err(DownloadError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// One way of turning a URL into metadata
#[async_trait]
pub trait InfoExtractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Extract metadata for `ctx.url`
    async fn extract(&self, ctx: &ExtractContext<'_>) -> Result<MediaInfo, DownloadError>;
}
