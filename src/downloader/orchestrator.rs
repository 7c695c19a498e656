// Download resolver - ordered backend chain with placeholder fallback

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backends::default_backends;
use super::diagnostics::{Resolution, StrategyFailure};
use super::errors::DownloadError;
use super::models::{DownloadFormat, ResolvedResource};
use super::placeholder;
use super::traits::{DownloadContext, DownloaderBackend};
use super::utils::{build_client, build_media_client, run_with_timeout};
use crate::config::{AppConfig, Endpoints};

pub struct DownloadResolver {
    backends: Vec<Box<dyn DownloaderBackend>>,
    client: reqwest::Client,
    media_client: reqwest::Client,
    endpoints: Endpoints,
    timeout: Duration,
}

impl DownloadResolver {
    pub fn new(config: &AppConfig) -> Result<Self, DownloadError> {
        let client = build_client(&config.network)?;
        let media_client = build_media_client(&config.network)?;
        Ok(Self::with_client(client, config).with_media_client(media_client))
    }

    /// `client` also fetches media files until `with_media_client` is called
    pub fn with_client(client: reqwest::Client, config: &AppConfig) -> Self {
        Self {
            backends: default_backends(),
            media_client: client.clone(),
            client,
            endpoints: config.endpoints.clone(),
            timeout: config.download_timeout(),
        }
    }

    pub fn with_media_client(mut self, client: reqwest::Client) -> Self {
        self.media_client = client;
        self
    }

    pub fn with_backends(mut self, backends: Vec<Box<dyn DownloaderBackend>>) -> Self {
        self.backends = backends;
        self
    }

    pub fn add_backend(&mut self, backend: Box<dyn DownloaderBackend>) {
        self.backends.push(backend);
    }

    pub fn backend_names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Client for provider API calls
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Client the session fetches remote resources with
    pub fn media_client(&self) -> &reqwest::Client {
        &self.media_client
    }

    /// Resolve something downloadable for `url` in `format`. Never fails.
    pub async fn resolve(
        &self,
        url: &str,
        format: &DownloadFormat,
        title: Option<&str>,
    ) -> ResolvedResource {
        self.resolve_detailed(url, format, title, &CancellationToken::new())
            .await
            .value
    }

    pub async fn resolve_detailed(
        &self,
        url: &str,
        format: &DownloadFormat,
        title: Option<&str>,
        cancel: &CancellationToken,
    ) -> Resolution<ResolvedResource> {
        let mut failures = Vec::new();

        for backend in &self.backends {
            if cancel.is_cancelled() {
                break;
            }

            let name = backend.name();
            debug!("[Downloader] Trying backend: {}", name);

            let attempt = run_with_timeout(self.timeout, cancel, |token| async move {
                let ctx = DownloadContext {
                    url,
                    format,
                    client: &self.client,
                    endpoints: &self.endpoints,
                    cancel: token,
                };
                backend.resolve(&ctx).await
            })
            .await;

            match attempt {
                Ok(link) if !link.trim().is_empty() => {
                    info!("[Downloader] ✓ Success with {}", name);
                    return Resolution {
                        value: ResolvedResource::Remote {
                            url: link,
                            mime: format.kind.mime().to_string(),
                        },
                        strategy: Some(name),
                        failures,
                    };
                }
                Ok(_) => {
                    debug!("[Downloader] ✗ {} returned an empty link", name);
                    failures.push(StrategyFailure::new(
                        name,
                        DownloadError::NoResult("empty link".to_string()),
                    ));
                }
                Err(e) => {
                    debug!("[Downloader] ✗ {} failed: {}", name, e);
                    failures.push(StrategyFailure::new(name, e));
                }
            }
        }

        warn!("[Downloader] All backends failed for {}, generating placeholder", url);
        Resolution {
            value: placeholder::generate(url, format, title),
            strategy: None,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::models::{MediaKind, Quality};
    use async_trait::async_trait;

    struct Fixed(&'static str, Result<&'static str, u16>);

    #[async_trait]
    impl DownloaderBackend for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn resolve(&self, _ctx: &DownloadContext<'_>) -> Result<String, DownloadError> {
            self.1
                .map(str::to_string)
                .map_err(DownloadError::HttpStatus)
        }
    }

    fn resolver(backends: Vec<Box<dyn DownloaderBackend>>) -> DownloadResolver {
        let config = AppConfig::default()
            .with_endpoints(Endpoints::all_at("http://127.0.0.1:9"))
            .with_timeouts(1, 1);
        DownloadResolver::with_client(reqwest::Client::new(), &config).with_backends(backends)
    }

    #[test]
    fn test_default_chain_order() {
        assert_eq!(
            resolver(default_backends()).backend_names(),
            vec!["cobalt", "ytdlp-web", "savefrom", "direct", "proxy-scrape"]
        );
    }

    #[tokio::test]
    async fn test_first_link_wins() {
        let resolver = resolver(vec![
            Box::new(Fixed("down", Err(500))),
            Box::new(Fixed("empty", Ok(""))),
            Box::new(Fixed("up", Ok("https://cdn.example.com/a.mp3"))),
        ]);
        let format = DownloadFormat::new(MediaKind::Audio, Quality::High, "mp3", "~8MB");

        let res = resolver
            .resolve_detailed("https://youtu.be/x", &format, None, &CancellationToken::new())
            .await;

        assert_eq!(
            res.value,
            ResolvedResource::Remote {
                url: "https://cdn.example.com/a.mp3".to_string(),
                mime: "audio/mpeg".to_string(),
            }
        );
        assert_eq!(res.strategy, Some("up"));
        assert_eq!(res.failures.len(), 2);
    }

    #[tokio::test]
    async fn test_all_failing_generates_placeholder() {
        let resolver = resolver(vec![Box::new(Fixed("down", Err(404)))]);
        let format = DownloadFormat::new(MediaKind::Image, Quality::High, "jpg", "~2MB");

        let resource = resolver
            .resolve("https://pinterest.com/pin/555", &format, Some("Pin"))
            .await;

        assert!(resource.is_placeholder());
        assert_eq!(resource.mime(), "image/jpeg");
        assert!(!resource.locator().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_input_still_yields_placeholder() {
        let resolver = resolver(default_backends());

        for (input, ext, mime) in [("::::", "mp4", "video/mp4"), ("", "mp3", "audio/mpeg")] {
            let kind = if ext == "mp4" { MediaKind::Video } else { MediaKind::Audio };
            let format = DownloadFormat::new(kind, Quality::High, ext, "~1MB");

            let resource = resolver.resolve(input, &format, None).await;

            assert!(resource.is_placeholder(), "{:?} gave {:?}", input, resource);
            assert_eq!(resource.mime(), mime);
            assert!(!resource.locator().is_empty());
        }
    }
}
