// Metadata resolver - ordered extractor chain with per-attempt timeout
//
// Extractors run one at a time in declared order. Each attempt is raced
// against the configured timeout and the caller's token; the loser is
// dropped and its token cancelled. If nothing yields a real title the
// synthetic record from `fallback::synthesize` is returned.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cobalt::CobaltExtractor;
use super::fallback::synthesize;
use super::heuristic::UrlHeuristicExtractor;
use super::oembed::{NoEmbedExtractor, OEmbedExtractor};
use super::platform_api::PlatformApiExtractor;
use super::proxy::ProxyScrapeExtractor;
use super::traits::{ExtractContext, InfoExtractor};
use crate::config::{AppConfig, Endpoints};
use crate::downloader::diagnostics::{Resolution, StrategyFailure};
use crate::downloader::errors::DownloadError;
use crate::downloader::models::MediaInfo;
use crate::downloader::platforms::Platform;
use crate::downloader::utils::{build_client, run_with_timeout};

/// Default extractor chain
pub fn default_extractors() -> Vec<Box<dyn InfoExtractor>> {
    vec![
        Box::new(PlatformApiExtractor),
        Box::new(CobaltExtractor),
        Box::new(OEmbedExtractor),
        Box::new(NoEmbedExtractor),
        Box::new(ProxyScrapeExtractor),
        Box::new(UrlHeuristicExtractor),
    ]
}

pub struct MetadataResolver {
    extractors: Vec<Box<dyn InfoExtractor>>,
    client: reqwest::Client,
    endpoints: Endpoints,
    timeout: Duration,
}

impl MetadataResolver {
    /// Resolver with the default chain and a client built from `config.network`
    pub fn new(config: &AppConfig) -> Result<Self, DownloadError> {
        let client = build_client(&config.network)?;
        Ok(Self::with_client(client, config))
    }

    /// Resolver sharing an existing HTTP client
    pub fn with_client(client: reqwest::Client, config: &AppConfig) -> Self {
        Self {
            extractors: default_extractors(),
            client,
            endpoints: config.endpoints.clone(),
            timeout: config.metadata_timeout(),
        }
    }

    /// Replace the extractor chain
    pub fn with_extractors(mut self, extractors: Vec<Box<dyn InfoExtractor>>) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn add_extractor(&mut self, extractor: Box<dyn InfoExtractor>) {
        self.extractors.push(extractor);
    }

    pub fn extractor_names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name()).collect()
    }

    /// Resolve metadata for `url`. Never fails.
    pub async fn resolve(&self, url: &str, platform: Platform) -> MediaInfo {
        self.resolve_with_cancel(url, platform, &CancellationToken::new())
            .await
    }

    /// Like [`resolve`](Self::resolve), abandoning the chain once `cancel` fires
    pub async fn resolve_with_cancel(
        &self,
        url: &str,
        platform: Platform,
        cancel: &CancellationToken,
    ) -> MediaInfo {
        self.resolve_detailed(url, platform, cancel).await.value
    }

    /// Resolve and report which extractor answered and why the others did not
    pub async fn resolve_detailed(
        &self,
        url: &str,
        platform: Platform,
        cancel: &CancellationToken,
    ) -> Resolution<MediaInfo> {
        let mut failures = Vec::new();

        for extractor in &self.extractors {
            if cancel.is_cancelled() {
                debug!("[MetadataResolver] Chain abandoned by caller");
                break;
            }

            let name = extractor.name();
            debug!("[MetadataResolver] Trying strategy: {}", name);

            let attempt = run_with_timeout(self.timeout, cancel, |token| async move {
                let ctx = ExtractContext {
                    url,
                    platform,
                    client: &self.client,
                    endpoints: &self.endpoints,
                    cancel: token,
                };
                extractor.extract(&ctx).await
            })
            .await;

            match attempt {
                Ok(info) if info.has_real_title() => {
                    info!("[MetadataResolver] ✓ {} resolved \"{}\"", name, info.title);
                    return Resolution {
                        value: info,
                        strategy: Some(name),
                        failures,
                    };
                }
                Ok(_) => {
                    debug!("[MetadataResolver] ✗ {} returned only a placeholder title", name);
                    failures.push(StrategyFailure::new(
                        name,
                        DownloadError::NoResult("placeholder title".to_string()),
                    ));
                }
                Err(e) => {
                    let failure = StrategyFailure::new(name, e);
                    debug!(
                        "[MetadataResolver] ✗ {} failed: {} ({})",
                        name,
                        failure.error,
                        failure.reason.map(|r| r.description()).unwrap_or("-")
                    );
                    failures.push(failure);
                }
            }
        }

        warn!(
            "[MetadataResolver] All strategies failed for {}, using synthetic metadata",
            url
        );
        Resolution {
            value: synthesize(url, platform),
            strategy: None,
            failures,
        }
    }
}
