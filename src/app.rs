// MediaDownloader - one entry point over registry, resolvers, sessions and store

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::AppConfig;
use crate::downloader::extractors::MetadataResolver;
use crate::downloader::format_selector::FormatSelector;
use crate::downloader::models::{DownloadFormat, MediaInfo};
use crate::downloader::orchestrator::DownloadResolver;
use crate::downloader::platforms::{classify, config_for, Platform};
use crate::downloader::session::{DownloadOutcome, DownloadSession};
use crate::downloader::traits::{ProgressEmitter, SaveTarget};
use crate::downloader::utils::{build_client, build_media_client, validate_url};
use crate::downloader::DownloadError;
use crate::storage::LocalStore;

pub struct MediaDownloader {
    config: AppConfig,
    metadata: MetadataResolver,
    downloads: DownloadResolver,
    store: LocalStore,
}

impl MediaDownloader {
    /// Build both resolvers around one API client
    pub fn new(config: AppConfig) -> Result<Self, DownloadError> {
        let client = build_client(&config.network)?;
        let media_client = build_media_client(&config.network)?;

        Ok(Self {
            metadata: MetadataResolver::with_client(client.clone(), &config),
            downloads: DownloadResolver::with_client(client, &config)
                .with_media_client(media_client),
            store: LocalStore::new(config.data_dir.clone()),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn metadata_resolver(&self) -> &MetadataResolver {
        &self.metadata
    }

    pub fn download_resolver(&self) -> &DownloadResolver {
        &self.downloads
    }

    /// Validate `input` and classify it; returns the trimmed URL
    pub fn detect(&self, input: &str) -> Result<(String, Platform), DownloadError> {
        let url = validate_url(input)?;
        let platform =
            classify(&url).ok_or_else(|| DownloadError::UnsupportedPlatform(url.clone()))?;
        Ok((url, platform))
    }

    /// Metadata for `input`; only input errors are reported
    pub async fn media_info(&self, input: &str) -> Result<MediaInfo, DownloadError> {
        self.media_info_with_cancel(input, &CancellationToken::new())
            .await
    }

    pub async fn media_info_with_cancel(
        &self,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<MediaInfo, DownloadError> {
        let (url, platform) = self.detect(input)?;
        info!("[MediaDownloader] {} detected for {}", config_for(platform).name, url);

        Ok(self.metadata.resolve_with_cancel(&url, platform, cancel).await)
    }

    pub fn formats(&self, platform: Platform) -> Vec<DownloadFormat> {
        FormatSelector::available_formats(config_for(platform))
    }

    /// Pick a format for `platform` by selector, or the recommended one
    pub fn select_format(
        &self,
        platform: Platform,
        selector: Option<&str>,
    ) -> Result<DownloadFormat, DownloadError> {
        let formats = self.formats(platform);
        match selector {
            Some(sel) => FormatSelector::find_format(&formats, sel),
            None => FormatSelector::recommend(&formats).cloned().ok_or_else(|| {
                DownloadError::UnknownFormat(format!("no formats for {}", platform))
            }),
        }
    }

    /// Run one download session, recording it in history
    pub async fn download(
        &self,
        media: MediaInfo,
        format: DownloadFormat,
        target: &dyn SaveTarget,
        emitter: ProgressEmitter,
    ) -> Result<DownloadOutcome, DownloadError> {
        let mut session = DownloadSession::new(media, format, &self.downloads, target)
            .with_store(&self.store)
            .with_emitter(emitter);
        session.start().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Endpoints;
    use crate::downloader::models::MediaKind;

    fn app() -> (tempfile::TempDir, MediaDownloader) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default()
            .with_endpoints(Endpoints::all_at("http://127.0.0.1:9"))
            .with_data_dir(dir.path().to_path_buf());
        (dir, MediaDownloader::new(config).unwrap())
    }

    #[test]
    fn test_detect() {
        let (_dir, app) = app();

        let (url, platform) = app.detect("  https://www.youtube.com/watch?v=abc123 ").unwrap();
        assert_eq!(url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(platform, Platform::Youtube);

        assert!(matches!(
            app.detect("ftp://youtube.com/x"),
            Err(DownloadError::InvalidUrl(_))
        ));
        assert!(matches!(
            app.detect("https://vimeo.com/1"),
            Err(DownloadError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_select_format() {
        let (_dir, app) = app();

        let default = app.select_format(Platform::Youtube, None).unwrap();
        assert_eq!(FormatSelector::selector(&default), "video-hd");

        let audio = app.select_format(Platform::Tiktok, Some("audio")).unwrap();
        assert_eq!(audio.kind, MediaKind::Audio);

        assert!(matches!(
            app.select_format(Platform::Pinterest, Some("audio")),
            Err(DownloadError::UnknownFormat(_))
        ));
    }
}
