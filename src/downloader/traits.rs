// Download backend trait, progress emitter and save target

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::errors::DownloadError;
use super::models::{DownloadFormat, DownloadProgress};
use crate::config::Endpoints;

/// Everything one download attempt may use
pub struct DownloadContext<'a> {
    pub url: &'a str,
    pub format: &'a DownloadFormat,
    pub client: &'a reqwest::Client,
    pub endpoints: &'a Endpoints,
    /// Cancelled once the attempt has timed out or been abandoned
    pub cancel: CancellationToken,
}

/// Trait for download backend implementations
#[async_trait]
pub trait DownloaderBackend: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Resolve a direct link to the media in the requested format
    async fn resolve(&self, ctx: &DownloadContext<'_>) -> Result<String, DownloadError>;
}

/// Progress emitter helper
#[derive(Clone, Default)]
pub struct ProgressEmitter {
    sender: Option<UnboundedSender<DownloadProgress>>,
}

impl ProgressEmitter {
    pub fn new(sender: UnboundedSender<DownloadProgress>) -> Self {
        Self {
            sender: Some(sender),
        }
    }

    /// Emitter that drops every update
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn emit(&self, progress: DownloadProgress) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(progress);
        }
    }
}

/// Writer a save target hands out for one file
pub type SaveWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Final destination of a downloaded file
#[async_trait]
pub trait SaveTarget: Send + Sync {
    /// Open `file_name` for writing, returning where it will end up
    async fn create(&self, file_name: &str) -> Result<(PathBuf, SaveWriter), DownloadError>;

    /// Persist `bytes` under `file_name` in one go
    async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DownloadError> {
        let (path, mut writer) = self.create(file_name).await?;
        writer
            .write_all(bytes)
            .await
            .map_err(|e| save_failed(&path, e))?;
        writer.flush().await.map_err(|e| save_failed(&path, e))?;
        Ok(path)
    }
}

pub(crate) fn save_failed(path: &Path, e: std::io::Error) -> DownloadError {
    DownloadError::SaveFailed(format!("{}: {}", path.display(), e))
}

/// Writes files into a directory on disk
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl SaveTarget for DirectorySaveTarget {
    async fn create(&self, file_name: &str) -> Result<(PathBuf, SaveWriter), DownloadError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| save_failed(&self.dir, e))?;

        let path = self.dir.join(file_name);
        let file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| save_failed(&path, e))?;

        Ok((path, Box::new(file)))
    }
}
