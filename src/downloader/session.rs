// Download session - preparing → downloading → completed | error
//
// Progress is cosmetic: it creeps towards 80% while the resolver works and
// jumps to 100% when it returns. Only the save step decides the outcome.

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::errors::DownloadError;
use super::models::{
    DownloadFormat, DownloadHistoryEntry, DownloadProgress, DownloadState, DownloadStatus,
    MediaInfo, ResolvedResource,
};
use super::orchestrator::DownloadResolver;
use super::traits::{save_failed, ProgressEmitter, SaveTarget};
use super::utils::{human_size, sanitize_filename};
use crate::storage::LocalStore;

/// What the user is told when a download fails
pub const DOWNLOAD_FAILED_MESSAGE: &str =
    "Download failed. Please try again or check your internet connection.";

const TICK: Duration = Duration::from_millis(500);
const PROGRESS_CEILING: f32 = 80.0;
const PROGRESS_STEP: f32 = 15.0;
/// Longest wait for the next piece of a media transfer
const STALL_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of a successful session
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub entry: DownloadHistoryEntry,
    /// The file is a labeled placeholder, not the requested media
    pub placeholder: bool,
}

pub struct DownloadSession<'a> {
    media: MediaInfo,
    format: DownloadFormat,
    resolver: &'a DownloadResolver,
    target: &'a dyn SaveTarget,
    store: Option<&'a LocalStore>,
    emitter: ProgressEmitter,
    tick: Duration,
    state: DownloadState,
    progress: f32,
    last_entry: Option<DownloadHistoryEntry>,
}

impl<'a> DownloadSession<'a> {
    pub fn new(
        media: MediaInfo,
        format: DownloadFormat,
        resolver: &'a DownloadResolver,
        target: &'a dyn SaveTarget,
    ) -> Self {
        Self {
            media,
            format,
            resolver,
            target,
            store: None,
            emitter: ProgressEmitter::silent(),
            tick: TICK,
            state: DownloadState::Preparing,
            progress: 0.0,
            last_entry: None,
        }
    }

    /// Record the outcome in this store's history
    pub fn with_store(mut self, store: &'a LocalStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_emitter(mut self, emitter: ProgressEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    /// Progress tick interval
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn state(&self) -> DownloadState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// History entry written by the last run, if any
    pub fn history_entry(&self) -> Option<&DownloadHistoryEntry> {
        self.last_entry.as_ref()
    }

    /// User-facing message once the session has failed
    pub fn error_message(&self) -> Option<&'static str> {
        (self.state == DownloadState::Error).then_some(DOWNLOAD_FAILED_MESSAGE)
    }

    /// Run the download. Only valid once, from `preparing`.
    pub async fn start(&mut self) -> Result<DownloadOutcome, DownloadError> {
        if self.state != DownloadState::Preparing {
            return Err(DownloadError::InvalidState(format!(
                "cannot start a download that is {:?}",
                self.state
            )));
        }

        self.set_state(DownloadState::Downloading);
        info!(
            "[Session] Downloading \"{}\" as {} {}",
            self.media.title, self.format.kind, self.format.quality
        );

        let resource = self.resolve_with_progress().await;
        self.progress = 100.0;
        self.emit();

        let stem = sanitize_filename(&self.media.title);
        let file_name = format!("{}.{}", stem, self.format.extension);

        match self.save(&resource, &file_name).await {
            Ok((path, size)) => {
                let locator = resource.locator();
                let mut format = self.format.clone();
                format.url = Some(locator.clone());

                let entry = self.new_entry(format, DownloadStatus::Completed);
                let entry = DownloadHistoryEntry {
                    file_size: Some(human_size(size)),
                    download_url: Some(locator),
                    ..entry
                };
                self.record(entry.clone());
                self.set_state(DownloadState::Completed);

                info!("[Session] ✓ Saved {}", path.display());
                Ok(DownloadOutcome {
                    path,
                    entry,
                    placeholder: resource.is_placeholder(),
                })
            }
            Err(e) => {
                warn!("[Session] ✗ Download failed: {}", e);

                let entry = DownloadHistoryEntry {
                    error: Some(e.to_string()),
                    ..self.new_entry(self.format.clone(), DownloadStatus::Failed)
                };
                self.record(entry);
                self.set_state(DownloadState::Error);

                Err(e)
            }
        }
    }

    async fn resolve_with_progress(&mut self) -> ResolvedResource {
        let resolver = self.resolver;
        let url = self.media.url.clone();
        let title = self.media.title.clone();
        let format = self.format.clone();

        let resolve = resolver.resolve(&url, &format, Some(&title));
        tokio::pin!(resolve);

        let start = tokio::time::Instant::now() + self.tick;
        let mut ticker = tokio::time::interval_at(start, self.tick);

        loop {
            tokio::select! {
                resource = &mut resolve => return resource,
                _ = ticker.tick() => {
                    self.progress = advance(self.progress);
                    self.emit();
                }
            }
        }
    }

    async fn save(
        &self,
        resource: &ResolvedResource,
        file_name: &str,
    ) -> Result<(PathBuf, u64), DownloadError> {
        match resource {
            ResolvedResource::Remote { url, .. } => {
                let request = self.resolver.media_client().get(url).send();
                let mut response = stalled(request).await??;
                let status = response.status();
                if !status.is_success() {
                    return Err(DownloadError::HttpStatus(status.as_u16()));
                }

                let (path, mut writer) = self.target.create(file_name).await?;
                let mut size = 0u64;
                while let Some(chunk) = stalled(response.chunk()).await?? {
                    writer
                        .write_all(&chunk)
                        .await
                        .map_err(|e| save_failed(&path, e))?;
                    size += chunk.len() as u64;
                }
                writer.flush().await.map_err(|e| save_failed(&path, e))?;

                Ok((path, size))
            }
            ResolvedResource::Placeholder { bytes, .. } => {
                let path = self.target.save(file_name, bytes).await?;
                Ok((path, bytes.len() as u64))
            }
        }
    }

    fn new_entry(&self, format: DownloadFormat, status: DownloadStatus) -> DownloadHistoryEntry {
        DownloadHistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            media_info: self.media.clone(),
            format,
            downloaded_at: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
            status,
            file_size: None,
            download_url: None,
            error: None,
        }
    }

    fn record(&mut self, entry: DownloadHistoryEntry) {
        if let Some(store) = self.store {
            if let Err(e) = store.add_history(entry.clone()) {
                warn!("[Session] Failed to record history: {}", e);
            }
        }
        self.last_entry = Some(entry);
    }

    fn set_state(&mut self, state: DownloadState) {
        self.state = state;
        self.emit();
    }

    fn emit(&self) {
        self.emitter.emit(DownloadProgress {
            percent: self.progress,
            status: self.state,
        });
    }
}

/// Fail a transfer step that makes no progress for `STALL_TIMEOUT`
async fn stalled<T>(
    step: impl std::future::Future<Output = Result<T, reqwest::Error>>,
) -> Result<Result<T, DownloadError>, DownloadError> {
    tokio::time::timeout(STALL_TIMEOUT, step)
        .await
        .map(|res| res.map_err(DownloadError::from))
        .map_err(|_| DownloadError::NetworkTimeout)
}

/// Next cosmetic progress value
fn advance(progress: f32) -> f32 {
    if progress >= PROGRESS_CEILING {
        return progress;
    }
    let step = rand::thread_rng().gen_range(0.0..PROGRESS_STEP);
    (progress + step).min(PROGRESS_CEILING)
}
