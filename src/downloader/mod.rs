// Downloader module - platform detection, resolution chains and sessions

pub mod backends;
pub mod diagnostics;
pub mod errors;
pub mod extractors;
pub mod format_selector;
pub mod models;
pub mod orchestrator;
pub mod placeholder;
pub mod platforms;
pub mod scrape;
pub mod session;
pub mod traits;
pub mod utils;

pub use diagnostics::{diagnose_error, FailureReason, Resolution, StrategyFailure};
pub use errors::DownloadError;
pub use extractors::MetadataResolver;
pub use format_selector::FormatSelector;
pub use models::{
    DownloadFormat, DownloadHistoryEntry, DownloadProgress, DownloadState, DownloadStatus,
    MediaInfo, MediaKind, NetworkConfig, Quality, ResolvedResource,
};
pub use orchestrator::DownloadResolver;
pub use platforms::{classify, config_for, Platform, PlatformConfig};
pub use session::{DownloadOutcome, DownloadSession, DOWNLOAD_FAILED_MESSAGE};
pub use traits::{
    DirectorySaveTarget, DownloaderBackend, ProgressEmitter, SaveTarget, SaveWriter,
};
