pub mod app;
pub mod cli;
pub mod config;
pub mod downloader;
pub mod logging;
pub mod storage;

pub use app::MediaDownloader;
pub use config::AppConfig;
pub use downloader::DownloadError;
pub use storage::{AppSettings, LocalStore};

/// Entry point for the `media-downloader` binary
pub async fn run() -> anyhow::Result<()> {
    cli::run().await
}
