// Command-line front end

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use crate::app::MediaDownloader;
use crate::config::AppConfig;
use crate::downloader::format_selector::FormatSelector;
use crate::downloader::models::{DownloadHistoryEntry, MediaInfo};
use crate::downloader::platforms::{config_for, Platform};
use crate::downloader::session::DOWNLOAD_FAILED_MESSAGE;
use crate::downloader::traits::{DirectorySaveTarget, ProgressEmitter};
use crate::downloader::{DownloadProgress, DownloadState};
use crate::logging;

#[derive(Debug, Parser)]
#[command(name = "media-downloader", version, about)]
pub struct Cli {
    /// HTTP or SOCKS5 proxy for all requests (e.g. socks5://127.0.0.1:1080)
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Config file (default: <config dir>/media-downloader/config.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where history, favorites and settings are stored
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List supported platforms
    Platforms,
    /// Show which platform a link belongs to
    Detect { url: String },
    /// Resolve metadata for a link
    Info {
        url: String,
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List formats offered for a link
    Formats { url: String },
    /// Download a link
    Download {
        url: String,
        /// Format selector: video-hd, video-sd, audio, image, mp3...
        #[arg(short, long)]
        format: Option<String>,
        /// Output directory (default: the download directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or edit download history
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
    /// Show or edit favorites
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
    /// Show or edit settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryAction {
    List,
    Clear,
    Remove { id: String },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    List,
    Add { url: String },
    Remove { id: String },
    Toggle { url: String },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    Show,
    /// Keys: language, theme, primaryColor
    Set { key: String, value: String },
}

/// Parse arguments and run one command
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = AppConfig::load(cli.config.as_deref())?.with_proxy(cli.proxy.clone());
    if let Some(dir) = cli.data_dir.clone() {
        config = config.with_data_dir(dir);
    }

    let app = MediaDownloader::new(config)?;
    execute(&app, cli.command).await
}

async fn execute(app: &MediaDownloader, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Platforms => {
            for platform in Platform::all() {
                let config = config_for(*platform);
                let kinds: Vec<&str> = [
                    ("video", config.supports.video),
                    ("audio", config.supports.audio),
                    ("image", config.supports.image),
                ]
                .iter()
                .filter(|(_, on)| *on)
                .map(|(kind, _)| *kind)
                .collect();
                println!("{:<10} {:<10} {}", platform, config.name, kinds.join(", "));
            }
        }
        Command::Detect { url } => {
            let (_, platform) = app.detect(&url)?;
            println!("{} ({})", platform, config_for(platform).name);
        }
        Command::Info { url, json } => {
            let media = app.media_info(&url).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&media)?);
            } else {
                print_media(&media);
            }
        }
        Command::Formats { url } => {
            let (_, platform) = app.detect(&url)?;
            for format in app.formats(platform) {
                println!(
                    "{:<12} {:<16} .{:<4} {}",
                    FormatSelector::selector(&format),
                    FormatSelector::quality_label(&format),
                    format.extension,
                    format.size.as_deref().unwrap_or("")
                );
            }
        }
        Command::Download {
            url,
            format,
            output,
        } => download(app, &url, format.as_deref(), output).await?,
        Command::History { action } => match action.unwrap_or(HistoryAction::List) {
            HistoryAction::List => {
                let history = app.store().history();
                if history.is_empty() {
                    println!("No downloads yet");
                }
                for entry in &history {
                    print_history_entry(entry);
                }
            }
            HistoryAction::Clear => {
                app.store().clear_history()?;
                println!("History cleared");
            }
            HistoryAction::Remove { id } => {
                if !app.store().remove_history(&id)? {
                    bail!("No history entry with id {}", id);
                }
                println!("Removed {}", id);
            }
        },
        Command::Favorites { action } => match action.unwrap_or(FavoritesAction::List) {
            FavoritesAction::List => {
                let favorites = app.store().favorites();
                if favorites.is_empty() {
                    println!("No favorites yet");
                }
                for media in &favorites {
                    println!("{:<14} {:<10} {}", media.id, media.platform, media.title);
                }
            }
            FavoritesAction::Add { url } => {
                let media = app.media_info(&url).await?;
                app.store().add_favorite(media.clone())?;
                println!("Added \"{}\" ({})", media.title, media.id);
            }
            FavoritesAction::Remove { id } => {
                if !app.store().remove_favorite(&id)? {
                    bail!("No favorite with id {}", id);
                }
                println!("Removed {}", id);
            }
            FavoritesAction::Toggle { url } => {
                let media = app.media_info(&url).await?;
                let now = app.store().toggle_favorite(media.clone())?;
                let verb = if now { "Added" } else { "Removed" };
                println!("{} \"{}\" ({})", verb, media.title, media.id);
            }
        },
        Command::Settings { action } => {
            let mut settings = app.store().settings();
            if let Some(SettingsAction::Set { key, value }) = action {
                settings.set(&key, &value)?;
                app.store().save_settings(&settings)?;
            }
            println!("language     {}", settings.language);
            println!("theme        {}", settings.theme);
            println!("primaryColor {}", settings.primary_color);
        }
    }

    Ok(())
}

async fn download(
    app: &MediaDownloader,
    url: &str,
    selector: Option<&str>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (_, platform) = app.detect(url)?;
    let format = app.select_format(platform, selector)?;
    let media = app.media_info(url).await?;
    let dir = output.unwrap_or_else(|| app.config().output_dir.clone());
    let target = DirectorySaveTarget::new(dir);

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<DownloadProgress>();
    let printer = tokio::spawn(async move {
        while let Some(progress) = rx.recv().await {
            if progress.status == DownloadState::Downloading {
                eprint!("\rDownloading... {:>3.0}%", progress.percent);
            }
        }
        eprintln!();
    });

    let result = app
        .download(media, format, &target, ProgressEmitter::new(tx))
        .await;
    printer.await.context("progress printer panicked")?;

    match result {
        Ok(outcome) => {
            println!("Saved {}", outcome.path.display());
            if outcome.placeholder {
                println!(
                    "No provider returned the media; saved a labeled placeholder file instead."
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", DOWNLOAD_FAILED_MESSAGE);
            Err(e).context("download failed")
        }
    }
}

fn print_media(media: &MediaInfo) {
    println!("Title:     {}", media.title);
    println!("Platform:  {}", config_for(media.platform).name);
    println!("Id:        {}", media.id);
    println!("Duration:  {}", media.duration);
    if let Some(author) = &media.author {
        println!("Author:    {}", author);
    }
    if let Some(views) = &media.views {
        println!("Views:     {}", views);
    }
    if let Some(date) = &media.upload_date {
        println!("Uploaded:  {}", date);
    }
    println!("Thumbnail: {}", media.thumbnail);
    if media.synthetic {
        println!("(some fields are generated placeholders; providers did not supply them)");
    }
}

fn print_history_entry(entry: &DownloadHistoryEntry) {
    let when = entry
        .downloaded_at()
        .map(|t| format!("{} {:02}:{:02}", t.date(), t.hour(), t.minute()))
        .unwrap_or_else(|| entry.downloaded_at.clone());

    println!(
        "{}  {:<9} {:<16} {:<10} {}",
        when,
        format!("{:?}", entry.status).to_lowercase(),
        FormatSelector::selector(&entry.format),
        entry.media_info.platform,
        entry.media_info.title
    );
    println!("    id {}", entry.id);
    if let Some(error) = &entry.error {
        println!("    error: {}", error);
    }
}
