use httpmock::prelude::*;
use httpmock::Method::HEAD;
use media_downloader_lib::config::{AppConfig, Endpoints};
use media_downloader_lib::downloader::{
    DirectorySaveTarget, DownloadError, DownloadFormat, DownloadResolver, DownloadState,
    DownloadStatus, MediaInfo, MediaKind, Platform, ProgressEmitter, Quality, ResolvedResource,
};
use media_downloader_lib::MediaDownloader;
use serde_json::json;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn config(server: &MockServer, data_dir: &std::path::Path) -> AppConfig {
    AppConfig::default()
        .with_endpoints(Endpoints::all_at(&server.base_url()))
        .with_timeouts(1, 1)
        .with_data_dir(data_dir.to_path_buf())
}

fn media(url: &str) -> MediaInfo {
    MediaInfo {
        id: "abc123".to_string(),
        title: "Mountain Bike Run".to_string(),
        thumbnail: "https://i.ytimg.com/vi/abc123/hqdefault.jpg".to_string(),
        duration: "4:20".to_string(),
        platform: Platform::Youtube,
        url: url.to_string(),
        description: None,
        author: Some("Trail Cam".to_string()),
        views: None,
        upload_date: None,
        synthetic: false,
    }
}

fn video_hd() -> DownloadFormat {
    DownloadFormat::new(MediaKind::Video, Quality::Hd, "mp4", "~50MB")
}

#[tokio::test]
async fn cobalt_link_is_fetched_and_saved() {
    let server = MockServer::start_async().await;
    let file_url = server.url("/files/clip.mp4");
    let cobalt = server
        .mock_async(|when, then| {
            when.method(POST).path("/cobalt");
            then.status(200)
                .json_body(json!({ "status": "success", "url": file_url }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/files/clip.mp4");
            then.status(200)
                .header("Content-Type", "video/mp4")
                .body(vec![7u8; 2048]);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = MediaDownloader::new(config(&server, &dir.path().join("data"))).unwrap();
    let target = DirectorySaveTarget::new(dir.path().join("out"));

    let outcome = app
        .download(
            media("https://www.youtube.com/watch?v=abc123"),
            video_hd(),
            &target,
            ProgressEmitter::silent(),
        )
        .await
        .unwrap();

    cobalt.assert_async().await;
    assert!(!outcome.placeholder);
    assert_eq!(outcome.path, dir.path().join("out").join("Mountain_Bike_Run.mp4"));
    assert_eq!(std::fs::read(&outcome.path).unwrap().len(), 2048);

    let history = app.store().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, DownloadStatus::Completed);
    assert_eq!(history[0].download_url.as_deref(), Some(file_url.as_str()));
    assert_eq!(history[0].format.url.as_deref(), Some(file_url.as_str()));
    assert_eq!(history[0].file_size.as_deref(), Some("2.0 KB"));
}

#[tokio::test]
async fn slow_file_transfer_outlasts_the_api_timeout() {
    let server = MockServer::start_async().await;
    let file_url = server.url("/files/long.mp4");
    server
        .mock_async(|when, then| {
            when.method(POST).path("/cobalt");
            then.status(200)
                .json_body(json!({ "status": "success", "url": file_url }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/files/long.mp4");
            then.status(200)
                .header("Content-Type", "video/mp4")
                .body(vec![3u8; 4096])
                .delay(Duration::from_secs(2));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = config(&server, &dir.path().join("data")).with_timeouts(5, 5);
    config.network.timeout = Some(1);
    let app = MediaDownloader::new(config).unwrap();
    let target = DirectorySaveTarget::new(dir.path().join("out"));

    let outcome = app
        .download(
            media("https://www.youtube.com/watch?v=abc123"),
            video_hd(),
            &target,
            ProgressEmitter::silent(),
        )
        .await
        .unwrap();

    assert!(!outcome.placeholder);
    assert_eq!(std::fs::read(&outcome.path).unwrap(), vec![3u8; 4096]);
    assert_eq!(app.store().history()[0].status, DownloadStatus::Completed);
}

#[tokio::test]
async fn broken_remote_link_records_failed_download() {
    let server = MockServer::start_async().await;
    let file_url = server.url("/files/gone.mp4");
    server
        .mock_async(|when, then| {
            when.method(POST).path("/cobalt");
            then.status(200)
                .json_body(json!({ "status": "success", "url": file_url }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/files/gone.mp4");
            then.status(410);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let app = MediaDownloader::new(config(&server, dir.path())).unwrap();
    let target = DirectorySaveTarget::new(dir.path().join("out"));
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let err = app
        .download(
            media("https://www.youtube.com/watch?v=abc123"),
            video_hd(),
            &target,
            ProgressEmitter::new(tx),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::HttpStatus(410)));

    let history = app.store().history();
    assert_eq!(history[0].status, DownloadStatus::Failed);
    assert!(!history[0].error.as_deref().unwrap_or("").is_empty());
    assert!(history[0].download_url.is_none());

    let mut last = None;
    while let Ok(update) = rx.try_recv() {
        last = Some(update);
    }
    assert_eq!(last.unwrap().status, DownloadState::Error);
}

#[tokio::test]
async fn every_backend_failing_yields_a_placeholder() {
    // unmatched requests answer 404
    let server = MockServer::start_async().await;
    let dir = tempfile::tempdir().unwrap();
    let resolver =
        DownloadResolver::with_client(reqwest::Client::new(), &config(&server, dir.path()));
    let page = server.url("/watch/some-clip");

    for (kind, ext, mime) in [
        (MediaKind::Video, "mp4", "video/mp4"),
        (MediaKind::Audio, "mp3", "audio/mpeg"),
        (MediaKind::Image, "jpg", "image/jpeg"),
    ] {
        let format = DownloadFormat::new(kind, Quality::High, ext, "~1MB");
        let res = resolver
            .resolve_detailed(&page, &format, Some("Some Clip"), &CancellationToken::new())
            .await;

        assert!(res.used_fallback());
        assert_eq!(res.failures.len(), 5);
        assert_eq!(res.value.mime(), mime);
        assert!(!res.value.locator().is_empty());
        match res.value {
            ResolvedResource::Placeholder { file_name, .. } => {
                assert!(file_name.starts_with("Some_Clip_"));
                assert!(file_name.ends_with(ext));
            }
            other => panic!("expected placeholder, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn direct_media_url_is_used_as_is() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(HEAD).path("/media/song.mp3");
            then.status(200).header("Content-Type", "audio/mpeg");
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolver =
        DownloadResolver::with_client(reqwest::Client::new(), &config(&server, dir.path()));
    let url = server.url("/media/song.mp3");
    let format = DownloadFormat::new(MediaKind::Audio, Quality::High, "mp3", "~8MB");

    let res = resolver
        .resolve_detailed(&url, &format, None, &CancellationToken::new())
        .await;

    assert_eq!(res.strategy, Some("direct"));
    assert_eq!(res.value.locator(), url);
}

#[tokio::test]
async fn proxy_page_scrape_finds_media_link() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/proxy");
            then.status(200).json_body(json!({
                "contents":
                    "<html><video src=\"https://cdn.example.com/v/clip.webm\"></video></html>"
            }));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolver =
        DownloadResolver::with_client(reqwest::Client::new(), &config(&server, dir.path()));
    let page = server.url("/watch/clip");

    let res = resolver
        .resolve_detailed(&page, &video_hd(), None, &CancellationToken::new())
        .await;

    assert_eq!(res.strategy, Some("proxy-scrape"));
    assert_eq!(res.value.locator(), "https://cdn.example.com/v/clip.webm");
}

#[tokio::test]
async fn ytdlp_and_savefrom_are_tried_after_cobalt() {
    let server = MockServer::start_async().await;
    let savefrom = server
        .mock_async(|when, then| {
            when.method(POST).path("/savefrom");
            then.status(200)
                .json_body(json!({ "url": "https://cdn.example.com/a.mp4" }));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let resolver =
        DownloadResolver::with_client(reqwest::Client::new(), &config(&server, dir.path()));

    let res = resolver
        .resolve_detailed(
            "https://www.youtube.com/watch?v=abc123",
            &video_hd(),
            None,
            &CancellationToken::new(),
        )
        .await;

    savefrom.assert_async().await;
    assert_eq!(res.strategy, Some("savefrom"));
    let failed: Vec<&str> = res.failures.iter().map(|f| f.strategy).collect();
    assert_eq!(failed, vec!["cobalt", "ytdlp-web"]);
}
