use std::time::Duration;

use httpmock::prelude::*;
use media_downloader_lib::config::{AppConfig, Endpoints};
use media_downloader_lib::downloader::extractors::{
    CobaltExtractor, InfoExtractor, NoEmbedExtractor, OEmbedExtractor, PlatformApiExtractor,
    ProxyScrapeExtractor,
};
use media_downloader_lib::downloader::{DownloadError, MetadataResolver, Platform};
use serde_json::json;
use tokio_util::sync::CancellationToken;

fn config(server: &MockServer) -> AppConfig {
    AppConfig::default()
        .with_endpoints(Endpoints::all_at(&server.base_url()))
        .with_timeouts(1, 1)
}

fn network_only() -> Vec<Box<dyn InfoExtractor>> {
    vec![
        Box::new(PlatformApiExtractor),
        Box::new(CobaltExtractor),
        Box::new(OEmbedExtractor),
        Box::new(NoEmbedExtractor),
        Box::new(ProxyScrapeExtractor),
    ]
}

#[tokio::test]
async fn all_failing_strategies_fall_back_to_synthetic_metadata() {
    // unmatched requests answer 404
    let server = MockServer::start_async().await;

    let resolver = MetadataResolver::with_client(reqwest::Client::new(), &config(&server))
        .with_extractors(network_only());

    let res = resolver
        .resolve_detailed(
            "https://tiktok.com/@x/video/42",
            Platform::Tiktok,
            &CancellationToken::new(),
        )
        .await;

    assert!(res.used_fallback());
    assert_eq!(res.failures.len(), 5);
    assert_eq!(res.value.platform, Platform::Tiktok);
    assert_eq!(res.value.id, "42");
    assert!(!res.value.title.is_empty());
    assert!(res.value.synthetic);
}

#[tokio::test]
async fn default_chain_ends_with_url_heuristics() {
    // unmatched requests answer 404
    let server = MockServer::start_async().await;

    let resolver = MetadataResolver::with_client(reqwest::Client::new(), &config(&server));

    let res = resolver
        .resolve_detailed(
            "https://tiktok.com/@x/video/42",
            Platform::Tiktok,
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(res.strategy, Some("url-heuristic"));
    assert_eq!(res.value.title, "TikTok Video 42");
    assert_eq!(res.value.author.as_deref(), Some("@x"));
}

#[tokio::test]
async fn platform_api_answer_is_normalized() {
    let server = MockServer::start_async().await;
    let api = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/youtube/info")
                .query_param("format", "json");
            then.status(200).json_body(json!({
                "title": "Never Gonna Give You Up",
                "author_name": "Rick Astley",
                "thumbnail_url": "https://i.ytimg.com/vi/abc123/hqdefault.jpg",
                "duration": "3:33",
                "view_count": 1500000000u64,
            }));
        })
        .await;

    let resolver = MetadataResolver::with_client(reqwest::Client::new(), &config(&server));
    let info = resolver
        .resolve("https://www.youtube.com/watch?v=abc123", Platform::Youtube)
        .await;

    api.assert_async().await;
    assert_eq!(info.title, "Never Gonna Give You Up");
    assert_eq!(info.author.as_deref(), Some("Rick Astley"));
    assert_eq!(info.views.as_deref(), Some("1500000000"));
    assert_eq!(info.id, "abc123");
    assert!(!info.synthetic);
}

#[tokio::test]
async fn slow_strategy_is_abandoned_for_the_next_one() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/info");
            then.status(200)
                .delay(Duration::from_secs(5))
                .json_body(json!({ "title": "Too Late" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/cobalt");
            then.status(200)
                .json_body(json!({ "status": "success", "title": "From Cobalt" }));
        })
        .await;

    let resolver = MetadataResolver::with_client(reqwest::Client::new(), &config(&server));
    let res = resolver
        .resolve_detailed(
            "https://youtu.be/abc123",
            Platform::Youtube,
            &CancellationToken::new(),
        )
        .await;

    assert_eq!(res.value.title, "From Cobalt");
    assert_eq!(res.strategy, Some("cobalt"));
    assert_eq!(res.failures[0].strategy, "platform-api");
    assert!(matches!(res.failures[0].error, DownloadError::NetworkTimeout));
}

#[tokio::test]
async fn cobalt_error_status_is_a_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/cobalt");
            then.status(200)
                .json_body(json!({ "status": "error", "text": "unsupported" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/noembed");
            then.status(200).json_body(json!({ "title": "Via Noembed" }));
        })
        .await;

    let resolver = MetadataResolver::with_client(reqwest::Client::new(), &config(&server));
    let res = resolver
        .resolve_detailed(
            "https://www.facebook.com/page/videos/777",
            Platform::Facebook,
            &CancellationToken::new(),
        )
        .await;

    // facebook has no oEmbed endpoint, so noembed is next after cobalt
    assert_eq!(res.strategy, Some("noembed"));
    assert_eq!(res.value.title, "Via Noembed");
    let failed: Vec<&str> = res.failures.iter().map(|f| f.strategy).collect();
    assert_eq!(failed, vec!["platform-api", "cobalt", "oembed"]);
}

#[tokio::test]
async fn malformed_url_still_resolves() {
    let server = MockServer::start_async().await;
    let resolver = MetadataResolver::with_client(reqwest::Client::new(), &config(&server))
        .with_extractors(network_only());

    let info = resolver.resolve("::::", Platform::Whatsapp).await;

    assert_eq!(info.platform, Platform::Whatsapp);
    assert!(!info.title.is_empty());
    assert!(info.synthetic);
}
