//! End-to-end publish workflow tests
//!
//! These tests verify the full orchestration path: sanitize once, fan out
//! concurrently, aggregate in request order, and keep every platform's
//! outcome isolated from its siblings.

use std::sync::Arc;
use std::time::Duration;

use libalbumcast::config::TelegramConfig;
use libalbumcast::platforms::mock::MockProvider;
use libalbumcast::platforms::telegram::TelegramProvider;
use libalbumcast::platforms::Provider;
use libalbumcast::publisher::SocialPublisher;
use libalbumcast::types::{AlbumShareData, Platform};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn album() -> AlbumShareData {
    AlbumShareData {
        title: "Rally Night".into(),
        description: "Photos from the rally".into(),
        public_url: "https://albums.example.com/a/rally".into(),
        cover_photo_url: Some("https://cdn.example.com/cover.jpg".into()),
        photo_urls: vec![
            "https://cdn.example.com/1.jpg".into(),
            "https://cdn.example.com/2.jpg".into(),
        ],
        photo_count: 2,
        campaign_name: "Chen 2026".into(),
    }
}

#[tokio::test]
async fn publishes_to_all_requested_platforms() {
    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(MockProvider::success(Platform::Facebook)),
        Arc::new(MockProvider::success(Platform::Telegram)),
        Arc::new(MockProvider::success(Platform::Line)),
    ];

    let publisher = SocialPublisher::new(providers, Duration::from_secs(5));
    let results = publisher
        .publish_to_social(
            &[Platform::Facebook, Platform::Telegram, Platform::Line],
            &album(),
            None,
        )
        .await;

    assert_eq!(results.len(), 3);
    for result in &results {
        assert!(result.success, "{} should succeed", result.platform);
        assert!(result.post_url.is_some());
        assert!(result.error.is_none());
    }
}

#[tokio::test]
async fn result_order_is_request_order_under_mixed_latency() {
    // The slowest platform is requested first; the fastest last.
    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(MockProvider::success(Platform::X).with_delay(Duration::from_millis(150))),
        Arc::new(MockProvider::success(Platform::Facebook).with_delay(Duration::from_millis(50))),
        Arc::new(MockProvider::success(Platform::Telegram)),
    ];

    let publisher = SocialPublisher::new(providers, Duration::from_secs(5));
    let results = publisher
        .publish_to_social(
            &[Platform::X, Platform::Facebook, Platform::Telegram],
            &album(),
            None,
        )
        .await;

    let order: Vec<Platform> = results.iter().map(|r| r.platform).collect();
    assert_eq!(order, vec![Platform::X, Platform::Facebook, Platform::Telegram]);
}

#[tokio::test]
async fn fan_out_runs_concurrently() {
    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(MockProvider::success(Platform::Facebook).with_delay(Duration::from_millis(100))),
        Arc::new(MockProvider::success(Platform::X).with_delay(Duration::from_millis(100))),
        Arc::new(MockProvider::success(Platform::Line).with_delay(Duration::from_millis(100))),
    ];

    let publisher = SocialPublisher::new(providers, Duration::from_secs(5));

    let start = std::time::Instant::now();
    let results = publisher
        .publish_to_social(&[Platform::Facebook, Platform::X, Platform::Line], &album(), None)
        .await;
    let elapsed = start.elapsed();

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r.success));
    // Three 100ms tasks sequentially would take 300ms; concurrently well under.
    assert!(elapsed < Duration::from_millis(250), "took {:?}", elapsed);
}

#[tokio::test]
async fn one_platform_failure_never_hides_sibling_results() {
    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(MockProvider::failure(Platform::Facebook, "page token expired")),
        Arc::new(MockProvider::panicking(Platform::Instagram)),
        Arc::new(MockProvider::success(Platform::X)),
    ];

    let publisher = SocialPublisher::new(providers, Duration::from_secs(5));
    let results = publisher
        .publish_to_social(
            &[Platform::Facebook, Platform::Instagram, Platform::X],
            &album(),
            None,
        )
        .await;

    assert_eq!(results.len(), 3);

    assert!(!results[0].success);
    assert_eq!(results[0].error.as_deref(), Some("page token expired"));

    assert_eq!(results[1].platform, Platform::Instagram);
    assert!(!results[1].success);

    assert_eq!(results[2].platform, Platform::X);
    assert!(results[2].success);
}

#[tokio::test]
async fn unconfigured_platform_reports_without_network() {
    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(MockProvider::not_configured(Platform::TikTok)),
        Arc::new(MockProvider::success(Platform::Telegram)),
    ];

    let publisher = SocialPublisher::new(providers, Duration::from_secs(5));
    let results = publisher
        .publish_to_social(&[Platform::TikTok, Platform::Telegram], &album(), None)
        .await;

    assert!(!results[0].success);
    assert_eq!(results[0].error.as_deref(), Some("tiktok is not configured"));
    assert!(results[1].success);
}

#[tokio::test]
async fn sanitization_runs_before_any_provider_sees_the_album() {
    // All album photo URLs are unsafe; the telegram adapter must therefore
    // fall back from sendPhoto to sendMessage.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/bot110:AAH/sendMessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": {"message_id": 7}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let telegram: Arc<dyn Provider> = Arc::new(TelegramProvider::new(
        Some(TelegramConfig {
            bot_token: "110:AAH".into(),
            chat_id: "@campaign_channel".into(),
            api_base: Some(server.uri()),
        }),
        reqwest::Client::new(),
    ));

    let mut data = album();
    data.cover_photo_url = Some("http://169.254.169.254/latest/meta-data/".into());
    data.photo_urls = vec![
        "http://10.0.0.1/internal.jpg".into(),
        "https://192.168.1.50/router.jpg".into(),
    ];

    let publisher = SocialPublisher::new(vec![telegram], Duration::from_secs(5));
    let results = publisher
        .publish_to_social(&[Platform::Telegram], &data, None)
        .await;

    assert!(results[0].success, "error: {:?}", results[0].error);
    assert_eq!(results[0].post_url.as_deref(), Some("https://t.me/campaign_channel/7"));
}

#[tokio::test]
async fn duplicate_platform_requests_each_get_a_slot() {
    let providers: Vec<Arc<dyn Provider>> =
        vec![Arc::new(MockProvider::success(Platform::Facebook))];

    let publisher = SocialPublisher::new(providers, Duration::from_secs(5));
    let results = publisher
        .publish_to_social(&[Platform::Facebook, Platform::Facebook], &album(), None)
        .await;

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success));
}

#[tokio::test]
async fn timeout_is_per_platform_not_global() {
    let providers: Vec<Arc<dyn Provider>> = vec![
        Arc::new(MockProvider::hanging(Platform::YouTube)),
        Arc::new(MockProvider::success(Platform::WhatsApp).with_delay(Duration::from_millis(50))),
    ];

    let publisher = SocialPublisher::new(providers, Duration::from_millis(150));
    let results = publisher
        .publish_to_social(&[Platform::YouTube, Platform::WhatsApp], &album(), None)
        .await;

    assert!(!results[0].success);
    assert!(results[0].error.as_deref().unwrap().contains("Timed out"));
    // The slow-but-finite sibling still completed inside its own budget.
    assert!(results[1].success);
}
