//! Mock provider for testing
//!
//! Configurable stand-in for a real platform adapter: success, failure,
//! latency, hangs, and even panics, so orchestrator tests can verify result
//! ordering, per-task isolation, and timeout handling without network
//! access. Available outside `cfg(test)` for the integration tests.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::platforms::Provider;
use crate::types::{AlbumShareData, Platform, ShareResult};

#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Succeed, returning this post URL.
    Succeed(Option<String>),
    /// Fail with this error message.
    Fail(String),
    /// Panic inside the publish task (exercises the orchestrator's defense
    /// against adapters that break the never-throw contract).
    Panic,
    /// Never complete (exercises the per-task timeout).
    Hang,
}

pub struct MockProvider {
    platform: Platform,
    behavior: MockBehavior,
    configured: bool,
    delay: Duration,
    publish_calls: Arc<Mutex<usize>>,
    published_titles: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn new(platform: Platform, behavior: MockBehavior) -> Self {
        Self {
            platform,
            behavior,
            configured: true,
            delay: Duration::ZERO,
            publish_calls: Arc::new(Mutex::new(0)),
            published_titles: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn success(platform: Platform) -> Self {
        Self::new(
            platform,
            MockBehavior::Succeed(Some(format!("https://{}.example.com/post/1", platform))),
        )
    }

    pub fn failure(platform: Platform, error: &str) -> Self {
        Self::new(platform, MockBehavior::Fail(error.to_string()))
    }

    pub fn panicking(platform: Platform) -> Self {
        Self::new(platform, MockBehavior::Panic)
    }

    pub fn hanging(platform: Platform) -> Self {
        Self::new(platform, MockBehavior::Hang)
    }

    pub fn not_configured(platform: Platform) -> Self {
        let mut provider = Self::success(platform);
        provider.configured = false;
        provider
    }

    /// Delay before resolving, to simulate network latency.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn publish_calls(&self) -> usize {
        *self.publish_calls.lock().unwrap()
    }

    pub fn published_titles(&self) -> Vec<String> {
        self.published_titles.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn publish(&self, data: &AlbumShareData, _message: Option<&str>) -> ShareResult {
        *self.publish_calls.lock().unwrap() += 1;

        if !self.configured {
            return crate::platforms::unconfigured(self.platform);
        }

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match &self.behavior {
            MockBehavior::Succeed(post_url) => {
                self.published_titles
                    .lock()
                    .unwrap()
                    .push(data.title.clone());
                ShareResult::published(self.platform, post_url.clone())
            }
            MockBehavior::Fail(error) => ShareResult::failed(self.platform, error.clone()),
            MockBehavior::Panic => panic!("mock provider panic for {}", self.platform),
            MockBehavior::Hang => {
                loop {
                    sleep(Duration::from_secs(3600)).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album() -> AlbumShareData {
        AlbumShareData {
            title: "Rally Night".into(),
            description: String::new(),
            public_url: "https://albums.example.com/a/rally".into(),
            cover_photo_url: None,
            photo_urls: vec![],
            photo_count: 0,
            campaign_name: "Chen 2026".into(),
        }
    }

    #[tokio::test]
    async fn test_mock_success() {
        let provider = MockProvider::success(Platform::Facebook);
        let result = provider.publish(&album(), None).await;

        assert!(result.success);
        assert_eq!(result.platform, Platform::Facebook);
        assert_eq!(provider.publish_calls(), 1);
        assert_eq!(provider.published_titles(), vec!["Rally Night".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let provider = MockProvider::failure(Platform::X, "simulated outage");
        let result = provider.publish(&album(), None).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("simulated outage"));
    }

    #[tokio::test]
    async fn test_mock_not_configured() {
        let provider = MockProvider::not_configured(Platform::Line);
        assert!(!provider.is_configured());

        let result = provider.publish(&album(), None).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("line is not configured"));
    }

    #[tokio::test]
    async fn test_mock_delay() {
        let provider =
            MockProvider::success(Platform::Telegram).with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        let result = provider.publish(&album(), None).await;
        assert!(result.success);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
