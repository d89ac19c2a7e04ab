//! X (Twitter) publishing
//!
//! A single signed call: the tweet is posted through the v2 endpoint with an
//! OAuth 1.0a user-context signature computed per request. Tweet text is
//! budgeted to 280 characters, with the trailing album URL counted at the
//! 23 characters t.co shortening gives every link.

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::config::XConfig;
use crate::error::PlatformError;
use crate::oauth1;
use crate::platforms::{expect_json, unconfigured, Provider};
use crate::types::{AlbumShareData, Platform, ShareResult};

const API_BASE: &str = "https://api.x.com";

const TWEET_CHAR_LIMIT: usize = 280;

/// Every URL costs this much after t.co shortening, regardless of length.
const SHORTENED_URL_LEN: usize = 23;

pub struct XProvider {
    config: Option<XConfig>,
    client: reqwest::Client,
}

impl XProvider {
    pub fn new(config: Option<XConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_base<'a>(config: &'a XConfig) -> &'a str {
        config.api_base.as_deref().unwrap_or(API_BASE)
    }

    /// A custom message replaces the auto-generated title+count text
    /// entirely; the album URL rides along either way.
    fn build_tweet(data: &AlbumShareData, message: Option<&str>) -> String {
        let text = match message {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => format!("{} — {} photos", data.title, data.photo_count),
        };

        if data.public_url.is_empty() {
            return truncate_chars(&text, TWEET_CHAR_LIMIT);
        }

        let budget = TWEET_CHAR_LIMIT - SHORTENED_URL_LEN - 1;
        format!("{} {}", truncate_chars(&text, budget), data.public_url)
    }

    async fn try_publish(
        &self,
        config: &XConfig,
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Result<Option<String>, PlatformError> {
        let endpoint = format!("{}/2/tweets", Self::api_base(config));
        let authorization = oauth1::sign(
            "POST",
            &endpoint,
            &config.api_key,
            &config.api_key_secret,
            &config.access_token,
            &config.access_token_secret,
        );

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", authorization)
            .json(&json!({ "text": Self::build_tweet(data, message) }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "x tweet"))?;

        let body = expect_json(response, "x tweet").await?;
        let tweet_id = body
            .get("data")
            .and_then(|d| d.get("id"))
            .and_then(|id| id.as_str())
            .ok_or_else(|| PlatformError::Posting("x tweet: response had no tweet id".into()))?;

        Ok(Some(format!("https://x.com/i/status/{}", tweet_id)))
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[async_trait]
impl Provider for XProvider {
    fn platform(&self) -> Platform {
        Platform::X
    }

    fn is_configured(&self) -> bool {
        self.config
            .as_ref()
            .map(|c| {
                !c.api_key.is_empty()
                    && !c.api_key_secret.is_empty()
                    && !c.access_token.is_empty()
                    && !c.access_token_secret.is_empty()
            })
            .unwrap_or(false)
    }

    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult {
        let Some(config) = self.config.as_ref() else {
            return unconfigured(Platform::X);
        };
        if !self.is_configured() {
            return unconfigured(Platform::X);
        }

        match self.try_publish(config, data, message).await {
            Ok(url) => ShareResult::published(Platform::X, url),
            Err(e) => {
                warn!(error = %e, "x publish failed");
                ShareResult::failed(Platform::X, e.to_string())
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
            description: "Photos from the rally".into(),
            public_url: "https://albums.example.com/a/rally".into(),
            cover_photo_url: None,
            photo_urls: vec![],
            photo_count: 12,
            campaign_name: "Chen 2026".into(),
        }
    }

    #[test]
    fn test_tweet_auto_text_with_url() {
        let tweet = XProvider::build_tweet(&album(), None);
        assert_eq!(tweet, "Rally Night — 12 photos https://albums.example.com/a/rally");
    }

    #[test]
    fn test_tweet_message_supersedes_auto_text() {
        let tweet = XProvider::build_tweet(&album(), Some("Come see the photos!"));
        assert_eq!(tweet, "Come see the photos! https://albums.example.com/a/rally");
        assert!(!tweet.contains("Rally Night"));
    }

    #[test]
    fn test_tweet_long_text_truncated_to_budget() {
        let mut data = album();
        data.description = String::new();
        let long_message = "x".repeat(400);
        let tweet = XProvider::build_tweet(&data, Some(&long_message));

        // 256 chars of text + space + URL counted as 23 = 280.
        let text_part = tweet.strip_suffix(" https://albums.example.com/a/rally").unwrap();
        assert_eq!(text_part.chars().count(), TWEET_CHAR_LIMIT - SHORTENED_URL_LEN - 1);
    }

    #[test]
    fn test_tweet_without_url_uses_full_limit() {
        let mut data = album();
        data.public_url = String::new();
        let long_message = "x".repeat(400);
        let tweet = XProvider::build_tweet(&data, Some(&long_message));
        assert_eq!(tweet.chars().count(), TWEET_CHAR_LIMIT);
    }

    #[test]
    fn test_truncate_chars_is_char_boundary_safe() {
        let text = "許多張美麗的照片許多張美麗的照片";
        let truncated = truncate_chars(text, 5);
        assert_eq!(truncated.chars().count(), 5);
        assert_eq!(truncated, "許多張美麗");
    }

    #[test]
    fn test_is_configured_requires_all_four_keys() {
        let client = crate::platforms::build_http_client(std::time::Duration::from_secs(5));
        let partial = XProvider::new(
            Some(XConfig {
                api_key: "ck".into(),
                api_key_secret: "cs".into(),
                access_token: "tok".into(),
                access_token_secret: String::new(),
                api_base: None,
            }),
            client.clone(),
        );
        assert!(!partial.is_configured());

        let complete = XProvider::new(
            Some(XConfig {
                api_key: "ck".into(),
                api_key_secret: "cs".into(),
                access_token: "tok".into(),
                access_token_secret: "ts".into(),
                api_base: None,
            }),
            client,
        );
        assert!(complete.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_short_circuits() {
        let provider = XProvider::new(
            None,
            crate::platforms::build_http_client(std::time::Duration::from_secs(5)),
        );
        let result = provider.publish(&album(), None).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("x is not configured"));
    }
}
