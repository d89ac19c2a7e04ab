//! Telegram channel publishing
//!
//! Bot API, one call: `sendPhoto` with an HTML caption when the album has a
//! cover or first photo, `sendMessage` otherwise. A public post URL can only
//! be synthesized when the chat id is an `@handle`; numeric chat ids stay
//! URL-less.

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::config::TelegramConfig;
use crate::error::PlatformError;
use crate::platforms::{body_text, expect_json, unconfigured, Provider};
use crate::types::{AlbumShareData, Platform, ShareResult};

const API_BASE: &str = "https://api.telegram.org";

pub struct TelegramProvider {
    config: Option<TelegramConfig>,
    client: reqwest::Client,
}

impl TelegramProvider {
    pub fn new(config: Option<TelegramConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_base<'a>(config: &'a TelegramConfig) -> &'a str {
        config.api_base.as_deref().unwrap_or(API_BASE)
    }

    fn build_caption(data: &AlbumShareData, message: Option<&str>) -> String {
        let mut caption = format!("<b>{}</b>", escape_html(&data.title));
        let body = body_text(data, message);
        if !body.is_empty() {
            caption.push_str("\n\n");
            caption.push_str(&escape_html(body));
        }
        caption.push_str(&format!("\n\n{} photos", data.photo_count));
        if !data.public_url.is_empty() {
            caption.push_str(&format!(
                "\n<a href=\"{}\">{}</a>",
                escape_html(&data.public_url),
                escape_html(&data.public_url)
            ));
        }
        caption
    }

    fn lead_photo(data: &AlbumShareData) -> Option<&str> {
        data.cover_photo_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| data.photo_urls.first().map(String::as_str))
    }

    /// Only `@handle` channels have predictable public URLs.
    fn post_url(chat_id: &str, message_id: i64) -> Option<String> {
        chat_id
            .strip_prefix('@')
            .map(|handle| format!("https://t.me/{}/{}", handle, message_id))
    }

    async fn try_publish(
        &self,
        config: &TelegramConfig,
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Result<Option<String>, PlatformError> {
        let caption = Self::build_caption(data, message);

        let (method, payload) = match Self::lead_photo(data) {
            Some(photo_url) => (
                "sendPhoto",
                json!({
                    "chat_id": config.chat_id,
                    "photo": photo_url,
                    "caption": caption,
                    "parse_mode": "HTML",
                }),
            ),
            None => (
                "sendMessage",
                json!({
                    "chat_id": config.chat_id,
                    "text": caption,
                    "parse_mode": "HTML",
                }),
            ),
        };

        let endpoint = format!(
            "{}/bot{}/{}",
            Self::api_base(config),
            config.bot_token,
            method
        );
        let response = self
            .client
            .post(&endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "telegram send"))?;

        let body = expect_json(response, "telegram send").await?;
        if !body.get("ok").and_then(|ok| ok.as_bool()).unwrap_or(false) {
            let detail = body
                .get("description")
                .and_then(|d| d.as_str())
                .unwrap_or("request was not ok");
            return Err(PlatformError::Posting(format!("telegram send: {}", detail)));
        }

        let message_id = body
            .get("result")
            .and_then(|r| r.get("message_id"))
            .and_then(|id| id.as_i64());

        Ok(message_id.and_then(|id| Self::post_url(&config.chat_id, id)))
    }
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[async_trait]
impl Provider for TelegramProvider {
    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    fn is_configured(&self) -> bool {
        self.config
            .as_ref()
            .map(|c| !c.bot_token.is_empty() && !c.chat_id.is_empty())
            .unwrap_or(false)
    }

    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult {
        let Some(config) = self.config.as_ref() else {
            return unconfigured(Platform::Telegram);
        };
        if !self.is_configured() {
            return unconfigured(Platform::Telegram);
        }

        match self.try_publish(config, data, message).await {
            Ok(url) => ShareResult::published(Platform::Telegram, url),
            Err(e) => {
                warn!(error = %e, "telegram publish failed");
                ShareResult::failed(Platform::Telegram, e.to_string())
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
            cover_photo_url: Some("https://cdn.example.com/cover.jpg".into()),
            photo_urls: vec!["https://cdn.example.com/1.jpg".into()],
            photo_count: 4,
            campaign_name: "Chen 2026".into(),
        }
    }

    #[test]
    fn test_caption_html() {
        let caption = TelegramProvider::build_caption(&album(), None);
        assert!(caption.starts_with("<b>Rally Night</b>\n\nPhotos from the rally"));
        assert!(caption.contains("4 photos"));
        assert!(caption.contains(r#"<a href="https://albums.example.com/a/rally">"#));
    }

    #[test]
    fn test_caption_escapes_html() {
        let mut data = album();
        data.title = "Rally <3 & more".into();
        let caption = TelegramProvider::build_caption(&data, None);
        assert!(caption.starts_with("<b>Rally &lt;3 &amp; more</b>"));
    }

    #[test]
    fn test_post_url_only_for_handles() {
        assert_eq!(
            TelegramProvider::post_url("@campaign_channel", 42),
            Some("https://t.me/campaign_channel/42".to_string())
        );
        assert_eq!(TelegramProvider::post_url("-1001234567890", 42), None);
    }

    #[test]
    fn test_lead_photo_prefers_cover() {
        assert_eq!(
            TelegramProvider::lead_photo(&album()),
            Some("https://cdn.example.com/cover.jpg")
        );

        let mut no_cover = album();
        no_cover.cover_photo_url = None;
        assert_eq!(
            TelegramProvider::lead_photo(&no_cover),
            Some("https://cdn.example.com/1.jpg")
        );

        let mut bare = album();
        bare.cover_photo_url = None;
        bare.photo_urls.clear();
        assert_eq!(TelegramProvider::lead_photo(&bare), None);
    }

    #[tokio::test]
    async fn test_unconfigured_short_circuits() {
        let provider = TelegramProvider::new(
            None,
            crate::platforms::build_http_client(std::time::Duration::from_secs(5)),
        );
        let result = provider.publish(&album(), None).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("telegram is not configured"));
    }
}
