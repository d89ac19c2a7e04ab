//! LINE broadcast publishing
//!
//! Broadcasts one Flex bubble to every channel subscriber: hero image from
//! the album cover (omitted when there is none), title, optional message
//! body, and a button linking to the public album page.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::config::LineConfig;
use crate::error::PlatformError;
use crate::platforms::{body_text, remote_error_message, unconfigured, Provider};
use crate::types::{AlbumShareData, Platform, ShareResult};

const API_BASE: &str = "https://api.line.me";

pub struct LineProvider {
    config: Option<LineConfig>,
    client: reqwest::Client,
}

impl LineProvider {
    pub fn new(config: Option<LineConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_base<'a>(config: &'a LineConfig) -> &'a str {
        config.api_base.as_deref().unwrap_or(API_BASE)
    }

    fn build_flex_card(data: &AlbumShareData, message: Option<&str>) -> Value {
        let mut body_contents = vec![json!({
            "type": "text",
            "text": data.title,
            "weight": "bold",
            "size": "lg",
            "wrap": true,
        })];

        let body = body_text(data, message);
        if !body.is_empty() {
            body_contents.push(json!({
                "type": "text",
                "text": body,
                "size": "sm",
                "color": "#666666",
                "wrap": true,
            }));
        }

        body_contents.push(json!({
            "type": "text",
            "text": format!("{} photos", data.photo_count),
            "size": "xs",
            "color": "#999999",
        }));

        let mut bubble = json!({
            "type": "bubble",
            "body": {
                "type": "box",
                "layout": "vertical",
                "spacing": "sm",
                "contents": body_contents,
            },
        });

        let hero = data
            .cover_photo_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| data.photo_urls.first().map(String::as_str));
        if let Some(hero_url) = hero {
            bubble["hero"] = json!({
                "type": "image",
                "url": hero_url,
                "size": "full",
                "aspectRatio": "20:13",
                "aspectMode": "cover",
            });
        }

        if !data.public_url.is_empty() {
            bubble["footer"] = json!({
                "type": "box",
                "layout": "vertical",
                "contents": [{
                    "type": "button",
                    "style": "primary",
                    "action": {
                        "type": "uri",
                        "label": "View album",
                        "uri": data.public_url,
                    },
                }],
            });
        }

        bubble
    }

    async fn try_publish(
        &self,
        config: &LineConfig,
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Result<Option<String>, PlatformError> {
        let endpoint = format!("{}/v2/bot/message/broadcast", Self::api_base(config));
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&config.channel_access_token)
            .json(&json!({
                "messages": [{
                    "type": "flex",
                    "altText": data.title,
                    "contents": Self::build_flex_card(data, message),
                }],
            }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "line broadcast"))?;

        // A successful broadcast returns an empty JSON object.
        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let detail =
                remote_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));
            return Err(PlatformError::Posting(format!("line broadcast: {}", detail)));
        }

        Ok(None)
    }
}

#[async_trait]
impl Provider for LineProvider {
    fn platform(&self) -> Platform {
        Platform::Line
    }

    fn is_configured(&self) -> bool {
        self.config
            .as_ref()
            .map(|c| !c.channel_access_token.is_empty())
            .unwrap_or(false)
    }

    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult {
        let Some(config) = self.config.as_ref() else {
            return unconfigured(Platform::Line);
        };
        if !self.is_configured() {
            return unconfigured(Platform::Line);
        }

        match self.try_publish(config, data, message).await {
            Ok(url) => ShareResult::published(Platform::Line, url),
            Err(e) => {
                warn!(error = %e, "line publish failed");
                ShareResult::failed(Platform::Line, e.to_string())
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
            photo_urls: vec![],
            photo_count: 9,
            campaign_name: "Chen 2026".into(),
        }
    }

    #[test]
    fn test_flex_card_with_cover_and_url() {
        let card = LineProvider::build_flex_card(&album(), None);
        assert_eq!(card["type"], "bubble");
        assert_eq!(card["hero"]["url"], "https://cdn.example.com/cover.jpg");
        assert_eq!(
            card["footer"]["contents"][0]["action"]["uri"],
            "https://albums.example.com/a/rally"
        );
        assert_eq!(card["body"]["contents"][0]["text"], "Rally Night");
        assert_eq!(card["body"]["contents"][2]["text"], "9 photos");
    }

    #[test]
    fn test_flex_card_omits_hero_without_photos() {
        let mut data = album();
        data.cover_photo_url = None;
        let card = LineProvider::build_flex_card(&data, None);
        assert!(card.get("hero").is_none());
    }

    #[test]
    fn test_flex_card_hero_falls_back_to_first_photo() {
        let mut data = album();
        data.cover_photo_url = None;
        data.photo_urls = vec!["https://cdn.example.com/1.jpg".into()];
        let card = LineProvider::build_flex_card(&data, None);
        assert_eq!(card["hero"]["url"], "https://cdn.example.com/1.jpg");
    }

    #[test]
    fn test_flex_card_omits_footer_without_url() {
        let mut data = album();
        data.public_url = String::new();
        let card = LineProvider::build_flex_card(&data, None);
        assert!(card.get("footer").is_none());
    }

    #[test]
    fn test_flex_card_message_override() {
        let card = LineProvider::build_flex_card(&album(), Some("Come see!"));
        assert_eq!(card["body"]["contents"][1]["text"], "Come see!");
    }

    #[tokio::test]
    async fn test_unconfigured_short_circuits() {
        let provider = LineProvider::new(
            None,
            crate::platforms::build_http_client(std::time::Duration::from_secs(5)),
        );
        let result = provider.publish(&album(), None).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("line is not configured"));
    }
}
