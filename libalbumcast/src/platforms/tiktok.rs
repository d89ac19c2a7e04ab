//! TikTok photo publishing
//!
//! One call to the content-init endpoint with `PULL_FROM_URL`: TikTok
//! fetches the photo itself. A photo URL is mandatory; an album whose cover
//! and photo list are both empty (or were sanitized away) fails before any
//! network call.

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::config::TikTokConfig;
use crate::error::PlatformError;
use crate::platforms::{body_text, expect_json, unconfigured, Provider};
use crate::types::{AlbumShareData, Platform, ShareResult};

const API_BASE: &str = "https://open.tiktokapis.com";

pub struct TikTokProvider {
    config: Option<TikTokConfig>,
    client: reqwest::Client,
}

impl TikTokProvider {
    pub fn new(config: Option<TikTokConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_base<'a>(config: &'a TikTokConfig) -> &'a str {
        config.api_base.as_deref().unwrap_or(API_BASE)
    }

    /// Cover photo wins; first album photo is the fallback.
    fn lead_photo(data: &AlbumShareData) -> Option<&str> {
        data.cover_photo_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .or_else(|| data.photo_urls.first().map(String::as_str))
    }

    async fn try_publish(
        &self,
        config: &TikTokConfig,
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Result<Option<String>, PlatformError> {
        let photo_url = Self::lead_photo(data).ok_or_else(|| {
            PlatformError::Posting("tiktok requires a cover or first photo".into())
        })?;

        let mut description = body_text(data, message).to_string();
        if !data.public_url.is_empty() {
            if !description.is_empty() {
                description.push(' ');
            }
            description.push_str(&data.public_url);
        }

        let endpoint = format!(
            "{}/v2/post/publish/content/init/",
            Self::api_base(config)
        );
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&config.access_token)
            .json(&json!({
                "post_info": {
                    "title": data.title,
                    "description": description,
                },
                "source_info": {
                    "source": "PULL_FROM_URL",
                    "photo_cover_index": 0,
                    "photo_images": [photo_url],
                },
                "post_mode": "DIRECT_POST",
                "media_type": "PHOTO",
            }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "tiktok content init"))?;

        let body = expect_json(response, "tiktok content init").await?;

        // TikTok wraps failures in a 200 with an error envelope.
        let code = body
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|c| c.as_str())
            .unwrap_or("ok");
        if code != "ok" {
            let detail = body
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .unwrap_or(code);
            return Err(PlatformError::Posting(format!("tiktok content init: {}", detail)));
        }

        Ok(None)
    }
}

#[async_trait]
impl Provider for TikTokProvider {
    fn platform(&self) -> Platform {
        Platform::TikTok
    }

    fn is_configured(&self) -> bool {
        self.config
            .as_ref()
            .map(|c| !c.access_token.is_empty())
            .unwrap_or(false)
    }

    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult {
        let Some(config) = self.config.as_ref() else {
            return unconfigured(Platform::TikTok);
        };
        if !self.is_configured() {
            return unconfigured(Platform::TikTok);
        }

        match self.try_publish(config, data, message).await {
            Ok(url) => ShareResult::published(Platform::TikTok, url),
            Err(e) => {
                warn!(error = %e, "tiktok publish failed");
                ShareResult::failed(Platform::TikTok, e.to_string())
            }
        }
    }
}
