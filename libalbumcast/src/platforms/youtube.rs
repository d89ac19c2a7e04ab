//! YouTube community publishing
//!
//! Posts a "bulletin" activity through the Data API v3. The configured
//! channel must be eligible for community posts; the adapter does not verify
//! eligibility, the API rejects the insert if the channel lacks it.

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::config::YouTubeConfig;
use crate::error::PlatformError;
use crate::platforms::{body_text, expect_json, unconfigured, Provider};
use crate::types::{AlbumShareData, Platform, ShareResult};

const API_BASE: &str = "https://www.googleapis.com/youtube/v3";

pub struct YouTubeProvider {
    config: Option<YouTubeConfig>,
    client: reqwest::Client,
}

impl YouTubeProvider {
    pub fn new(config: Option<YouTubeConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_base<'a>(config: &'a YouTubeConfig) -> &'a str {
        config.api_base.as_deref().unwrap_or(API_BASE)
    }

    fn build_description(data: &AlbumShareData, message: Option<&str>) -> String {
        let mut description = body_text(data, message).to_string();
        if !description.is_empty() {
            description.push_str("\n\n");
        }
        description.push_str(&format!("{} — {} photos", data.title, data.photo_count));
        if !data.public_url.is_empty() {
            description.push('\n');
            description.push_str(&data.public_url);
        }
        description
    }

    async fn try_publish(
        &self,
        config: &YouTubeConfig,
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Result<Option<String>, PlatformError> {
        let endpoint = format!("{}/activities?part=snippet", Self::api_base(config));
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&config.access_token)
            .json(&json!({
                "snippet": {
                    "channelId": config.channel_id,
                    "description": Self::build_description(data, message),
                    "type": "bulletin",
                },
            }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "youtube bulletin"))?;

        let body = expect_json(response, "youtube bulletin").await?;
        if body.get("id").and_then(|id| id.as_str()).is_none() {
            return Err(PlatformError::Posting(
                "youtube bulletin: response had no activity id".into(),
            ));
        }

        Ok(None)
    }
}

#[async_trait]
impl Provider for YouTubeProvider {
    fn platform(&self) -> Platform {
        Platform::YouTube
    }

    fn is_configured(&self) -> bool {
        self.config
            .as_ref()
            .map(|c| !c.access_token.is_empty() && !c.channel_id.is_empty())
            .unwrap_or(false)
    }

    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult {
        let Some(config) = self.config.as_ref() else {
            return unconfigured(Platform::YouTube);
        };
        if !self.is_configured() {
            return unconfigured(Platform::YouTube);
        }

        match self.try_publish(config, data, message).await {
            Ok(url) => ShareResult::published(Platform::YouTube, url),
            Err(e) => {
                warn!(error = %e, "youtube publish failed");
                ShareResult::failed(Platform::YouTube, e.to_string())
            }
        }
    }
}
