//! Threads publishing
//!
//! Two-step container flow against the Threads Graph API: create a TEXT
//! container, then publish it by creation id.

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::config::ThreadsConfig;
use crate::error::PlatformError;
use crate::platforms::{body_text, expect_json, unconfigured, Provider};
use crate::types::{AlbumShareData, Platform, ShareResult};

const API_BASE: &str = "https://graph.threads.net/v1.0";

pub struct ThreadsProvider {
    config: Option<ThreadsConfig>,
    client: reqwest::Client,
}

impl ThreadsProvider {
    pub fn new(config: Option<ThreadsConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_base<'a>(config: &'a ThreadsConfig) -> &'a str {
        config.api_base.as_deref().unwrap_or(API_BASE)
    }

    fn build_text(data: &AlbumShareData, message: Option<&str>) -> String {
        let mut text = body_text(data, message).to_string();
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(&format!("{} · {} photos", data.title, data.photo_count));
        if !data.public_url.is_empty() {
            text.push('\n');
            text.push_str(&data.public_url);
        }
        text
    }

    async fn try_publish(
        &self,
        config: &ThreadsConfig,
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Result<Option<String>, PlatformError> {
        let create_endpoint = format!("{}/{}/threads", Self::api_base(config), config.user_id);
        let response = self
            .client
            .post(&create_endpoint)
            .json(&json!({
                "media_type": "TEXT",
                "text": Self::build_text(data, message),
                "access_token": config.access_token,
            }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "threads container"))?;

        let body = expect_json(response, "threads container").await?;
        let creation_id = body
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| {
                PlatformError::Posting("threads container: response had no container id".into())
            })?
            .to_string();

        let publish_endpoint = format!(
            "{}/{}/threads_publish",
            Self::api_base(config),
            config.user_id
        );
        let response = self
            .client
            .post(&publish_endpoint)
            .json(&json!({
                "creation_id": creation_id,
                "access_token": config.access_token,
            }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "threads publish"))?;

        expect_json(response, "threads publish").await?;
        Ok(None)
    }
}

#[async_trait]
impl Provider for ThreadsProvider {
    fn platform(&self) -> Platform {
        Platform::Threads
    }

    fn is_configured(&self) -> bool {
        self.config
            .as_ref()
            .map(|c| !c.user_id.is_empty() && !c.access_token.is_empty())
            .unwrap_or(false)
    }

    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult {
        let Some(config) = self.config.as_ref() else {
            return unconfigured(Platform::Threads);
        };
        if !self.is_configured() {
            return unconfigured(Platform::Threads);
        }

        match self.try_publish(config, data, message).await {
            Ok(url) => ShareResult::published(Platform::Threads, url),
            Err(e) => {
                warn!(error = %e, "threads publish failed");
                ShareResult::failed(Platform::Threads, e.to_string())
            }
        }
    }
}
