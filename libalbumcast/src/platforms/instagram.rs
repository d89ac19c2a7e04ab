//! Instagram business-account publishing
//!
//! Instagram has no text-only posts, so an album without photos fails before
//! any network call. Single photos use the two-step container flow (create
//! media container, publish it); multiple photos become a carousel of up to
//! ten children, where a failed child is skipped and the carousel proceeds
//! as long as at least one child survives.

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::config::InstagramConfig;
use crate::error::PlatformError;
use crate::platforms::{body_text, expect_json, unconfigured, Provider};
use crate::types::{AlbumShareData, Platform, ShareResult};

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v19.0";

/// Carousel posts take at most ten children.
const MAX_CAROUSEL_CHILDREN: usize = 10;

pub struct InstagramProvider {
    config: Option<InstagramConfig>,
    client: reqwest::Client,
}

impl InstagramProvider {
    pub fn new(config: Option<InstagramConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_base<'a>(config: &'a InstagramConfig) -> &'a str {
        config.api_base.as_deref().unwrap_or(GRAPH_API_BASE)
    }

    fn build_caption(data: &AlbumShareData, message: Option<&str>) -> String {
        let mut caption = body_text(data, message).to_string();
        if !caption.is_empty() {
            caption.push_str("\n\n");
        }
        caption.push_str(&format!("{} · {} photos", data.title, data.photo_count));
        if !data.public_url.is_empty() {
            caption.push('\n');
            caption.push_str(&data.public_url);
        }
        caption
    }

    async fn create_container(
        &self,
        config: &InstagramConfig,
        payload: serde_json::Value,
        context: &str,
    ) -> Result<String, PlatformError> {
        let endpoint = format!(
            "{}/{}/media",
            Self::api_base(config),
            config.business_account_id
        );
        let response = self
            .client
            .post(&endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, context))?;

        let body = expect_json(response, context).await?;
        body.get("id")
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| PlatformError::Posting(format!("{}: response had no container id", context)))
    }

    async fn publish_container(
        &self,
        config: &InstagramConfig,
        creation_id: &str,
    ) -> Result<(), PlatformError> {
        let endpoint = format!(
            "{}/{}/media_publish",
            Self::api_base(config),
            config.business_account_id
        );
        let response = self
            .client
            .post(&endpoint)
            .json(&json!({
                "creation_id": creation_id,
                "access_token": config.access_token,
            }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "instagram media publish"))?;

        expect_json(response, "instagram media publish").await?;
        Ok(())
    }

    async fn try_publish(
        &self,
        config: &InstagramConfig,
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Result<Option<String>, PlatformError> {
        if data.photo_urls.is_empty() {
            return Err(PlatformError::Posting(
                "instagram requires at least one photo".into(),
            ));
        }

        let caption = Self::build_caption(data, message);

        let creation_id = if data.photo_urls.len() == 1 {
            self.create_container(
                config,
                json!({
                    "image_url": data.photo_urls[0],
                    "caption": caption,
                    "access_token": config.access_token,
                }),
                "instagram media container",
            )
            .await?
        } else {
            let mut children = Vec::new();
            for photo_url in data.photo_urls.iter().take(MAX_CAROUSEL_CHILDREN) {
                let result = self
                    .create_container(
                        config,
                        json!({
                            "image_url": photo_url,
                            "is_carousel_item": true,
                            "access_token": config.access_token,
                        }),
                        "instagram carousel item",
                    )
                    .await;
                match result {
                    Ok(id) => children.push(id),
                    Err(e) => {
                        warn!(url = %photo_url, error = %e, "instagram carousel item failed, skipping")
                    }
                }
            }

            if children.is_empty() {
                return Err(PlatformError::Posting(
                    "instagram carousel: no carousel item survived".into(),
                ));
            }

            self.create_container(
                config,
                json!({
                    "media_type": "CAROUSEL",
                    "children": children,
                    "caption": caption,
                    "access_token": config.access_token,
                }),
                "instagram carousel container",
            )
            .await?
        };

        self.publish_container(config, &creation_id).await?;

        // The publish response carries only an internal media id; a
        // permalink would take an extra lookup this engine does not make.
        Ok(None)
    }
}

#[async_trait]
impl Provider for InstagramProvider {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn is_configured(&self) -> bool {
        self.config
            .as_ref()
            .map(|c| !c.business_account_id.is_empty() && !c.access_token.is_empty())
            .unwrap_or(false)
    }

    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult {
        let Some(config) = self.config.as_ref() else {
            return unconfigured(Platform::Instagram);
        };
        if !self.is_configured() {
            return unconfigured(Platform::Instagram);
        }

        match self.try_publish(config, data, message).await {
            Ok(url) => ShareResult::published(Platform::Instagram, url),
            Err(e) => {
                warn!(error = %e, "instagram publish failed");
                ShareResult::failed(Platform::Instagram, e.to_string())
            }
        }
    }
}
