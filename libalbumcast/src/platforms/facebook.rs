//! Facebook page publishing
//!
//! Albums with photos go out as a multi-photo feed post: each photo is first
//! uploaded unpublished, then a feed post references the uploaded media ids.
//! Individual photo uploads may fail without sinking the post; if every
//! upload fails, the adapter falls back to a plain link post. Albums without
//! photos skip straight to the link post.

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::config::FacebookConfig;
use crate::error::PlatformError;
use crate::platforms::{body_text, expect_json, unconfigured, Provider};
use crate::types::{AlbumShareData, Platform, ShareResult};

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v19.0";

/// Facebook caps multi-photo posts; anything beyond this is not uploaded.
const MAX_PHOTOS_PER_POST: usize = 10;

pub struct FacebookProvider {
    config: Option<FacebookConfig>,
    client: reqwest::Client,
}

impl FacebookProvider {
    pub fn new(config: Option<FacebookConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_base<'a>(config: &'a FacebookConfig) -> &'a str {
        config.api_base.as_deref().unwrap_or(GRAPH_API_BASE)
    }

    fn build_caption(data: &AlbumShareData, message: Option<&str>) -> String {
        let mut caption = body_text(data, message).to_string();
        if !caption.is_empty() {
            caption.push_str("\n\n");
        }
        caption.push_str(&format!("{} — {} photos", data.title, data.photo_count));
        if !data.public_url.is_empty() {
            caption.push('\n');
            caption.push_str(&data.public_url);
        }
        caption
    }

    /// Upload one photo unpublished, returning its media id.
    async fn upload_photo(
        &self,
        config: &FacebookConfig,
        photo_url: &str,
    ) -> Result<String, PlatformError> {
        let endpoint = format!("{}/{}/photos", Self::api_base(config), config.page_id);
        let response = self
            .client
            .post(&endpoint)
            .json(&json!({
                "url": photo_url,
                "published": false,
                "access_token": config.access_token,
            }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "facebook photo upload"))?;

        let body = expect_json(response, "facebook photo upload").await?;
        body.get("id")
            .and_then(|id| id.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                PlatformError::Posting("facebook photo upload: response had no media id".into())
            })
    }

    /// Feed post referencing previously uploaded media ids.
    async fn create_media_post(
        &self,
        config: &FacebookConfig,
        caption: &str,
        media_ids: &[String],
    ) -> Result<String, PlatformError> {
        let attached: Vec<_> = media_ids
            .iter()
            .map(|id| json!({ "media_fbid": id }))
            .collect();

        let endpoint = format!("{}/{}/feed", Self::api_base(config), config.page_id);
        let response = self
            .client
            .post(&endpoint)
            .json(&json!({
                "message": caption,
                "attached_media": attached,
                "access_token": config.access_token,
            }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "facebook feed post"))?;

        let body = expect_json(response, "facebook feed post").await?;
        extract_post_id(&body)
    }

    /// Plain link post; also the fallback when no photo upload survives.
    async fn create_link_post(
        &self,
        config: &FacebookConfig,
        caption: &str,
        public_url: &str,
    ) -> Result<String, PlatformError> {
        let mut payload = json!({
            "message": caption,
            "access_token": config.access_token,
        });
        if !public_url.is_empty() {
            payload["link"] = json!(public_url);
        }

        let endpoint = format!("{}/{}/feed", Self::api_base(config), config.page_id);
        let response = self
            .client
            .post(&endpoint)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "facebook link post"))?;

        let body = expect_json(response, "facebook link post").await?;
        extract_post_id(&body)
    }

    async fn try_publish(
        &self,
        config: &FacebookConfig,
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Result<Option<String>, PlatformError> {
        let caption = Self::build_caption(data, message);

        if data.photo_urls.is_empty() {
            let post_id = self
                .create_link_post(config, &caption, &data.public_url)
                .await?;
            return Ok(Some(post_url(&post_id)));
        }

        let mut media_ids = Vec::new();
        for photo_url in data.photo_urls.iter().take(MAX_PHOTOS_PER_POST) {
            match self.upload_photo(config, photo_url).await {
                Ok(id) => media_ids.push(id),
                Err(e) => warn!(url = %photo_url, error = %e, "facebook photo upload failed, skipping"),
            }
        }

        let post_id = if media_ids.is_empty() {
            info!("no facebook photo uploads survived, falling back to link post");
            self.create_link_post(config, &caption, &data.public_url)
                .await?
        } else {
            self.create_media_post(config, &caption, &media_ids).await?
        };

        Ok(Some(post_url(&post_id)))
    }
}

fn extract_post_id(body: &serde_json::Value) -> Result<String, PlatformError> {
    body.get("id")
        .and_then(|id| id.as_str())
        .map(str::to_string)
        .ok_or_else(|| PlatformError::Posting("facebook feed post: response had no id".into()))
}

fn post_url(post_id: &str) -> String {
    format!("https://www.facebook.com/{}", post_id)
}

#[async_trait]
impl Provider for FacebookProvider {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn is_configured(&self) -> bool {
        self.config
            .as_ref()
            .map(|c| !c.page_id.is_empty() && !c.access_token.is_empty())
            .unwrap_or(false)
    }

    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult {
        let Some(config) = self.config.as_ref() else {
            return unconfigured(Platform::Facebook);
        };
        if !self.is_configured() {
            return unconfigured(Platform::Facebook);
        }

        match self.try_publish(config, data, message).await {
            Ok(url) => ShareResult::published(Platform::Facebook, url),
            Err(e) => {
                warn!(error = %e, "facebook publish failed");
                ShareResult::failed(Platform::Facebook, e.to_string())
            }
        }
    }
}
