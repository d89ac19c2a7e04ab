//! WhatsApp broadcast publishing
//!
//! Cloud API text message to a configured broadcast group. The group id is a
//! separate recipient from the phone-number id the messages are sent from;
//! without it the adapter fails at publish time even though the section
//! itself counts as configured.

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::config::WhatsAppConfig;
use crate::error::PlatformError;
use crate::platforms::{body_text, expect_json, unconfigured, Provider};
use crate::types::{AlbumShareData, Platform, ShareResult};

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v19.0";

pub struct WhatsAppProvider {
    config: Option<WhatsAppConfig>,
    client: reqwest::Client,
}

impl WhatsAppProvider {
    pub fn new(config: Option<WhatsAppConfig>, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn api_base<'a>(config: &'a WhatsAppConfig) -> &'a str {
        config.api_base.as_deref().unwrap_or(GRAPH_API_BASE)
    }

    fn build_message(data: &AlbumShareData, message: Option<&str>) -> String {
        let mut text = format!("{} — {}", data.campaign_name, data.title);
        let body = body_text(data, message);
        if !body.is_empty() {
            text.push('\n');
            text.push_str(body);
        }
        text.push_str(&format!("\n{} photos", data.photo_count));
        if !data.public_url.is_empty() {
            text.push('\n');
            text.push_str(&data.public_url);
        }
        text
    }

    async fn try_publish(
        &self,
        config: &WhatsAppConfig,
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Result<Option<String>, PlatformError> {
        let group_id = config
            .group_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                PlatformError::Posting("whatsapp broadcast group id is not configured".into())
            })?;

        let endpoint = format!("{}/{}/messages", Self::api_base(config), config.phone_number_id);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&config.access_token)
            .json(&json!({
                "messaging_product": "whatsapp",
                "to": group_id,
                "type": "text",
                "text": { "body": Self::build_message(data, message) },
            }))
            .send()
            .await
            .map_err(|e| PlatformError::from_http(e, "whatsapp message"))?;

        expect_json(response, "whatsapp message").await?;
        Ok(None)
    }
}

#[async_trait]
impl Provider for WhatsAppProvider {
    fn platform(&self) -> Platform {
        Platform::WhatsApp
    }

    fn is_configured(&self) -> bool {
        self.config
            .as_ref()
            .map(|c| !c.access_token.is_empty() && !c.phone_number_id.is_empty())
            .unwrap_or(false)
    }

    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult {
        let Some(config) = self.config.as_ref() else {
            return unconfigured(Platform::WhatsApp);
        };
        if !self.is_configured() {
            return unconfigured(Platform::WhatsApp);
        }

        match self.try_publish(config, data, message).await {
            Ok(url) => ShareResult::published(Platform::WhatsApp, url),
            Err(e) => {
                warn!(error = %e, "whatsapp publish failed");
                ShareResult::failed(Platform::WhatsApp, e.to_string())
            }
        }
    }
}
