//! Provider adapters for the supported social platforms
//!
//! Each platform gets one adapter implementing [`Provider`]: a constant
//! platform tag, a pure configuration predicate, and a `publish` operation
//! that never fails the caller. Adapters receive already-sanitized album
//! data; they turn it into one to three HTTP calls against their platform
//! and interpret that platform's own success/error shape.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::PlatformError;
use crate::types::{AlbumShareData, Platform, ShareResult};

pub mod facebook;
pub mod instagram;
pub mod line;
pub mod telegram;
pub mod threads;
pub mod tiktok;
pub mod whatsapp;
pub mod x;
pub mod youtube;

// Mock provider is available for all builds (not just tests) to support
// integration tests.
pub mod mock;

/// Capability contract shared by all nine platform adapters.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Constant identity of the platform this adapter serves.
    fn platform(&self) -> Platform;

    /// Whether enough configuration exists to attempt publishing.
    ///
    /// Pure presence check over credentials; performs no I/O and never
    /// probes the network.
    fn is_configured(&self) -> bool;

    /// Publish one album to this platform.
    ///
    /// Never returns an error: configuration gaps, remote rejections, and
    /// transport failures all terminate as a failed [`ShareResult`], so the
    /// orchestrator can fan out without a platform fault escaping. When the
    /// adapter is unconfigured this short-circuits before any network call.
    ///
    /// `message` overrides the album description in the generated caption;
    /// platform-specific title/count/URL suffixes still apply.
    async fn publish(&self, data: &AlbumShareData, message: Option<&str>) -> ShareResult;
}

/// Failure result for an adapter whose configuration is missing.
pub(crate) fn unconfigured(platform: Platform) -> ShareResult {
    ShareResult::failed(
        platform,
        PlatformError::NotConfigured(platform.to_string()).to_string(),
    )
}

/// HTTP client shared by the real adapters. The request timeout here is the
/// transport-level bound; the orchestrator enforces its own per-task bound
/// on top.
pub(crate) fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Message override takes precedence over the album description.
pub(crate) fn body_text<'a>(data: &'a AlbumShareData, message: Option<&'a str>) -> &'a str {
    match message {
        Some(text) if !text.is_empty() => text,
        _ => data.description.as_str(),
    }
}

/// Pull a human-readable error out of a provider response body. Covers the
/// shapes the nine platforms actually return: Graph-style `error.message`,
/// Telegram `description`, X `detail`/`errors[0].message`, LINE `message`.
pub(crate) fn remote_error_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .or_else(|| body.get("description").and_then(Value::as_str))
        .or_else(|| body.get("detail").and_then(Value::as_str))
        .or_else(|| {
            body.get("errors")
                .and_then(|e| e.get(0))
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
        })
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::to_string)
}

/// Decode a response as JSON, mapping non-2xx statuses to a posting error
/// carrying the provider's own message when it sent one.
pub(crate) async fn expect_json(
    response: reqwest::Response,
    context: &str,
) -> Result<Value, PlatformError> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        if body.is_null() {
            return Err(PlatformError::Network(format!(
                "{}: response was not valid JSON",
                context
            )));
        }
        return Ok(body);
    }

    let detail = remote_error_message(&body).unwrap_or_else(|| format!("HTTP {}", status));
    Err(PlatformError::Posting(format!("{}: {}", context, detail)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_error_message_graph_shape() {
        let body = json!({"error": {"message": "Invalid OAuth access token", "code": 190}});
        assert_eq!(
            remote_error_message(&body).as_deref(),
            Some("Invalid OAuth access token")
        );
    }

    #[test]
    fn test_remote_error_message_telegram_shape() {
        let body = json!({"ok": false, "description": "Bad Request: chat not found"});
        assert_eq!(
            remote_error_message(&body).as_deref(),
            Some("Bad Request: chat not found")
        );
    }

    #[test]
    fn test_remote_error_message_x_shapes() {
        let body = json!({"detail": "Unauthorized"});
        assert_eq!(remote_error_message(&body).as_deref(), Some("Unauthorized"));

        let body = json!({"errors": [{"message": "Duplicate content"}]});
        assert_eq!(remote_error_message(&body).as_deref(), Some("Duplicate content"));
    }

    #[test]
    fn test_remote_error_message_line_shape() {
        let body = json!({"message": "Invalid reply token"});
        assert_eq!(remote_error_message(&body).as_deref(), Some("Invalid reply token"));
    }

    #[test]
    fn test_remote_error_message_absent() {
        assert_eq!(remote_error_message(&json!({"ok": true})), None);
        assert_eq!(remote_error_message(&Value::Null), None);
    }

    #[test]
    fn test_body_text_precedence() {
        let data = AlbumShareData {
            title: "Rally Night".into(),
            description: "Photos from the rally".into(),
            public_url: "https://albums.example.com/a/rally".into(),
            cover_photo_url: None,
            photo_urls: vec![],
            photo_count: 0,
            campaign_name: "Chen 2026".into(),
        };

        assert_eq!(body_text(&data, None), "Photos from the rally");
        assert_eq!(body_text(&data, Some("Come see!")), "Come see!");
        assert_eq!(body_text(&data, Some("")), "Photos from the rally");
    }

    #[test]
    fn test_unconfigured_result() {
        let result = unconfigured(Platform::TikTok);
        assert!(!result.success);
        assert_eq!(result.platform, Platform::TikTok);
        assert_eq!(result.error.as_deref(), Some("tiktok is not configured"));
    }
}
