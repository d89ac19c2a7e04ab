//! Core types for Albumcast

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The social platforms an album can be published to.
///
/// The set is closed: every variant has a registered provider adapter, and
/// the orchestrator dispatches on this tag rather than on free-form strings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Instagram,
    X,
    Threads,
    TikTok,
    YouTube,
    Telegram,
    WhatsApp,
    Line,
}

impl Platform {
    /// All platforms, in registry order.
    pub const ALL: [Platform; 9] = [
        Platform::Facebook,
        Platform::Instagram,
        Platform::X,
        Platform::Threads,
        Platform::TikTok,
        Platform::YouTube,
        Platform::Telegram,
        Platform::WhatsApp,
        Platform::Line,
    ];

    /// Lowercase identifier used in CLI arguments, logs, and JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::X => "x",
            Platform::Threads => "threads",
            Platform::TikTok => "tiktok",
            Platform::YouTube => "youtube",
            Platform::Telegram => "telegram",
            Platform::WhatsApp => "whatsapp",
            Platform::Line => "line",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "x" | "twitter" => Ok(Platform::X),
            "threads" => Ok(Platform::Threads),
            "tiktok" => Ok(Platform::TikTok),
            "youtube" => Ok(Platform::YouTube),
            "telegram" => Ok(Platform::Telegram),
            "whatsapp" => Ok(Platform::WhatsApp),
            "line" => Ok(Platform::Line),
            _ => Err(format!(
                "Unknown platform: '{}'. Valid options: facebook, instagram, x, threads, tiktok, youtube, telegram, whatsapp, line",
                s
            )),
        }
    }
}

/// Public share data for one album, assembled by the caller.
///
/// Immutable for the duration of a publish call. `photo_count` is carried
/// separately from `photo_urls` and the two are never reconciled: captions
/// report `photo_count` while uploads consume `photo_urls`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumShareData {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub public_url: String,
    #[serde(default)]
    pub cover_photo_url: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub photo_count: u32,
    pub campaign_name: String,
}

/// Outcome of publishing one album to one platform.
///
/// Exactly one of the two shapes holds: `success == true` with an optional
/// `post_url`, or `success == false` with `error` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResult {
    pub platform: Platform,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ShareResult {
    pub fn published(platform: Platform, post_url: Option<String>) -> Self {
        Self {
            platform,
            success: true,
            post_url,
            error: None,
        }
    }

    pub fn failed(platform: Platform, error: impl Into<String>) -> Self {
        Self {
            platform,
            success: false,
            post_url: None,
            error: Some(error.into()),
        }
    }
}
