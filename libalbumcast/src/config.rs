//! Configuration management for Albumcast
//!
//! Credentials are pre-issued and read once at startup, either from a TOML
//! file or from process environment variables. There is no hot reload and no
//! token acquisition: a platform section is either present with usable keys
//! or the platform is treated as unconfigured.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    pub facebook: Option<FacebookConfig>,
    pub instagram: Option<InstagramConfig>,
    pub x: Option<XConfig>,
    pub threads: Option<ThreadsConfig>,
    pub tiktok: Option<TikTokConfig>,
    pub youtube: Option<YouTubeConfig>,
    pub telegram: Option<TelegramConfig>,
    pub whatsapp: Option<WhatsAppConfig>,
    pub line: Option<LineConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Upper bound, in seconds, for a single platform's publish attempt.
    pub publish_timeout_secs: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            publish_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookConfig {
    pub page_id: String,
    pub access_token: String,
    /// Override for the Graph API base URL (tests, proxies).
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstagramConfig {
    pub business_account_id: String,
    pub access_token: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XConfig {
    pub api_key: String,
    pub api_key_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadsConfig {
    pub user_id: String,
    pub access_token: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TikTokConfig {
    pub access_token: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    pub access_token: String,
    pub channel_id: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Numeric chat id or `@handle` of the target channel.
    pub chat_id: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    pub access_token: String,
    pub phone_number_id: String,
    /// Broadcast group recipient. Distinct from `phone_number_id`; publishing
    /// fails without it even when the rest of the section is usable.
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default = "default_whatsapp_template")]
    pub template_name: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

fn default_whatsapp_template() -> String {
    "album_share".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    pub channel_access_token: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Build configuration from process environment variables.
    ///
    /// A platform section is created only when all of its required keys are
    /// present and non-empty, so partially exported credentials leave the
    /// platform unconfigured rather than half-configured.
    pub fn from_env() -> Self {
        Self {
            defaults: DefaultsConfig {
                publish_timeout_secs: env_var("ALBUMCAST_PUBLISH_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
            facebook: env_var("FACEBOOK_PAGE_ID").zip(env_var("FACEBOOK_ACCESS_TOKEN")).map(
                |(page_id, access_token)| FacebookConfig {
                    page_id,
                    access_token,
                    api_base: None,
                },
            ),
            instagram: env_var("INSTAGRAM_BUSINESS_ACCOUNT_ID")
                .zip(env_var("INSTAGRAM_ACCESS_TOKEN"))
                .map(|(business_account_id, access_token)| InstagramConfig {
                    business_account_id,
                    access_token,
                    api_base: None,
                }),
            x: match (
                env_var("X_API_KEY"),
                env_var("X_API_KEY_SECRET"),
                env_var("X_ACCESS_TOKEN"),
                env_var("X_ACCESS_TOKEN_SECRET"),
            ) {
                (Some(api_key), Some(api_key_secret), Some(access_token), Some(access_token_secret)) => {
                    Some(XConfig {
                        api_key,
                        api_key_secret,
                        access_token,
                        access_token_secret,
                        api_base: None,
                    })
                }
                _ => None,
            },
            threads: env_var("THREADS_USER_ID").zip(env_var("THREADS_ACCESS_TOKEN")).map(
                |(user_id, access_token)| ThreadsConfig {
                    user_id,
                    access_token,
                    api_base: None,
                },
            ),
            tiktok: env_var("TIKTOK_ACCESS_TOKEN").map(|access_token| TikTokConfig {
                access_token,
                api_base: None,
            }),
            youtube: env_var("YOUTUBE_ACCESS_TOKEN").zip(env_var("YOUTUBE_CHANNEL_ID")).map(
                |(access_token, channel_id)| YouTubeConfig {
                    access_token,
                    channel_id,
                    api_base: None,
                },
            ),
            telegram: env_var("TELEGRAM_BOT_TOKEN").zip(env_var("TELEGRAM_CHAT_ID")).map(
                |(bot_token, chat_id)| TelegramConfig {
                    bot_token,
                    chat_id,
                    api_base: None,
                },
            ),
            whatsapp: env_var("WHATSAPP_ACCESS_TOKEN")
                .zip(env_var("WHATSAPP_PHONE_NUMBER_ID"))
                .map(|(access_token, phone_number_id)| WhatsAppConfig {
                    access_token,
                    phone_number_id,
                    group_id: env_var("WHATSAPP_GROUP_ID"),
                    template_name: env_var("WHATSAPP_TEMPLATE_NAME")
                        .unwrap_or_else(default_whatsapp_template),
                    api_base: None,
                }),
            line: env_var("LINE_CHANNEL_ACCESS_TOKEN").map(|channel_access_token| LineConfig {
                channel_access_token,
                api_base: None,
            }),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("ALBUMCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("albumcast").join("config.toml"))
}
