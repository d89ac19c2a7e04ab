//! Multi-platform publish orchestration
//!
//! Owns the provider registry and the fan-out: one album, one sanitization
//! pass, one concurrent task per requested platform, results collected back
//! in request order. A platform failure, timeout, or even a panicking
//! adapter degrades to a failed result in that platform's slot; siblings are
//! never cancelled.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::PlatformError;
use crate::platforms::{
    build_http_client, facebook::FacebookProvider, instagram::InstagramProvider,
    line::LineProvider, telegram::TelegramProvider, threads::ThreadsProvider,
    tiktok::TikTokProvider, whatsapp::WhatsAppProvider, x::XProvider, youtube::YouTubeProvider,
    Provider,
};
use crate::types::{AlbumShareData, Platform, ShareResult};
use crate::url_filter;

pub struct SocialPublisher {
    providers: Vec<Arc<dyn Provider>>,
    publish_timeout: Duration,
}

impl SocialPublisher {
    /// Build a publisher over an explicit provider registry.
    ///
    /// `publish_timeout` bounds each platform's publish attempt
    /// independently; a task that overruns resolves to a failure result.
    pub fn new(providers: Vec<Arc<dyn Provider>>, publish_timeout: Duration) -> Self {
        Self {
            providers,
            publish_timeout,
        }
    }

    /// Build the full nine-platform registry from configuration.
    ///
    /// Every platform gets an adapter regardless of whether its section is
    /// present; missing sections surface as `is_configured() == false` and
    /// publish-time configuration failures, not as missing registry entries.
    pub fn from_config(config: &Config) -> Self {
        let timeout = Duration::from_secs(config.defaults.publish_timeout_secs);
        let client = build_http_client(timeout);

        let providers: Vec<Arc<dyn Provider>> = vec![
            Arc::new(FacebookProvider::new(config.facebook.clone(), client.clone())),
            Arc::new(InstagramProvider::new(config.instagram.clone(), client.clone())),
            Arc::new(XProvider::new(config.x.clone(), client.clone())),
            Arc::new(ThreadsProvider::new(config.threads.clone(), client.clone())),
            Arc::new(TikTokProvider::new(config.tiktok.clone(), client.clone())),
            Arc::new(YouTubeProvider::new(config.youtube.clone(), client.clone())),
            Arc::new(TelegramProvider::new(config.telegram.clone(), client.clone())),
            Arc::new(WhatsAppProvider::new(config.whatsapp.clone(), client.clone())),
            Arc::new(LineProvider::new(config.line.clone(), client)),
        ];

        Self::new(providers, timeout)
    }

    fn provider_for(&self, platform: Platform) -> Option<&Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.platform() == platform)
    }

    /// Per-platform configuration status. Pure: delegates to each adapter's
    /// presence predicate, no network access.
    pub fn configured_platforms(&self) -> BTreeMap<Platform, bool> {
        self.providers
            .iter()
            .map(|provider| (provider.platform(), provider.is_configured()))
            .collect()
    }

    /// Publish one album to the requested platforms concurrently.
    ///
    /// The returned list matches `platforms` in length and order regardless
    /// of completion order. Every entry is a definite outcome: success, the
    /// platform's own failure, a timeout, or an unsupported-platform error
    /// for tags with no registered adapter.
    pub async fn publish_to_social(
        &self,
        platforms: &[Platform],
        data: &AlbumShareData,
        message: Option<&str>,
    ) -> Vec<ShareResult> {
        // One sanitization pass, shared read-only by every platform task.
        let sanitized = Arc::new(url_filter::sanitize(data));

        info!(
            album = %sanitized.title,
            platforms = platforms.len(),
            "publishing album"
        );

        enum Slot {
            Immediate(ShareResult),
            Spawned(Platform, JoinHandle<ShareResult>),
        }

        let slots: Vec<Slot> = platforms
            .iter()
            .map(|&platform| match self.provider_for(platform) {
                None => Slot::Immediate(ShareResult::failed(
                    platform,
                    PlatformError::Unsupported(platform.to_string()).to_string(),
                )),
                Some(provider) => {
                    let provider = Arc::clone(provider);
                    let data = Arc::clone(&sanitized);
                    let message = message.map(str::to_string);
                    let timeout = self.publish_timeout;

                    Slot::Spawned(
                        platform,
                        tokio::spawn(async move {
                            match tokio::time::timeout(
                                timeout,
                                provider.publish(&data, message.as_deref()),
                            )
                            .await
                            {
                                Ok(result) => result,
                                Err(_) => ShareResult::failed(
                                    platform,
                                    PlatformError::Timeout(format!(
                                        "publish did not finish within {}s",
                                        timeout.as_secs()
                                    ))
                                    .to_string(),
                                ),
                            }
                        }),
                    )
                }
            })
            .collect();

        // join_all preserves input order, so each outcome lands in the slot
        // of the platform that was requested there, no matter which task
        // finishes first.
        let results = futures::future::join_all(slots.into_iter().map(|slot| async move {
            match slot {
                Slot::Immediate(result) => result,
                Slot::Spawned(platform, handle) => handle.await.unwrap_or_else(|e| {
                    // Adapters never throw by contract, but a panicking task
                    // still must land in its own slot with its own tag.
                    warn!(platform = %platform, error = %e, "publish task aborted");
                    ShareResult::failed(platform, format!("publish task aborted: {}", e))
                }),
            }
        }))
        .await;

        for result in &results {
            if result.success {
                info!(platform = %result.platform, "published");
            } else {
                warn!(
                    platform = %result.platform,
                    error = result.error.as_deref().unwrap_or(""),
                    "publish failed"
                );
            }
        }

        results
    }
}
