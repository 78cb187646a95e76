// Lifecycle operations: install, fetch intercept, activate, sync, push, click.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::cache::{CacheStorage, CacheStore};
use super::notify::{build_notification, ClientHost, ACTION_EXPLORE};
use super::precache::precache_assets;
use super::stats::{StatsCollector, StatsSnapshot};
use crate::config::{CacheConfig, FALLBACK_PATH, SYNC_TAG};
use crate::source::traits::{AssetResponse, Destination, NetworkSource, ResourceRequest};

/// One method per lifecycle stage. Each is independently invocable with
/// constructed inputs; the hosting layer decides when each fires and is
/// responsible for completing install and activate before fetch traffic
/// starts.
#[async_trait]
pub trait LifecycleHandler: Send + Sync {
    async fn on_install(&self) -> Result<()>;
    async fn on_fetch(&self, request: &ResourceRequest) -> Result<Option<AssetResponse>>;
    async fn on_activate(&self) -> Result<()>;
    async fn on_sync(&self, tag: &str) -> Result<()>;
    async fn on_push(&self, payload: Option<&str>) -> Result<()>;
    async fn on_notification_click(&self, action: Option<&str>) -> Result<()>;
}

pub struct OfflineWorker {
    config: CacheConfig,
    storage: Arc<CacheStorage>,
    source: Arc<dyn NetworkSource>,
    host: Arc<dyn ClientHost>,
    stats: Arc<StatsCollector>,
}

impl OfflineWorker {
    pub fn new(
        config: CacheConfig,
        source: Arc<dyn NetworkSource>,
        host: Arc<dyn ClientHost>,
    ) -> Self {
        let storage = Arc::new(CacheStorage::new(config.match_rule));
        Self {
            config,
            storage,
            source,
            host,
            stats: Arc::new(StatsCollector::new()),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// The store generation for the configured version, created on demand.
    fn store(&self) -> Arc<CacheStore> {
        self.storage.open(&self.config.version)
    }

    /// Rewrite the request URL to its absolute form so relative and
    /// absolute spellings of the same asset share one key.
    fn normalize(&self, request: &ResourceRequest) -> ResourceRequest {
        match self.config.resolve(&request.url) {
            Ok(url) => {
                let mut normalized = request.clone();
                normalized.url = url;
                normalized
            }
            Err(_) => request.clone(),
        }
    }

    fn fallback_document(&self, store: &CacheStore) -> Option<AssetResponse> {
        let url = self.config.resolve(FALLBACK_PATH).ok()?;
        store.match_url(&url)
    }
}

#[async_trait]
impl LifecycleHandler for OfflineWorker {
    /// Precache the fixed asset list into the current-version store.
    /// All-or-nothing: one failed asset fails the whole install.
    async fn on_install(&self) -> Result<()> {
        let store = self.store();
        let count = precache_assets(self.source.as_ref(), &store, &self.config).await?;
        info!("cache {} opened, precached {} assets", store.name(), count);
        Ok(())
    }

    /// Cache-first, then network, then offline fallback. Network failures
    /// never escape this method.
    async fn on_fetch(&self, request: &ResourceRequest) -> Result<Option<AssetResponse>> {
        let request = self.normalize(request);
        self.stats.record_request();
        let store = self.store();

        if let Some(hit) = store.matches(&request) {
            self.stats.record_hit();
            return Ok(Some(hit));
        }

        match self.source.fetch(&request).await {
            Ok(response) => {
                self.stats.record_network_fetch();
                if response.is_cacheable() && self.config.match_rule.admits_method(&request.method)
                {
                    store.put(&request, response.clone())?;
                    self.stats.record_stored();
                }
                Ok(Some(response))
            }
            Err(e) => {
                self.stats.record_network_failure();
                warn!("network fetch failed for {}: {}", request.url, e);

                if request.destination == Destination::Document {
                    let fallback = self.fallback_document(&store);
                    if fallback.is_some() {
                        self.stats.record_fallback();
                    }
                    Ok(fallback)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Delete every store generation whose name differs from the configured
    /// version. Best-effort: a generation that fails to delete is logged
    /// and the batch continues.
    async fn on_activate(&self) -> Result<()> {
        let current = self.config.version.as_str();
        for name in self.storage.keys() {
            if name == current {
                continue;
            }
            if self.storage.delete(&name) {
                info!("deleted stale cache {}", name);
            } else {
                warn!("stale cache {} disappeared before deletion", name);
            }
        }
        Ok(())
    }

    /// Extension point: deferred work would be drained here.
    async fn on_sync(&self, tag: &str) -> Result<()> {
        if tag == SYNC_TAG {
            debug!("background sync triggered");
        }
        Ok(())
    }

    async fn on_push(&self, payload: Option<&str>) -> Result<()> {
        let notification = build_notification(payload);
        self.host.show_notification(notification).await
    }

    async fn on_notification_click(&self, action: Option<&str>) -> Result<()> {
        self.host.close_notification().await?;
        if action == Some(ACTION_EXPLORE) {
            self.host.open_window(FALLBACK_PATH).await?;
        }
        Ok(())
    }
}
