// Install-time precache: fetch the fixed asset list and commit it as one batch.

use anyhow::{anyhow, Result};
use tracing::debug;

use super::cache::CacheStore;
use crate::config::CacheConfig;
use crate::source::traits::{NetworkSource, ResourceRequest};

/// Fetch every URL in the precache list and insert all of them at once.
/// Any single failure (transport error or non-200 status) fails the whole
/// batch and leaves the store untouched.
pub async fn precache_assets(
    source: &dyn NetworkSource,
    store: &CacheStore,
    config: &CacheConfig,
) -> Result<usize> {
    let mut batch = Vec::with_capacity(config.precache.len());

    for url in &config.precache {
        let resolved = config.resolve(url)?;
        let request = ResourceRequest::get(resolved);
        let response = source
            .fetch(&request)
            .await
            .map_err(|e| anyhow!("precache fetch failed for {}: {}", url, e))?;
        if response.status != 200 {
            return Err(anyhow!(
                "precache fetch for {} returned HTTP {}",
                url,
                response.status
            ));
        }
        debug!("precached {} ({} bytes)", url, response.body.len());
        batch.push((request, response));
    }

    let count = batch.len();
    store.put_all(batch)?;
    Ok(count)
}
