// In-memory named response stores, one generation per version identifier.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use parking_lot::RwLock;

use crate::config::MatchRule;
use crate::source::traits::{AssetResponse, ResourceRequest};

/// The key a request maps to under a `MatchRule`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: Option<String>,
    url: String,
}

impl CacheKey {
    fn new(rule: &MatchRule, method: &str, url: &str) -> Self {
        let url = if rule.ignore_query {
            strip_query(url)
        } else {
            url.to_string()
        };
        let method = if rule.ignore_method {
            None
        } else {
            Some(method.to_ascii_uppercase())
        };
        Self { method, url }
    }
}

fn strip_query(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}

/// One named store generation. Key-addressed, last-write-wins, no
/// expiration and no eviction. Entries are replaced wholesale, never
/// patched.
pub struct CacheStore {
    name: String,
    rule: MatchRule,
    entries: RwLock<HashMap<CacheKey, AssetResponse>>,
}

impl CacheStore {
    fn new(name: String, rule: MatchRule) -> Self {
        Self {
            name,
            rule,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up the stored response for a request.
    pub fn matches(&self, request: &ResourceRequest) -> Option<AssetResponse> {
        if !self.rule.admits_method(&request.method) {
            return None;
        }
        let key = CacheKey::new(&self.rule, &request.method, &request.url);
        self.entries.read().get(&key).cloned()
    }

    /// Look up a URL as a plain GET.
    pub fn match_url(&self, url: &str) -> Option<AssetResponse> {
        let key = CacheKey::new(&self.rule, "GET", url);
        self.entries.read().get(&key).cloned()
    }

    /// Store a response under the request's key, replacing any previous
    /// entry for that key.
    pub fn put(&self, request: &ResourceRequest, response: AssetResponse) -> Result<()> {
        if !self.rule.admits_method(&request.method) {
            return Err(anyhow!(
                "method {} not admitted by match rule",
                request.method
            ));
        }
        let key = CacheKey::new(&self.rule, &request.method, &request.url);
        self.entries.write().insert(key, response);
        Ok(())
    }

    /// Insert a whole batch under one write lock. Keys are derived up front
    /// so a rejected entry leaves the store untouched.
    pub fn put_all(&self, batch: Vec<(ResourceRequest, AssetResponse)>) -> Result<()> {
        let mut keyed = Vec::with_capacity(batch.len());
        for (request, response) in batch {
            if !self.rule.admits_method(&request.method) {
                return Err(anyhow!(
                    "method {} not admitted by match rule",
                    request.method
                ));
            }
            keyed.push((
                CacheKey::new(&self.rule, &request.method, &request.url),
                response,
            ));
        }

        let mut entries = self.entries.write();
        for (key, response) in keyed {
            entries.insert(key, response);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Registry of named stores, keyed by version identifier.
pub struct CacheStorage {
    rule: MatchRule,
    stores: RwLock<HashMap<String, Arc<CacheStore>>>,
}

impl CacheStorage {
    pub fn new(rule: MatchRule) -> Self {
        Self {
            rule,
            stores: RwLock::new(HashMap::new()),
        }
    }

    /// Open the named store, creating it if absent.
    pub fn open(&self, name: &str) -> Arc<CacheStore> {
        if let Some(store) = self.stores.read().get(name) {
            return Arc::clone(store);
        }
        let mut stores = self.stores.write();
        Arc::clone(
            stores
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(CacheStore::new(name.to_string(), self.rule))),
        )
    }

    pub fn get(&self, name: &str) -> Option<Arc<CacheStore>> {
        self.stores.read().get(name).cloned()
    }

    /// Names of all existing stores.
    pub fn keys(&self) -> Vec<String> {
        self.stores.read().keys().cloned().collect()
    }

    /// Delete a store wholesale. Returns whether it existed.
    pub fn delete(&self, name: &str) -> bool {
        self.stores.write().remove(name).is_some()
    }
}
