use anyhow::{anyhow, Result};
use reqwest::Url;
use serde::Deserialize;

/// Default version identifier naming the active store generation.
pub const DEFAULT_CACHE_VERSION: &str = "static-site-v1";

/// The only background-sync tag this engine recognizes.
pub const SYNC_TAG: &str = "background-sync";

/// Path served as the offline fallback for document requests.
pub const FALLBACK_PATH: &str = "/";

/// Title the host displays for every push notification.
pub const NOTIFICATION_TITLE: &str = "Sculpture Gallery";

/// Body used when a push arrives without a payload.
pub const DEFAULT_NOTIFICATION_BODY: &str = "New update from the gallery";

/// Icon and badge image shown on notifications.
pub const NOTIFICATION_ICON: &str = "/assets/site/profile.jpg";

/// Vibration pattern in milliseconds (on, off, on).
pub const VIBRATION_PATTERN: [u64; 3] = [100, 50, 100];

/// Static key attached to every notification payload.
pub const NOTIFICATION_PRIMARY_KEY: u32 = 1;

/// How requests map to store keys.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MatchRule {
    /// Strip the query string before keying.
    #[serde(default)]
    pub ignore_query: bool,
    /// Key by URL alone. When false only GET requests match or populate
    /// the store.
    #[serde(default)]
    pub ignore_method: bool,
}

impl MatchRule {
    /// Whether a request with this method can be looked up or stored.
    pub fn admits_method(&self, method: &str) -> bool {
        self.ignore_method || method.eq_ignore_ascii_case("GET")
    }
}

/// Top-level configuration for the cache engine.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Version identifier naming the active store generation. Changing it
    /// is the sole mechanism that invalidates previously cached entries,
    /// on the next activation.
    pub version: String,
    /// Site origin used to resolve root-relative URLs and to classify
    /// responses as same-origin.
    pub origin: String,
    /// Assets fetched and stored during install, in order.
    #[serde(default = "default_precache_list")]
    pub precache: Vec<String>,
    /// Request-to-key mapping rule.
    #[serde(default)]
    pub match_rule: MatchRule,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_CACHE_VERSION.to_string(),
            origin: "http://localhost:8080".to_string(),
            precache: default_precache_list(),
            match_rule: MatchRule::default(),
        }
    }
}

/// The fixed asset list for the site: root, main document, stylesheet,
/// manifest, the third-party CSS framework, the web-font stylesheet, three
/// script bundles, and the profile image used by notifications.
pub fn default_precache_list() -> Vec<String> {
    [
        "/",
        "/index.html",
        "/index.css",
        "/manifest.json",
        "https://cdn.tailwindcss.com",
        "https://fonts.googleapis.com/css2?family=Cairo:wght@400;700;900&display=swap",
        "https://unpkg.com/react@18/umd/react.development.js",
        "https://unpkg.com/react-dom@18/umd/react-dom.development.js",
        "https://unpkg.com/@babel/standalone/babel.min.js",
        "/assets/site/profile.jpg",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl CacheConfig {
    /// Resolve a root-relative URL against the configured origin. Absolute
    /// URLs pass through unchanged, so relative and absolute spellings of
    /// the same asset share one store key.
    pub fn resolve(&self, url: &str) -> Result<String> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Ok(url.to_string());
        }
        let base = Url::parse(&self.origin)
            .map_err(|e| anyhow!("invalid origin {}: {}", self.origin, e))?;
        let joined = base
            .join(url)
            .map_err(|e| anyhow!("cannot resolve {} against {}: {}", url, self.origin, e))?;
        Ok(joined.to_string())
    }
}
