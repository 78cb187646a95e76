use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, Url};
use tracing::debug;

use super::traits::{AssetResponse, NetworkSource, ResourceRequest, ResponseKind};

/// Live network backend. Resolves root-relative URLs against the site
/// origin and classifies every response by origin.
pub struct HttpSource {
    client: Client,
    origin: Url,
}

impl HttpSource {
    pub fn new(origin: &str) -> Result<Self> {
        let origin =
            Url::parse(origin).map_err(|e| anyhow!("invalid origin {}: {}", origin, e))?;
        Ok(Self {
            client: Client::new(),
            origin,
        })
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        if url.starts_with("http://") || url.starts_with("https://") {
            return Url::parse(url).map_err(|e| anyhow!("invalid url {}: {}", url, e));
        }
        self.origin
            .join(url)
            .map_err(|e| anyhow!("cannot resolve {} against {}: {}", url, self.origin, e))
    }

    fn classify(&self, url: &Url, headers: &HashMap<String, String>) -> ResponseKind {
        let same_origin = url.scheme() == self.origin.scheme()
            && url.host_str() == self.origin.host_str()
            && url.port_or_known_default() == self.origin.port_or_known_default();

        if same_origin {
            ResponseKind::Basic
        } else if headers.contains_key("access-control-allow-origin") {
            ResponseKind::Cors
        } else {
            ResponseKind::Opaque
        }
    }
}

#[async_trait]
impl NetworkSource for HttpSource {
    async fn fetch(&self, request: &ResourceRequest) -> Result<AssetResponse> {
        let url = self.resolve(&request.url)?;
        let method: Method = request
            .method
            .parse()
            .map_err(|_| anyhow!("invalid method {}", request.method))?;

        let mut req = self.client.request(method, url.clone());
        for (k, v) in &request.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        let resp = req.send().await?;
        let status = resp.status().as_u16();

        let mut headers = HashMap::new();
        for (name, value) in resp.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_ascii_lowercase(), v.to_string());
            }
        }

        // Classify against the final URL so redirects land on the right origin.
        let kind = self.classify(resp.url(), &headers);

        let body = resp.bytes().await?;
        debug!(
            "http fetch {} status={} kind={:?} bytes={}",
            url,
            status,
            kind,
            body.len()
        );

        Ok(AssetResponse {
            status,
            kind,
            headers,
            body,
        })
    }
}
