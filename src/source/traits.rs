use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// What kind of resource a request is for, as reported by the hosting
/// environment. Only `Document` influences behavior (offline fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    Document,
    Style,
    Script,
    Image,
    Font,
    Manifest,
    #[default]
    Other,
}

impl Destination {
    /// Parse a `Sec-Fetch-Dest` style token. Unknown tokens map to `Other`.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "document" => Self::Document,
            "style" => Self::Style,
            "script" => Self::Script,
            "image" => Self::Image,
            "font" => Self::Font,
            "manifest" => Self::Manifest,
            _ => Self::Other,
        }
    }
}

/// Origin classification of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Same-origin response.
    Basic,
    /// Cross-origin response that opted into sharing.
    Cors,
    /// Cross-origin response without CORS headers.
    Opaque,
}

/// An incoming resource request.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub destination: Destination,
}

impl ResourceRequest {
    /// A plain GET request for `url` with no particular destination.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            headers: HashMap::new(),
            destination: Destination::Other,
        }
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }
}

/// An immutable snapshot of an HTTP response. `Bytes` is reference-counted,
/// so the same value can be returned to a caller and stored in a cache
/// without any duplication logic.
#[derive(Debug, Clone)]
pub struct AssetResponse {
    pub status: u16,
    pub kind: ResponseKind,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl AssetResponse {
    /// Whether this response may enter the store: status exactly 200 and
    /// same-origin.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind == ResponseKind::Basic
    }
}

#[async_trait]
pub trait NetworkSource: Send + Sync {
    /// Perform the request against the live network.
    async fn fetch(&self, request: &ResourceRequest) -> Result<AssetResponse>;
}
