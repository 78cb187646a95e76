// Axum gateway: translates incoming HTTP requests into fetch-intercept
// operations against the offline worker.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tracing::{debug, error};

use crate::engine::worker::{LifecycleHandler, OfflineWorker};
use crate::source::traits::{Destination, ResourceRequest};

pub struct GatewayServer {
    port: u16,
    worker: Arc<OfflineWorker>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl GatewayServer {
    /// Run install then activate, then start serving on a random local
    /// port. Serving never begins before both lifecycle stages completed.
    pub async fn start(worker: Arc<OfflineWorker>) -> Result<Self> {
        worker.on_install().await?;
        worker.on_activate().await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let app = Router::new()
            .fallback(serve_asset)
            .with_state(Arc::clone(&worker));

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Ok(Self {
            port,
            worker,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Get the port the gateway is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Build a URL for a path served through the gateway.
    pub fn url_for(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    pub fn worker(&self) -> &Arc<OfflineWorker> {
        &self.worker
    }

    /// Shutdown the gateway gracefully.
    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Read the request destination from the `Sec-Fetch-Dest` header.
fn destination_from_headers(headers: &HeaderMap) -> Destination {
    headers
        .get("sec-fetch-dest")
        .and_then(|v| v.to_str().ok())
        .map(Destination::from_token)
        .unwrap_or_default()
}

async fn serve_asset(State(worker): State<Arc<OfflineWorker>>, req: Request) -> Response {
    let destination = destination_from_headers(req.headers());

    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());

    let mut headers = HashMap::new();
    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    let request = ResourceRequest {
        method: req.method().as_str().to_string(),
        url: path,
        headers,
        destination,
    };

    debug!(
        "gateway request {} {} dest={:?}",
        request.method, request.url, destination
    );

    match worker.on_fetch(&request).await {
        Ok(Some(asset)) => {
            let status = StatusCode::from_u16(asset.status).unwrap_or(StatusCode::OK);

            let mut resp_headers = HeaderMap::new();
            for (k, v) in &asset.headers {
                if let (Ok(name), Ok(value)) = (k.parse::<HeaderName>(), v.parse::<HeaderValue>())
                {
                    resp_headers.insert(name, value);
                }
            }
            // The stored body is fully materialized; let axum restate framing.
            resp_headers.remove(header::TRANSFER_ENCODING);
            resp_headers.remove(header::CONTENT_LENGTH);

            (status, resp_headers, asset.body).into_response()
        }
        Ok(None) => (StatusCode::BAD_GATEWAY, "offline").into_response(),
        Err(e) => {
            error!("fetch intercept error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("error: {}", e)).into_response()
        }
    }
}
