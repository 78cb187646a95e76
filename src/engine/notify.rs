// Push notification descriptor and the host-environment seam.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::config::{
    DEFAULT_NOTIFICATION_BODY, NOTIFICATION_ICON, NOTIFICATION_PRIMARY_KEY, NOTIFICATION_TITLE,
    VIBRATION_PATTERN,
};

/// Action identifier that opens the site when clicked.
pub const ACTION_EXPLORE: &str = "explore";

/// Action identifier that dismisses the notification.
pub const ACTION_CLOSE: &str = "close";

/// A named action button on a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Auxiliary data carried with every notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationData {
    pub date_of_arrival_ms: u64,
    pub primary_key: u32,
}

/// Descriptor handed to the host for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u64>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

/// Build the fixed notification descriptor, using `payload` as the body
/// when present.
pub fn build_notification(payload: Option<&str>) -> Notification {
    let date_of_arrival_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    Notification {
        title: NOTIFICATION_TITLE.to_string(),
        body: payload.unwrap_or(DEFAULT_NOTIFICATION_BODY).to_string(),
        icon: NOTIFICATION_ICON.to_string(),
        badge: NOTIFICATION_ICON.to_string(),
        vibrate: VIBRATION_PATTERN.to_vec(),
        data: NotificationData {
            date_of_arrival_ms,
            primary_key: NOTIFICATION_PRIMARY_KEY,
        },
        actions: vec![
            NotificationAction {
                action: ACTION_EXPLORE.to_string(),
                title: "Explore".to_string(),
                icon: Some(NOTIFICATION_ICON.to_string()),
            },
            NotificationAction {
                action: ACTION_CLOSE.to_string(),
                title: "Close".to_string(),
                icon: None,
            },
        ],
    }
}

/// Host-environment operations the worker delegates to.
#[async_trait]
pub trait ClientHost: Send + Sync {
    /// Ask the host to display a notification.
    async fn show_notification(&self, notification: Notification) -> Result<()>;

    /// Dismiss the currently displayed notification.
    async fn close_notification(&self) -> Result<()>;

    /// Open or focus a client window at the given URL.
    async fn open_window(&self, url: &str) -> Result<()>;
}

/// Host that only logs. Used where no real display surface is attached.
pub struct NoopHost;

#[async_trait]
impl ClientHost for NoopHost {
    async fn show_notification(&self, notification: Notification) -> Result<()> {
        debug!(
            "notification \"{}\": {}",
            notification.title, notification.body
        );
        Ok(())
    }

    async fn close_notification(&self) -> Result<()> {
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<()> {
        debug!("open window {}", url);
        Ok(())
    }
}
