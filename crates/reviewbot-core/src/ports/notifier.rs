//! Notifier port - 一方向の通知チャネル

use async_trait::async_trait;

use crate::domain::DeliveryError;

/// Notifier delivers one opaque text message to the configured destination.
///
/// Timeouts belong to the implementation and surface as `DeliveryError`.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<(), DeliveryError>;
}
