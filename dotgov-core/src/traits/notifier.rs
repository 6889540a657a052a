//! Notification dispatch trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Notification;

/// Outbound notification channel.
///
/// Dispatch is best-effort at the call sites that matter: a state change that
/// has already committed is never rolled back because its email failed.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one notification
    async fn send(&self, notification: &Notification) -> CoreResult<()>;
}
