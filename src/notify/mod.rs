//! Notifier (spec §6): delivers a synthesized [`crate::domain::Alert`] to
//! external collaborator channels (webhook, email). Out of core scope —
//! the spec names webhook POST and an email provider SDK as the contract,
//! not an implementation the pipeline itself owns.

use async_trait::async_trait;
use tracing::info;

use crate::domain::Alert;
use crate::errors::Result;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> Result<()>;
}

/// Default notifier: logs and reports success without calling out. Used
/// until a webhook/email channel is wired up, and in tests.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, alert: &Alert) -> Result<()> {
        info!(alert_id = %alert.id, title = %alert.title, "alert notification (noop)");
        Ok(())
    }
}
