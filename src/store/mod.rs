//! The document store contract (spec §6): collections for companies,
//! suppliers, articles, risk events, and alerts, behind a trait so the
//! pipeline stages never depend on a concrete database.

pub mod postgres;

use async_trait::async_trait;

use crate::domain::{Alert, Article, CompanyProfile, RiskEvent, Supplier};
use crate::errors::Result;

/// Idempotent upsert + read access to every persisted collection (spec
/// §6). All writes are upserts keyed by the documented id fields so
/// at-least-once stream delivery never double-inserts (spec §5/§8
/// invariant 5).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn upsert_company(&self, company: &CompanyProfile) -> Result<()>;
    async fn upsert_supplier(&self, supplier: &Supplier) -> Result<()>;
    async fn suppliers_for_company(&self, company_id: &str) -> Result<Vec<Supplier>>;

    async fn upsert_article(&self, article: &Article) -> Result<()>;
    async fn mark_article_processed(&self, event_id: uuid::Uuid, risk_event_id: Option<uuid::Uuid>) -> Result<()>;

    async fn upsert_risk_event(&self, event: &RiskEvent) -> Result<()>;
    async fn get_risk_event(&self, id: uuid::Uuid) -> Result<Option<RiskEvent>>;

    async fn upsert_alert(&self, alert: &Alert) -> Result<()>;
}
