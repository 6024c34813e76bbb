//! `PostgresStore`: the concrete [`super::DocumentStore`] adapter, grounded
//! on `hub::db::create_pool`/`run_migrations` for pool setup and
//! `hub::intelligence::job_queue`'s runtime-bound `sqlx::query` style
//! (deliberately not the `sqlx::query!` compile-time macro, which would
//! require a live `DATABASE_URL` at build time).

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::domain::{Alert, Article, CompanyProfile, RiskEvent, Supplier};
use crate::errors::{PipelineError, Result};

use super::DocumentStore;

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .map_err(|e| PipelineError::transient("postgres", e.to_string()))?;

        info!("connected to PostgreSQL document store");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("running document store migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        Ok(())
    }
}

/// Unit enum variants serialize as a bare JSON string (`"high"`); strip
/// the quotes so the column holds a plain TEXT value.
fn enum_to_text<T: Serialize>(v: &T) -> String {
    match serde_json::to_value(v) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

fn text_to_enum<T: DeserializeOwned>(s: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(s.to_string()))
        .map_err(|e| PipelineError::malformed("postgres", e.to_string()))
}

fn pg_err(e: sqlx::Error) -> PipelineError {
    PipelineError::transient("postgres", e.to_string())
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn upsert_company(&self, company: &CompanyProfile) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO companies
                (company_id, name, raw_materials, key_geographies, inventory_days,
                 material_criticality, alert_contacts)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (company_id) DO UPDATE SET
                 name = EXCLUDED.name,
                 raw_materials = EXCLUDED.raw_materials,
                 key_geographies = EXCLUDED.key_geographies,
                 inventory_days = EXCLUDED.inventory_days,
                 material_criticality = EXCLUDED.material_criticality,
                 alert_contacts = EXCLUDED.alert_contacts"#,
        )
        .bind(&company.company_id)
        .bind(&company.name)
        .bind(serde_json::to_value(&company.raw_materials).unwrap_or_default())
        .bind(serde_json::to_value(&company.key_geographies).unwrap_or_default())
        .bind(serde_json::to_value(&company.inventory_days).unwrap_or_default())
        .bind(serde_json::to_value(&company.material_criticality).unwrap_or_default())
        .bind(serde_json::to_value(&company.alert_contacts).unwrap_or_default())
        .execute(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(())
    }

    async fn upsert_supplier(&self, supplier: &Supplier) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO suppliers
                (id, company_id, name, country, region, tier, supplies, supply_volume_pct,
                 status, approved_vendor, pre_qualified, is_single_source, esg_score,
                 financial_health_score, switching_cost_estimate, max_capacity,
                 lead_time_weeks, risk_score_current, upstream_suppliers)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
               ON CONFLICT (id) DO UPDATE SET
                 company_id = EXCLUDED.company_id,
                 name = EXCLUDED.name,
                 country = EXCLUDED.country,
                 region = EXCLUDED.region,
                 tier = EXCLUDED.tier,
                 supplies = EXCLUDED.supplies,
                 supply_volume_pct = EXCLUDED.supply_volume_pct,
                 status = EXCLUDED.status,
                 approved_vendor = EXCLUDED.approved_vendor,
                 pre_qualified = EXCLUDED.pre_qualified,
                 is_single_source = EXCLUDED.is_single_source,
                 esg_score = EXCLUDED.esg_score,
                 financial_health_score = EXCLUDED.financial_health_score,
                 switching_cost_estimate = EXCLUDED.switching_cost_estimate,
                 max_capacity = EXCLUDED.max_capacity,
                 lead_time_weeks = EXCLUDED.lead_time_weeks,
                 risk_score_current = EXCLUDED.risk_score_current,
                 upstream_suppliers = EXCLUDED.upstream_suppliers"#,
        )
        .bind(&supplier.id)
        .bind(&supplier.company_id)
        .bind(&supplier.name)
        .bind(&supplier.country)
        .bind(&supplier.region)
        .bind(supplier.tier as i32)
        .bind(serde_json::to_value(&supplier.supplies).unwrap_or_default())
        .bind(supplier.supply_volume_pct)
        .bind(enum_to_text(&supplier.status))
        .bind(supplier.approved_vendor)
        .bind(supplier.pre_qualified)
        .bind(supplier.is_single_source)
        .bind(supplier.esg_score)
        .bind(supplier.financial_health_score)
        .bind(supplier.switching_cost_estimate)
        .bind(supplier.max_capacity)
        .bind(supplier.lead_time_weeks as i32)
        .bind(supplier.risk_score_current)
        .bind(serde_json::to_value(&supplier.upstream_suppliers).unwrap_or_default())
        .execute(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(())
    }

    async fn suppliers_for_company(&self, company_id: &str) -> Result<Vec<Supplier>> {
        let rows: Vec<SupplierRow> = sqlx::query_as(
            r#"SELECT id, company_id, name, country, region, tier, supplies, supply_volume_pct,
                      status, approved_vendor, pre_qualified, is_single_source, esg_score,
                      financial_health_score, switching_cost_estimate, max_capacity,
                      lead_time_weeks, risk_score_current, upstream_suppliers
               FROM suppliers WHERE company_id = $1"#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await
        .map_err(pg_err)?;

        rows.into_iter().map(SupplierRow::into_domain).collect()
    }

    async fn upsert_article(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO articles
                (event_id, timestamp, source, headline, body, url, processed,
                 risk_extracted, risk_event_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               ON CONFLICT (event_id) DO UPDATE SET
                 processed = EXCLUDED.processed,
                 risk_extracted = EXCLUDED.risk_extracted,
                 risk_event_id = EXCLUDED.risk_event_id"#,
        )
        .bind(article.event_id)
        .bind(article.timestamp)
        .bind(&article.source)
        .bind(&article.headline)
        .bind(&article.body)
        .bind(&article.url)
        .bind(article.processed)
        .bind(article.risk_extracted)
        .bind(article.risk_event_id)
        .execute(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(())
    }

    async fn mark_article_processed(&self, event_id: Uuid, risk_event_id: Option<Uuid>) -> Result<()> {
        sqlx::query(
            r#"UPDATE articles SET processed = TRUE, risk_extracted = $2, risk_event_id = $3
               WHERE event_id = $1"#,
        )
        .bind(event_id)
        .bind(risk_event_id.is_some())
        .bind(risk_event_id)
        .execute(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(())
    }

    async fn upsert_risk_event(&self, event: &RiskEvent) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO risk_events
                (id, article_id, company_id, timestamp, risk_type, affected_entities,
                 affected_supply_chain_nodes, severity, is_confirmed, time_horizon,
                 reasoning, recommended_action, risk_score_components, risk_score,
                 severity_band, propagation)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
               ON CONFLICT (id) DO UPDATE SET
                 risk_score_components = EXCLUDED.risk_score_components,
                 risk_score = EXCLUDED.risk_score,
                 severity_band = EXCLUDED.severity_band,
                 propagation = EXCLUDED.propagation"#,
        )
        .bind(event.id)
        .bind(event.article_id)
        .bind(&event.company_id)
        .bind(event.timestamp)
        .bind(enum_to_text(&event.risk_type))
        .bind(serde_json::to_value(&event.affected_entities).unwrap_or_default())
        .bind(serde_json::to_value(&event.affected_supply_chain_nodes).unwrap_or_default())
        .bind(enum_to_text(&event.severity))
        .bind(enum_to_text(&event.is_confirmed))
        .bind(enum_to_text(&event.time_horizon))
        .bind(&event.reasoning)
        .bind(&event.recommended_action)
        .bind(serde_json::to_value(&event.risk_score_components).unwrap_or_default())
        .bind(event.risk_score)
        .bind(enum_to_text(&event.severity_band))
        .bind(serde_json::to_value(&event.propagation).unwrap_or_default())
        .execute(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(())
    }

    async fn get_risk_event(&self, id: Uuid) -> Result<Option<RiskEvent>> {
        let row: Option<RiskEventRow> = sqlx::query_as(
            r#"SELECT id, article_id, company_id, timestamp, risk_type, affected_entities,
                      affected_supply_chain_nodes, severity, is_confirmed, time_horizon,
                      reasoning, recommended_action, risk_score_components, risk_score,
                      severity_band, propagation
               FROM risk_events WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(pg_err)?;

        row.map(RiskEventRow::into_domain).transpose()
    }

    async fn upsert_alert(&self, alert: &Alert) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO alerts
                (id, risk_event_id, company_id, severity_band, risk_score, title, description,
                 affected_supplier, affected_material, recommendations, recommendation_text,
                 is_acknowledged, acknowledged_by, acknowledged_at, notification_sent,
                 created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
               ON CONFLICT (id) DO UPDATE SET
                 is_acknowledged = EXCLUDED.is_acknowledged,
                 acknowledged_by = EXCLUDED.acknowledged_by,
                 acknowledged_at = EXCLUDED.acknowledged_at,
                 notification_sent = EXCLUDED.notification_sent,
                 updated_at = EXCLUDED.updated_at"#,
        )
        .bind(alert.id)
        .bind(alert.risk_event_id)
        .bind(&alert.company_id)
        .bind(enum_to_text(&alert.severity_band))
        .bind(alert.risk_score)
        .bind(&alert.title)
        .bind(&alert.description)
        .bind(&alert.affected_supplier)
        .bind(&alert.affected_material)
        .bind(serde_json::to_value(&alert.recommendations).unwrap_or_default())
        .bind(&alert.recommendation_text)
        .bind(alert.is_acknowledged)
        .bind(&alert.acknowledged_by)
        .bind(alert.acknowledged_at)
        .bind(alert.notification_sent)
        .bind(alert.created_at)
        .bind(alert.updated_at)
        .execute(&self.pool)
        .await
        .map_err(pg_err)?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SupplierRow {
    id: String,
    company_id: String,
    name: String,
    country: String,
    region: String,
    tier: i32,
    supplies: serde_json::Value,
    supply_volume_pct: f64,
    status: String,
    approved_vendor: bool,
    pre_qualified: bool,
    is_single_source: bool,
    esg_score: f64,
    financial_health_score: f64,
    switching_cost_estimate: f64,
    max_capacity: Option<f64>,
    lead_time_weeks: i32,
    risk_score_current: f64,
    upstream_suppliers: serde_json::Value,
}

impl SupplierRow {
    fn into_domain(self) -> Result<Supplier> {
        Ok(Supplier {
            id: self.id,
            company_id: self.company_id,
            name: self.name,
            country: self.country,
            region: self.region,
            tier: self.tier as u32,
            supplies: serde_json::from_value(self.supplies)
                .map_err(|e| PipelineError::malformed("postgres", e.to_string()))?,
            supply_volume_pct: self.supply_volume_pct,
            status: text_to_enum(&self.status)?,
            approved_vendor: self.approved_vendor,
            pre_qualified: self.pre_qualified,
            is_single_source: self.is_single_source,
            esg_score: self.esg_score,
            financial_health_score: self.financial_health_score,
            switching_cost_estimate: self.switching_cost_estimate,
            max_capacity: self.max_capacity,
            lead_time_weeks: self.lead_time_weeks as u32,
            risk_score_current: self.risk_score_current,
            upstream_suppliers: serde_json::from_value(self.upstream_suppliers)
                .map_err(|e| PipelineError::malformed("postgres", e.to_string()))?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RiskEventRow {
    id: Uuid,
    article_id: Uuid,
    company_id: String,
    timestamp: chrono::DateTime<chrono::Utc>,
    risk_type: String,
    affected_entities: serde_json::Value,
    affected_supply_chain_nodes: serde_json::Value,
    severity: String,
    is_confirmed: String,
    time_horizon: String,
    reasoning: String,
    recommended_action: String,
    risk_score_components: serde_json::Value,
    risk_score: f64,
    severity_band: String,
    propagation: serde_json::Value,
}

impl RiskEventRow {
    fn into_domain(self) -> Result<RiskEvent> {
        Ok(RiskEvent {
            id: self.id,
            article_id: self.article_id,
            company_id: self.company_id,
            timestamp: self.timestamp,
            risk_type: text_to_enum(&self.risk_type)?,
            affected_entities: serde_json::from_value(self.affected_entities)
                .map_err(|e| PipelineError::malformed("postgres", e.to_string()))?,
            affected_supply_chain_nodes: serde_json::from_value(self.affected_supply_chain_nodes)
                .map_err(|e| PipelineError::malformed("postgres", e.to_string()))?,
            severity: text_to_enum(&self.severity)?,
            is_confirmed: text_to_enum(&self.is_confirmed)?,
            time_horizon: text_to_enum(&self.time_horizon)?,
            reasoning: self.reasoning,
            recommended_action: self.recommended_action,
            risk_score_components: serde_json::from_value(self.risk_score_components)
                .map_err(|e| PipelineError::malformed("postgres", e.to_string()))?,
            risk_score: self.risk_score,
            severity_band: text_to_enum(&self.severity_band)?,
            propagation: serde_json::from_value(self.propagation)
                .map_err(|e| PipelineError::malformed("postgres", e.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeverityBand;

    #[test]
    fn enum_to_text_strips_json_quotes() {
        assert_eq!(enum_to_text(&SeverityBand::High), "high");
    }

    #[test]
    fn text_to_enum_round_trips() {
        let band: SeverityBand = text_to_enum("critical").unwrap();
        assert_eq!(band, SeverityBand::Critical);
    }
}
