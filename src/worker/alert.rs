//! Alert stage: consumes `risk_scores`, gates on `should_alert`,
//! synthesizes an Alert, persists it, publishes a summary to
//! `new_alerts`, and hands it to the Notifier (spec §4.8).

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::alerts::synth;
use crate::domain::RiskEvent;
use crate::errors::Result;
use crate::stream::{self, Record, GROUP_ALERT_GENERATION, STREAM_NEW_ALERTS, STREAM_RISK_SCORES};

use super::WorkerContext;

/// The flat summary published on `new_alerts` (spec §4.8: "publish
/// `(alert_id, band, score, title)`").
#[derive(Debug, Clone, Serialize)]
struct NewAlertSummary {
    alert_id: uuid::Uuid,
    band: crate::domain::SeverityBand,
    score: f64,
    title: String,
}

pub async fn run(ctx: WorkerContext, consumer: String, cancel: CancellationToken) {
    super::run_consumer_loop(
        ctx.bus.clone(),
        STREAM_RISK_SCORES,
        GROUP_ALERT_GENERATION,
        consumer,
        cancel,
        move |record| handle_record(ctx.clone(), record),
    )
    .await;
}

async fn handle_record(ctx: WorkerContext, record: Record) -> Result<()> {
    let event: RiskEvent = record.decode()?;

    if !synth::should_alert(&event, ctx.alert_threshold) {
        return Ok(());
    }

    let catalog = ctx.catalog.current();
    let Some(alert) = synth::synthesize(&event, &catalog, &ctx.llm).await else {
        tracing::warn!(risk_event_id = %event.id, "alert gate passed but supplier could not be resolved");
        return Ok(());
    };

    ctx.store.upsert_alert(&alert).await?;

    let summary = NewAlertSummary {
        alert_id: alert.id,
        band: alert.severity_band,
        score: alert.risk_score,
        title: alert.title.clone(),
    };
    stream::publish(ctx.bus.as_ref(), STREAM_NEW_ALERTS, &summary).await?;

    ctx.notifier.notify(&alert).await?;
    info!(alert_id = %alert.id, title = %alert.title, "alert synthesized and notified");

    Ok(())
}
