//! Score stage: consumes `risk_entities`, runs the Scorer and Propagator,
//! and publishes the scored event to `risk_scores` (spec §4.6/§4.7).

use tokio_util::sync::CancellationToken;

use crate::domain::RiskEvent;
use crate::errors::Result;
use crate::graph::propagator;
use crate::scoring;
use crate::stream::{self, Record, GROUP_RISK_SCORING, STREAM_RISK_ENTITIES, STREAM_RISK_SCORES};

use super::WorkerContext;

pub async fn run(ctx: WorkerContext, consumer: String, cancel: CancellationToken) {
    super::run_consumer_loop(
        ctx.bus.clone(),
        STREAM_RISK_ENTITIES,
        GROUP_RISK_SCORING,
        consumer,
        cancel,
        move |record| handle_record(ctx.clone(), record),
    )
    .await;
}

async fn handle_record(ctx: WorkerContext, record: Record) -> Result<()> {
    let mut event: RiskEvent = record.decode()?;
    let company = crate::config::get();
    let catalog = ctx.catalog.current();

    let scored = scoring::score_event(
        &mut event,
        &catalog,
        |material| company.material_criticality(material),
        |material| company.inventory_days(material),
    );

    if scored.is_none() {
        tracing::warn!(
            risk_event_id = %event.id,
            "could not resolve primary affected supplier, leaving event unscored"
        );
        ctx.store.upsert_risk_event(&event).await?;
        return Ok(());
    }

    let graph = ctx.graph.current();
    if let Some(origin_name) = event.affected_supply_chain_nodes.first() {
        if let Some(origin) = catalog.find_by_name(origin_name) {
            event.propagation = propagator::propagate(
                &graph,
                &origin.id,
                event.risk_score,
                ctx.propagation_threshold,
            );
        }
    }

    ctx.store.upsert_risk_event(&event).await?;
    stream::publish(ctx.bus.as_ref(), STREAM_RISK_SCORES, &event).await?;
    Ok(())
}
