//! Extract stage: consumes `normalized_events`, runs the RelevanceFilter
//! gate then the RiskExtractor, and publishes risk skeletons to
//! `risk_entities` (spec §4.4/§4.5).

use std::collections::HashMap;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Article, RiskEvent, ScoreComponents, SeverityBand};
use crate::errors::Result;
use crate::relevance::{build_company_keywords, RelevanceFilter};
use crate::risk_extraction::{Extraction, RiskExtractor};
use crate::stream::{self, Record, GROUP_RISK_EXTRACTION, STREAM_NORMALIZED_EVENTS, STREAM_RISK_ENTITIES};

use super::WorkerContext;

/// Run the extract stage loop until `cancel` fires.
pub async fn run(ctx: WorkerContext, consumer: String, cancel: CancellationToken) {
    let relevance = RelevanceFilter::new(ctx.embeddings.clone(), ctx.relevance_threshold);
    let extractor = RiskExtractor::new(ctx.llm.clone());

    super::run_consumer_loop(
        ctx.bus.clone(),
        STREAM_NORMALIZED_EVENTS,
        GROUP_RISK_EXTRACTION,
        consumer,
        cancel,
        move |record| {
            let ctx = ctx.clone();
            handle_record(ctx, &relevance, &extractor, record)
        },
    )
    .await;
}

async fn handle_record(
    ctx: WorkerContext,
    relevance: &RelevanceFilter<Arc<dyn crate::relevance::EmbeddingClient>>,
    extractor: &RiskExtractor<Arc<dyn crate::llm::LlmClient>>,
    record: Record,
) -> Result<()> {
    let article: Article = record.decode()?;
    let company = crate::config::get();
    let catalog = ctx.catalog.current();

    let keywords = build_company_keywords(&company, &catalog.all().iter().collect::<Vec<_>>());
    let (is_relevant, score) = relevance.is_relevant(&article, &keywords).await;

    if !is_relevant {
        info!(event_id = %article.event_id, score, "article not relevant, marking processed");
        ctx.store.mark_article_processed(article.event_id, None).await?;
        return Ok(());
    }

    match extractor.extract(&article, &company, &catalog).await? {
        Extraction::NotRisk => {
            ctx.store.mark_article_processed(article.event_id, None).await?;
        }
        Extraction::Risk(fields) if fields.affected_supply_chain_nodes.is_empty() => {
            warn!(
                event_id = %article.event_id,
                "risk extraction resolved no known supplier, discarding event"
            );
            ctx.store.mark_article_processed(article.event_id, None).await?;
        }
        Extraction::Risk(fields) => {
            let event = RiskEvent {
                id: Uuid::new_v4(),
                article_id: article.event_id,
                company_id: company.company_id.clone(),
                timestamp: article.timestamp,
                risk_type: fields.risk_type,
                affected_entities: fields.affected_entities,
                affected_supply_chain_nodes: fields.affected_supply_chain_nodes,
                severity: fields.severity,
                is_confirmed: fields.is_confirmed,
                time_horizon: fields.time_horizon,
                reasoning: fields.reasoning,
                recommended_action: fields.recommended_action,
                risk_score_components: ScoreComponents::zeroed(),
                risk_score: 0.0,
                severity_band: SeverityBand::Low,
                propagation: HashMap::new(),
            };

            ctx.store.upsert_risk_event(&event).await?;
            stream::publish(ctx.bus.as_ref(), STREAM_RISK_ENTITIES, &event).await?;
            ctx.store
                .mark_article_processed(article.event_id, Some(event.id))
                .await?;
        }
    }

    Ok(())
}
