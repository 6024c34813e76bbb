//! Competing-consumer workers: one per pipeline stage (extract, score,
//! alert), each reading its stage's stream via a consumer group and
//! acking only on success or a permanently-malformed record — a
//! transient failure leaves the record pending for redelivery (spec §7).
//!
//! Grounded on [`crate::main`]'s `JoinSet` + `CancellationToken`
//! supervisor pattern, generalized from per-task `tokio::select!` loops
//! to a single reusable consumer loop every stage shares.

pub mod alert;
pub mod extract;
pub mod score;

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::catalog::CatalogHandle;
use crate::graph::GraphHandle;
use crate::llm::LlmClient;
use crate::notify::Notifier;
use crate::relevance::EmbeddingClient;
use crate::store::DocumentStore;
use crate::stream::{Record, StreamBus};

/// Records pulled per `read_group` call.
const BATCH_SIZE: usize = 10;
/// Block duration for a `read_group` call with nothing immediately ready.
const BLOCK_MS: u64 = 5_000;
/// Backoff after a `read_group` transport error, before retrying.
const ERROR_BACKOFF_MS: u64 = 2_000;

/// Shared handles every stage worker needs. Cloned cheaply (every field
/// is an `Arc` or an `ArcSwap` handle) so each stage's loop can own one.
#[derive(Clone)]
pub struct WorkerContext {
    pub bus: Arc<dyn StreamBus>,
    pub store: Arc<dyn DocumentStore>,
    pub catalog: CatalogHandle,
    pub graph: GraphHandle,
    pub llm: Arc<dyn LlmClient>,
    pub embeddings: Arc<dyn EmbeddingClient>,
    pub notifier: Arc<dyn Notifier>,
    pub relevance_threshold: f64,
    pub alert_threshold: f64,
    pub propagation_threshold: f64,
}

/// Runs `handle` over every record delivered to `consumer` in `group` on
/// `stream` until `cancel` fires. `handle` returning `Ok(())` or an error
/// where [`crate::errors::PipelineError::should_ack`] is true acks the
/// record; a transient error leaves it pending for redelivery.
pub async fn run_consumer_loop<F, Fut>(
    bus: Arc<dyn StreamBus>,
    stream: &'static str,
    group: &'static str,
    consumer: String,
    cancel: CancellationToken,
    mut handle: F,
) where
    F: FnMut(Record) -> Fut,
    Fut: Future<Output = crate::errors::Result<()>>,
{
    if let Err(e) = bus.ensure_group(stream, group).await {
        error!(stream, group, error = %e, "failed to ensure consumer group, worker exiting");
        return;
    }

    loop {
        if cancel.is_cancelled() {
            return;
        }

        let records = tokio::select! {
            _ = cancel.cancelled() => return,
            result = bus.read_group(stream, group, &consumer, BATCH_SIZE, BLOCK_MS) => result,
        };

        let records = match records {
            Ok(records) => records,
            Err(e) => {
                warn!(stream, group, error = %e, "read_group failed, backing off");
                tokio::time::sleep(std::time::Duration::from_millis(ERROR_BACKOFF_MS)).await;
                continue;
            }
        };

        for record in records {
            let id = record.id.clone();
            match handle(record).await {
                Ok(()) => {
                    if let Err(e) = bus.ack(stream, group, &id).await {
                        warn!(stream, group, record_id = %id, error = %e, "failed to ack record");
                    }
                }
                Err(e) => {
                    if e.should_ack() {
                        warn!(stream, group, record_id = %id, error = %e, "dropping malformed record");
                        if let Err(ack_err) = bus.ack(stream, group, &id).await {
                            warn!(stream, group, record_id = %id, error = %ack_err, "failed to ack dropped record");
                        }
                    } else {
                        warn!(stream, group, record_id = %id, error = %e, "transient failure, leaving record pending");
                    }
                }
            }
        }
    }
}
