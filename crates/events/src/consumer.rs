//! Long-running consumer for product batch messages.
//!
//! [`ProductConsumer`] pulls messages off a [`MessageSource`], decodes
//! payloads on the product topic as JSON arrays of create records, and
//! drives the bulk-insert engine. Per-message failures of any kind are
//! logged and contained; nothing a single message carries can stop the
//! loop.

use merx_db::models::CreateProduct;
use merx_db::repositories::ProductRepo;
use merx_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::bus::{BusError, BusMessage, MessageSource};

/// Topic carrying product batch payloads.
pub const PRODUCT_TOPIC: &str = "products";

/// Background service that ingests product batches from the bus.
pub struct ProductConsumer;

impl ProductConsumer {
    /// Run the consume loop until `cancel` fires or the source closes.
    ///
    /// With no cancellation ever issued this loops forever: the receive
    /// has no timeout, read errors are logged and skipped, and messages on
    /// other topics are read and discarded. A closed source means the bus
    /// sender was dropped, which only happens at process teardown.
    pub async fn run(pool: DbPool, mut source: impl MessageSource, cancel: CancellationToken) {
        tracing::info!(topic = PRODUCT_TOPIC, "Product consumer started");

        loop {
            let message = tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!("Cancellation requested, product consumer stopping");
                    break;
                }
                received = source.recv() => match received {
                    Ok(message) => message,
                    Err(BusError::Closed) => {
                        tracing::info!("Bus closed, product consumer shutting down");
                        break;
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "Consumer read error");
                        continue;
                    }
                },
            };

            if message.topic != PRODUCT_TOPIC {
                continue;
            }

            Self::process(&pool, &message).await;
        }
    }

    /// Decode and ingest one product batch message.
    ///
    /// Failures are contained here: a message that cannot be decoded or
    /// attempted is logged and dropped, with no retry and no dead-letter.
    async fn process(pool: &DbPool, message: &BusMessage) {
        tracing::info!(bytes = message.payload.len(), "Reading a products message");

        let batch: Vec<CreateProduct> = match serde_json::from_slice(&message.payload) {
            Ok(batch) => batch,
            Err(err) => {
                tracing::error!(
                    error = %err,
                    payload = %String::from_utf8_lossy(&message.payload),
                    "Failed to decode product batch, dropping message"
                );
                return;
            }
        };

        match ProductRepo::insert_many(pool, &batch).await {
            Ok(outcome) => {
                for reject in &outcome.rejects {
                    tracing::warn!(
                        index = reject.index,
                        field = %reject.field,
                        reason = %reject.reason,
                        "Store rejected product during bulk insert"
                    );
                }
                tracing::info!(
                    inserted = outcome.inserted_ids.len(),
                    rejected = outcome.rejects.len(),
                    "Product batch ingested"
                );
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    batch_len = batch.len(),
                    "Could not attempt product batch, dropping message"
                );
            }
        }
    }
}
