//! Sums provider charges over many orders, one status request per chunk.

use std::sync::Arc;

use brezora_provider::{ProviderClient, ProviderError};
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, error, info};
use rust_decimal::Decimal;

use super::earnings_model::{ChargeReport, FailedChunk};
use crate::constants::STATUS_CHUNK_SIZE;
use crate::errors::Result;

async fn fetch_chunk(
    provider: Arc<dyn ProviderClient>,
    index: usize,
    chunk: &[String],
) -> std::result::Result<Decimal, ProviderError> {
    debug!(
        "Requesting {} status chunk {} ({} orders)",
        provider.id(),
        index,
        chunk.len()
    );
    let batch = provider.order_statuses(chunk).await?;
    Ok(batch.total_charge())
}

/// Splits provider order ids into chunks of at most [`STATUS_CHUNK_SIZE`] and
/// asks the provider for each chunk's status records.
///
/// Chunks are requested in order, `concurrency` at a time (1 by default,
/// i.e. strictly one after another).
pub struct ChargeAggregator {
    provider: Arc<dyn ProviderClient>,
    chunk_size: usize,
    concurrency: usize,
}

impl ChargeAggregator {
    pub fn new(provider: Arc<dyn ProviderClient>) -> Self {
        Self {
            provider,
            chunk_size: STATUS_CHUNK_SIZE,
            concurrency: 1,
        }
    }

    /// Allows up to `concurrency` chunk requests in flight. Zero means one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn chunk_count(&self, order_count: usize) -> usize {
        order_count.div_ceil(self.chunk_size)
    }

    /// Owned copies of each chunk so the request futures borrow nothing.
    fn owned_chunks(&self, order_ids: &[String]) -> Vec<(usize, Vec<String>)> {
        order_ids
            .chunks(self.chunk_size)
            .map(<[String]>::to_vec)
            .enumerate()
            .collect()
    }

    /// Total charge across every chunk.
    ///
    /// All or nothing: the first failing chunk fails the whole call and no
    /// partial total is returned.
    pub async fn aggregate(&self, order_ids: &[String]) -> Result<Decimal> {
        if order_ids.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let total = stream::iter(self.owned_chunks(order_ids))
            .map(|(index, chunk)| {
                let provider = Arc::clone(&self.provider);
                async move { fetch_chunk(provider, index, &chunk).await }
            })
            .buffered(self.concurrency)
            .try_fold(Decimal::ZERO, |acc, charge| async move {
                Ok::<_, ProviderError>(acc + charge)
            })
            .await
            .inspect_err(|e| error!("Charge aggregation aborted: {}", e))?;

        info!(
            "Aggregated provider charges for {} orders in {} chunks: {}",
            order_ids.len(),
            self.chunk_count(order_ids.len()),
            total
        );
        Ok(total)
    }

    /// Like [`aggregate`](Self::aggregate) but keeps going past failed chunks
    /// and reports them alongside the total of the chunks that succeeded.
    pub async fn aggregate_report(&self, order_ids: &[String]) -> ChargeReport {
        let outcomes: Vec<_> = stream::iter(self.owned_chunks(order_ids))
            .map(|(index, chunk)| {
                let provider = Arc::clone(&self.provider);
                async move {
                    let outcome = fetch_chunk(provider, index, &chunk).await;
                    (index, chunk, outcome)
                }
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut report = ChargeReport {
            order_count: order_ids.len(),
            chunk_count: outcomes.len(),
            ..Default::default()
        };

        for (index, chunk, outcome) in outcomes {
            match outcome {
                Ok(charge) => report.total_charge += charge,
                Err(e) => {
                    error!("Status chunk {} ({} orders) failed: {}", index, chunk.len(), e);
                    report.failed_chunks.push(FailedChunk {
                        index,
                        first_order_id: chunk.first().cloned().unwrap_or_default(),
                        last_order_id: chunk.last().cloned().unwrap_or_default(),
                        size: chunk.len(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Charge report: {} over {} chunks, {} failed",
            report.total_charge,
            report.chunk_count,
            report.failed_chunks.len()
        );
        report
    }
}
