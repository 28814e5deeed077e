//! Concurrent fan-out of describe calls
//!
//! [`FanOut::run`] spawns one task per [`Batch`]. Every task calls the
//! describer once and pushes its classified lines into a shared channel,
//! followed by exactly one completion event for the batch. The consumer side,
//! [`StatusStream`], counts outstanding *batches*, so a batch that fails
//! outright can never leave the consumer waiting for lines that will not
//! arrive.
//!
//! ## Ordering
//!
//! Lines from different batches interleave arbitrarily. Within one batch the
//! failures come first, then the services, in the order the describer
//! returned them.
//!
//! ## Cancellation
//!
//! All tasks share one [`CancellationToken`]. Cancelling it stops tasks that
//! have not called the describer yet, abandons calls in flight, and makes
//! [`StatusStream::next`] return `Ok(None)` with the summary marked partial.
//! A fatal [`DescribeError`] cancels the token itself.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::classify::{classify, classify_failure};
use crate::error::{DescribeError, RunError};
use crate::partition::Batch;
use crate::traits::ServiceDescriber;
use crate::types::StatusLine;

/// Deadline for a single describe call when none is configured
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// Buffer between the batch tasks and the consumer
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Events sent from batch tasks to the stream
#[derive(Debug)]
enum BatchEvent {
    /// One classified line
    Line(StatusLine),
    /// The batch delivered all of its lines
    Done { batch: usize, lines: usize },
    /// The describe call failed
    Failed {
        batch: usize,
        services: usize,
        error: DescribeError,
    },
    /// The batch was abandoned because the run was cancelled
    Cancelled { batch: usize },
}

/// Item yielded by [`StatusStream::next`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// A classified status line
    Line(StatusLine),
    /// A batch failed with a non-fatal error and contributes no lines
    BatchError {
        batch: usize,
        services: usize,
        error: DescribeError,
    },
}

/// Issues describe calls for many batches concurrently
pub struct FanOut<D> {
    describer: Arc<D>,
    call_timeout: Duration,
    cancel: CancellationToken,
}

impl<D: ServiceDescriber + 'static> FanOut<D> {
    /// Create a fan-out over `describer` with the default call deadline
    pub fn new(describer: Arc<D>) -> Self {
        Self {
            describer,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }

    /// Set the deadline for each describe call
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Use an externally owned cancellation token
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The token shared by every task of this fan-out
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Start one task per batch and return the stream of their results.
    ///
    /// Must be called from within a tokio runtime.
    pub fn run(&self, cluster: &str, batches: Vec<Batch>) -> StatusStream {
        let expected = batches.iter().map(Batch::len).sum();
        let pending = batches.len();
        let cluster: Arc<str> = Arc::from(cluster);
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        tracing::debug!(
            cluster = %cluster,
            batches = pending,
            services = expected,
            "Starting fan-out"
        );

        for (index, batch) in batches.into_iter().enumerate() {
            tokio::spawn(describe_batch(
                Arc::clone(&self.describer),
                Arc::clone(&cluster),
                index,
                batch,
                self.call_timeout,
                self.cancel.clone(),
                tx.clone(),
            ));
        }

        StatusStream {
            rx,
            cancel: self.cancel.clone(),
            pending,
            expected,
            reported: 0,
            failed_batches: 0,
            cancelled: false,
        }
    }
}

async fn describe_batch<D: ServiceDescriber>(
    describer: Arc<D>,
    cluster: Arc<str>,
    index: usize,
    batch: Batch,
    call_timeout: Duration,
    cancel: CancellationToken,
    tx: mpsc::Sender<BatchEvent>,
) {
    if cancel.is_cancelled() {
        let _ = tx.send(BatchEvent::Cancelled { batch: index }).await;
        return;
    }

    tracing::debug!(batch = index, services = batch.len(), "Describing batch");

    let outcome = tokio::select! {
        _ = cancel.cancelled() => {
            tracing::debug!(batch = index, "Batch abandoned, run cancelled");
            let _ = tx.send(BatchEvent::Cancelled { batch: index }).await;
            return;
        }
        result = tokio::time::timeout(call_timeout, describer.describe(&cluster, &batch)) => {
            result.unwrap_or_else(|_| Err(DescribeError::Timeout(call_timeout)))
        }
    };

    let result = match outcome {
        Ok(result) => result,
        Err(error) => {
            let _ = tx
                .send(BatchEvent::Failed {
                    batch: index,
                    services: batch.len(),
                    error,
                })
                .await;
            return;
        }
    };

    let lines = result
        .failures
        .iter()
        .map(classify_failure)
        .chain(result.services.iter().map(classify));

    let mut sent = 0;
    for line in lines {
        if tx.send(BatchEvent::Line(line)).await.is_err() {
            // Consumer is gone
            return;
        }
        sent += 1;
    }

    let _ = tx
        .send(BatchEvent::Done {
            batch: index,
            lines: sent,
        })
        .await;
}

/// Consumer side of a fan-out run. Finite and not restartable.
pub struct StatusStream {
    rx: mpsc::Receiver<BatchEvent>,
    cancel: CancellationToken,
    /// Batches that have not signalled completion yet
    pending: usize,
    expected: usize,
    reported: usize,
    failed_batches: usize,
    cancelled: bool,
}

impl StatusStream {
    /// Wait for the next line or batch error.
    ///
    /// Returns `Ok(None)` once every batch has finished, when the run is
    /// cancelled, or if the batch tasks went away without reporting. A fatal
    /// describer error cancels the remaining batches and is returned as
    /// `Err` straight away.
    pub async fn next(&mut self) -> Result<Option<Progress>, RunError> {
        loop {
            if self.pending == 0 {
                return Ok(None);
            }

            let event = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::debug!(outstanding = self.pending, "Run cancelled");
                    self.cancelled = true;
                    self.pending = 0;
                    return Ok(None);
                }
                event = self.rx.recv() => event,
            };

            match event {
                Some(BatchEvent::Line(line)) => {
                    self.reported += 1;
                    return Ok(Some(Progress::Line(line)));
                }
                Some(BatchEvent::Done { batch, lines }) => {
                    tracing::debug!(batch, lines, "Batch complete");
                    self.pending -= 1;
                }
                Some(BatchEvent::Cancelled { .. }) => {
                    self.cancelled = true;
                    self.pending -= 1;
                }
                Some(BatchEvent::Failed {
                    batch,
                    services,
                    error,
                }) => {
                    self.pending -= 1;
                    self.failed_batches += 1;

                    if error.is_fatal() {
                        tracing::error!(batch, error = %error, "Fatal describe error, cancelling run");
                        self.cancel.cancel();
                        self.pending = 0;
                        return Err(RunError::Fatal { batch, error });
                    }

                    tracing::warn!(batch, services, error = %error, "Batch failed");
                    return Ok(Some(Progress::BatchError {
                        batch,
                        services,
                        error,
                    }));
                }
                None => {
                    tracing::warn!(
                        outstanding = self.pending,
                        "Batch tasks ended without reporting"
                    );
                    self.pending = 0;
                    return Ok(None);
                }
            }
        }
    }

    /// Counts gathered so far
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            expected: self.expected,
            reported: self.reported,
            failed_batches: self.failed_batches,
            cancelled: self.cancelled,
        }
    }
}

/// Outcome of a fan-out run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Services that were asked for
    pub expected: usize,
    /// Lines that were delivered
    pub reported: usize,
    /// Batches whose describe call failed
    pub failed_batches: usize,
    /// Whether the run was cut short by cancellation
    pub cancelled: bool,
}

impl RunSummary {
    /// Services that were asked for but never reported
    pub fn missing(&self) -> usize {
        self.expected.saturating_sub(self.reported)
    }

    /// Whether every service was accounted for
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.missing() == 0
    }
}
