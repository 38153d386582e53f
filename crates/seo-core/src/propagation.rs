//! Change propagation
//!
//! Decouples "a setting changed" from "regenerate what depends on it":
//! - [`ChangePropagator`] enqueues a [`GenerationTypeChange`] without blocking
//! - [`RegenerationWorker`] drains the queue in its own task and hands each
//!   change to a [`RegenerationPipeline`], redelivering on failure
//!
//! Delivery is at-least-once. Failures are logged and never reach the caller
//! of the command that produced the change.

use crate::config::CoreConfig;
use crate::error::{PipelineError, PropagationError};
use async_trait::async_trait;
use parking_lot::Mutex;
use seo_settings::{PageId, SentenceGenerationType, SentenceType};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

/// A committed change of one page's generation strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTypeChange {
    /// Affected page
    pub page_id: PageId,
    /// Sentence category whose strategy changed
    pub sentence_type: SentenceType,
    /// Effective strategy before the change
    pub old: SentenceGenerationType,
    /// Strategy now stored on the page
    pub new: SentenceGenerationType,
}

impl GenerationTypeChange {
    /// Create change description
    #[inline]
    #[must_use]
    pub fn new(
        page_id: PageId,
        sentence_type: SentenceType,
        old: SentenceGenerationType,
        new: SentenceGenerationType,
    ) -> Self {
        Self {
            page_id,
            sentence_type,
            old,
            new,
        }
    }

    /// True when the strategy did not actually change
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }
}

/// Non-blocking producer side of the change queue
#[derive(Debug, Clone)]
pub struct ChangePropagator {
    sender: mpsc::Sender<GenerationTypeChange>,
}

impl ChangePropagator {
    /// Create propagator and the receiver a worker should drain
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<GenerationTypeChange>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Create from configuration
    #[inline]
    #[must_use]
    pub fn from_config(config: &CoreConfig) -> (Self, mpsc::Receiver<GenerationTypeChange>) {
        Self::new(config.propagation_queue_capacity)
    }

    /// Enqueue a change and return immediately
    ///
    /// # Errors
    /// - `PropagationError::QueueFull` if the queue is at capacity
    /// - `PropagationError::Closed` if no worker is listening
    pub fn on_change(&self, change: GenerationTypeChange) -> Result<(), PropagationError> {
        self.sender.try_send(change).map_err(|e| match e {
            TrySendError::Full(_) => PropagationError::QueueFull,
            TrySendError::Closed(_) => PropagationError::Closed,
        })
    }
}

/// External content-generation pipeline
///
/// Receiving the same change twice must be harmless.
#[async_trait]
pub trait RegenerationPipeline: Send + Sync {
    /// Schedule recomputation of everything depending on `change`
    async fn regenerate(&self, change: &GenerationTypeChange) -> Result<(), PipelineError>;
}

/// Pipeline that only logs, used by the demo binary
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPipeline;

#[async_trait]
impl RegenerationPipeline for TracingPipeline {
    async fn regenerate(&self, change: &GenerationTypeChange) -> Result<(), PipelineError> {
        tracing::info!(
            page_id = %change.page_id,
            sentence_type = %change.sentence_type,
            old = %change.old,
            new = %change.new,
            "regeneration scheduled"
        );
        Ok(())
    }
}

/// Redelivery policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryPolicy {
    /// Attempts per change, at least 1
    pub max_attempts: u32,
    /// Base delay, multiplied by the attempt number
    pub backoff: Duration,
}

impl DeliveryPolicy {
    /// Create policy
    #[inline]
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self::from(&CoreConfig::default())
    }
}

impl From<&CoreConfig> for DeliveryPolicy {
    fn from(config: &CoreConfig) -> Self {
        Self::new(config.max_delivery_attempts, config.retry_backoff())
    }
}

/// Worker statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Changes the pipeline accepted
    pub delivered: u64,
    /// Changes dropped after the last attempt failed
    pub failed: u64,
    /// Redeliveries performed
    pub retried: u64,
}

/// Consumer side of the change queue
pub struct RegenerationWorker {
    pipeline: Arc<dyn RegenerationPipeline>,
    policy: DeliveryPolicy,
    stats: Arc<Mutex<WorkerStats>>,
}

impl std::fmt::Debug for RegenerationWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegenerationWorker")
            .field("policy", &self.policy)
            .field("stats", &*self.stats.lock())
            .finish_non_exhaustive()
    }
}

impl RegenerationWorker {
    /// Create worker
    #[must_use]
    pub fn new(pipeline: Arc<dyn RegenerationPipeline>, policy: DeliveryPolicy) -> Self {
        Self {
            pipeline,
            policy,
            stats: Arc::new(Mutex::new(WorkerStats::default())),
        }
    }

    /// Current statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> WorkerStats {
        *self.stats.lock()
    }

    /// Drain `receiver` in a background task
    ///
    /// The task ends once every [`ChangePropagator`] clone has been dropped and
    /// the queue is empty; it yields the final statistics.
    #[must_use]
    pub fn spawn(
        self,
        mut receiver: mpsc::Receiver<GenerationTypeChange>,
    ) -> JoinHandle<WorkerStats> {
        tokio::spawn(async move {
            while let Some(change) = receiver.recv().await {
                self.deliver(&change).await;
            }
            tracing::debug!(stats = ?self.stats(), "propagation queue closed");
            self.stats()
        })
    }

    /// Deliver one change, retrying per policy
    pub async fn deliver(&self, change: &GenerationTypeChange) {
        let mut attempt = 1;
        loop {
            match self.pipeline.regenerate(change).await {
                Ok(()) => {
                    self.stats.lock().delivered += 1;
                    tracing::debug!(page_id = %change.page_id, attempt, "change delivered");
                    return;
                }
                Err(e) if attempt < self.policy.max_attempts => {
                    self.stats.lock().retried += 1;
                    tracing::warn!(
                        page_id = %change.page_id,
                        attempt,
                        error = %e,
                        "delivery failed, retrying"
                    );
                    tokio::time::sleep(self.policy.backoff * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    self.stats.lock().failed += 1;
                    tracing::error!(
                        page_id = %change.page_id,
                        sentence_type = %change.sentence_type,
                        attempts = attempt,
                        error = %e,
                        "regeneration dropped"
                    );
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn change() -> GenerationTypeChange {
        GenerationTypeChange::new(
            PageId::new(),
            SentenceType::Title,
            SentenceGenerationType::Auto,
            SentenceGenerationType::Manual,
        )
    }

    /// Fails the first `failures` deliveries
    struct FlakyPipeline {
        failures: u32,
        calls: AtomicU32,
    }

    #[async_trait]
    impl RegenerationPipeline for FlakyPipeline {
        async fn regenerate(&self, _change: &GenerationTypeChange) -> Result<(), PipelineError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(PipelineError("busy".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn flaky(failures: u32) -> Arc<FlakyPipeline> {
        Arc::new(FlakyPipeline {
            failures,
            calls: AtomicU32::new(0),
        })
    }

    #[test]
    fn on_change_does_not_block_and_reports_full_queue() {
        let (propagator, mut rx) = ChangePropagator::new(1);

        assert!(propagator.on_change(change()).is_ok());
        assert_eq!(propagator.on_change(change()), Err(PropagationError::QueueFull));

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn on_change_reports_closed_queue() {
        let (propagator, rx) = ChangePropagator::new(4);
        drop(rx);
        assert_eq!(propagator.on_change(change()), Err(PropagationError::Closed));
    }

    #[test]
    fn noop_detection() {
        let mut c = change();
        assert!(!c.is_noop());
        c.new = c.old;
        assert!(c.is_noop());
    }

    #[tokio::test]
    async fn worker_retries_until_delivered() {
        let pipeline = flaky(2);
        let worker =
            RegenerationWorker::new(pipeline.clone(), DeliveryPolicy::new(3, Duration::ZERO));

        worker.deliver(&change()).await;

        assert_eq!(
            worker.stats(),
            WorkerStats {
                delivered: 1,
                failed: 0,
                retried: 2
            }
        );
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn worker_gives_up_after_max_attempts() {
        let pipeline = flaky(u32::MAX);
        let worker =
            RegenerationWorker::new(pipeline.clone(), DeliveryPolicy::new(2, Duration::ZERO));

        worker.deliver(&change()).await;

        assert_eq!(worker.stats().failed, 1);
        assert_eq!(worker.stats().delivered, 0);
        assert_eq!(pipeline.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn spawned_worker_drains_queue_and_exits() {
        let (propagator, rx) = ChangePropagator::new(8);
        let handle = RegenerationWorker::new(flaky(0), DeliveryPolicy::default()).spawn(rx);

        for _ in 0..3 {
            propagator.on_change(change()).unwrap();
        }
        drop(propagator);

        let stats = handle.await.unwrap();
        assert_eq!(stats.delivered, 3);
    }

    #[test]
    fn policy_from_config() {
        let config = CoreConfig::new()
            .with_max_delivery_attempts(7)
            .with_retry_backoff(Duration::from_millis(5));
        let policy = DeliveryPolicy::from(&config);
        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.backoff, Duration::from_millis(5));
        assert_eq!(DeliveryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }
}
