use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::db::{self, PgPool};

use super::{service::translate_and_store, TranslationProvider, TranslationStatus};

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub queue_capacity: usize,
    pub max_attempts: u32,
    pub base_backoff: Duration,
    pub provider_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            max_attempts: 3,
            base_backoff: Duration::from_millis(500),
            provider_timeout: Duration::from_secs(20),
        }
    }
}

/// Exponential backoff between attempts, capped at 5s. `attempt` is the
/// number of failures so far.
fn backoff_delay(config: &WorkerConfig, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.min(8));
    (config.base_backoff * factor).min(Duration::from_secs(5))
}

/// Fire-and-forget handle for requesting a background translation. Dropping
/// a request on a full queue is acceptable: translation is at-least-once and
/// any Arabic read of the posting will translate it on demand.
#[derive(Clone)]
pub struct TranslationTrigger {
    tx: mpsc::Sender<i64>,
}

impl TranslationTrigger {
    pub fn request(&self, job_id: i64) {
        match self.tx.try_send(job_id) {
            Ok(()) => debug!(job_id, "queued background translation"),
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(job_id, "translation queue full; dropping trigger");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(job_id, "translation worker stopped; dropping trigger");
            }
        }
    }

    #[cfg(test)]
    fn with_capacity(capacity: usize) -> (Self, mpsc::Receiver<i64>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

/// Spawn the detached translation worker and return its trigger handle. The
/// task owns its own pool/provider handles and is never tied to a request's
/// cancellation; failures stay on this task's error channel (the log).
pub fn spawn_translation_worker(
    pool: PgPool,
    provider: Arc<dyn TranslationProvider>,
    config: WorkerConfig,
) -> TranslationTrigger {
    let (tx, rx) = mpsc::channel(config.queue_capacity);
    tokio::spawn(run_worker(rx, pool, provider, config));
    TranslationTrigger { tx }
}

async fn run_worker(
    mut rx: mpsc::Receiver<i64>,
    pool: PgPool,
    provider: Arc<dyn TranslationProvider>,
    config: WorkerConfig,
) {
    info!(
        queue_capacity = config.queue_capacity,
        max_attempts = config.max_attempts,
        "translation worker started"
    );

    while let Some(job_id) = rx.recv().await {
        if let Err(err) = process_job(&pool, provider.as_ref(), &config, job_id).await {
            // Dead-letter path: the job stays `pending` and is logged here;
            // the next Arabic read retries it on demand.
            error!(job_id, error = %err, "translation dead-lettered after retries");
        }
    }

    info!("translation worker stopped");
}

async fn process_job(
    pool: &PgPool,
    provider: &dyn TranslationProvider,
    config: &WorkerConfig,
    job_id: i64,
) -> Result<(), super::TranslationError> {
    let posting = match db::postings::fetch_posting(pool, job_id).await {
        Ok(Some(posting)) => posting,
        Ok(None) => {
            warn!(job_id, "translation requested for unknown posting");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    // Repeated triggers for an already-translated posting are no-ops.
    if posting.translation_status == TranslationStatus::Completed {
        debug!(job_id, "posting already translated; skipping");
        return Ok(());
    }

    let mut last_error = None;
    for attempt in 0..config.max_attempts {
        if attempt > 0 {
            tokio::time::sleep(backoff_delay(config, attempt - 1)).await;
        }

        match translate_and_store(pool, provider, &posting, config.provider_timeout).await {
            Ok(()) => {
                info!(job_id, attempt, "background translation completed");
                return Ok(());
            }
            Err(err) => {
                warn!(job_id, attempt, error = %err, "background translation attempt failed");
                last_error = Some(err);
            }
        }
    }

    Err(last_error.unwrap_or(super::TranslationError::Disabled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_and_caps() {
        let config = WorkerConfig::default();
        assert_eq!(backoff_delay(&config, 0), Duration::from_millis(500));
        assert_eq!(backoff_delay(&config, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(&config, 2), Duration::from_secs(2));
        assert_eq!(backoff_delay(&config, 10), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn trigger_is_lossy_when_the_queue_is_full() {
        let (trigger, mut rx) = TranslationTrigger::with_capacity(1);

        trigger.request(1);
        trigger.request(2); // dropped, must not panic or block

        assert_eq!(rx.recv().await, Some(1));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn trigger_survives_a_stopped_worker() {
        let (trigger, rx) = TranslationTrigger::with_capacity(1);
        drop(rx);

        // Closed channel: the request is dropped silently.
        trigger.request(42);
    }
}
