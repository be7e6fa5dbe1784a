//! Bounded polling of generation tasks.
//!
//! A task is fetched once per attempt. Non-terminal statuses wait one
//! interval and try again, up to `max_attempts` fetches. There is no wait
//! after the final fetch, so the worst-case wall time is
//! `interval * (max_attempts - 1)` plus request latency.

use std::time::Duration;

use async_trait::async_trait;
use picto_core::{GeneratedIcon, GenerationTask, TaskStatus};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::error::ApiError;

/// Default delay between status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Default number of status fetches.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Failure reason used when upstream gives none.
const UNKNOWN_FAILURE: &str = "Unknown error";

// ============================================================================
// Poll Policy
// ============================================================================

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between status fetches.
    pub interval: Duration,
    /// Maximum number of status fetches.
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Creates a policy.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Sets the attempt budget.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Upper bound on time spent waiting between fetches.
    ///
    /// This is `interval * (max_attempts - 1)`, one interval less than
    /// `interval * max_attempts`: the poller gives up right after the last
    /// non-terminal fetch instead of sleeping once more. With the default
    /// policy that is 58 s rather than 60 s.
    pub fn total_wait_bound(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}

// ============================================================================
// Status Source
// ============================================================================

/// Anything that can report the current state of a generation task.
#[async_trait]
pub trait TaskStatusSource: Send + Sync {
    /// Fetches the task's current state.
    async fn task_status(&self, task_id: &str) -> Result<GenerationTask, ApiError>;
}

// ============================================================================
// Poll Loop
// ============================================================================

/// Polls a task until it completes, fails, runs out of attempts, or is
/// cancelled.
///
/// Errors from the status source end polling immediately.
#[instrument(skip(source, policy, cancel), fields(task_id = %task_id, max_attempts = policy.max_attempts))]
pub async fn poll_until_complete<S>(
    source: &S,
    task_id: &str,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<GeneratedIcon, ApiError>
where
    S: TaskStatusSource + ?Sized,
{
    for attempt in 1..=policy.max_attempts {
        let task = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(ApiError::Cancelled),
            result = source.task_status(task_id) => result?,
        };
        debug!(attempt, status = %task.status, "Polled generation task");

        match task.status {
            TaskStatus::Completed => return into_generated(task),
            TaskStatus::Failed => {
                return Err(ApiError::GenerationFailed {
                    reason: task
                        .error
                        .filter(|e| !e.is_empty())
                        .unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
                });
            }
            TaskStatus::Pending | TaskStatus::Processing => {}
        }

        if attempt < policy.max_attempts {
            tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(ApiError::Cancelled),
                () = tokio::time::sleep(policy.interval) => {}
            }
        }
    }

    warn!(attempts = policy.max_attempts, "Generation did not finish in time");
    Err(ApiError::GenerationTimeout {
        attempts: policy.max_attempts,
    })
}

fn into_generated(task: GenerationTask) -> Result<GeneratedIcon, ApiError> {
    let outcome = task.outcome();
    let url = outcome
        .url()
        .map(str::to_string)
        .ok_or(ApiError::EmptyGenerationResult)?;

    Ok(GeneratedIcon {
        task_id: task.task_id,
        url,
        outcome,
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    /// Replays scripted responses, then reports `processing` forever.
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<GenerationTask, ApiError>>>,
        calls: AtomicU32,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<GenerationTask, ApiError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TaskStatusSource for ScriptedSource {
        async fn task_status(&self, task_id: &str) -> Result<GenerationTask, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Ok(GenerationTask::new(task_id, TaskStatus::Processing)))
        }
    }

    fn processing() -> Result<GenerationTask, ApiError> {
        Ok(GenerationTask::new("T1", TaskStatus::Processing))
    }

    fn completed(url: &str) -> Result<GenerationTask, ApiError> {
        let mut task = GenerationTask::new("T1", TaskStatus::Completed);
        task.icon_url = Some(url.to_string());
        Ok(task)
    }

    #[tokio::test(start_paused = true)]
    async fn test_completes_after_processing() {
        let source = ScriptedSource::new(vec![
            processing(),
            processing(),
            completed("https://x/icon.png"),
        ]);
        let policy = PollPolicy::new(Duration::from_millis(2000), 30);

        let icon = poll_until_complete(&source, "T1", &policy, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(icon.url, "https://x/icon.png");
        assert_eq!(icon.task_id, "T1");
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_uses_exact_budget() {
        let source = ScriptedSource::new(vec![]);
        let policy = PollPolicy::new(Duration::from_millis(2000), 5);
        let start = Instant::now();

        let err = poll_until_complete(&source, "T1", &policy, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::GenerationTimeout { attempts: 5 }));
        assert_eq!(source.calls(), 5);
        // No sleep after the final fetch.
        assert_eq!(start.elapsed(), policy.total_wait_bound());
        assert_eq!(policy.total_wait_bound(), Duration::from_millis(8000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_aborts_with_reason() {
        let mut failed = GenerationTask::new("T1", TaskStatus::Failed);
        failed.error = Some("prompt rejected".to_string());
        let source = ScriptedSource::new(vec![processing(), Ok(failed)]);

        let err = poll_until_complete(
            &source,
            "T1",
            &PollPolicy::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::GenerationFailed { reason } if reason == "prompt rejected"));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_without_reason() {
        let source = ScriptedSource::new(vec![Ok(GenerationTask::new("T1", TaskStatus::Failed))]);

        let err = poll_until_complete(
            &source,
            "T1",
            &PollPolicy::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::GenerationFailed { reason } if reason == "Unknown error"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_without_result() {
        let source = ScriptedSource::new(vec![Ok(GenerationTask::new("T1", TaskStatus::Completed))]);

        let err = poll_until_complete(
            &source,
            "T1",
            &PollPolicy::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::EmptyGenerationResult));
    }

    #[tokio::test(start_paused = true)]
    async fn test_candidate_list_used_when_no_direct_url() {
        let mut task = GenerationTask::new("T1", TaskStatus::Completed);
        task.generated = vec!["https://x/a.png".to_string(), "https://x/b.png".to_string()];
        let source = ScriptedSource::new(vec![Ok(task)]);

        let icon = poll_until_complete(
            &source,
            "T1",
            &PollPolicy::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(icon.url, "https://x/a.png");
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_error_stops_polling() {
        let source = ScriptedSource::new(vec![processing(), Err(ApiError::InvalidCredential)]);

        let err = poll_until_complete(
            &source,
            "T1",
            &PollPolicy::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::InvalidCredential));
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_start() {
        let source = ScriptedSource::new(vec![]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = poll_until_complete(&source, "T1", &PollPolicy::default(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Cancelled));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_wait() {
        let source = ScriptedSource::new(vec![]);
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5000)).await;
            trigger.cancel();
        });

        let err = poll_until_complete(&source, "T1", &PollPolicy::default(), &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Cancelled));
        // Fetches at 0s, 2s and 4s; cancelled while waiting for 6s.
        assert_eq!(source.calls(), 3);
    }

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_millis(2000));
        assert_eq!(policy.max_attempts, 30);
        assert_eq!(policy.total_wait_bound(), Duration::from_secs(58));
    }
}
