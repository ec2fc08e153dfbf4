use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::Instant;

/// Delay between two checks of the same condition.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// The state an element can be waited into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementState {
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl ElementState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Attached => "attached",
            Self::Detached => "detached",
        }
    }
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single poll: the condition held before the deadline, or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Ready { elapsed: Duration },
    TimedOut { elapsed: Duration },
}

impl PollOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Ready { elapsed } | Self::TimedOut { elapsed } => *elapsed,
        }
    }
}

/// Re-run `check` every [`POLL_INTERVAL`] until it yields `Ok(true)` or `timeout` elapses.
///
/// A check that errors counts as "not yet". Each check is bounded by the time
/// left, so a slow or hung CDP call cannot hold the loop past the deadline;
/// the check that lands exactly on the deadline only counts if it resolves on
/// its first poll. A zero timeout performs exactly one check, bounded by
/// [`POLL_INTERVAL`].
pub async fn poll_until<F, Fut>(timeout: Duration, mut check: F) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();
    let deadline = start + timeout;

    loop {
        let budget = if timeout.is_zero() {
            POLL_INTERVAL
        } else {
            deadline.saturating_duration_since(Instant::now())
        };

        let satisfied = match tokio::time::timeout(budget, check()).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                tracing::trace!("poll check failed: {:#}", e);
                false
            }
            Err(_) => false,
        };

        if satisfied {
            return PollOutcome::Ready { elapsed: start.elapsed() };
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return PollOutcome::TimedOut { elapsed: start.elapsed() };
        }
        tokio::time::sleep(POLL_INTERVAL.min(remaining)).await;
    }
}

/// Something that can report the live state of one element.
///
/// [`crate::locator::Locator`] is the browser-backed implementation; the
/// readiness helpers only ever talk to this trait.
#[async_trait]
pub trait ElementProbe: Send + Sync {
    /// Human readable description used in error messages.
    fn description(&self) -> String;

    async fn is_visible(&self) -> Result<bool>;

    async fn is_enabled(&self) -> Result<bool>;

    async fn is_attached(&self) -> Result<bool>;

    /// Poll until the element reaches `state`.
    async fn wait_for(&self, state: ElementState, timeout: Duration) -> PollOutcome {
        tracing::debug!(
            "Waiting up to {}ms for {} to be {}",
            timeout.as_millis(),
            self.description(),
            state
        );
        poll_until(timeout, || async move {
            match state {
                ElementState::Visible => self.is_visible().await,
                ElementState::Hidden => self.is_visible().await.map(|visible| !visible),
                ElementState::Attached => self.is_attached().await,
                ElementState::Detached => self.is_attached().await.map(|attached| !attached),
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_ready_on_first_check() {
        let outcome = poll_until(Duration::from_secs(5), || async { Ok(true) }).await;
        assert!(outcome.is_ready());
        assert!(outcome.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_times_out_close_to_deadline() {
        let outcome = poll_until(Duration::from_millis(100), || async { Ok(false) }).await;
        assert!(!outcome.is_ready());
        assert!(outcome.elapsed() >= Duration::from_millis(100));
        assert!(outcome.elapsed() < Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_errors_count_as_not_ready() {
        let outcome = poll_until(Duration::from_millis(150), || async {
            anyhow::bail!("node detached")
        })
        .await;
        assert!(matches!(outcome, PollOutcome::TimedOut { .. }));
    }

    #[tokio::test]
    async fn test_becomes_ready_after_a_few_checks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let outcome = poll_until(Duration::from_secs(2), move || {
            let counter = counter.clone();
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst) >= 2) }
        })
        .await;
        assert!(outcome.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_timeout_checks_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let outcome = poll_until(Duration::ZERO, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(false)
            }
        })
        .await;
        assert!(!outcome.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_check_does_not_overrun_deadline() {
        let outcome = poll_until(Duration::from_millis(100), || async {
            tokio::time::sleep(Duration::from_millis(80)).await;
            Ok(false)
        })
        .await;
        assert!(!outcome.is_ready());
        assert!(
            outcome.elapsed() < Duration::from_millis(150),
            "took {:?}",
            outcome.elapsed()
        );
    }

    #[tokio::test]
    async fn test_immediate_check_on_deadline_still_counts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let outcome = poll_until(Duration::from_millis(50), move || {
            let counter = counter.clone();
            async move { Ok(counter.fetch_add(1, Ordering::SeqCst) >= 1) }
        })
        .await;
        assert!(outcome.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_hung_check_is_bounded() {
        let outcome = poll_until(Duration::from_millis(100), || async {
            std::future::pending::<()>().await;
            Ok(true)
        })
        .await;
        assert!(!outcome.is_ready());
        assert!(outcome.elapsed() < Duration::from_millis(400));
    }
}
