//! Checker/asserter pairs over [`ElementProbe::wait_for`].
//!
//! Every `is_*` function swallows timeouts and probe errors into `false`;
//! its `assert_*` twin runs the same poll and reports what went wrong.

use std::time::Duration;

use super::wait::{ElementProbe, ElementState, PollOutcome};

/// Default timeout for presence and clickability checks.
pub const DEFAULT_PRESENCE_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default timeout for waiting on an element to disappear.
pub const DEFAULT_HIDDEN_TIMEOUT: Duration = Duration::from_millis(5_000);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReadinessError {
    #[error("Element {description} was not visible within {timeout_ms}ms")]
    NotFound { description: String, timeout_ms: u128 },

    #[error("Element {description} was visible but disabled after waiting {timeout_ms}ms")]
    Disabled { description: String, timeout_ms: u128 },

    #[error("Element {description} was still visible after {timeout_ms}ms")]
    StillVisible { description: String, timeout_ms: u128 },
}

/// How a clickability check ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clickability {
    Clickable,
    NotFound,
    Disabled,
}

async fn clickability<P>(probe: &P, timeout: Duration) -> Clickability
where
    P: ElementProbe + ?Sized,
{
    if let PollOutcome::TimedOut { .. } = probe.wait_for(ElementState::Visible, timeout).await {
        return Clickability::NotFound;
    }
    match probe.is_enabled().await {
        Ok(true) => Clickability::Clickable,
        Ok(false) => Clickability::Disabled,
        // Visible a moment ago but unreadable now: it detached or re-rendered
        Err(e) => {
            tracing::debug!("Could not read enabled state of {}: {:#}", probe.description(), e);
            Clickability::NotFound
        }
    }
}

pub async fn is_element_present<P>(probe: &P, timeout: Duration) -> bool
where
    P: ElementProbe + ?Sized,
{
    probe.wait_for(ElementState::Visible, timeout).await.is_ready()
}

pub async fn assert_element_present<P>(probe: &P, timeout: Duration) -> Result<(), ReadinessError>
where
    P: ElementProbe + ?Sized,
{
    if is_element_present(probe, timeout).await {
        Ok(())
    } else {
        Err(ReadinessError::NotFound {
            description: probe.description(),
            timeout_ms: timeout.as_millis(),
        })
    }
}

pub async fn is_element_clickable<P>(probe: &P, timeout: Duration) -> bool
where
    P: ElementProbe + ?Sized,
{
    clickability(probe, timeout).await == Clickability::Clickable
}

pub async fn assert_element_clickable<P>(probe: &P, timeout: Duration) -> Result<(), ReadinessError>
where
    P: ElementProbe + ?Sized,
{
    let description = || probe.description();
    let timeout_ms = timeout.as_millis();
    match clickability(probe, timeout).await {
        Clickability::Clickable => Ok(()),
        Clickability::NotFound => Err(ReadinessError::NotFound {
            description: description(),
            timeout_ms,
        }),
        Clickability::Disabled => Err(ReadinessError::Disabled {
            description: description(),
            timeout_ms,
        }),
    }
}

pub async fn wait_for_element_hidden<P>(probe: &P, timeout: Duration) -> Result<(), ReadinessError>
where
    P: ElementProbe + ?Sized,
{
    match probe.wait_for(ElementState::Hidden, timeout).await {
        PollOutcome::Ready { .. } => Ok(()),
        PollOutcome::TimedOut { .. } => Err(ReadinessError::StillVisible {
            description: probe.description(),
            timeout_ms: timeout.as_millis(),
        }),
    }
}
