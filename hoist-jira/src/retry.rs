//! # Resilient Request Execution
//!
//! Every call to Jira goes through [`execute_with_retry`]. Throttling (429)
//! and server errors (5xx) are retried with exponential backoff, or after the
//! delay the server asks for in `Retry-After`. Any other client error fails
//! at once. The loop is an explicit state machine so each transition is
//! visible in one place.

use std::future::Future;
use std::time::Duration;

use hoist_core::RequestError;
use reqwest::Response;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use tracing::{debug, warn};

/// Total attempts per request, the first one included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Delay before the first retry when the server gives no hint.
pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(1_000);
/// Upper bound for the computed backoff.
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_millis(15_000);

/// Retry budget and backoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  pub initial_backoff: Duration,
  pub max_backoff: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: DEFAULT_MAX_ATTEMPTS,
      initial_backoff: DEFAULT_INITIAL_BACKOFF,
      max_backoff: DEFAULT_MAX_BACKOFF,
    }
  }
}

impl RetryPolicy {
  /// Computed backoff after failed attempt number `attempt` (1-based):
  /// doubles from `initial_backoff` and is capped at `max_backoff`.
  pub fn backoff(&self, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    self
      .initial_backoff
      .saturating_mul(1_u32 << exponent)
      .min(self.max_backoff)
  }

  /// Delay before the next attempt. A `Retry-After` hint wins over the
  /// computed backoff.
  pub fn next_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
    retry_after.unwrap_or_else(|| self.backoff(attempt))
  }
}

/// How a response status is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
  Success,
  Retryable,
  Permanent,
}

/// Classify an HTTP status: below 400 succeeds, 429 and 5xx are retried,
/// everything else is permanent.
pub const fn classify_status(status: u16) -> StatusClass {
  match status {
    0..=399 => StatusClass::Success,
    429 | 500.. => StatusClass::Retryable,
    _ => StatusClass::Permanent,
  }
}

/// Read a numeric `Retry-After` header as a delay. HTTP-date values are
/// ignored.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
  let raw = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
  let seconds: f64 = raw.parse().ok()?;
  // Negative, NaN and out-of-range values are rejected rather than panicking
  Duration::try_from_secs_f64(seconds).ok()
}

enum RetryState {
  Attempting { attempt: u32 },
  Backoff { attempt: u32, delay: Duration },
  Succeeded(Response),
  PermanentlyFailed { status: u16, body: String },
  RetriesExhausted { attempts: u32, status: u16, body: String },
}

/// Run `send` until it yields a terminal response.
///
/// `send` performs exactly one HTTP call per invocation. `description` names
/// the operation in logs and errors.
///
/// # Errors
///
/// [`RequestError::Status`] for a non-retryable status,
/// [`RequestError::Exhausted`] when the attempt budget runs out, and
/// [`RequestError::Transport`] when no response was received at all.
pub async fn execute_with_retry<F, Fut>(
  policy: &RetryPolicy,
  description: &str,
  mut send: F,
) -> Result<Response, RequestError>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = reqwest::Result<Response>>,
{
  let mut state = RetryState::Attempting { attempt: 1 };

  loop {
    state = match state {
      RetryState::Attempting { attempt } => {
        debug!("{description}: attempt {attempt}/{}", policy.max_attempts);
        let response = send().await.map_err(|e| RequestError::Transport {
          description: description.to_string(),
          message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        match classify_status(status) {
          StatusClass::Success => RetryState::Succeeded(response),
          StatusClass::Permanent => RetryState::PermanentlyFailed {
            status,
            body: response.text().await.unwrap_or_default(),
          },
          StatusClass::Retryable if attempt >= policy.max_attempts => RetryState::RetriesExhausted {
            attempts: attempt,
            status,
            body: response.text().await.unwrap_or_default(),
          },
          StatusClass::Retryable => {
            let delay = policy.next_delay(attempt, parse_retry_after(response.headers()));
            warn!(
              "{description}: HTTP {status} on attempt {attempt}/{}, retrying in {} ms",
              policy.max_attempts,
              delay.as_millis()
            );
            RetryState::Backoff { attempt, delay }
          }
        }
      }
      RetryState::Backoff { attempt, delay } => {
        tokio::time::sleep(delay).await;
        RetryState::Attempting { attempt: attempt + 1 }
      }
      RetryState::Succeeded(response) => return Ok(response),
      RetryState::PermanentlyFailed { status, body } => {
        return Err(RequestError::Status {
          description: description.to_string(),
          status,
          body,
        });
      }
      RetryState::RetriesExhausted { attempts, status, body } => {
        return Err(RequestError::Exhausted {
          description: description.to_string(),
          attempts,
          status,
          body,
        });
      }
    };
  }
}
