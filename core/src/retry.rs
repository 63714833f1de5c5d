// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounded retry for transiently unready resources
//!
//! Mid-boot, mid-POST or mid-reconfiguration the device answers some
//! fetches with an error envelope whose short code marks the resource as
//! not yet materialized (see [`crate::codes::RESOURCE_NOT_READY_RETRY`]).
//! [`retry_until_ready`] wraps any fetch with retry-on-that-signature
//! semantics: matching envelopes are retried on a fixed interval, any
//! other outcome is returned to the caller immediately.
//!
//! The loop is always bounded. Exhausting [`RetryPolicy::max_attempts`]
//! yields the distinct [`RetryError::Deadline`] failure carrying the last
//! observed envelope, so callers can tell "device never became ready"
//! apart from a transport failure.

use crate::ErrorEnvelope;
use crate::Response;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Pacing and ceiling for one retry-until-ready loop.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Sleep between attempts.
    pub interval: Duration,
    /// Maximum number of not-ready responses tolerated before giving up.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Create a policy.
    #[must_use]
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 30,
        }
    }
}

/// Failure of a retry-until-ready loop.
#[derive(Debug)]
pub enum RetryError<E> {
    /// The attempt ceiling was reached while the device still reported
    /// not-ready; carries the last envelope observed.
    Deadline {
        /// Number of not-ready responses observed.
        attempts: u32,
        /// Envelope of the final not-ready response.
        last: ErrorEnvelope,
    },
    /// The underlying fetch failed at the transport level.
    Transport(E),
}

impl<E: Display> Display for RetryError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Deadline { attempts, last } => {
                write!(f, "resource still not ready after {attempts} attempts: {last}")
            }
            Self::Transport(e) => write!(f, "transport error while polling: {e}"),
        }
    }
}

impl<E: StdError + 'static> StdError for RetryError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Deadline { .. } => None,
        }
    }
}

/// Invoke `fetch` until it stops answering with the `signature` envelope.
///
/// Every outcome other than a matching envelope — a clean document, an
/// envelope with a different short code, a transport error — is returned
/// to the caller as-is on the attempt that produced it.
///
/// # Errors
///
/// Returns [`RetryError::Transport`] if `fetch` fails, or
/// [`RetryError::Deadline`] once `policy.max_attempts` matching envelopes
/// have been observed.
pub async fn retry_until_ready<F, Fut, E>(
    policy: &RetryPolicy,
    signature: &str,
    mut fetch: F,
) -> Result<Response, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Response, E>>,
{
    let mut attempts: u32 = 0;
    loop {
        let response = fetch().await.map_err(RetryError::Transport)?;
        let envelope = match response.document.error() {
            Some(envelope) if envelope.matches(signature) => envelope,
            _ => return Ok(response),
        };

        attempts += 1;
        if attempts >= policy.max_attempts {
            return Err(RetryError::Deadline {
                attempts,
                last: envelope,
            });
        }

        debug!(
            attempts,
            interval_ms = policy.interval.as_millis() as u64,
            signature,
            "resource not ready, retrying"
        );
        tokio::time::sleep(policy.interval).await;
    }
}
