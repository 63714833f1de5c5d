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

//! Error type of the orchestration layer
//!
//! Fatal failure kinds only. Local precondition violations and
//! device-reported rejections that a reconciliation operation can describe
//! to the user travel inside [`crate::Reconciliation`] instead — an `Err`
//! from an aggregate means the operation could not run to a verdict at all.

use ilo_redfish_core::Connection;
use ilo_redfish_core::ErrorEnvelope;
use ilo_redfish_core::RetryError;
use std::error::Error as StdError;
use std::fmt;

/// Fatal failure of one orchestration operation.
pub enum Error<C: Connection> {
    /// Transport-level failure; the device is unreachable or its response
    /// was undecodable. Never retried.
    Transport(C::Error),
    /// The device reported an application-level failure the client does
    /// not special-case; the envelope is propagated verbatim.
    Device(ErrorEnvelope),
    /// The readiness poller exhausted its attempt ceiling while the device
    /// still reported not-ready.
    NotReadyDeadline {
        /// Not-ready responses observed before giving up.
        attempts: u32,
    },
    /// Power convergence did not observe device discovery completing
    /// within its attempt ceiling.
    PowerDeadline {
        /// Poll attempts made before giving up.
        attempts: u32,
    },
    /// A fetched document lacks a link or field the operation requires.
    Missing(String),
    /// A fetched document does not decode into the expected typed record.
    Json(serde_json::Error),
}

impl<C: Connection> Error<C> {
    /// Missing-field error from a JSON pointer or field description.
    pub fn missing(what: impl Into<String>) -> Self {
        Self::Missing(what.into())
    }
}

impl<C: Connection> fmt::Debug for Error<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => f.debug_tuple("Transport").field(e).finish(),
            Self::Device(envelope) => f.debug_tuple("Device").field(envelope).finish(),
            Self::NotReadyDeadline { attempts } => f
                .debug_struct("NotReadyDeadline")
                .field("attempts", attempts)
                .finish(),
            Self::PowerDeadline { attempts } => f
                .debug_struct("PowerDeadline")
                .field("attempts", attempts)
                .finish(),
            Self::Missing(what) => f.debug_tuple("Missing").field(what).finish(),
            Self::Json(e) => f.debug_tuple("Json").field(e).finish(),
        }
    }
}

impl<C: Connection> fmt::Display for Error<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport error: {e}"),
            Self::Device(envelope) => write!(f, "device error: {envelope}"),
            Self::NotReadyDeadline { attempts } => {
                write!(f, "resource still not ready after {attempts} attempts")
            }
            Self::PowerDeadline { attempts } => {
                write!(
                    f,
                    "device discovery incomplete after {attempts} poll attempts"
                )
            }
            Self::Missing(what) => write!(f, "document is missing {what}"),
            Self::Json(e) => write!(f, "document decode error: {e}"),
        }
    }
}

impl<C: Connection> StdError for Error<C>
where
    C::Error: 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl<C: Connection> From<serde_json::Error> for Error<C> {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl<C: Connection> From<RetryError<C::Error>> for Error<C> {
    fn from(err: RetryError<C::Error>) -> Self {
        match err {
            RetryError::Transport(e) => Self::Transport(e),
            RetryError::Deadline { attempts, .. } => Self::NotReadyDeadline { attempts },
        }
    }
}
