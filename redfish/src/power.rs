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

//! Power convergence
//!
//! Storage and network-adapter resources are only populated once the node
//! has powered on and POST has completed device discovery. Before those
//! sub-resources are queried, [`ensure_powered_and_posted`] converges the
//! node: if it is off, a `ResetType: On` action is issued and a settle
//! delay observed, then the system document's device-discovery token is
//! polled until it reports complete. The poll loop is bounded; exhaustion
//! is the distinct [`Error::PowerDeadline`] failure.

use crate::schema::system::ComputerSystemView;
use crate::schema::system::PowerState;
use crate::walker::fetch_document;
use crate::Error;
use ilo_redfish_core::Connection;
use ilo_redfish_core::Endpoint;
use ilo_redfish_core::RetryPolicy;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use tracing::info;

/// Pacing for one power-convergence sequence.
#[derive(Debug, Clone)]
pub struct PowerPolicy {
    /// Delay after issuing the power-on reset, before the first poll.
    pub settle: Duration,
    /// Pacing and ceiling of the device-discovery poll loop.
    pub poll: RetryPolicy,
}

impl Default for PowerPolicy {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(30),
            poll: RetryPolicy::default(),
        }
    }
}

/// Ensure the node at `system` is powered on and POST device discovery has
/// completed.
///
/// # Errors
///
/// Returns [`Error::Missing`] if the system document lacks a reset action
/// target while the node is off, [`Error::PowerDeadline`] if discovery
/// does not complete within the poll ceiling, and the usual transport and
/// device errors.
pub async fn ensure_powered_and_posted<C: Connection>(
    conn: &C,
    system: &Endpoint,
    policy: &PowerPolicy,
) -> Result<(), Error<C>> {
    let document = fetch_document(conn, system).await?;
    let view = ComputerSystemView::from_document(&document);

    if view.discovery_complete() && view.power_state != Some(PowerState::Off) {
        return Ok(());
    }

    if view.power_state == Some(PowerState::Off) {
        let target = view
            .reset_target
            .ok_or_else(|| Error::missing("#ComputerSystem.Reset action target"))?;
        info!(%system, "node is off, powering on");
        conn.post(&target, &json!({ "ResetType": "On" }))
            .await
            .map_err(Error::Transport)?;
        tokio::time::sleep(policy.settle).await;
    }

    let mut attempts: u32 = 0;
    loop {
        let document = fetch_document(conn, system).await?;
        let view = ComputerSystemView::from_document(&document);
        if view.discovery_complete() {
            return Ok(());
        }

        attempts += 1;
        if attempts >= policy.poll.max_attempts {
            return Err(Error::PowerDeadline { attempts });
        }

        debug!(
            %system,
            attempts,
            state = view.device_discovery.as_deref().unwrap_or("unknown"),
            "waiting for device discovery to complete"
        );
        tokio::time::sleep(policy.poll.interval).await;
    }
}
