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

//! Staged settings commits
//!
//! Some resources are read-only live: changes are written to an associated
//! settings object and only take effect after the device confirms them,
//! sometimes behind a reboot. The commit sequence is two-phase:
//!
//! 1. PUT the mutated document to the settings object's apply endpoint.
//! 2. Inspect the response's error envelope. A `SystemResetRequired` short
//!    code is not a failure — it is the device asking for a
//!    `ForceRestart` reset to apply the staged change, and the reset
//!    action's response becomes the commit result. Any other envelope is
//!    a device error propagated verbatim.
//!
//! A 2xx transport status alone never means the write applied; only an
//! envelope-free response or an issued reset does.

use crate::Error;
use ilo_redfish_core::codes;
use ilo_redfish_core::Connection;
use ilo_redfish_core::Document;
use ilo_redfish_core::Endpoint;
use serde_json::json;
use serde_json::Value as JsonValue;
use tracing::info;

/// Where a staged write must go, paired with the resource's current
/// document.
#[derive(Debug, Clone)]
pub struct SettingsRef {
    /// Endpoint of the settings object the mutated document is PUT to.
    pub apply_endpoint: Endpoint,
    /// The resource's current document, as fetched.
    pub current: Document,
}

impl SettingsRef {
    /// Extract the settings reference from a resource document.
    ///
    /// Returns `None` if the resource does not stage its writes (no
    /// `@Redfish.Settings.SettingsObject` link).
    #[must_use]
    pub fn from_resource(document: &Document) -> Option<Self> {
        document.settings_object().map(|apply_endpoint| Self {
            apply_endpoint,
            current: document.clone(),
        })
    }
}

/// Commit a mutated document through a resource's settings object.
///
/// Returns the document that proves the commit: the PUT response when the
/// device accepted the staged change outright, or the reset action's
/// response when the device demanded a reset to apply it.
///
/// # Errors
///
/// Returns [`Error::Transport`] on transport failure and [`Error::Device`]
/// for any envelope other than the reset-required signal.
pub async fn commit_staged<C: Connection>(
    conn: &C,
    settings: &SettingsRef,
    reset_target: &Endpoint,
    body: &JsonValue,
) -> Result<Document, Error<C>> {
    let response = conn
        .put(&settings.apply_endpoint, body)
        .await
        .map_err(Error::Transport)?;

    let envelope = match response.document.error() {
        None => return Ok(response.document),
        Some(envelope) => envelope,
    };

    if !envelope.matches(codes::SYSTEM_RESET_REQUIRED) {
        return Err(Error::Device(envelope));
    }

    info!(
        settings = %settings.apply_endpoint,
        reset = %reset_target,
        "staged settings require a reset to apply"
    );
    let reset = conn
        .post(reset_target, &json!({ "ResetType": "ForceRestart" }))
        .await
        .map_err(Error::Transport)?;
    Ok(reset.document)
}
