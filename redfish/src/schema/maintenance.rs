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

//! Typed records for update-service maintenance windows.

use serde::Deserialize;

/// Fields of one `MaintenanceWindow` document the client consumes.
///
/// `start_after` and `expire` are ISO-8601 UTC instants with an explicit
/// `Z` suffix, the form every comparison and submission uses.
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceWindowView {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "StartAfter", default)]
    pub start_after: Option<String>,
    #[serde(rename = "Expire", default)]
    pub expire: Option<String>,
}

/// Desired state of one maintenance window.
///
/// `start` and `end` accept the two input date formats
/// (`MM/DD/YYYY hh:mmAM|PM` and `Mon DD YYYY hh:mmAM|PM`) and are
/// normalized before any comparison or submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceWindowRequest {
    pub name: String,
    pub description: String,
    pub start: String,
    pub end: String,
}

impl MaintenanceWindowRequest {
    /// Request for a window `name` spanning `start`..`end`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            start: start.into(),
            end: end.into(),
        }
    }
}
