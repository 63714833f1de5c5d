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

//! Typed records for the Smart Storage staged configuration
//!
//! The `SmartStorageConfig` resource stages storage-topology changes behind
//! its settings object. The record round-trips: it decodes the current
//! document, is mutated in memory, and is serialized back for the staged
//! PUT — unknown fields are preserved in the flattened `rest` map so the
//! device sees the full document it handed out.

use ilo_redfish_core::Document;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

/// Data-protection guard the device enforces on staged topology changes.
///
/// Creation requires `Disabled`; destructive changes require `Permissive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataGuard {
    Disabled,
    Permissive,
    Strict,
}

/// Staged Smart Storage configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartStorageConfig {
    /// Logical drives currently staged on the controller.
    #[serde(rename = "LogicalDrives", default)]
    pub logical_drives: Vec<LogicalDrive>,
    /// Physical drives visible to the controller.
    #[serde(rename = "PhysicalDrives", default)]
    pub physical_drives: Vec<PhysicalDrive>,
    /// Data-protection guard for the next staged write.
    #[serde(rename = "DataGuard", skip_serializing_if = "Option::is_none")]
    pub data_guard: Option<DataGuard>,
    /// Every other field of the document, preserved for the round trip.
    #[serde(flatten)]
    pub rest: Map<String, JsonValue>,
}

/// One staged logical drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicalDrive {
    /// Raid level, e.g. `Raid1`.
    #[serde(rename = "Raid", skip_serializing_if = "Option::is_none")]
    pub raid: Option<String>,
    /// Physical-drive location identifiers backing the drive.
    #[serde(rename = "DataDrives", default)]
    pub data_drives: Vec<String>,
    /// Caller-chosen drive name.
    #[serde(rename = "LogicalDriveName", skip_serializing_if = "Option::is_none")]
    pub logical_drive_name: Option<String>,
    /// Device-assigned unique identifier; key for destructive actions.
    #[serde(
        rename = "VolumeUniqueIdentifier",
        skip_serializing_if = "Option::is_none"
    )]
    pub volume_unique_identifier: Option<String>,
    /// Every other field of the entry, preserved for the round trip.
    #[serde(flatten)]
    pub rest: Map<String, JsonValue>,
}

impl LogicalDrive {
    /// The drive's physical-drive set, for exact-set comparison.
    #[must_use]
    pub fn drive_set(&self) -> BTreeSet<&str> {
        self.data_drives.iter().map(String::as_str).collect()
    }
}

/// One physical drive as reported by the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicalDrive {
    /// Opaque location identifier (box/bay encoding, e.g. `1I:1:2`).
    #[serde(rename = "Location", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Every other field of the entry, preserved for the round trip.
    #[serde(flatten)]
    pub rest: Map<String, JsonValue>,
}

/// Flat summary of one Smart Storage controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSummary {
    pub id: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub firmware_version: Option<String>,
    pub location: Option<String>,
    pub health: Option<String>,
}

impl ControllerSummary {
    /// Extract the summary from a fetched controller document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.str_at("/Id").map(str::to_string),
            model: document.str_at("/Model").map(str::to_string),
            serial_number: document.str_at("/SerialNumber").map(str::to_string),
            firmware_version: document
                .str_at("/FirmwareVersion/Current/VersionString")
                .map(str::to_string),
            location: document.str_at("/Location").map(str::to_string),
            health: document.str_at("/Status/Health").map(str::to_string),
        }
    }
}

/// Desired state of one logical drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalDriveSpec {
    /// Raid level, e.g. `Raid1`. Required for creation.
    pub raid: Option<String>,
    /// Physical-drive location identifiers, compared by exact string
    /// equality against the controller's reported locations.
    pub drives: Vec<String>,
    /// Optional drive name; the device assigns one when omitted.
    pub name: Option<String>,
}

impl LogicalDriveSpec {
    /// Spec for a new drive on `drives` at `raid` level.
    pub fn new(raid: impl Into<String>, drives: Vec<String>) -> Self {
        Self {
            raid: Some(raid.into()),
            drives,
            name: None,
        }
    }

    /// Set the caller-chosen drive name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The requested physical-drive set, for exact-set comparison.
    #[must_use]
    pub fn drive_set(&self) -> BTreeSet<&str> {
        self.drives.iter().map(String::as_str).collect()
    }
}
