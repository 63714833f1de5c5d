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

//! Typed views over `ComputerSystem` documents.

use ilo_redfish_core::Document;
use ilo_redfish_core::Endpoint;
use serde_json::Value as JsonValue;

/// Boot-progress token the device reports once POST has discovered all
/// devices.
pub const DEVICE_DISCOVERY_COMPLETE: &str = "vMainDeviceDiscoveryComplete";

const DEVICE_DISCOVERY_POINTER: &str = "/Oem/Hpe/DeviceDiscoveryComplete/DeviceDiscovery";

/// Reported power state of a compute node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    On,
    Off,
    PoweringOn,
    PoweringOff,
}

impl PowerState {
    /// Parse the `PowerState` property value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "On" => Some(Self::On),
            "Off" => Some(Self::Off),
            "PoweringOn" => Some(Self::PoweringOn),
            "PoweringOff" => Some(Self::PoweringOff),
            _ => None,
        }
    }
}

/// Links and control fields of one `ComputerSystem` document.
#[derive(Debug, Clone)]
pub struct ComputerSystemView {
    /// Current power state.
    pub power_state: Option<PowerState>,
    /// `#ComputerSystem.Reset` action target.
    pub reset_target: Option<Endpoint>,
    /// Boot-progress / device-discovery token.
    pub device_discovery: Option<String>,
    /// `Processors` sub-collection.
    pub processors: Option<Endpoint>,
    /// `Memory` sub-collection.
    pub memory: Option<Endpoint>,
    /// `Storage` sub-collection (populated post-boot only).
    pub storage: Option<Endpoint>,
    /// `EthernetInterfaces` sub-collection.
    pub ethernet_interfaces: Option<Endpoint>,
    /// Smart Storage subsystem root (`Oem.Hpe.Links.SmartStorage`).
    pub smart_storage: Option<Endpoint>,
    /// Smart Storage staged-configuration resource
    /// (`Oem.Hpe.Links.SmartStorageConfig`).
    pub smart_storage_config: Option<Endpoint>,
}

impl ComputerSystemView {
    /// Extract the view from a fetched system document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            power_state: document.str_at("/PowerState").and_then(PowerState::parse),
            reset_target: document.action_target("#ComputerSystem.Reset"),
            device_discovery: document
                .str_at(DEVICE_DISCOVERY_POINTER)
                .map(str::to_string),
            processors: document.link_at("/Processors"),
            memory: document.link_at("/Memory"),
            storage: document.link_at("/Storage"),
            ethernet_interfaces: document.link_at("/EthernetInterfaces"),
            smart_storage: document.link_at("/Oem/Hpe/Links/SmartStorage"),
            smart_storage_config: document.link_at("/Oem/Hpe/Links/SmartStorageConfig"),
        }
    }

    /// Whether the device reports POST device discovery as complete.
    #[must_use]
    pub fn discovery_complete(&self) -> bool {
        self.device_discovery.as_deref() == Some(DEVICE_DISCOVERY_COMPLETE)
    }
}

/// Flat summary of one compute node.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSummary {
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub sku: Option<String>,
    pub total_memory_gib: Option<f64>,
    pub processor_model: Option<String>,
    pub processor_count: Option<u64>,
    pub bios_version: Option<String>,
}

impl SystemSummary {
    /// Extract the summary from a fetched system document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            model: document.str_at("/Model").map(str::to_string),
            serial_number: document.str_at("/SerialNumber").map(str::to_string),
            sku: document.str_at("/SKU").map(str::to_string),
            total_memory_gib: document
                .pointer("/MemorySummary/TotalSystemMemoryGiB")
                .and_then(JsonValue::as_f64),
            processor_model: document
                .str_at("/ProcessorSummary/Model")
                .map(str::to_string),
            processor_count: document
                .pointer("/ProcessorSummary/Count")
                .and_then(JsonValue::as_u64),
            bios_version: document
                .str_at("/Oem/Hpe/Bios/Current/VersionString")
                .map(str::to_string),
        }
    }
}

/// Flat summary of one processor.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorSummary {
    pub id: Option<String>,
    pub model: Option<String>,
    pub total_cores: Option<u64>,
    pub total_threads: Option<u64>,
    pub health: Option<String>,
}

impl ProcessorSummary {
    /// Extract the summary from a fetched processor document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.str_at("/Id").map(str::to_string),
            model: document.str_at("/Model").map(str::to_string),
            total_cores: document.pointer("/TotalCores").and_then(JsonValue::as_u64),
            total_threads: document
                .pointer("/TotalThreads")
                .and_then(JsonValue::as_u64),
            health: document.str_at("/Status/Health").map(str::to_string),
        }
    }
}
