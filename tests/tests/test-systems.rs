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

//! Integration tests of Systems construction against a cold node.

use ilo_redfish::{PowerPolicy, Systems, SystemsPolicy};
use ilo_redfish_core::RetryPolicy;
use ilo_redfish_tests::{collection, envelope, Expect, MockConnection};
use serde_json::json;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use tokio::test;

const SYSTEMS: &str = "/redfish/v1/Systems";
const SYSTEM: &str = "/redfish/v1/Systems/1";
const PROCESSORS: &str = "/redfish/v1/Systems/1/Processors";
const CPU1: &str = "/redfish/v1/Systems/1/Processors/1";
const MEMORY: &str = "/redfish/v1/Systems/1/Memory";
const STORAGE: &str = "/redfish/v1/Systems/1/Storage";
const SMART_STORAGE: &str = "/redfish/v1/Systems/1/SmartStorage";
const ARRAY_CONTROLLERS: &str = "/redfish/v1/Systems/1/SmartStorage/ArrayControllers";
const CONTROLLER: &str = "/redfish/v1/Systems/1/SmartStorage/ArrayControllers/0";
const HOST_BUS_ADAPTERS: &str = "/redfish/v1/Systems/1/SmartStorage/HostBusAdapters";
const RESET: &str = "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset";

fn system_doc(power_state: &str, discovery: &str) -> JsonValue {
    json!({
        "@odata.id": SYSTEM,
        "Model": "ProLiant DL380 Gen10",
        "SerialNumber": "CZJ1234567",
        "SKU": "868703-B21",
        "PowerState": power_state,
        "MemorySummary": { "TotalSystemMemoryGiB": 128 },
        "ProcessorSummary": { "Model": "Intel Xeon Gold 6130", "Count": 2 },
        "Processors": { "@odata.id": PROCESSORS },
        "Memory": { "@odata.id": MEMORY },
        "Storage": { "@odata.id": STORAGE },
        "Actions": { "#ComputerSystem.Reset": { "target": RESET } },
        "Oem": { "Hpe": {
            "Bios": { "Current": { "VersionString": "U30 v2.54" } },
            "DeviceDiscoveryComplete": { "DeviceDiscovery": discovery },
            "Links": {
                "SmartStorage": { "@odata.id": SMART_STORAGE }
            }
        }}
    })
}

fn smart_storage_doc() -> JsonValue {
    json!({
        "@odata.id": SMART_STORAGE,
        "Links": {
            "ArrayControllers": { "@odata.id": ARRAY_CONTROLLERS },
            "HostBusAdapters": { "@odata.id": HOST_BUS_ADAPTERS }
        }
    })
}

fn fast_policy() -> SystemsPolicy {
    SystemsPolicy {
        power: PowerPolicy {
            settle: Duration::from_millis(1),
            poll: RetryPolicy::new(Duration::from_millis(1), 5),
        },
        ready: RetryPolicy::new(Duration::from_millis(1), 5),
    }
}

#[test]
async fn construction_converges_power_and_retries_unready_storage() {
    let mock = Arc::new(MockConnection::default());
    mock.expect_all([
        // Eager walk of the Systems collection.
        Expect::get(SYSTEMS, collection(SYSTEMS, &[SYSTEM])),
        Expect::get(SYSTEM, system_doc("Off", "Busy")),
        // Processors and Memory are populated regardless of power.
        Expect::get(PROCESSORS, collection(PROCESSORS, &[CPU1])),
        Expect::get(
            CPU1,
            json!({
                "@odata.id": CPU1,
                "Id": "1",
                "Model": "Intel Xeon Gold 6130",
                "TotalCores": 16,
                "TotalThreads": 32,
                "Status": { "Health": "OK" }
            }),
        ),
        Expect::get(MEMORY, collection(MEMORY, &[])),
        // Power convergence: off node is reset on, then polled until POST
        // finishes device discovery.
        Expect::get(SYSTEM, system_doc("Off", "Busy")),
        Expect::post(RESET, json!({ "ResetType": "On" }), json!({})),
        Expect::get(SYSTEM, system_doc("On", "Busy")),
        Expect::get(SYSTEM, system_doc("On", "vMainDeviceDiscoveryComplete")),
        // Storage materializes late; the first fetch reports not ready.
        Expect::get_with_status(STORAGE, 400, envelope("iLO.2.14.ResourceNotReadyRetry")),
        Expect::get(STORAGE, collection(STORAGE, &[])),
        // Smart Storage controller chains.
        Expect::get(SMART_STORAGE, smart_storage_doc()),
        Expect::get(ARRAY_CONTROLLERS, collection(ARRAY_CONTROLLERS, &[CONTROLLER])),
        Expect::get(
            CONTROLLER,
            json!({
                "@odata.id": CONTROLLER,
                "Id": "0",
                "Model": "HPE Smart Array P408i-a SR Gen10",
                "SerialNumber": "PEYHB0ARH8Y01U",
                "FirmwareVersion": { "Current": { "VersionString": "2.65" } },
                "Status": { "Health": "OK" }
            }),
        ),
        Expect::get(SMART_STORAGE, smart_storage_doc()),
        Expect::get(HOST_BUS_ADAPTERS, collection(HOST_BUS_ADAPTERS, &[])),
    ]);

    let systems = Systems::with_policy(mock.clone(), fast_policy())
        .await
        .unwrap();

    assert_eq!(systems.systems().len(), 1);
    assert_eq!(systems.processors().len(), 1);
    assert!(systems.storage().is_empty());
    assert_eq!(systems.array_controllers().len(), 1);

    let summaries = systems.system_summaries();
    assert_eq!(summaries[0].model.as_deref(), Some("ProLiant DL380 Gen10"));
    assert_eq!(summaries[0].bios_version.as_deref(), Some("U30 v2.54"));
    assert_eq!(summaries[0].total_memory_gib, Some(128.0));

    let processors = systems.processor_summaries();
    assert_eq!(processors[0].total_cores, Some(16));

    let controllers = systems.smart_array_summaries();
    assert_eq!(controllers[0].firmware_version.as_deref(), Some("2.65"));

    mock.verify_empty();
}
