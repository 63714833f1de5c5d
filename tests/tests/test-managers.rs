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

//! Integration tests of the Managers aggregate.

use ilo_redfish::Managers;
use ilo_redfish_tests::{collection, Expect, MockConnection};
use serde_json::json;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::test;

const MANAGERS: &str = "/redfish/v1/Managers";
const MANAGER: &str = "/redfish/v1/Managers/1";
const INTERFACES: &str = "/redfish/v1/Managers/1/EthernetInterfaces";
const MAIN_INTERFACE: &str = "/redfish/v1/Managers/1/EthernetInterfaces/1";
const DATETIME: &str = "/redfish/v1/Managers/1/DateTimeService";
const MANAGER_RESET: &str = "/redfish/v1/Managers/1/Actions/Manager.Reset";

fn manager_doc() -> JsonValue {
    json!({
        "@odata.id": MANAGER,
        "Model": "iLO 5",
        "FirmwareVersion": "iLO 5 v2.72",
        "EthernetInterfaces": { "@odata.id": INTERFACES },
        "Actions": { "#Manager.Reset": { "target": MANAGER_RESET } },
        "Oem": { "Hpe": {
            "License": { "LicenseString": "iLO Advanced" },
            "iLOSelfTestResults": [
                { "SelfTestName": "NVRAMData", "Status": "OK" },
                { "SelfTestName": "EEPROM", "Status": "OK" }
            ],
            "Links": {
                "DateTimeService": { "@odata.id": DATETIME }
            }
        }}
    })
}

fn interface_doc() -> JsonValue {
    json!({
        "@odata.id": MAIN_INTERFACE,
        "HostName": "ilo-lab",
        "FQDN": "ilo-lab.example.org",
        "MACAddress": "aa:bb:cc:dd:ee:ff",
        "IPv4Addresses": [{ "Address": "10.0.0.5" }],
        "IPv6Addresses": [{ "Address": "fe80::1" }],
        "NameServers": ["10.0.0.2", "10.0.0.3"]
    })
}

async fn managers_under_test(mock: &Arc<MockConnection>) -> Managers<MockConnection> {
    mock.expect_all([
        Expect::get(MANAGERS, collection(MANAGERS, &[MANAGER])),
        Expect::get(MANAGER, manager_doc()),
    ]);
    Managers::new(mock.clone()).await.expect("construction succeeds")
}

#[test]
async fn summaries_project_the_cached_snapshot() {
    let mock = Arc::new(MockConnection::default());
    let managers = managers_under_test(&mock).await;

    let summaries = managers.manager_summaries();
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.model.as_deref(), Some("iLO 5"));
    assert_eq!(summary.firmware_version.as_deref(), Some("iLO 5 v2.72"));
    assert_eq!(summary.license.as_deref(), Some("iLO Advanced"));
    assert_eq!(summary.self_test_results.len(), 2);
    mock.verify_empty();
}

#[test]
async fn interface_summary_reads_the_first_interface() {
    let mock = Arc::new(MockConnection::default());
    let mut managers = managers_under_test(&mock).await;

    mock.expect_all([
        Expect::get(INTERFACES, collection(INTERFACES, &[MAIN_INTERFACE])),
        Expect::get(MAIN_INTERFACE, interface_doc()),
    ]);

    let summary = managers.interface_summary().await.unwrap();
    assert_eq!(summary.hostname.as_deref(), Some("ilo-lab"));
    assert_eq!(summary.ipv4_address.as_deref(), Some("10.0.0.5"));
    assert_eq!(summary.name_servers, vec!["10.0.0.2", "10.0.0.3"]);
    mock.verify_empty();
}

#[test]
async fn set_ntp_servers_issues_two_patches_in_order() {
    let mock = Arc::new(MockConnection::default());
    let mut managers = managers_under_test(&mock).await;

    mock.expect_all([
        // Main-interface resolution.
        Expect::get(INTERFACES, collection(INTERFACES, &[MAIN_INTERFACE])),
        Expect::get(MAIN_INTERFACE, interface_doc()),
        // DHCPv6-sourced NTP off, then the static list.
        Expect::patch(
            MAIN_INTERFACE,
            json!({ "Oem": { "Hpe": { "DHCPv6": { "UseNTPServers": false } } } }),
            json!({ "@odata.id": MAIN_INTERFACE }),
        ),
        Expect::patch(
            DATETIME,
            json!({ "StaticNTPServers": ["10.0.0.7", "10.0.0.8"] }),
            json!({ "@odata.id": DATETIME, "StaticNTPServers": ["10.0.0.7", "10.0.0.8"] }),
        ),
    ]);

    let servers = vec!["10.0.0.7".to_string(), "10.0.0.8".to_string()];
    let document = managers.set_ntp_servers(&servers).await.unwrap();
    assert_eq!(
        document.pointer("/StaticNTPServers").unwrap(),
        &json!(["10.0.0.7", "10.0.0.8"])
    );
    mock.verify_empty();
}

#[test]
async fn reset_manager_posts_to_the_action_target() {
    let mock = Arc::new(MockConnection::default());
    let managers = managers_under_test(&mock).await;

    mock.expect(Expect::post(MANAGER_RESET, json!({}), json!({})));
    managers.reset_manager().await.unwrap();
    mock.verify_empty();
}
