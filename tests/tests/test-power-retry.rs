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

//! Integration tests of power convergence and readiness polling.

use ilo_redfish::walker::fetch_ready;
use ilo_redfish::{ensure_powered_and_posted, Error, PowerPolicy};
use ilo_redfish_core::{Endpoint, RetryPolicy};
use ilo_redfish_tests::{envelope, Expect, MockConnection};
use serde_json::json;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::test;

const SYSTEM: &str = "/redfish/v1/Systems/1";
const RESET: &str = "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset";
const STORAGE: &str = "/redfish/v1/Systems/1/Storage";

fn system_doc(power_state: &str, discovery: &str) -> JsonValue {
    json!({
        "@odata.id": SYSTEM,
        "PowerState": power_state,
        "Actions": { "#ComputerSystem.Reset": { "target": RESET } },
        "Oem": { "Hpe": {
            "DeviceDiscoveryComplete": { "DeviceDiscovery": discovery }
        }}
    })
}

fn fast_power_policy(max_attempts: u32) -> PowerPolicy {
    PowerPolicy {
        settle: Duration::from_millis(1),
        poll: RetryPolicy::new(Duration::from_millis(1), max_attempts),
    }
}

#[test]
async fn powers_on_an_off_node_and_waits_for_discovery() {
    let mock = MockConnection::default();
    mock.expect_all([
        Expect::get(SYSTEM, system_doc("Off", "Busy")),
        Expect::post(RESET, json!({ "ResetType": "On" }), json!({})),
        Expect::get(SYSTEM, system_doc("On", "Busy")),
        Expect::get(SYSTEM, system_doc("On", "vMainDeviceDiscoveryComplete")),
    ]);

    ensure_powered_and_posted(&mock, &Endpoint::from(SYSTEM), &fast_power_policy(5))
        .await
        .unwrap();
    mock.verify_empty();
}

#[test]
async fn already_converged_node_needs_a_single_fetch() {
    let mock = MockConnection::default();
    mock.expect(Expect::get(
        SYSTEM,
        system_doc("On", "vMainDeviceDiscoveryComplete"),
    ));

    ensure_powered_and_posted(&mock, &Endpoint::from(SYSTEM), &fast_power_policy(5))
        .await
        .unwrap();
    mock.verify_empty();
}

#[test]
async fn convergence_is_bounded() {
    let mock = MockConnection::default();
    mock.expect_all([
        Expect::get(SYSTEM, system_doc("On", "Busy")),
        Expect::get(SYSTEM, system_doc("On", "Busy")),
        Expect::get(SYSTEM, system_doc("On", "Busy")),
    ]);

    let result =
        ensure_powered_and_posted(&mock, &Endpoint::from(SYSTEM), &fast_power_policy(2)).await;
    match result {
        Err(Error::PowerDeadline { attempts }) => assert_eq!(attempts, 2),
        other => panic!("expected power deadline, got {other:?}"),
    }
    mock.verify_empty();
}

#[test]
async fn fetch_ready_retries_only_the_not_ready_signature() {
    let mock = MockConnection::default();
    mock.expect_all([
        Expect::get_with_status(STORAGE, 400, envelope("iLO.2.14.ResourceNotReadyRetry")),
        Expect::get_with_status(STORAGE, 400, envelope("iLO.2.14.ResourceNotReadyRetry")),
        Expect::get(STORAGE, json!({ "@odata.id": STORAGE, "Members": [] })),
    ]);

    let policy = RetryPolicy::new(Duration::from_millis(1), 5);
    let document = fetch_ready(&mock, &Endpoint::from(STORAGE), &policy)
        .await
        .unwrap();
    assert!(document.error().is_none());
    mock.verify_empty();
}

#[test]
async fn fetch_ready_surfaces_other_envelopes_immediately() {
    let mock = MockConnection::default();
    mock.expect(Expect::get_with_status(
        STORAGE,
        500,
        envelope("iLO.2.14.InternalError"),
    ));

    let policy = RetryPolicy::new(Duration::from_millis(1), 5);
    let result = fetch_ready(&mock, &Endpoint::from(STORAGE), &policy).await;
    match result {
        Err(Error::Device(env)) => assert_eq!(env.short_code(), Some("InternalError")),
        other => panic!("expected device error, got {other:?}"),
    }
    mock.verify_empty();
}

#[test]
async fn fetch_ready_deadline_is_a_distinct_failure() {
    let mock = MockConnection::default();
    mock.expect_all([
        Expect::get_with_status(STORAGE, 400, envelope("iLO.2.14.ResourceNotReadyRetry")),
        Expect::get_with_status(STORAGE, 400, envelope("iLO.2.14.ResourceNotReadyRetry")),
    ]);

    let policy = RetryPolicy::new(Duration::from_millis(1), 2);
    let result = fetch_ready(&mock, &Endpoint::from(STORAGE), &policy).await;
    match result {
        Err(Error::NotReadyDeadline { attempts }) => assert_eq!(attempts, 2),
        other => panic!("expected not-ready deadline, got {other:?}"),
    }
    mock.verify_empty();
}
