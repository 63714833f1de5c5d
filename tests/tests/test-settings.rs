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

//! Integration tests of the staged-settings committer.

use ilo_redfish::{commit_staged, Error, SettingsRef};
use ilo_redfish_core::{Document, Endpoint};
use ilo_redfish_tests::{envelope, Expect, MockConnection};
use serde_json::json;
use tokio::test;

const SETTINGS: &str = "/redfish/v1/Systems/1/Bios/Settings/";
const RESET: &str = "/redfish/v1/Systems/1/Actions/ComputerSystem.Reset";

fn settings_ref() -> SettingsRef {
    SettingsRef::from_resource(&Document::new(json!({
        "@odata.id": "/redfish/v1/Systems/1/Bios",
        "@Redfish.Settings": {
            "SettingsObject": { "@odata.id": SETTINGS }
        }
    })))
    .expect("settings link present")
}

#[test]
async fn clean_put_response_is_the_commit_result() {
    let mock = MockConnection::default();
    let body = json!({ "Attributes": { "WorkloadProfile": "Virtualization-MaxPerformance" } });
    mock.expect(Expect::put(
        SETTINGS,
        body.clone(),
        json!({ "Name": "Bios Settings Pending" }),
    ));

    let document = commit_staged(&mock, &settings_ref(), &Endpoint::from(RESET), &body)
        .await
        .unwrap();
    assert_eq!(document.str_at("/Name"), Some("Bios Settings Pending"));
    mock.verify_empty();
}

#[test]
async fn reset_required_is_applied_via_force_restart() {
    let mock = MockConnection::default();
    let body = json!({ "Attributes": { "Sriov": "Enabled" } });
    mock.expect_all([
        Expect::put(SETTINGS, body.clone(), envelope("iLO.2.14.SystemResetRequired")),
        Expect::post(
            RESET,
            json!({ "ResetType": "ForceRestart" }),
            json!({ "Name": "reset accepted" }),
        ),
    ]);

    let document = commit_staged(&mock, &settings_ref(), &Endpoint::from(RESET), &body)
        .await
        .unwrap();
    assert_eq!(document.str_at("/Name"), Some("reset accepted"));
    mock.verify_empty();
}

#[test]
async fn any_other_envelope_propagates_verbatim() {
    let mock = MockConnection::default();
    let body = json!({ "Attributes": { "BootMode": "Uefi" } });
    mock.expect(Expect::put(
        SETTINGS,
        body.clone(),
        envelope("iLO.2.14.PropertyValueIncompatible"),
    ));

    let result = commit_staged(&mock, &settings_ref(), &Endpoint::from(RESET), &body).await;
    match result {
        Err(Error::Device(env)) => {
            assert_eq!(env.short_code(), Some("PropertyValueIncompatible"));
        }
        other => panic!("expected device error, got {other:?}"),
    }
    mock.verify_empty();
}
