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

//! Integration tests of maintenance-window reconciliation.

use ilo_redfish::{MaintenanceWindowRequest, RejectKind, UpdateService};
use ilo_redfish_tests::{collection, envelope_with_args, Expect, MockConnection};
use serde_json::json;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::test;

const MAINTENANCE: &str = "/redfish/v1/UpdateService/MaintenanceWindows";
const INVENTORY: &str = "/redfish/v1/UpdateService/FirmwareInventory";
const REPOSITORY: &str = "/redfish/v1/UpdateService/ComponentRepository";
const INSTALL_SETS: &str = "/redfish/v1/UpdateService/InstallSets";
const W1: &str = "/redfish/v1/UpdateService/MaintenanceWindows/W1";

fn w1_doc() -> JsonValue {
    json!({
        "@odata.id": W1,
        "Id": "W1-id",
        "Name": "W1",
        "Description": "weekly window",
        "StartAfter": "2021-07-21T17:00:00Z",
        "Expire": "2021-07-22T08:00:00Z"
    })
}

/// Queue the exchanges `UpdateService` construction performs, with the
/// given maintenance windows and the optional collections absent.
fn expect_construction(mock: &MockConnection, windows: &[(&str, JsonValue)]) {
    let endpoints: Vec<&str> = windows.iter().map(|(endpoint, _)| *endpoint).collect();
    mock.expect(Expect::get(MAINTENANCE, collection(MAINTENANCE, &endpoints)));
    for (endpoint, document) in windows {
        mock.expect(Expect::get(*endpoint, document.clone()));
    }
    mock.expect(Expect::get(INVENTORY, collection(INVENTORY, &[])));
    mock.expect(Expect::get_with_status(REPOSITORY, 404, json!({})));
    mock.expect(Expect::get_with_status(INSTALL_SETS, 404, json!({})));
}

fn w1_request() -> MaintenanceWindowRequest {
    // Mixed input formats on purpose; both normalize to UTC instants.
    MaintenanceWindowRequest::new(
        "W1",
        "weekly window",
        "Jul 21 2021 5:00PM",
        "07/22/2021 8:00AM",
    )
}

#[test]
async fn create_normalizes_instants_and_posts() {
    let mock = Arc::new(MockConnection::default());
    expect_construction(&mock, &[]);
    let mut service = UpdateService::new(mock.clone()).await.unwrap();

    mock.expect(Expect::post(
        MAINTENANCE,
        json!({
            "Name": "W1",
            "Description": "weekly window",
            "StartAfter": "2021-07-21T17:00:00Z",
            "Expire": "2021-07-22T08:00:00Z"
        }),
        w1_doc(),
    ));

    let verdict = service.create_maintenance_window(&w1_request()).await.unwrap();
    assert!(verdict.succeeded);
    assert_eq!(service.maintenance_windows().len(), 1);
    mock.verify_empty();
}

#[test]
async fn second_identical_create_returns_existing_window_without_post() {
    let mock = Arc::new(MockConnection::default());
    expect_construction(&mock, &[]);
    let mut service = UpdateService::new(mock.clone()).await.unwrap();

    mock.expect(Expect::post(
        MAINTENANCE,
        json!({
            "Name": "W1",
            "Description": "weekly window",
            "StartAfter": "2021-07-21T17:00:00Z",
            "Expire": "2021-07-22T08:00:00Z"
        }),
        w1_doc(),
    ));
    assert!(
        service
            .create_maintenance_window(&w1_request())
            .await
            .unwrap()
            .succeeded
    );

    // Identical request again: matched in the snapshot, no new POST.
    let verdict = service.create_maintenance_window(&w1_request()).await.unwrap();
    assert!(verdict.succeeded);
    assert_eq!(
        verdict.document.unwrap().str_at("/Id"),
        Some("W1-id")
    );
    mock.verify_empty();
}

#[test]
async fn pre_existing_window_satisfies_create_without_post() {
    let mock = Arc::new(MockConnection::default());
    expect_construction(&mock, &[(W1, w1_doc())]);
    let mut service = UpdateService::new(mock.clone()).await.unwrap();

    let verdict = service.create_maintenance_window(&w1_request()).await.unwrap();
    assert!(verdict.succeeded);
    mock.verify_empty();
}

#[test]
async fn device_already_exists_maps_to_user_message() {
    let mock = Arc::new(MockConnection::default());
    expect_construction(&mock, &[]);
    let mut service = UpdateService::new(mock.clone()).await.unwrap();

    mock.expect(Expect::post(
        MAINTENANCE,
        json!({
            "Name": "W1",
            "Description": "weekly window",
            "StartAfter": "2021-07-21T17:00:00Z",
            "Expire": "2021-07-22T08:00:00Z"
        }),
        envelope_with_args("iLO.2.14.ResourceAlreadyExists", &["Name"]),
    ));

    let verdict = service.create_maintenance_window(&w1_request()).await.unwrap();
    assert!(!verdict.succeeded);
    assert_eq!(verdict.message, "iLO - Maintenance Window already exists");
    mock.verify_empty();
}

#[test]
async fn device_incompatible_value_maps_to_attribute_message() {
    let mock = Arc::new(MockConnection::default());
    expect_construction(&mock, &[]);
    let mut service = UpdateService::new(mock.clone()).await.unwrap();

    mock.expect(Expect::post(
        MAINTENANCE,
        json!({
            "Name": "W1",
            "Description": "weekly window",
            "StartAfter": "2021-07-21T17:00:00Z",
            "Expire": "2021-07-22T08:00:00Z"
        }),
        envelope_with_args("iLO.2.14.PropertyValueIncompatible", &["StartAfter"]),
    ));

    let verdict = service.create_maintenance_window(&w1_request()).await.unwrap();
    assert!(!verdict.succeeded);
    assert_eq!(
        verdict.message,
        "iLO - Error in attribute specified for maintenance window. Value is StartAfter"
    );
    mock.verify_empty();
}

#[test]
async fn malformed_instant_is_rejected_locally() {
    let mock = Arc::new(MockConnection::default());
    expect_construction(&mock, &[]);
    let mut service = UpdateService::new(mock.clone()).await.unwrap();

    let request =
        MaintenanceWindowRequest::new("W1", "weekly window", "someday soon", "07/22/2021 8:00AM");
    let verdict = service.create_maintenance_window(&request).await.unwrap();
    assert!(!verdict.succeeded);
    assert_eq!(
        verdict.reject,
        Some(RejectKind::MaintenanceAttributeError("someday soon".to_string()))
    );
    mock.verify_empty();
}
