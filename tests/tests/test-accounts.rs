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

//! Integration tests of account reconciliation.

use ilo_redfish::{AccountRequest, RejectKind, Users};
use ilo_redfish_tests::{collection, Expect, MockConnection};
use serde_json::json;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::test;

const ACCOUNTS: &str = "/redfish/v1/AccountService/Accounts";
const ADMIN: &str = "/redfish/v1/AccountService/Accounts/1";
const OPERATOR: &str = "/redfish/v1/AccountService/Accounts/12";

fn admin_doc() -> JsonValue {
    json!({
        "@odata.id": ADMIN,
        "Id": "1",
        "UserName": "Administrator",
        "RoleId": "Administrator"
    })
}

fn operator_doc() -> JsonValue {
    json!({
        "@odata.id": OPERATOR,
        "Id": "12",
        "UserName": "operator",
        "RoleId": "Operator"
    })
}

/// Queue one full walk of the accounts collection.
fn expect_walk(mock: &MockConnection, members: &[(&str, JsonValue)]) {
    let endpoints: Vec<&str> = members.iter().map(|(endpoint, _)| *endpoint).collect();
    mock.expect(Expect::get(ACCOUNTS, collection(ACCOUNTS, &endpoints)));
    for (endpoint, document) in members {
        mock.expect(Expect::get(*endpoint, document.clone()));
    }
}

async fn users_under_test(mock: &Arc<MockConnection>) -> Users<MockConnection> {
    expect_walk(mock, &[(ADMIN, admin_doc())]);
    Users::new(mock.clone()).await.expect("construction succeeds")
}

#[test]
async fn create_account_posts_and_appends_to_snapshot() {
    let mock = Arc::new(MockConnection::default());
    let mut users = users_under_test(&mock).await;
    assert_eq!(users.accounts().len(), 1);

    // Existence is checked against a fresh walk, not the cache.
    expect_walk(&mock, &[(ADMIN, admin_doc())]);
    mock.expect(Expect::post(
        ACCOUNTS,
        json!({
            "UserName": "operator",
            "Password": "secret",
            "RoleId": "Operator"
        }),
        operator_doc(),
    ));

    let request = AccountRequest::new("operator", "secret").with_role("Operator");
    let verdict = users.create_account(&request).await.unwrap();
    assert!(verdict.succeeded);
    assert_eq!(verdict.message, "Resource created successfully.");
    assert_eq!(users.accounts().len(), 2);
    mock.verify_empty();
}

#[test]
async fn duplicate_username_is_rejected_regardless_of_other_fields() {
    let mock = Arc::new(MockConnection::default());
    let mut users = users_under_test(&mock).await;

    expect_walk(
        &mock,
        &[(ADMIN, admin_doc()), (OPERATOR, operator_doc())],
    );

    // Same username, different password and role: still rejected.
    let request = AccountRequest::new("operator", "different").with_role("Administrator");
    let verdict = users.create_account(&request).await.unwrap();
    assert!(!verdict.succeeded);
    assert_eq!(
        verdict.reject,
        Some(RejectKind::AccountAlreadyPresent("operator".to_string()))
    );
    assert_eq!(verdict.message, "Account operator is already present.");
    mock.verify_empty();
}

#[test]
async fn delete_unknown_account_issues_zero_writes() {
    let mock = Arc::new(MockConnection::default());
    let mut users = users_under_test(&mock).await;

    expect_walk(&mock, &[(ADMIN, admin_doc())]);

    let verdict = users.delete_account("ghost").await.unwrap();
    assert!(!verdict.succeeded);
    assert_eq!(
        verdict.reject,
        Some(RejectKind::AccountNotExisted("ghost".to_string()))
    );
    // Only the lookup walk ran; no write was queued, none consumed.
    mock.verify_empty();
}

#[test]
async fn delete_existing_account_removes_it_from_the_snapshot() {
    let mock = Arc::new(MockConnection::default());
    let mut users = users_under_test(&mock).await;

    expect_walk(
        &mock,
        &[(ADMIN, admin_doc()), (OPERATOR, operator_doc())],
    );
    mock.expect(Expect::delete(OPERATOR));

    // Construction cached only Administrator; deleting operator leaves it.
    let verdict = users.delete_account("operator").await.unwrap();
    assert!(verdict.succeeded);
    assert_eq!(verdict.message, "Account operator deleted successfully.");
    assert_eq!(users.accounts().len(), 1);
    mock.verify_empty();
}
