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

//! Typed records for manager accounts.

use serde::Deserialize;
use serde_json::json;
use serde_json::Value as JsonValue;

/// Fields of one `ManagerAccount` document the client consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountView {
    /// Unique account key.
    #[serde(rename = "UserName", default)]
    pub username: Option<String>,
    /// Assigned role identifier.
    #[serde(rename = "RoleId", default)]
    pub role_id: Option<String>,
}

/// Desired state of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRequest {
    /// Unique account key.
    pub username: String,
    /// Initial password.
    pub password: String,
    /// Role identifier; takes precedence over `privileges` when set.
    pub role_id: Option<String>,
    /// Display login name, stored OEM-side.
    pub login_name: Option<String>,
    /// Named privileges granted explicitly; encoded as a name→true map.
    /// Ignored when `role_id` is set.
    pub privileges: Vec<String>,
}

impl AccountRequest {
    /// Request for `username` with `password` and no role or privileges.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role_id: None,
            login_name: None,
            privileges: Vec::new(),
        }
    }

    /// Assign a role identifier.
    #[must_use]
    pub fn with_role(mut self, role_id: impl Into<String>) -> Self {
        self.role_id = Some(role_id.into());
        self
    }

    /// Set the OEM login name.
    #[must_use]
    pub fn with_login_name(mut self, login_name: impl Into<String>) -> Self {
        self.login_name = Some(login_name.into());
        self
    }

    /// Grant explicit named privileges.
    #[must_use]
    pub fn with_privileges(mut self, privileges: Vec<String>) -> Self {
        self.privileges = privileges;
        self
    }

    /// Build the account-creation body.
    #[must_use]
    pub fn body(&self) -> JsonValue {
        let mut body = json!({
            "UserName": self.username,
            "Password": self.password,
        });

        if let Some(role_id) = &self.role_id {
            body["RoleId"] = json!(role_id);
        } else if !self.privileges.is_empty() {
            let privileges: serde_json::Map<String, JsonValue> = self
                .privileges
                .iter()
                .map(|name| (name.clone(), JsonValue::Bool(true)))
                .collect();
            body["Oem"]["Hpe"]["Privileges"] = JsonValue::Object(privileges);
        }

        if let Some(login_name) = &self.login_name {
            body["Oem"]["Hpe"]["LoginName"] = json!(login_name);
        }

        body
    }
}
