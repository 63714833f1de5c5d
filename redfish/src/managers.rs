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

//! Managers domain aggregate
//!
//! [`Managers`] owns a snapshot of the Managers collection, taken eagerly
//! at construction. Read projections work off the snapshot; network
//! settings go through PATCH against the management controller's main
//! network interface (the first `EthernetInterfaces` member, resolved
//! lazily and remembered).

use crate::walker::walk;
use crate::walker::Snapshot;
use crate::Error;
use ilo_redfish_core::Connection;
use ilo_redfish_core::Document;
use ilo_redfish_core::Endpoint;
use serde_json::json;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::info;

/// Managers collection endpoint.
pub const MANAGERS_ENDPOINT: &str = "/redfish/v1/Managers";

/// Flat summary of one management controller.
#[derive(Debug, Clone, PartialEq)]
pub struct ManagerSummary {
    pub model: Option<String>,
    pub firmware_version: Option<String>,
    pub license: Option<String>,
    pub self_test_results: Vec<SelfTestResult>,
}

/// One entry of the controller's self-test report.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfTestResult {
    pub name: String,
    pub status: String,
}

impl ManagerSummary {
    /// Extract the summary from a fetched manager document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let self_test_results = document
            .pointer("/Oem/Hpe/iLOSelfTestResults")
            .and_then(JsonValue::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let name = entry.get("SelfTestName")?.as_str()?;
                        let status = entry.get("Status")?.as_str()?;
                        Some(SelfTestResult {
                            name: name.to_string(),
                            status: status.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            model: document.str_at("/Model").map(str::to_string),
            firmware_version: document.str_at("/FirmwareVersion").map(str::to_string),
            license: document
                .str_at("/Oem/Hpe/License/LicenseString")
                .map(str::to_string),
            self_test_results,
        }
    }
}

/// Flat summary of the controller's main network interface.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceSummary {
    pub hostname: Option<String>,
    pub fqdn: Option<String>,
    pub mac_address: Option<String>,
    pub ipv4_address: Option<String>,
    pub ipv6_address: Option<String>,
    pub name_servers: Vec<String>,
}

impl InterfaceSummary {
    /// Extract the summary from a fetched interface document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let name_servers = document
            .pointer("/NameServers")
            .and_then(JsonValue::as_array)
            .map(|servers| {
                servers
                    .iter()
                    .filter_map(JsonValue::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            hostname: document.str_at("/HostName").map(str::to_string),
            fqdn: document.str_at("/FQDN").map(str::to_string),
            mac_address: document.str_at("/MACAddress").map(str::to_string),
            ipv4_address: document
                .str_at("/IPv4Addresses/0/Address")
                .map(str::to_string),
            ipv6_address: document
                .str_at("/IPv6Addresses/0/Address")
                .map(str::to_string),
            name_servers,
        }
    }
}

/// Per-connection aggregate over the Managers resource tree.
pub struct Managers<C: Connection> {
    conn: Arc<C>,
    managers: Snapshot,
    main_interface: Option<Endpoint>,
}

impl<C: Connection> Managers<C> {
    /// Construct the aggregate, eagerly walking the Managers collection.
    ///
    /// # Errors
    ///
    /// Fails if the walk fails.
    pub async fn new(conn: Arc<C>) -> Result<Self, Error<C>> {
        let managers = walk(conn.as_ref(), &Endpoint::from(MANAGERS_ENDPOINT)).await?;
        Ok(Self {
            conn,
            managers,
            main_interface: None,
        })
    }

    /// Snapshot of the Managers collection members.
    #[must_use]
    pub fn managers(&self) -> &Snapshot {
        &self.managers
    }

    /// Flat summaries of the management controllers, from the cached
    /// snapshot.
    #[must_use]
    pub fn manager_summaries(&self) -> Vec<ManagerSummary> {
        self.managers
            .documents()
            .map(ManagerSummary::from_document)
            .collect()
    }

    /// Resolve and remember the main network interface: the first member
    /// of the first manager's `EthernetInterfaces` collection.
    async fn resolve_main_interface(&mut self) -> Result<(Endpoint, Document), Error<C>> {
        let (_, manager_doc) = self
            .managers
            .first()
            .ok_or_else(|| Error::missing("Managers collection member"))?;
        let interfaces = manager_doc
            .link_at("/EthernetInterfaces")
            .ok_or_else(|| Error::missing("EthernetInterfaces link"))?;

        let walked = walk(self.conn.as_ref(), &interfaces).await?;
        let (endpoint, document) = walked
            .first()
            .cloned()
            .ok_or_else(|| Error::missing("EthernetInterfaces member"))?;
        self.main_interface = Some(endpoint.clone());
        Ok((endpoint, document))
    }

    /// Summary of the controller's main network interface.
    ///
    /// # Errors
    ///
    /// Fails if the interface collection cannot be walked or is empty.
    pub async fn interface_summary(&mut self) -> Result<InterfaceSummary, Error<C>> {
        let (_, document) = self.resolve_main_interface().await?;
        Ok(InterfaceSummary::from_document(&document))
    }

    /// Point the controller at a static NTP server list.
    ///
    /// Two sequential PATCHes: DHCPv6-sourced NTP is switched off on the
    /// main interface first, then the static list is written to the
    /// `DateTimeService` resource.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or a device envelope on either PATCH.
    pub async fn set_ntp_servers(&mut self, servers: &[String]) -> Result<Document, Error<C>> {
        let interface = match self.main_interface.clone() {
            Some(endpoint) => endpoint,
            None => self.resolve_main_interface().await?.0,
        };
        let (_, manager_doc) = self
            .managers
            .first()
            .ok_or_else(|| Error::missing("Managers collection member"))?;
        let datetime = manager_doc
            .link_at("/Oem/Hpe/Links/DateTimeService")
            .ok_or_else(|| Error::missing("Oem.Hpe.Links.DateTimeService link"))?;

        let body = json!({ "Oem": { "Hpe": { "DHCPv6": { "UseNTPServers": false } } } });
        let response = self
            .conn
            .patch(&interface, &body)
            .await
            .map_err(Error::Transport)?;
        if let Some(envelope) = response.document.error() {
            return Err(Error::Device(envelope));
        }

        let body = json!({ "StaticNTPServers": servers });
        let response = self
            .conn
            .patch(&datetime, &body)
            .await
            .map_err(Error::Transport)?;
        match response.document.error() {
            Some(envelope) => Err(Error::Device(envelope)),
            None => Ok(response.document),
        }
    }

    /// Reset the management controller itself (`#Manager.Reset`).
    ///
    /// Returns the action's response document verbatim.
    ///
    /// # Errors
    ///
    /// Fails on transport errors or a missing action target.
    pub async fn reset_manager(&self) -> Result<Document, Error<C>> {
        let (endpoint, manager_doc) = self
            .managers
            .first()
            .ok_or_else(|| Error::missing("Managers collection member"))?;
        let target = manager_doc
            .action_target("#Manager.Reset")
            .ok_or_else(|| Error::missing("#Manager.Reset action target"))?;

        info!(manager = %endpoint, "resetting management controller");
        let response = self
            .conn
            .post(&target, &json!({}))
            .await
            .map_err(Error::Transport)?;
        Ok(response.document)
    }
}
