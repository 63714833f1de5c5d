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

//! Update-service domain aggregate
//!
//! [`UpdateService`] owns snapshots of the update service's
//! sub-collections: maintenance windows, firmware inventory, the component
//! repository and install sets. Machines lacking an optional collection
//! simply contribute an empty snapshot.
//!
//! Maintenance-window reconciliation normalizes both accepted input date
//! formats to ISO-8601 UTC instants before any comparison or submission,
//! treats an existing window with matching identity as already satisfied
//! (no POST), and maps the device's already-exists and value-incompatible
//! rejections to user-facing messages.

use crate::outcome::Reconciliation;
use crate::outcome::RejectKind;
use crate::schema::maintenance::MaintenanceWindowRequest;
use crate::schema::maintenance::MaintenanceWindowView;
use crate::time_format::normalize_instant;
use crate::walker::walk_linked;
use crate::walker::Snapshot;
use crate::Error;
use ilo_redfish_core::codes;
use ilo_redfish_core::Connection;
use ilo_redfish_core::Document;
use ilo_redfish_core::Endpoint;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Update service endpoint.
pub const UPDATE_SERVICE_ENDPOINT: &str = "/redfish/v1/UpdateService";
/// Maintenance windows collection endpoint.
pub const MAINTENANCE_WINDOWS_ENDPOINT: &str = "/redfish/v1/UpdateService/MaintenanceWindows";
/// Firmware inventory collection endpoint.
pub const FIRMWARE_INVENTORY_ENDPOINT: &str = "/redfish/v1/UpdateService/FirmwareInventory";
/// Component repository collection endpoint.
pub const COMPONENT_REPOSITORY_ENDPOINT: &str = "/redfish/v1/UpdateService/ComponentRepository";
/// Install sets collection endpoint.
pub const INSTALL_SETS_ENDPOINT: &str = "/redfish/v1/UpdateService/InstallSets";

/// Flat summary of one firmware inventory entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FirmwareComponent {
    /// Device the firmware lives on (`Oem.Hpe.DeviceContext`).
    pub location: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
}

impl FirmwareComponent {
    /// Extract the summary from a fetched inventory document.
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        Self {
            location: document
                .str_at("/Oem/Hpe/DeviceContext")
                .map(str::to_string),
            name: document.str_at("/Name").map(str::to_string),
            version: document.str_at("/Version").map(str::to_string),
        }
    }
}

/// Per-connection aggregate over the update-service resource tree.
pub struct UpdateService<C: Connection> {
    conn: Arc<C>,
    maintenance_windows: Snapshot,
    firmware_inventory: Snapshot,
    component_repository: Snapshot,
    install_sets: Snapshot,
}

impl<C: Connection> UpdateService<C> {
    /// Construct the aggregate, eagerly walking the update-service
    /// sub-collections. Absent optional collections yield empty snapshots.
    ///
    /// # Errors
    ///
    /// Fails if any present collection cannot be walked.
    pub async fn new(conn: Arc<C>) -> Result<Self, Error<C>> {
        let maintenance_windows =
            walk_linked(conn.as_ref(), &Endpoint::from(MAINTENANCE_WINDOWS_ENDPOINT)).await?;
        let firmware_inventory =
            walk_linked(conn.as_ref(), &Endpoint::from(FIRMWARE_INVENTORY_ENDPOINT)).await?;
        let component_repository =
            walk_linked(conn.as_ref(), &Endpoint::from(COMPONENT_REPOSITORY_ENDPOINT)).await?;
        let install_sets =
            walk_linked(conn.as_ref(), &Endpoint::from(INSTALL_SETS_ENDPOINT)).await?;

        Ok(Self {
            conn,
            maintenance_windows,
            firmware_inventory,
            component_repository,
            install_sets,
        })
    }

    /// Snapshot of the maintenance windows.
    #[must_use]
    pub fn maintenance_windows(&self) -> &Snapshot {
        &self.maintenance_windows
    }

    /// Snapshot of the firmware inventory.
    #[must_use]
    pub fn firmware_inventory(&self) -> &Snapshot {
        &self.firmware_inventory
    }

    /// Snapshot of the component repository.
    #[must_use]
    pub fn component_repository(&self) -> &Snapshot {
        &self.component_repository
    }

    /// Snapshot of the install sets.
    #[must_use]
    pub fn install_sets(&self) -> &Snapshot {
        &self.install_sets
    }

    /// Flat summaries of the firmware inventory, from the cached snapshot.
    #[must_use]
    pub fn firmware_components(&self) -> Vec<FirmwareComponent> {
        self.firmware_inventory
            .documents()
            .map(FirmwareComponent::from_document)
            .collect()
    }

    /// First cached window matching `id`, or the (name, start, expire)
    /// triple. Matching preserves snapshot (server) order.
    #[must_use]
    pub fn find_window(
        &self,
        id: Option<&str>,
        name: &str,
        start_after: &str,
        expire: &str,
    ) -> Option<&Document> {
        self.maintenance_windows
            .find(|document| {
                let view: MaintenanceWindowView = match document.decode() {
                    Ok(view) => view,
                    Err(_) => return false,
                };
                if id.is_some() && view.id.as_deref() == id {
                    return true;
                }
                view.name.as_deref() == Some(name)
                    && view.start_after.as_deref() == Some(start_after)
                    && view.expire.as_deref() == Some(expire)
            })
            .map(|(_, document)| document)
    }

    /// Reconcile "this maintenance window should exist".
    ///
    /// An unparsable start or end instant is a local rejection with no
    /// network write. A window with matching identity is returned as
    /// already satisfied without a POST.
    ///
    /// # Errors
    ///
    /// Fatal kinds only; rejections travel inside the verdict.
    pub async fn create_maintenance_window(
        &mut self,
        request: &MaintenanceWindowRequest,
    ) -> Result<Reconciliation, Error<C>> {
        let start_after = match normalize_instant(&request.start) {
            Ok(instant) => instant,
            Err(_) => {
                return Ok(Reconciliation::rejected(RejectKind::MaintenanceAttributeError(
                    request.start.clone(),
                )))
            }
        };
        let expire = match normalize_instant(&request.end) {
            Ok(instant) => instant,
            Err(_) => {
                return Ok(Reconciliation::rejected(RejectKind::MaintenanceAttributeError(
                    request.end.clone(),
                )))
            }
        };

        if let Some(existing) = self.find_window(None, &request.name, &start_after, &expire) {
            return Ok(Reconciliation::satisfied(existing.clone()));
        }

        let body = json!({
            "Name": request.name,
            "Description": request.description,
            "StartAfter": start_after,
            "Expire": expire,
        });
        let response = self
            .conn
            .post(&Endpoint::from(MAINTENANCE_WINDOWS_ENDPOINT), &body)
            .await
            .map_err(Error::Transport)?;

        let envelope = match response.document.error() {
            None => {
                info!(name = %request.name, %start_after, %expire, "maintenance window created");
                if let Some(endpoint) = response.document.odata_id() {
                    self.maintenance_windows
                        .push(endpoint, response.document.clone());
                }
                return Ok(Reconciliation::applied(response.document));
            }
            Some(envelope) => envelope,
        };

        if envelope.matches(codes::RESOURCE_ALREADY_EXISTS) {
            return Ok(Reconciliation::rejected_with_document(
                RejectKind::MaintenanceWindowExists(request.name.clone()),
                response.document,
            ));
        }
        if envelope.matches(codes::PROPERTY_VALUE_INCOMPATIBLE) {
            let value = envelope.first_arg().unwrap_or_else(|| request.name.clone());
            return Ok(Reconciliation::rejected_with_document(
                RejectKind::MaintenanceAttributeError(value),
                response.document,
            ));
        }
        Err(Error::Device(envelope))
    }
}
