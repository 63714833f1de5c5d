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

//! Systems domain aggregate
//!
//! [`Systems`] owns snapshots of the Systems collection and its nested
//! sub-collections, taken eagerly at construction:
//!
//! - `Processors` and `Memory` per system
//! - `Storage` per system — populated post-boot only, so construction
//!   first converges power (see [`crate::power`]) and the walk retries
//!   while the device reports the collection not ready
//! - the Smart Storage `ArrayControllers` and `HostBusAdapters` chains
//!   (`Oem.Hpe.Links.SmartStorage` → `Links.<kind>`)
//!
//! Read projections work off the snapshots without network traffic.
//! Logical-drive reconciliation works against the `SmartStorageConfig`
//! resource's staged settings and commits through
//! [`crate::settings::commit_staged`]; the current configuration is fetched
//! fresh for every operation.

use crate::outcome::Reconciliation;
use crate::outcome::RejectKind;
use crate::power::ensure_powered_and_posted;
use crate::power::PowerPolicy;
use crate::schema::storage::ControllerSummary;
use crate::schema::storage::DataGuard;
use crate::schema::storage::LogicalDrive;
use crate::schema::storage::LogicalDriveSpec;
use crate::schema::storage::SmartStorageConfig;
use crate::schema::system::ComputerSystemView;
use crate::schema::system::ProcessorSummary;
use crate::schema::system::SystemSummary;
use crate::settings::commit_staged;
use crate::settings::SettingsRef;
use crate::walker::fetch_ready;
use crate::walker::walk;
use crate::walker::walk_ready;
use crate::walker::Snapshot;
use crate::Error;
use ilo_redfish_core::Connection;
use ilo_redfish_core::Endpoint;
use ilo_redfish_core::RetryPolicy;
use serde_json::json;
use serde_json::Map;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

/// Systems collection endpoint.
pub const SYSTEMS_ENDPOINT: &str = "/redfish/v1/Systems";

/// Pacing policies for one [`Systems`] aggregate.
#[derive(Debug, Clone, Default)]
pub struct SystemsPolicy {
    /// Power convergence before post-boot sub-collections are walked.
    pub power: PowerPolicy,
    /// Readiness retry for transiently unready resources.
    pub ready: RetryPolicy,
}

/// Per-connection aggregate over the Systems resource tree.
pub struct Systems<C: Connection> {
    conn: Arc<C>,
    policy: SystemsPolicy,
    systems: Snapshot,
    processors: Snapshot,
    memory: Snapshot,
    storage: Snapshot,
    array_controllers: Snapshot,
    host_bus_adapters: Snapshot,
}

impl<C: Connection> Systems<C> {
    /// Construct the aggregate, eagerly walking the resource graph.
    ///
    /// # Errors
    ///
    /// Fails if any walk fails; see [`Self::with_policy`].
    pub async fn new(conn: Arc<C>) -> Result<Self, Error<C>> {
        Self::with_policy(conn, SystemsPolicy::default()).await
    }

    /// Construct the aggregate with explicit pacing policies.
    ///
    /// Walks the Systems collection and its `Processors` and `Memory`
    /// sub-collections, then converges power on every member before
    /// walking `Storage` and the Smart Storage controller chains.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, device errors, and poller/convergence
    /// deadline exhaustion.
    pub async fn with_policy(conn: Arc<C>, policy: SystemsPolicy) -> Result<Self, Error<C>> {
        let systems = walk(conn.as_ref(), &Endpoint::from(SYSTEMS_ENDPOINT)).await?;

        let processors = linked_collections(conn.as_ref(), &systems, "/Processors").await?;
        let memory = linked_collections(conn.as_ref(), &systems, "/Memory").await?;

        for (endpoint, _) in systems.iter() {
            ensure_powered_and_posted(conn.as_ref(), endpoint, &policy.power).await?;
        }

        let storage = ready_collections(conn.as_ref(), &systems, "/Storage", &policy.ready).await?;
        let array_controllers =
            controller_collections(conn.as_ref(), &systems, "ArrayControllers", &policy.ready)
                .await?;
        let host_bus_adapters =
            controller_collections(conn.as_ref(), &systems, "HostBusAdapters", &policy.ready)
                .await?;

        Ok(Self {
            conn,
            policy,
            systems,
            processors,
            memory,
            storage,
            array_controllers,
            host_bus_adapters,
        })
    }

    /// Snapshot of the Systems collection members.
    #[must_use]
    pub fn systems(&self) -> &Snapshot {
        &self.systems
    }

    /// Snapshot of every system's `Processors` members.
    #[must_use]
    pub fn processors(&self) -> &Snapshot {
        &self.processors
    }

    /// Snapshot of every system's `Memory` members.
    #[must_use]
    pub fn memory(&self) -> &Snapshot {
        &self.memory
    }

    /// Snapshot of every system's `Storage` members.
    #[must_use]
    pub fn storage(&self) -> &Snapshot {
        &self.storage
    }

    /// Snapshot of the Smart Storage array controllers.
    #[must_use]
    pub fn array_controllers(&self) -> &Snapshot {
        &self.array_controllers
    }

    /// Snapshot of the Smart Storage host bus adapters.
    #[must_use]
    pub fn host_bus_adapters(&self) -> &Snapshot {
        &self.host_bus_adapters
    }

    /// Flat summaries of the compute nodes, from the cached snapshot.
    #[must_use]
    pub fn system_summaries(&self) -> Vec<SystemSummary> {
        self.systems
            .documents()
            .map(SystemSummary::from_document)
            .collect()
    }

    /// Flat summaries of the processors, from the cached snapshot.
    #[must_use]
    pub fn processor_summaries(&self) -> Vec<ProcessorSummary> {
        self.processors
            .documents()
            .map(ProcessorSummary::from_document)
            .collect()
    }

    /// Flat summaries of the array controllers, from the cached snapshot.
    #[must_use]
    pub fn smart_array_summaries(&self) -> Vec<ControllerSummary> {
        self.array_controllers
            .documents()
            .map(ControllerSummary::from_document)
            .collect()
    }

    /// Resolve the staged storage configuration of the first system:
    /// the settings reference (apply endpoint + freshly fetched current
    /// document) and the owning system's reset target.
    async fn storage_config(&self) -> Result<(SettingsRef, Endpoint), Error<C>> {
        let (_, system_doc) = self
            .systems
            .first()
            .ok_or_else(|| Error::missing("Systems collection member"))?;
        let view = ComputerSystemView::from_document(system_doc);

        let config_endpoint = view
            .smart_storage_config
            .ok_or_else(|| Error::missing("Oem.Hpe.Links.SmartStorageConfig link"))?;
        let reset_target = view
            .reset_target
            .ok_or_else(|| Error::missing("#ComputerSystem.Reset action target"))?;

        let current = fetch_ready(self.conn.as_ref(), &config_endpoint, &self.policy.ready).await?;
        let settings = SettingsRef::from_resource(&current)
            .ok_or_else(|| Error::missing("@Redfish.Settings.SettingsObject link"))?;
        Ok((settings, reset_target))
    }

    /// Reconcile "this logical drive should exist" against the controller.
    ///
    /// Local rejections (no raid/drives given, unknown physical drives,
    /// duplicate drive set) are returned before any network write.
    ///
    /// # Errors
    ///
    /// Fatal kinds only; rejections travel inside the verdict.
    pub async fn create_logical_drive(
        &self,
        spec: &LogicalDriveSpec,
    ) -> Result<Reconciliation, Error<C>> {
        if spec.raid.is_none() || spec.drives.is_empty() {
            return Ok(Reconciliation::rejected(RejectKind::LogicalDiskNotSpecified));
        }

        let (settings, reset_target) = self.storage_config().await?;
        let config: SmartStorageConfig = settings.current.decode()?;

        let locations: BTreeSet<&str> = config
            .physical_drives
            .iter()
            .filter_map(|drive| drive.location.as_deref())
            .collect();
        let missing: Vec<String> = spec
            .drives
            .iter()
            .filter(|drive| !locations.contains(drive.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Ok(Reconciliation::rejected(RejectKind::PhysicalDriveNotExisted(missing)));
        }

        // An exact duplicate of an existing drive set is a conflict, not an
        // idempotent success.
        let requested = spec.drive_set();
        if config
            .logical_drives
            .iter()
            .any(|drive| drive.drive_set() == requested)
        {
            return Ok(Reconciliation::rejected(RejectKind::PhysicalDriveInUse));
        }

        let mut staged = config;
        staged.logical_drives.push(LogicalDrive {
            raid: spec.raid.clone(),
            data_drives: spec.drives.clone(),
            logical_drive_name: spec.name.clone(),
            volume_unique_identifier: None,
            rest: Map::new(),
        });
        staged.data_guard = Some(DataGuard::Disabled);

        let body = serde_json::to_value(&staged)?;
        let document =
            commit_staged(self.conn.as_ref(), &settings, &reset_target, &body).await?;
        Ok(Reconciliation::applied(document))
    }

    /// Reconcile "this logical drive should not exist".
    ///
    /// The drive is matched by `name`, or, failing that, by an exact
    /// `drives` set match.
    ///
    /// # Errors
    ///
    /// Fatal kinds only; a no-match rejection travels inside the verdict.
    pub async fn delete_logical_drive(
        &self,
        name: Option<&str>,
        drives: &[String],
    ) -> Result<Reconciliation, Error<C>> {
        let (settings, reset_target) = self.storage_config().await?;
        let config: SmartStorageConfig = settings.current.decode()?;

        let requested: BTreeSet<&str> = drives.iter().map(String::as_str).collect();
        let found = config
            .logical_drives
            .iter()
            .find(|drive| name.is_some() && drive.logical_drive_name.as_deref() == name)
            .or_else(|| {
                if requested.is_empty() {
                    None
                } else {
                    config
                        .logical_drives
                        .iter()
                        .find(|drive| drive.drive_set() == requested)
                }
            });

        let drive = match found {
            Some(drive) => drive,
            None => return Ok(Reconciliation::rejected(RejectKind::LogicalDiskNotFound)),
        };
        let volume_unique_identifier = drive
            .volume_unique_identifier
            .clone()
            .ok_or_else(|| Error::missing("VolumeUniqueIdentifier"))?;

        let body = json!({
            "LogicalDrives": [{
                "Actions": [{ "Action": "LogicalDriveDelete" }],
                "VolumeUniqueIdentifier": volume_unique_identifier
            }],
            "DataGuard": "Permissive"
        });
        let document =
            commit_staged(self.conn.as_ref(), &settings, &reset_target, &body).await?;
        Ok(Reconciliation::applied(document))
    }
}

/// Walk the collection linked at `pointer` from every parent member into
/// one combined snapshot.
async fn linked_collections<C: Connection>(
    conn: &C,
    parents: &Snapshot,
    pointer: &str,
) -> Result<Snapshot, Error<C>> {
    let mut combined = Snapshot::default();
    for (endpoint, document) in parents.iter() {
        match document.link_at(pointer) {
            Some(link) => combined.merge(walk(conn, &link).await?),
            None => warn!(parent = %endpoint, pointer, "sub-collection link missing"),
        }
    }
    Ok(combined)
}

/// As [`linked_collections`], retrying collection roots the device reports
/// not ready.
async fn ready_collections<C: Connection>(
    conn: &C,
    parents: &Snapshot,
    pointer: &str,
    policy: &RetryPolicy,
) -> Result<Snapshot, Error<C>> {
    let mut combined = Snapshot::default();
    for (endpoint, document) in parents.iter() {
        match document.link_at(pointer) {
            Some(link) => combined.merge(walk_ready(conn, &link, policy).await?),
            None => warn!(parent = %endpoint, pointer, "sub-collection link missing"),
        }
    }
    Ok(combined)
}

/// Walk the Smart Storage controller chain of every system:
/// `Oem.Hpe.Links.SmartStorage` → `Links.<kind>` → members.
async fn controller_collections<C: Connection>(
    conn: &C,
    parents: &Snapshot,
    kind: &str,
    policy: &RetryPolicy,
) -> Result<Snapshot, Error<C>> {
    let mut combined = Snapshot::default();
    for (_, document) in parents.iter() {
        let view = ComputerSystemView::from_document(document);
        let smart = match view.smart_storage {
            Some(smart) => smart,
            None => continue,
        };
        let smart_doc = fetch_ready(conn, &smart, policy).await?;
        let link = match smart_doc.link_at(&format!("/Links/{kind}")) {
            Some(link) => link,
            None => continue,
        };
        combined.merge(walk_ready(conn, &link, policy).await?);
    }
    Ok(combined)
}
