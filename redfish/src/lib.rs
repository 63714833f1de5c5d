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

//! Client-side orchestration of an HPE iLO management controller.
//!
//! The device exposes a hypermedia graph of linked JSON documents. This
//! crate provides the orchestration layer over that graph:
//!
//! - **Discovery**: the domain aggregates ([`Systems`], [`Managers`],
//!   [`UpdateService`], [`Users`]) eagerly walk their sub-collections at
//!   construction into in-memory [`walker::Snapshot`]s and serve read
//!   projections from them.
//! - **Staged configuration**: changes the device cannot apply live are
//!   PUT to a settings object and, when the device demands it, applied by
//!   triggering a reset ([`settings::commit_staged`]).
//! - **Convergence**: power state and POST progress are converged before
//!   post-boot resources are queried ([`power`]), and transiently unready
//!   resources are retried with a bounded poll
//!   ([`ilo_redfish_core::retry_until_ready`]).
//! - **Reconciliation**: declared state (a logical drive, an account, a
//!   maintenance window) is converted into the minimal set of writes, with
//!   verdicts returned as [`Reconciliation`] values the front-end can
//!   present uniformly.
//!
//! One aggregate owns one authenticated connection; nothing is persisted
//! beyond the connection's lifetime. Callers mutating the same controller
//! concurrently must serialize staged-settings commits per device
//! externally.

pub mod error;
pub mod managers;
pub mod outcome;
pub mod power;
pub mod schema;
pub mod settings;
pub mod systems;
pub mod time_format;
pub mod update_service;
pub mod users;
pub mod walker;

pub use error::Error;
pub use managers::Managers;
pub use outcome::Reconciliation;
pub use outcome::RejectKind;
pub use power::ensure_powered_and_posted;
pub use power::PowerPolicy;
pub use schema::account::AccountRequest;
pub use schema::maintenance::MaintenanceWindowRequest;
pub use schema::storage::LogicalDriveSpec;
pub use settings::commit_staged;
pub use settings::SettingsRef;
pub use systems::Systems;
pub use systems::SystemsPolicy;
pub use time_format::normalize_instant;
pub use time_format::TimeFormatError;
pub use update_service::UpdateService;
pub use users::Users;
pub use walker::walk;
pub use walker::walk_linked;
pub use walker::walk_ready;
pub use walker::Snapshot;
