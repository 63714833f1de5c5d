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

//! Reconciliation verdicts
//!
//! Every reconciliation operation answers with a [`Reconciliation`] value
//! rather than throwing: the front-end decides presentation (exit code,
//! message) uniformly from the success flag, the structured reject kind and
//! the message text. A rejected verdict never reports "changed", and local
//! rejections are produced before any network write.

use ilo_redfish_core::Document;
use std::fmt;

/// Structured reason a reconciliation request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectKind {
    /// Logical drive creation was requested without a raid level or
    /// without physical drives.
    LogicalDiskNotSpecified,
    /// Requested physical drives are not visible to the array controller;
    /// carries the offending identifiers.
    PhysicalDriveNotExisted(Vec<String>),
    /// An existing logical drive already uses exactly the requested
    /// physical-drive set.
    PhysicalDriveInUse,
    /// No staged logical drive matches the requested name or drive set.
    LogicalDiskNotFound,
    /// An account with the requested username already exists.
    AccountAlreadyPresent(String),
    /// No account with the requested username exists.
    AccountNotExisted(String),
    /// The device rejected a maintenance-window attribute; carries the
    /// offending value.
    MaintenanceAttributeError(String),
    /// The device reported the maintenance window as already existing.
    MaintenanceWindowExists(String),
}

impl fmt::Display for RejectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LogicalDiskNotSpecified => {
                write!(f, "Logical drive raid level and physical drives must be specified.")
            }
            Self::PhysicalDriveNotExisted(drives) => {
                write!(
                    f,
                    "Physical drives [{}] are not present on the array controller.",
                    drives.join(", ")
                )
            }
            Self::PhysicalDriveInUse => {
                write!(f, "Physical drive set is already used by an existing logical drive.")
            }
            Self::LogicalDiskNotFound => write!(f, "Logical drive not found."),
            Self::AccountAlreadyPresent(username) => {
                write!(f, "Account {username} is already present.")
            }
            Self::AccountNotExisted(username) => {
                write!(f, "Account {username} does not exist.")
            }
            Self::MaintenanceAttributeError(value) => {
                write!(
                    f,
                    "iLO - Error in attribute specified for maintenance window. Value is {value}"
                )
            }
            Self::MaintenanceWindowExists(_) => {
                write!(f, "iLO - Maintenance Window already exists")
            }
        }
    }
}

/// Verdict of one reconciliation operation.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Resource document the operation ended on: the commit response, the
    /// pre-existing resource for an already-satisfied request, or `None`
    /// when the operation left nothing to show (deletes, local rejects).
    pub document: Option<Document>,
    /// Whether the declared state now holds on the device.
    pub succeeded: bool,
    /// User-facing message; empty on an unremarkable success.
    pub message: String,
    /// Structured reason when the request was rejected.
    pub reject: Option<RejectKind>,
}

impl Reconciliation {
    /// A change was written to the device.
    #[must_use]
    pub fn applied(document: Document) -> Self {
        Self {
            document: Some(document),
            succeeded: true,
            message: String::new(),
            reject: None,
        }
    }

    /// A change was written to the device; report `message` to the user.
    pub fn applied_with_message(document: Option<Document>, message: impl Into<String>) -> Self {
        Self {
            document,
            succeeded: true,
            message: message.into(),
            reject: None,
        }
    }

    /// The declared state already held; no write was issued.
    #[must_use]
    pub fn satisfied(document: Document) -> Self {
        Self {
            document: Some(document),
            succeeded: true,
            message: String::new(),
            reject: None,
        }
    }

    /// The request was rejected; no change was applied.
    #[must_use]
    pub fn rejected(kind: RejectKind) -> Self {
        Self {
            document: None,
            succeeded: false,
            message: kind.to_string(),
            reject: Some(kind),
        }
    }

    /// The device rejected the request; keep its response document.
    #[must_use]
    pub fn rejected_with_document(kind: RejectKind, document: Document) -> Self {
        Self {
            document: Some(document),
            succeeded: false,
            message: kind.to_string(),
            reject: Some(kind),
        }
    }
}
