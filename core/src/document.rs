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

//! Generic resource document tree
//!
//! One fetch yields one [`Document`]: an arbitrarily nested JSON value
//! representing the remote resource's state at that instant. Documents stay
//! untyped at the transport boundary; callers convert them into typed
//! records with [`Document::decode`] immediately after fetch instead of
//! threading raw maps through their logic.
//!
//! The accessors here cover the hypermedia conventions the device relies
//! on:
//! - `Members[].@odata.id` collection links ([`Document::member_links`])
//! - `Actions.#<Name>.target` action targets ([`Document::action_target`])
//! - the `@Redfish.Settings.SettingsObject` staged-settings link
//!   ([`Document::settings_object`])
//! - the `error.@Message.ExtendedInfo` envelope ([`Document::error`])
//!
//! The envelope is the primary success/failure signal throughout the
//! client: a 2xx response that carries an envelope is a failure, and some
//! envelopes (not-ready, reset-required) drive control flow rather than
//! surfacing as errors.

use crate::Endpoint;
use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FmtResult;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Message-registry short codes the orchestration layer reacts to.
///
/// A short code is the last dot-separated segment of an extended-info
/// message identifier, e.g. `iLO.2.14.SystemResetRequired` →
/// `SystemResetRequired`.
pub mod codes {
    /// The device has not finished materializing the resource; retry later.
    pub const RESOURCE_NOT_READY_RETRY: &str = "ResourceNotReadyRetry";
    /// The staged change requires a system reset to take effect.
    pub const SYSTEM_RESET_REQUIRED: &str = "SystemResetRequired";
    /// A resource with the submitted identity already exists.
    pub const RESOURCE_ALREADY_EXISTS: &str = "ResourceAlreadyExists";
    /// A submitted property value is incompatible with the resource.
    pub const PROPERTY_VALUE_INCOMPATIBLE: &str = "PropertyValueIncompatible";
}

/// One remote resource's state as observed by a single fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(JsonValue);

impl Document {
    /// Wrap a decoded JSON value.
    #[must_use]
    pub const fn new(value: JsonValue) -> Self {
        Self(value)
    }

    /// Document for a bodyless response.
    #[must_use]
    pub const fn empty() -> Self {
        Self(JsonValue::Null)
    }

    /// The underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &JsonValue {
        &self.0
    }

    /// Consume the document, returning the underlying JSON value.
    #[must_use]
    pub fn into_value(self) -> JsonValue {
        self.0
    }

    /// Value at a JSON pointer, if present.
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&JsonValue> {
        self.0.pointer(pointer)
    }

    /// String value at a JSON pointer, if present.
    #[must_use]
    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(JsonValue::as_str)
    }

    /// The document's own `@odata.id`, if present.
    #[must_use]
    pub fn odata_id(&self) -> Option<Endpoint> {
        self.str_at("/@odata.id").map(Endpoint::from)
    }

    /// Link (`@odata.id`) found under the object at `pointer`.
    #[must_use]
    pub fn link_at(&self, pointer: &str) -> Option<Endpoint> {
        self.0
            .pointer(pointer)
            .and_then(|v| v.get("@odata.id"))
            .and_then(JsonValue::as_str)
            .map(Endpoint::from)
    }

    /// All `Members[].@odata.id` links, preserving the server-reported
    /// member order.
    #[must_use]
    pub fn member_links(&self) -> Vec<Endpoint> {
        self.0
            .get("Members")
            .and_then(JsonValue::as_array)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|m| m.get("@odata.id"))
                    .filter_map(JsonValue::as_str)
                    .map(Endpoint::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Target endpoint of the named action, e.g.
    /// `action_target("#ComputerSystem.Reset")`.
    #[must_use]
    pub fn action_target(&self, action: &str) -> Option<Endpoint> {
        self.0
            .get("Actions")
            .and_then(|actions| actions.get(action))
            .and_then(|action| action.get("target"))
            .and_then(JsonValue::as_str)
            .map(Endpoint::from)
    }

    /// Endpoint of the resource's staged-settings object
    /// (`@Redfish.Settings.SettingsObject`), if the resource stages writes.
    #[must_use]
    pub fn settings_object(&self) -> Option<Endpoint> {
        self.0
            .get("@Redfish.Settings")
            .and_then(|settings| settings.get("SettingsObject"))
            .and_then(|object| object.get("@odata.id"))
            .and_then(JsonValue::as_str)
            .map(Endpoint::from)
    }

    /// The application-level error envelope, if the document carries one.
    #[must_use]
    pub fn error(&self) -> Option<ErrorEnvelope> {
        self.0
            .get("error")
            .and_then(|e| serde_json::from_value(e.clone()).ok())
    }

    /// Convert the document into a typed record.
    ///
    /// # Errors
    ///
    /// Returns the underlying serde error if the document does not match
    /// `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.0.clone())
    }
}

impl From<JsonValue> for Document {
    fn from(value: JsonValue) -> Self {
        Self(value)
    }
}

/// Application-level error envelope carried inside a response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// Registry-qualified error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable summary.
    #[serde(default)]
    pub message: Option<String>,
    /// Ordered extended-info entries; the first entry's message identifier
    /// is the authoritative signal.
    #[serde(rename = "@Message.ExtendedInfo", default)]
    pub extended_info: Vec<ExtendedInfo>,
}

/// One `@Message.ExtendedInfo` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedInfo {
    /// Dot-qualified message identifier, e.g. `iLO.2.14.SystemResetRequired`.
    #[serde(rename = "MessageId")]
    pub message_id: String,
    /// Optional message arguments.
    #[serde(rename = "MessageArgs", default)]
    pub message_args: Vec<JsonValue>,
}

impl ErrorEnvelope {
    /// Last dot-separated segment of the first extended-info message
    /// identifier.
    #[must_use]
    pub fn short_code(&self) -> Option<&str> {
        self.extended_info
            .first()
            .and_then(|info| info.message_id.rsplit('.').next())
    }

    /// Whether the envelope's short code equals `code`.
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        self.short_code() == Some(code)
    }

    /// First message argument of the first extended-info entry, rendered
    /// as a string.
    #[must_use]
    pub fn first_arg(&self) -> Option<String> {
        self.extended_info
            .first()
            .and_then(|info| info.message_args.first())
            .map(|arg| match arg.as_str() {
                Some(s) => s.to_string(),
                None => arg.to_string(),
            })
    }
}

impl Display for ErrorEnvelope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.extended_info.first() {
            Some(info) => write!(f, "{}", info.message_id),
            None => match &self.message {
                Some(message) => write!(f, "{message}"),
                None => write!(f, "unspecified device error"),
            },
        }
    }
}
