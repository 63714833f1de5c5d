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

//! Transport primitives for the iLO Redfish orchestration client.
//!
//! This crate is the sole point of contact with the wire. It knows nothing
//! about Systems, Storage or Accounts; it provides:
//!
//! - [`Endpoint`]: the opaque `@odata.id` resource path.
//! - [`Document`]: the generic JSON tree one fetch returns, with accessors
//!   for the handful of hypermedia conventions the device uses (member
//!   links, action targets, the staged-settings link, the error envelope).
//! - [`Connection`]: the transport trait (GET/POST/PUT/PATCH/DELETE against
//!   an [`Endpoint`], yielding a [`Response`]).
//! - [`retry_until_ready`]: a bounded poll loop for resources the device
//!   reports as transiently unready.
//! - An HTTP implementation of [`Connection`] built on reqwest (feature
//!   `reqwest`, enabled by default).
//!
//! The application-level error envelope embedded in a response body, not the
//! HTTP status code, is the authoritative success signal; see
//! [`document::ErrorEnvelope`].

pub mod connection;
pub mod document;
pub mod http;
pub mod odata;
pub mod retry;

pub use connection::Connection;
pub use connection::Credentials;
pub use connection::Response;
pub use document::codes;
pub use document::Document;
pub use document::ErrorEnvelope;
pub use document::ExtendedInfo;
pub use crate::http::HttpClient;
pub use crate::http::HttpConnection;
pub use crate::http::ServiceEndpoint;
pub use odata::Endpoint;
pub use retry::retry_until_ready;
pub use retry::RetryError;
pub use retry::RetryPolicy;

#[cfg(feature = "reqwest")]
pub use crate::http::HttpError;
#[cfg(feature = "reqwest")]
pub use crate::http::ReqwestClient;
#[cfg(feature = "reqwest")]
pub use crate::http::ReqwestClientParams;
