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

//! Connection abstraction over the management-controller transport
//!
//! [`Connection`] is the minimal transport-agnostic interface the
//! orchestration layer is written against: the five HTTP verbs applied to
//! an [`Endpoint`], each yielding a [`Response`]. Implementors only move
//! bytes; they never interpret the error envelope, never retry, and never
//! follow links — that is the caller's job.
//!
//! Operation semantics:
//! - `get` fetches the resource at the endpoint.
//! - `post` creates a collection member or invokes an action target.
//! - `put` replaces a document (used for staged-settings writes).
//! - `patch` updates fields of a live resource.
//! - `delete` removes the resource; the response body may be empty.
//!
//! Notes for implementors:
//! - The trait is `Send + Sync` and returns `Send` futures so aggregates
//!   can be driven from any async runtime.
//! - A transport error means the device was unreachable or the body was
//!   undecodable; an application-level failure travels inside the returned
//!   document instead.

use crate::Document;
use crate::Endpoint;
use http::StatusCode;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;

/// Decoded outcome of one transport round trip.
///
/// The embedded error envelope, not `status`, is the authoritative
/// success/failure signal; `status` is carried for the few places that need
/// it (absent optional collections report 404 with no useful envelope).
#[derive(Debug, Clone)]
pub struct Response {
    /// Transport status code.
    pub status: StatusCode,
    /// Decoded response body; `Null` for bodyless responses.
    pub document: Document,
}

impl Response {
    /// A 200 response around `document`.
    #[must_use]
    pub const fn ok(document: Document) -> Self {
        Self {
            status: StatusCode::OK,
            document,
        }
    }

    /// The document's error envelope, if any.
    #[must_use]
    pub fn error(&self) -> Option<crate::ErrorEnvelope> {
        self.document.error()
    }
}

/// Transport interface to one management controller.
pub trait Connection: Send + Sync {
    /// Transport error.
    type Error: StdError + Send + Sync;

    /// Fetch the resource at `endpoint`.
    fn get(
        &self,
        endpoint: &Endpoint,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Create a member of the collection at `endpoint`, or invoke an
    /// action target.
    fn post(
        &self,
        endpoint: &Endpoint,
        body: &JsonValue,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Replace the document at `endpoint`.
    fn put(
        &self,
        endpoint: &Endpoint,
        body: &JsonValue,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Update fields of the resource at `endpoint`.
    fn patch(
        &self,
        endpoint: &Endpoint,
        body: &JsonValue,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Remove the resource at `endpoint`.
    fn delete(
        &self,
        endpoint: &Endpoint,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

/// Credentials used to access the management controller.
///
/// Security notes:
/// - `Debug`/`Display` redact the password.
/// - Prefer short-lived instances and avoid logging credentials.
#[derive(Clone)]
pub struct Credentials {
    /// Username to authenticate with.
    pub username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    #[must_use]
    pub const fn new(username: String, password: String) -> Self {
        Self { username, password }
    }

    /// Get password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Credentials(username: {}, password: [REDACTED])",
            self.username
        )
    }
}
