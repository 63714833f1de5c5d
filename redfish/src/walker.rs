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

//! Collection walking and snapshots
//!
//! A [`Snapshot`] is a point-in-time copy of one sub-collection: an ordered
//! list of `(endpoint, document)` pairs, one per member, in the
//! server-reported order. Snapshots are cached inside the domain aggregates
//! and mutated in place by the specific operation that changed them;
//! staleness is otherwise the caller's responsibility.
//!
//! [`walk`] resolves every member link of a collection resource and fetches
//! each member. Member fetches run concurrently (collections are small) but
//! the resulting snapshot preserves member order. A failure fetching the
//! root or any member fails the whole walk — there is no partial-success
//! mode, mirroring the device's expectation that collections are consistent
//! at a point in time.

use crate::Error;
use futures_util::future::try_join_all;
use http::StatusCode;
use ilo_redfish_core::codes;
use ilo_redfish_core::retry_until_ready;
use ilo_redfish_core::Connection;
use ilo_redfish_core::Document;
use ilo_redfish_core::Endpoint;
use ilo_redfish_core::RetryPolicy;
use tracing::debug;

/// Point-in-time copy of one sub-collection's members.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    members: Vec<(Endpoint, Document)>,
}

impl Snapshot {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the snapshot has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in server-reported order.
    pub fn iter(&self) -> impl Iterator<Item = &(Endpoint, Document)> {
        self.members.iter()
    }

    /// Member endpoints in server-reported order.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.members.iter().map(|(endpoint, _)| endpoint)
    }

    /// Member documents in server-reported order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.members.iter().map(|(_, document)| document)
    }

    /// First member, if any.
    #[must_use]
    pub fn first(&self) -> Option<&(Endpoint, Document)> {
        self.members.first()
    }

    /// Document of the member at `endpoint`.
    #[must_use]
    pub fn get(&self, endpoint: &Endpoint) -> Option<&Document> {
        self.members
            .iter()
            .find(|(e, _)| e == endpoint)
            .map(|(_, document)| document)
    }

    /// First member whose document satisfies `predicate`.
    pub fn find<P>(&self, predicate: P) -> Option<&(Endpoint, Document)>
    where
        P: Fn(&Document) -> bool,
    {
        self.members.iter().find(|(_, document)| predicate(document))
    }

    /// Append a member, replacing any existing entry at the same endpoint
    /// (endpoints are unique within one snapshot).
    pub fn push(&mut self, endpoint: Endpoint, document: Document) {
        if let Some(existing) = self.members.iter_mut().find(|(e, _)| *e == endpoint) {
            existing.1 = document;
        } else {
            self.members.push((endpoint, document));
        }
    }

    /// Remove the member at `endpoint`, returning its document.
    pub fn remove(&mut self, endpoint: &Endpoint) -> Option<Document> {
        let index = self.members.iter().position(|(e, _)| e == endpoint)?;
        Some(self.members.remove(index).1)
    }

    /// Append every member of `other`, preserving order.
    pub fn merge(&mut self, other: Snapshot) {
        for (endpoint, document) in other.members {
            self.push(endpoint, document);
        }
    }
}

/// Fetch one resource, surfacing an embedded error envelope as a device
/// error.
///
/// # Errors
///
/// Returns [`Error::Transport`] on transport failure and [`Error::Device`]
/// if the fetched document carries an error envelope.
pub async fn fetch_document<C: Connection>(
    conn: &C,
    endpoint: &Endpoint,
) -> Result<Document, Error<C>> {
    let response = conn.get(endpoint).await.map_err(Error::Transport)?;
    match response.document.error() {
        Some(envelope) => Err(Error::Device(envelope)),
        None => Ok(response.document),
    }
}

/// Fetch one resource, retrying while the device reports it not ready.
///
/// # Errors
///
/// In addition to [`fetch_document`]'s failures, returns
/// [`Error::NotReadyDeadline`] if the policy's attempt ceiling is reached.
pub async fn fetch_ready<C: Connection>(
    conn: &C,
    endpoint: &Endpoint,
    policy: &RetryPolicy,
) -> Result<Document, Error<C>> {
    let response =
        retry_until_ready(policy, codes::RESOURCE_NOT_READY_RETRY, || conn.get(endpoint)).await?;
    match response.document.error() {
        Some(envelope) => Err(Error::Device(envelope)),
        None => Ok(response.document),
    }
}

async fn collect_members<C: Connection>(
    conn: &C,
    endpoint: &Endpoint,
    root: &Document,
) -> Result<Snapshot, Error<C>> {
    let links = root.member_links();
    debug!(collection = %endpoint, members = links.len(), "walking collection");

    let fetches = links.into_iter().map(|link| async move {
        let document = fetch_document(conn, &link).await?;
        Ok::<_, Error<C>>((link, document))
    });
    let members = try_join_all(fetches).await?;

    Ok(Snapshot { members })
}

/// Walk a collection resource into a [`Snapshot`].
///
/// # Errors
///
/// Fails the whole walk if the root fetch or any member fetch fails.
pub async fn walk<C: Connection>(conn: &C, endpoint: &Endpoint) -> Result<Snapshot, Error<C>> {
    let root = fetch_document(conn, endpoint).await?;
    collect_members(conn, endpoint, &root).await
}

/// Walk a collection resource, retrying the root fetch while the device
/// reports it not ready.
///
/// # Errors
///
/// As [`walk`], plus [`Error::NotReadyDeadline`] on poller exhaustion.
pub async fn walk_ready<C: Connection>(
    conn: &C,
    endpoint: &Endpoint,
    policy: &RetryPolicy,
) -> Result<Snapshot, Error<C>> {
    let root = fetch_ready(conn, endpoint, policy).await?;
    collect_members(conn, endpoint, &root).await
}

/// Walk a collection that may not exist on this device.
///
/// A not-found root yields an empty snapshot instead of an error; machines
/// without the optional service simply contribute no members.
///
/// # Errors
///
/// As [`walk`] for any failure other than a not-found root.
pub async fn walk_linked<C: Connection>(
    conn: &C,
    endpoint: &Endpoint,
) -> Result<Snapshot, Error<C>> {
    let response = conn.get(endpoint).await.map_err(Error::Transport)?;
    if response.status == StatusCode::NOT_FOUND {
        debug!(collection = %endpoint, "optional collection absent");
        return Ok(Snapshot::default());
    }
    match response.document.error() {
        Some(envelope) => Err(Error::Device(envelope)),
        None => collect_members(conn, endpoint, &response.document).await,
    }
}
