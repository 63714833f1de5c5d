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

//! Users domain aggregate
//!
//! [`Users`] owns a snapshot of the manager accounts collection.
//! Existence checks use a fresh walk rather than the cache — accounts must
//! reflect current device state — while the cached snapshot is kept
//! current by appending created accounts and removing deleted ones.
//! Local rejections (duplicate username on create, unknown username on
//! delete) are produced before any network write.

use crate::outcome::Reconciliation;
use crate::outcome::RejectKind;
use crate::schema::account::AccountRequest;
use crate::schema::account::AccountView;
use crate::walker::walk;
use crate::walker::Snapshot;
use crate::Error;
use ilo_redfish_core::Connection;
use ilo_redfish_core::Document;
use ilo_redfish_core::Endpoint;
use std::sync::Arc;
use tracing::info;

/// Manager accounts collection endpoint.
pub const ACCOUNTS_ENDPOINT: &str = "/redfish/v1/AccountService/Accounts";

/// Per-connection aggregate over the manager accounts collection.
pub struct Users<C: Connection> {
    conn: Arc<C>,
    accounts: Snapshot,
}

impl<C: Connection> Users<C> {
    /// Construct the aggregate, eagerly walking the accounts collection.
    ///
    /// # Errors
    ///
    /// Fails if the walk fails.
    pub async fn new(conn: Arc<C>) -> Result<Self, Error<C>> {
        let accounts = walk(conn.as_ref(), &Endpoint::from(ACCOUNTS_ENDPOINT)).await?;
        Ok(Self { conn, accounts })
    }

    /// Snapshot of the accounts collection members.
    #[must_use]
    pub fn accounts(&self) -> &Snapshot {
        &self.accounts
    }

    /// Look an account up by username against current device state
    /// (fresh walk, not the cache).
    ///
    /// # Errors
    ///
    /// Fails if the walk fails.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<(Endpoint, Document)>, Error<C>> {
        let walked = walk(self.conn.as_ref(), &Endpoint::from(ACCOUNTS_ENDPOINT)).await?;
        Ok(walked
            .find(|document| {
                document
                    .decode::<AccountView>()
                    .map(|view| view.username.as_deref() == Some(username))
                    .unwrap_or(false)
            })
            .cloned())
    }

    /// Reconcile "this account should exist".
    ///
    /// A username already present on the device is a local rejection with
    /// no network write. On success the created account's document is
    /// appended to the cached snapshot.
    ///
    /// # Errors
    ///
    /// Fatal kinds only; rejections travel inside the verdict.
    pub async fn create_account(
        &mut self,
        request: &AccountRequest,
    ) -> Result<Reconciliation, Error<C>> {
        if self.find_by_username(&request.username).await?.is_some() {
            return Ok(Reconciliation::rejected(RejectKind::AccountAlreadyPresent(
                request.username.clone(),
            )));
        }

        let response = self
            .conn
            .post(&Endpoint::from(ACCOUNTS_ENDPOINT), &request.body())
            .await
            .map_err(Error::Transport)?;
        if let Some(envelope) = response.document.error() {
            return Err(Error::Device(envelope));
        }

        info!(username = %request.username, "account created");
        if let Some(endpoint) = response.document.odata_id() {
            self.accounts.push(endpoint, response.document.clone());
        }
        Ok(Reconciliation::applied_with_message(
            Some(response.document),
            "Resource created successfully.",
        ))
    }

    /// Reconcile "this account should not exist".
    ///
    /// An unknown username is a local rejection with no network write. On
    /// success the account is removed from the cached snapshot.
    ///
    /// # Errors
    ///
    /// Fatal kinds only; rejections travel inside the verdict.
    pub async fn delete_account(&mut self, username: &str) -> Result<Reconciliation, Error<C>> {
        let (endpoint, _) = match self.find_by_username(username).await? {
            Some(found) => found,
            None => {
                return Ok(Reconciliation::rejected(RejectKind::AccountNotExisted(
                    username.to_string(),
                )))
            }
        };

        let response = self
            .conn
            .delete(&endpoint)
            .await
            .map_err(Error::Transport)?;
        if let Some(envelope) = response.document.error() {
            return Err(Error::Device(envelope));
        }

        info!(username, "account deleted");
        self.accounts.remove(&endpoint);
        Ok(Reconciliation::applied_with_message(
            None,
            format!("Account {username} deleted successfully."),
        ))
    }
}
