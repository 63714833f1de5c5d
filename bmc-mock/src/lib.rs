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

//! Scripted mock implementation of the transport [`IloConnection`] trait.
//!
//! Tests queue [`Expect`] entries in the order the code under test must
//! issue them; each request pops the front of the queue, is matched against
//! the expectation (verb, endpoint, and exact body for writes), and is
//! answered with the scripted response. Any mismatch or unexpected request
//! fails the exchange with a descriptive error, and
//! [`Connection::verify_empty`] asserts the script was fully consumed.

pub mod expect;

#[doc(inline)]
pub use expect::Expect;
pub use expect::ExpectedRequest;

use ilo_redfish_core::Connection as IloConnection;
use ilo_redfish_core::Endpoint;
use ilo_redfish_core::Response;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Mutex;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum Error {
    MutexLock(String),
    NothingIsExpected(&'static str, Endpoint),
    UnexpectedGet(Endpoint, ExpectedRequest),
    UnexpectedPost(Endpoint, String, ExpectedRequest),
    UnexpectedPut(Endpoint, String, ExpectedRequest),
    UnexpectedPatch(Endpoint, String, ExpectedRequest),
    UnexpectedDelete(Endpoint, ExpectedRequest),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::MutexLock(err) => write!(f, "lock error: {err}"),
            Self::NothingIsExpected(verb, endpoint) => {
                write!(f, "nothing is expected but {verb} {endpoint} happened")
            }
            Self::UnexpectedGet(endpoint, expected) => {
                write!(f, "unexpected get: {endpoint}; expected: {expected:?}")
            }
            Self::UnexpectedPost(endpoint, json, expected) => {
                write!(
                    f,
                    "unexpected post: {endpoint}; json: {json} expected: {expected:?}"
                )
            }
            Self::UnexpectedPut(endpoint, json, expected) => {
                write!(
                    f,
                    "unexpected put: {endpoint}; json: {json} expected: {expected:?}"
                )
            }
            Self::UnexpectedPatch(endpoint, json, expected) => {
                write!(
                    f,
                    "unexpected patch: {endpoint}; json: {json} expected: {expected:?}"
                )
            }
            Self::UnexpectedDelete(endpoint, expected) => {
                write!(f, "unexpected delete: {endpoint}; expected: {expected:?}")
            }
        }
    }
}

impl StdError for Error {}

impl Error {
    pub fn mutex_lock<T>(err: PoisonError<T>) -> Self {
        Self::MutexLock(err.to_string())
    }
}

/// Mock connection driven by a FIFO expectation script.
#[derive(Default)]
pub struct Connection {
    expect: Mutex<VecDeque<Expect>>,
}

impl Connection {
    /// Queue one expected exchange.
    pub fn expect(&self, exp: Expect) {
        let expect: &mut VecDeque<Expect> = &mut self.expect.lock().expect("not poisoned");
        expect.push_back(exp);
    }

    /// Queue several expected exchanges in order.
    pub fn expect_all(&self, exps: impl IntoIterator<Item = Expect>) {
        let expect: &mut VecDeque<Expect> = &mut self.expect.lock().expect("not poisoned");
        expect.extend(exps);
    }

    /// Number of queued expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.expect.lock().expect("not poisoned").len()
    }

    /// Panic unless every queued expectation was consumed.
    pub fn verify_empty(&self) {
        let expect: &VecDeque<Expect> = &self.expect.lock().expect("not poisoned");
        assert!(
            expect.is_empty(),
            "unconsumed expectations left: {:#?}",
            expect
        );
    }

    fn pop(&self, verb: &'static str, endpoint: &Endpoint) -> Result<Expect, Error> {
        self.expect
            .lock()
            .map_err(Error::mutex_lock)?
            .pop_front()
            .ok_or_else(|| Error::NothingIsExpected(verb, endpoint.clone()))
    }
}

impl IloConnection for Connection {
    type Error = Error;

    async fn get(&self, in_endpoint: &Endpoint) -> Result<Response, Error> {
        let expect = self.pop("GET", in_endpoint)?;
        match expect {
            Expect {
                request: ExpectedRequest::Get { endpoint },
                response,
            } if endpoint == *in_endpoint => Ok(response),
            _ => Err(Error::UnexpectedGet(in_endpoint.clone(), expect.request)),
        }
    }

    async fn post(&self, in_endpoint: &Endpoint, body: &JsonValue) -> Result<Response, Error> {
        let expect = self.pop("POST", in_endpoint)?;
        match expect {
            Expect {
                request: ExpectedRequest::Post { endpoint, request },
                response,
            } if endpoint == *in_endpoint && request == *body => Ok(response),
            _ => Err(Error::UnexpectedPost(
                in_endpoint.clone(),
                body.to_string(),
                expect.request,
            )),
        }
    }

    async fn put(&self, in_endpoint: &Endpoint, body: &JsonValue) -> Result<Response, Error> {
        let expect = self.pop("PUT", in_endpoint)?;
        match expect {
            Expect {
                request: ExpectedRequest::Put { endpoint, request },
                response,
            } if endpoint == *in_endpoint && request == *body => Ok(response),
            _ => Err(Error::UnexpectedPut(
                in_endpoint.clone(),
                body.to_string(),
                expect.request,
            )),
        }
    }

    async fn patch(&self, in_endpoint: &Endpoint, body: &JsonValue) -> Result<Response, Error> {
        let expect = self.pop("PATCH", in_endpoint)?;
        match expect {
            Expect {
                request: ExpectedRequest::Patch { endpoint, request },
                response,
            } if endpoint == *in_endpoint && request == *body => Ok(response),
            _ => Err(Error::UnexpectedPatch(
                in_endpoint.clone(),
                body.to_string(),
                expect.request,
            )),
        }
    }

    async fn delete(&self, in_endpoint: &Endpoint) -> Result<Response, Error> {
        let expect = self.pop("DELETE", in_endpoint)?;
        match expect {
            Expect {
                request: ExpectedRequest::Delete { endpoint },
                response,
            } if endpoint == *in_endpoint => Ok(response),
            _ => Err(Error::UnexpectedDelete(in_endpoint.clone(), expect.request)),
        }
    }
}
