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

//! Expectations for the mock connection.

use http::StatusCode;
use ilo_redfish_core::Document;
use ilo_redfish_core::Endpoint;
use ilo_redfish_core::Response;
use serde_json::Value as JsonValue;

/// Request the mock connection expects next.
#[derive(Debug)]
pub enum ExpectedRequest {
    /// Expected GET.
    Get { endpoint: Endpoint },
    /// Expected POST with the exact request body.
    Post {
        endpoint: Endpoint,
        request: JsonValue,
    },
    /// Expected PUT with the exact request body.
    Put {
        endpoint: Endpoint,
        request: JsonValue,
    },
    /// Expected PATCH with the exact request body.
    Patch {
        endpoint: Endpoint,
        request: JsonValue,
    },
    /// Expected DELETE.
    Delete { endpoint: Endpoint },
}

/// One scripted exchange: the request the test expects the code under test
/// to issue, and the response the mock answers with.
#[derive(Debug)]
pub struct Expect {
    pub request: ExpectedRequest,
    pub response: Response,
}

fn respond(status: u16, body: JsonValue) -> Response {
    Response {
        status: StatusCode::from_u16(status).expect("valid status code"),
        document: Document::new(body),
    }
}

impl Expect {
    /// Expect a GET answered with `response` and status 200.
    pub fn get(endpoint: impl Into<Endpoint>, response: JsonValue) -> Self {
        Self::get_with_status(endpoint, 200, response)
    }

    /// Expect a GET answered with `response` and an explicit status.
    pub fn get_with_status(
        endpoint: impl Into<Endpoint>,
        status: u16,
        response: JsonValue,
    ) -> Self {
        Expect {
            request: ExpectedRequest::Get {
                endpoint: endpoint.into(),
            },
            response: respond(status, response),
        }
    }

    /// Expect a POST of exactly `request`, answered with `response`.
    pub fn post(
        endpoint: impl Into<Endpoint>,
        request: JsonValue,
        response: JsonValue,
    ) -> Self {
        Expect {
            request: ExpectedRequest::Post {
                endpoint: endpoint.into(),
                request,
            },
            response: respond(200, response),
        }
    }

    /// Expect a PUT of exactly `request`, answered with `response`.
    pub fn put(
        endpoint: impl Into<Endpoint>,
        request: JsonValue,
        response: JsonValue,
    ) -> Self {
        Expect {
            request: ExpectedRequest::Put {
                endpoint: endpoint.into(),
                request,
            },
            response: respond(200, response),
        }
    }

    /// Expect a PATCH of exactly `request`, answered with `response`.
    pub fn patch(
        endpoint: impl Into<Endpoint>,
        request: JsonValue,
        response: JsonValue,
    ) -> Self {
        Expect {
            request: ExpectedRequest::Patch {
                endpoint: endpoint.into(),
                request,
            },
            response: respond(200, response),
        }
    }

    /// Expect a DELETE answered with an empty 200.
    pub fn delete(endpoint: impl Into<Endpoint>) -> Self {
        Expect {
            request: ExpectedRequest::Delete {
                endpoint: endpoint.into(),
            },
            response: Response::ok(Document::empty()),
        }
    }
}
