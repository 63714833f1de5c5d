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

//! HTTP implementation of [`Connection`]
//!
//! [`HttpConnection`] combines an [`HttpClient`] with the device's base URL
//! and credentials. [`ReqwestClient`] (feature `reqwest`) is the provided
//! client; [`ReqwestClientParams`] configures timeouts, the user agent,
//! redirect limits and TLS-certificate tolerance — BMCs commonly serve
//! self-signed certificates.
//!
//! A non-2xx status whose body decodes as JSON is returned as a normal
//! [`Response`]: the device reports application failures through the error
//! envelope in the body, and callers must see that envelope rather than a
//! transport error.

use crate::Connection;
use crate::Credentials;
use crate::Document;
use crate::Endpoint;
use crate::Response;
use serde_json::Value as JsonValue;
use std::error::Error as StdError;
use std::future::Future;
use url::Url;

#[cfg(feature = "reqwest")]
use std::time::Duration;

/// Minimal HTTP client interface used by [`HttpConnection`].
pub trait HttpClient: Send + Sync {
    /// Client error.
    type Error: Send + StdError;

    /// Perform an HTTP GET request.
    fn get(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Perform an HTTP POST request.
    fn post(
        &self,
        url: Url,
        body: &JsonValue,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Perform an HTTP PUT request.
    fn put(
        &self,
        url: Url,
        body: &JsonValue,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Perform an HTTP PATCH request.
    fn patch(
        &self,
        url: Url,
        body: &JsonValue,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;

    /// Perform an HTTP DELETE request.
    fn delete(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Response, Self::Error>> + Send;
}

/// Base URL of one device's Redfish service.
///
/// Provides conversion from an [`Endpoint`] path to a full request URL.
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    base_url: Url,
}

impl ServiceEndpoint {
    /// Create a new `ServiceEndpoint` from a base URL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Full request URL for one resource endpoint.
    #[must_use]
    pub fn with_path(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(endpoint.as_str());
        url
    }
}

impl From<Url> for ServiceEndpoint {
    fn from(url: Url) -> Self {
        Self::new(url)
    }
}

/// HTTP-based [`Connection`] to one management controller.
///
/// # Examples
///
/// ```rust,no_run
/// use ilo_redfish_core::http::HttpConnection;
/// use ilo_redfish_core::http::ReqwestClient;
/// use ilo_redfish_core::Credentials;
/// use url::Url;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("admin".to_string(), "password".to_string());
/// let client = ReqwestClient::new()?;
/// let base = Url::parse("https://192.168.1.100")?;
///
/// let connection = HttpConnection::new(client, base, credentials);
/// # Ok(())
/// # }
/// ```
pub struct HttpConnection<C: HttpClient> {
    client: C,
    endpoint: ServiceEndpoint,
    credentials: Credentials,
}

impl<C: HttpClient> HttpConnection<C> {
    /// Create a new HTTP-based connection.
    pub fn new(client: C, base_url: Url, credentials: Credentials) -> Self {
        Self {
            client,
            endpoint: ServiceEndpoint::from(base_url),
            credentials,
        }
    }
}

impl<C: HttpClient> Connection for HttpConnection<C>
where
    C::Error: Sync,
{
    type Error = C::Error;

    async fn get(&self, endpoint: &Endpoint) -> Result<Response, Self::Error> {
        let url = self.endpoint.with_path(endpoint);
        self.client.get(url, &self.credentials).await
    }

    async fn post(&self, endpoint: &Endpoint, body: &JsonValue) -> Result<Response, Self::Error> {
        let url = self.endpoint.with_path(endpoint);
        self.client.post(url, body, &self.credentials).await
    }

    async fn put(&self, endpoint: &Endpoint, body: &JsonValue) -> Result<Response, Self::Error> {
        let url = self.endpoint.with_path(endpoint);
        self.client.put(url, body, &self.credentials).await
    }

    async fn patch(&self, endpoint: &Endpoint, body: &JsonValue) -> Result<Response, Self::Error> {
        let url = self.endpoint.with_path(endpoint);
        self.client.patch(url, body, &self.credentials).await
    }

    async fn delete(&self, endpoint: &Endpoint) -> Result<Response, Self::Error> {
        let url = self.endpoint.with_path(endpoint);
        self.client.delete(url, &self.credentials).await
    }
}

#[cfg(feature = "reqwest")]
#[derive(Debug)]
pub enum HttpError {
    /// Device unreachable or request failed at the transport level.
    Reqwest(reqwest::Error),
    /// Non-success status with a body that is not a JSON document.
    Status(http::StatusCode),
    /// Success status with an undecodable body.
    Json(serde_json::Error),
}

#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for HttpError {
    fn from(value: reqwest::Error) -> Self {
        Self::Reqwest(value)
    }
}

#[cfg(feature = "reqwest")]
#[allow(clippy::absolute_paths)]
impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reqwest(e) => write!(f, "HTTP client error: {e}"),
            Self::Status(status) => write!(f, "HTTP error status without JSON body: {status}"),
            Self::Json(e) => write!(f, "JSON conversion error: {e}"),
        }
    }
}

#[cfg(feature = "reqwest")]
#[allow(clippy::absolute_paths)]
impl std::error::Error for HttpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Reqwest(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Status(_) => None,
        }
    }
}

#[cfg(feature = "reqwest")]
/// Configuration parameters for the reqwest HTTP client.
///
/// # Examples
///
/// ```rust
/// use ilo_redfish_core::http::ReqwestClientParams;
/// use std::time::Duration;
///
/// let params = ReqwestClientParams::new()
///     .timeout(Duration::from_secs(30))
///     .connect_timeout(Duration::from_secs(10))
///     .user_agent("MyApp/1.0")
///     .accept_invalid_certs(true);
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClientParams {
    /// HTTP request timeout.
    pub timeout: Option<Duration>,
    /// TCP connection timeout.
    pub connect_timeout: Option<Duration>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// Whether to accept invalid TLS certificates.
    pub accept_invalid_certs: bool,
    /// Maximum number of HTTP redirects to follow.
    pub max_redirects: Option<usize>,
}

#[cfg(feature = "reqwest")]
impl Default for ReqwestClientParams {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(30)),
            connect_timeout: Some(Duration::from_secs(10)),
            user_agent: Some("ilo-redfish/0.1.0".to_string()),
            accept_invalid_certs: false,
            max_redirects: Some(10),
        }
    }
}

#[cfg(feature = "reqwest")]
impl ReqwestClientParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub const fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    #[must_use]
    pub const fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = Some(max);
        self
    }

    #[must_use]
    pub const fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }
}

#[cfg(feature = "reqwest")]
/// HTTP client implementation using the reqwest library.
pub struct ReqwestClient {
    client: reqwest::Client,
}

#[cfg(feature = "reqwest")]
#[allow(clippy::missing_errors_doc)]
#[allow(clippy::absolute_paths)]
impl ReqwestClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_params(ReqwestClientParams::default())
    }

    pub fn with_params(params: ReqwestClientParams) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = params.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(connect_timeout) = params.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        if let Some(user_agent) = params.user_agent {
            builder = builder.user_agent(user_agent);
        }

        if params.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(max_redirects) = params.max_redirects {
            builder = builder.redirect(reqwest::redirect::Policy::limited(max_redirects));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn handle_response(&self, response: reqwest::Response) -> Result<Response, HttpError> {
        let status = response.status();
        let bytes = response.bytes().await.map_err(HttpError::Reqwest)?;

        if bytes.is_empty() {
            return Ok(Response {
                status,
                document: Document::empty(),
            });
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(Response {
                status,
                document: Document::new(value),
            }),
            // The device answers application failures as JSON; a non-JSON
            // body only ever accompanies a transport-level failure.
            Err(err) if status.is_success() => Err(HttpError::Json(err)),
            Err(_) => Err(HttpError::Status(status)),
        }
    }
}

#[cfg(feature = "reqwest")]
impl HttpClient for ReqwestClient {
    type Error = HttpError;

    async fn get(&self, url: Url, credentials: &Credentials) -> Result<Response, Self::Error> {
        let response = self
            .client
            .get(url)
            .basic_auth(&credentials.username, Some(credentials.password()))
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn post(
        &self,
        url: Url,
        body: &JsonValue,
        credentials: &Credentials,
    ) -> Result<Response, Self::Error> {
        let response = self
            .client
            .post(url)
            .basic_auth(&credentials.username, Some(credentials.password()))
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn put(
        &self,
        url: Url,
        body: &JsonValue,
        credentials: &Credentials,
    ) -> Result<Response, Self::Error> {
        let response = self
            .client
            .put(url)
            .basic_auth(&credentials.username, Some(credentials.password()))
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn patch(
        &self,
        url: Url,
        body: &JsonValue,
        credentials: &Credentials,
    ) -> Result<Response, Self::Error> {
        let response = self
            .client
            .patch(url)
            .basic_auth(&credentials.username, Some(credentials.password()))
            .json(body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn delete(&self, url: Url, credentials: &Credentials) -> Result<Response, Self::Error> {
        let response = self
            .client
            .delete(url)
            .basic_auth(&credentials.username, Some(credentials.password()))
            .send()
            .await?;
        self.handle_response(response).await
    }
}
