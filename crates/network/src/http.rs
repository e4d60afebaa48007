// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2025 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! A thin HTTP transport on top of [`reqwest`].
//!
//! The client returns the raw response for every HTTP status; interpreting the status and the
//! payload is the caller's concern. Failures to obtain a response at all are classified into
//! connection, timeout and other transport errors so callers can decide their retry policy.

use std::{collections::HashMap, error::Error as StdError, time::Duration};

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use reqwest::Method;
use thiserror::Error;

/// A raw HTTP response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The response headers (values which are not valid UTF-8 are omitted).
    pub headers: HashMap<String, String>,
    /// The raw response body.
    pub body: Bytes,
}

/// Errors raised by [`HttpClient`].
#[derive(Debug, Clone, Error)]
pub enum HttpClientError {
    /// The connection could not be established.
    #[error("Connection error: {0}")]
    ConnectError(String),
    /// The request or response body timed out.
    #[error("Timeout error: {0}")]
    TimeoutError(String),
    /// Any other failure while the request was in flight (reset, broken body, protocol error).
    #[error("HTTP error: {0}")]
    Error(String),
    /// The request could not be built (invalid header, URL or method).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// The underlying client could not be constructed.
    #[error("Client build error: {0}")]
    ClientBuildError(String),
}

impl HttpClientError {
    /// Returns `true` if the failure happened on the network rather than in request building.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectError(_) | Self::TimeoutError(_) | Self::Error(_)
        )
    }
}

impl From<reqwest::Error> for HttpClientError {
    fn from(error: reqwest::Error) -> Self {
        let message = error_chain(&error);
        if error.is_timeout() {
            Self::TimeoutError(message)
        } else if error.is_connect() {
            Self::ConnectError(message)
        } else if error.is_builder() {
            Self::InvalidRequest(message)
        } else {
            Self::Error(message)
        }
    }
}

// reqwest puts the interesting part (refused, reset, ...) in the source chain
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// An HTTP client sharing a single connection pool across all callers.
///
/// Cloning is cheap and clones share the pool.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Creates a new [`HttpClient`] sending `headers` with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if a header is invalid or the client cannot be constructed.
    pub fn new(
        headers: HashMap<String, String>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, HttpClientError> {
        let default_headers = to_header_map(&headers)?;

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| HttpClientError::ClientBuildError(error_chain(&e)))?;

        Ok(Self { client })
    }

    /// Sends a request and returns the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built, the connection cannot be established,
    /// the request times out, or the connection fails before the full body is received.
    pub async fn request(
        &self,
        method: Method,
        url: String,
        headers: Option<HashMap<String, String>>,
        body: Option<Vec<u8>>,
        timeout_secs: Option<u64>,
    ) -> Result<HttpResponse, HttpClientError> {
        let mut request = self.client.request(method, url);

        if let Some(headers) = headers {
            request = request.headers(to_header_map(&headers)?);
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        if let Some(secs) = timeout_secs {
            request = request.timeout(Duration::from_secs(secs));
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response.bytes().await?;

        tracing::trace!("HTTP response {status} ({} bytes)", body.len());

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, HttpClientError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| HttpClientError::InvalidRequest(format!("header '{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| HttpClientError::InvalidRequest(format!("header '{key}': {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_invalid_default_header_rejected() {
        let headers = HashMap::from([("bad header".to_string(), "x".to_string())]);
        let result = HttpClient::new(headers, None);
        assert!(matches!(result, Err(HttpClientError::InvalidRequest(_))));
    }

    #[rstest]
    fn test_transport_classification() {
        assert!(HttpClientError::ConnectError("refused".to_string()).is_transport());
        assert!(HttpClientError::TimeoutError("slow".to_string()).is_transport());
        assert!(HttpClientError::Error("reset".to_string()).is_transport());
        assert!(!HttpClientError::InvalidRequest("bad".to_string()).is_transport());
    }

    #[rstest]
    fn test_error_display() {
        let error = HttpClientError::TimeoutError("operation timed out".to_string());
        assert_eq!(error.to_string(), "Timeout error: operation timed out");
    }
}
