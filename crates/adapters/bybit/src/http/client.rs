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

//! Provides the HTTP client integration for the [Bybit](https://bybit.com) REST API.
//!
//! The client owns everything shared by the endpoints of one account: the connection pool,
//! the base URL, the signer and the category rate limiter. A request passes through three
//! steps, driven by [`crate::http::endpoint::BybitHttpEndpoint::call`]:
//!
//! 1. [`BybitHttpInnerClient::acquire`] waits for a rate-limit token.
//! 2. [`BybitHttpInnerClient::prepare`] encodes and signs the request without any I/O.
//! 3. [`BybitHttpInnerClient::dispatch`] performs exactly one network round trip.
//!
//! Bybit API reference <https://bybit-exchange.github.io/docs/>.

use std::{
    collections::HashMap,
    fmt::Debug,
    sync::Arc,
};

use reqwest::{
    Method,
    header::{CONTENT_TYPE, REFERER, USER_AGENT},
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tradeport_core::{consts::TRADEPORT_USER_AGENT, time::unix_time_ms};
use tradeport_network::{
    auth::{RequestSigner, SigningContext},
    http::{HttpClient, HttpClientError, HttpResponse},
    ratelimiter::{RateLimitPermit, RateLimiter},
};

use super::{endpoint::EndpointDescriptor, error::BybitHttpError};
use crate::{
    common::{consts::BYBIT_BROKER_ID, enums::BybitEndpointType},
    config::BybitHttpClientConfig,
};

/// A fully encoded and signed request, ready to be dispatched.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
    /// The HTTP method.
    pub method: Method,
    /// The absolute URL including any query string.
    pub url: String,
    /// The URL path the request targets (without base URL or query).
    pub url_path: String,
    /// Request specific headers (authentication, content type).
    pub headers: HashMap<String, String>,
    /// The encoded body for write requests.
    pub body: Option<Vec<u8>>,
}

/// Inner HTTP client implementation containing the actual HTTP logic.
pub struct BybitHttpInnerClient {
    base_url: String,
    client: HttpClient,
    signer: Option<Arc<dyn RequestSigner>>,
    rate_limiter: RateLimiter<BybitEndpointType>,
    cancellation_token: CancellationToken,
}

impl Debug for BybitHttpInnerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(BybitHttpInnerClient))
            .field("base_url", &self.base_url)
            .field("has_credentials", &self.signer.is_some())
            .field("rate_limiter", &self.rate_limiter)
            .finish()
    }
}

impl BybitHttpInnerClient {
    /// Creates a new [`BybitHttpInnerClient`] from the given configuration.
    ///
    /// Credentials are resolved from the configuration or, failing that, the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: &BybitHttpClientConfig) -> Result<Self, BybitHttpError> {
        let signer = config
            .resolve_credential()
            .map(|credential| Arc::new(credential) as Arc<dyn RequestSigner>);
        Self::with_signer(config, signer)
    }

    /// Creates a new [`BybitHttpInnerClient`] with an explicit signer (or none).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built.
    pub fn with_signer(
        config: &BybitHttpClientConfig,
        signer: Option<Arc<dyn RequestSigner>>,
    ) -> Result<Self, BybitHttpError> {
        config.validate()?;

        let (default_quota, quotas) = config.rate_limit_quotas()?;
        let client = HttpClient::new(Self::default_headers(), config.http_timeout_secs)
            .map_err(|e| BybitHttpError::ValidationError(e.to_string()))?;

        Ok(Self {
            base_url: config.http_base_url().trim_end_matches('/').to_string(),
            client,
            signer,
            rate_limiter: RateLimiter::new_with_quota(default_quota, quotas),
            cancellation_token: CancellationToken::new(),
        })
    }

    fn default_headers() -> HashMap<String, String> {
        HashMap::from([
            (USER_AGENT.to_string(), TRADEPORT_USER_AGENT.to_string()),
            (REFERER.to_string(), BYBIT_BROKER_ID.to_string()),
        ])
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns `true` if the client can sign requests.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.signer.is_some()
    }

    /// Returns the rate limiter shared by every endpoint of this client.
    #[must_use]
    pub const fn rate_limiter(&self) -> &RateLimiter<BybitEndpointType> {
        &self.rate_limiter
    }

    /// Cancel all pending HTTP requests.
    pub fn cancel_all_requests(&self) {
        self.cancellation_token.cancel();
    }

    /// Get the cancellation token for this client.
    #[must_use]
    pub const fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation_token
    }

    /// Waits for a rate-limit token in the bucket for `endpoint_type`.
    ///
    /// # Errors
    ///
    /// Returns [`BybitHttpError::Canceled`] if the client is canceled while waiting.
    pub async fn acquire(
        &self,
        endpoint_type: BybitEndpointType,
    ) -> Result<RateLimitPermit, BybitHttpError> {
        tokio::select! {
            biased;
            () = self.cancellation_token.cancelled() => {
                Err(BybitHttpError::Canceled("canceled while rate limited".to_string()))
            }
            permit = self.rate_limiter.acquire(&endpoint_type) => Ok(permit),
        }
    }

    /// Encodes and (for signed categories) signs a request without performing any I/O.
    ///
    /// Reads encode `params` as a query string and writes as a JSON body. The signature covers
    /// exactly the encoded bytes that will be sent.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `params` cannot be encoded.
    /// - The endpoint requires authentication and no signer is configured.
    /// - The signer fails.
    pub fn prepare<P: Serialize>(
        &self,
        descriptor: &EndpointDescriptor,
        params: &P,
    ) -> Result<PreparedRequest, BybitHttpError> {
        let url_path = descriptor.url_path.as_str();
        let method = descriptor.http_method.clone();
        let mut headers = HashMap::new();

        let (url, payload, body) = if matches!(method, Method::GET | Method::DELETE) {
            let query = serde_urlencoded::to_string(params)
                .map_err(|e| BybitHttpError::ValidationError(e.to_string()))?;
            if query.is_empty() {
                (format!("{}{url_path}", self.base_url), None, None)
            } else {
                let url = format!("{}{url_path}?{query}", self.base_url);
                (url, Some(query), None)
            }
        } else {
            let json = serde_json::to_string(params)
                .map_err(|e| BybitHttpError::ValidationError(e.to_string()))?;
            headers.insert(CONTENT_TYPE.to_string(), "application/json".to_string());
            let body = json.clone().into_bytes();
            (format!("{}{url_path}", self.base_url), Some(json), Some(body))
        };

        if descriptor.endpoint_type.requires_auth() {
            let signer = self
                .signer
                .as_ref()
                .ok_or(BybitHttpError::MissingCredentials)?;
            let context = SigningContext {
                method: &method,
                path: url_path,
                payload: payload.as_deref(),
                timestamp_ms: unix_time_ms(),
            };
            headers.extend(signer.auth_headers(&context)?);
        }

        Ok(PreparedRequest {
            method,
            url,
            url_path: url_path.to_string(),
            headers,
            body,
        })
    }

    /// Sends a prepared request and returns the raw response, whatever its HTTP status.
    ///
    /// The request runs on its own task. Canceling the client while it is in flight returns
    /// immediately, but the request still completes and its response is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No response is obtained (connection, timeout or reset).
    /// - The client is canceled before the response arrives.
    pub async fn dispatch(&self, request: PreparedRequest) -> Result<HttpResponse, BybitHttpError> {
        let url_path = request.url_path;
        if self.cancellation_token.is_cancelled() {
            return Err(BybitHttpError::Canceled(format!("{url_path} canceled before send")));
        }
        tracing::debug!("{} {url_path}", request.method);

        let client = self.client.clone();
        let mut send = tokio::spawn(async move {
            client
                .request(
                    request.method,
                    request.url,
                    Some(request.headers),
                    request.body,
                    None,
                )
                .await
        });

        let result = tokio::select! {
            biased;
            () = self.cancellation_token.cancelled() => {
                tracing::debug!("{url_path} canceled in flight, response will be discarded");
                return Err(BybitHttpError::Canceled(format!("{url_path} canceled in flight")));
            }
            joined = &mut send => joined.unwrap_or_else(|e| {
                Err(HttpClientError::Error(format!("request task failed: {e}")))
            }),
        };

        match result {
            Ok(response) => {
                tracing::trace!("{url_path} responded {}", response.status);
                Ok(response)
            }
            Err(e) if e.is_transport() => {
                tracing::debug!("{url_path} transport failure: {e}");
                Err(BybitHttpError::TransportError {
                    url_path,
                    source: e,
                })
            }
            Err(e) => Err(BybitHttpError::ValidationError(e.to_string())),
        }
    }
}

/// Provides a cheaply cloneable handle to a shared [`BybitHttpInnerClient`].
#[derive(Clone)]
pub struct BybitHttpClient {
    pub(crate) inner: Arc<BybitHttpInnerClient>,
}

impl Debug for BybitHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(BybitHttpClient))
            .field("inner", &self.inner)
            .finish()
    }
}

impl BybitHttpClient {
    /// Creates a new [`BybitHttpClient`] from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built.
    pub fn new(config: &BybitHttpClientConfig) -> Result<Self, BybitHttpError> {
        Ok(Self {
            inner: Arc::new(BybitHttpInnerClient::new(config)?),
        })
    }

    /// Creates a new [`BybitHttpClient`] with an explicit signer (or none).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built.
    pub fn with_signer(
        config: &BybitHttpClientConfig,
        signer: Option<Arc<dyn RequestSigner>>,
    ) -> Result<Self, BybitHttpError> {
        Ok(Self {
            inner: Arc::new(BybitHttpInnerClient::with_signer(config, signer)?),
        })
    }

    /// Returns the shared inner client.
    #[must_use]
    pub fn inner(&self) -> &BybitHttpInnerClient {
        &self.inner
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    /// Returns `true` if the client can sign requests.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.inner.has_credentials()
    }

    /// Cancel all pending HTTP requests.
    pub fn cancel_all_requests(&self) {
        self.inner.cancel_all_requests();
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{
        common::{credential::Credential, enums::BybitProductType},
        http::{endpoint::EndpointDescriptor, query::BybitSetLeverageParams},
    };

    fn config() -> BybitHttpClientConfig {
        BybitHttpClientConfig {
            base_url_http: Some("http://127.0.0.1:1/".to_string()),
            ..BybitHttpClientConfig::default()
        }
    }

    fn signed_client() -> BybitHttpInnerClient {
        let signer: Arc<dyn RequestSigner> = Arc::new(Credential::new("key", "secret"));
        BybitHttpInnerClient::with_signer(&config(), Some(signer)).unwrap()
    }

    fn set_leverage() -> EndpointDescriptor {
        EndpointDescriptor::new(
            BybitEndpointType::Position,
            Method::POST,
            "/v5/position/set-leverage",
        )
    }

    fn server_time() -> EndpointDescriptor {
        EndpointDescriptor::new(BybitEndpointType::Market, Method::GET, "/v5/market/time")
    }

    #[rstest]
    fn test_base_url_trailing_slash_trimmed() {
        let client = BybitHttpInnerClient::with_signer(&config(), None).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:1");
    }

    #[rstest]
    fn test_prepare_post_encodes_json_body_and_signs() {
        let client = signed_client();
        let params =
            BybitSetLeverageParams::new(BybitProductType::Linear, "BTCUSDT", "10.5", "10.5")
                .unwrap();

        let request = client.prepare(&set_leverage(), &params).unwrap();

        assert_eq!(request.url, "http://127.0.0.1:1/v5/position/set-leverage");
        let body = String::from_utf8(request.body.unwrap()).unwrap();
        assert_eq!(
            body,
            r#"{"category":"linear","symbol":"BTCUSDT","buyLeverage":"10.5","sellLeverage":"10.5"}"#
        );
        assert_eq!(request.headers["content-type"], "application/json");
        assert_eq!(request.headers["X-BAPI-API-KEY"], "key");
        assert_eq!(request.headers["X-BAPI-RECV-WINDOW"], "5000");

        let timestamp = &request.headers["X-BAPI-TIMESTAMP"];
        let expected = Credential::new("key", "secret").sign_with_payload(
            timestamp,
            5_000,
            Some(&body),
        );
        assert_eq!(request.headers["X-BAPI-SIGN"], expected);
    }

    #[rstest]
    fn test_prepare_signed_without_credentials_fails() {
        let client = BybitHttpInnerClient::with_signer(&config(), None).unwrap();
        let params =
            BybitSetLeverageParams::new(BybitProductType::Linear, "BTCUSDT", "5", "5").unwrap();

        let result = client.prepare(&set_leverage(), &params);
        assert!(matches!(result, Err(BybitHttpError::MissingCredentials)));
    }

    #[rstest]
    fn test_prepare_public_get_without_params() {
        let client = BybitHttpInnerClient::with_signer(&config(), None).unwrap();

        let request = client.prepare(&server_time(), &()).unwrap();

        assert_eq!(request.url, "http://127.0.0.1:1/v5/market/time");
        assert!(request.body.is_none());
        assert!(request.headers.is_empty());
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_failed_prepare_returns_token() {
        let client = BybitHttpInnerClient::with_signer(&config(), None).unwrap();
        let params =
            BybitSetLeverageParams::new(BybitProductType::Linear, "BTCUSDT", "5", "5").unwrap();
        let before = client
            .rate_limiter()
            .snapshot(&BybitEndpointType::Position)
            .unwrap()
            .tokens;

        let permit = client.acquire(BybitEndpointType::Position).await.unwrap();
        assert!(client.prepare(&set_leverage(), &params).is_err());
        drop(permit);

        let after = client
            .rate_limiter()
            .snapshot(&BybitEndpointType::Position)
            .unwrap()
            .tokens;
        assert_eq!(before, after);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn test_acquire_after_cancel_fails() {
        let client = BybitHttpInnerClient::with_signer(&config(), None).unwrap();
        client.cancel_all_requests();

        let result = client.acquire(BybitEndpointType::Market).await;
        assert!(matches!(result, Err(BybitHttpError::Canceled(_))));
    }
}
