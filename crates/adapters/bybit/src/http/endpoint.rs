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

//! Typed Bybit REST endpoints.
//!
//! An endpoint binds a request parameter type and a response schema to a fixed
//! `{category, method, path}` descriptor. Each [`BybitHttpEndpoint::call`] spends exactly one
//! rate-limit token on exactly one network round trip; nothing is retried.

use std::{fmt::Debug, marker::PhantomData, sync::Arc};

use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};

use super::{
    client::BybitHttpClient,
    decode::decode_response,
    error::BybitHttpError,
    models::{
        BybitFeeRateResponse, BybitPositionListResponse, BybitServerTimeResponse,
        BybitSetLeverageResponse, BybitSwitchModeResponse,
    },
    query::{
        BybitFeeRateParams, BybitPositionListParams, BybitSetLeverageParams,
        BybitSwitchModeParams,
    },
};
use crate::common::enums::BybitEndpointType;

/// The static binding of an endpoint: rate-limit category, HTTP method and URL path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub endpoint_type: BybitEndpointType,
    pub http_method: Method,
    pub url_path: String,
}

impl EndpointDescriptor {
    /// Creates a new [`EndpointDescriptor`] instance.
    #[must_use]
    pub fn new(
        endpoint_type: BybitEndpointType,
        http_method: Method,
        url_path: impl Into<String>,
    ) -> Self {
        Self {
            endpoint_type,
            http_method,
            url_path: url_path.into(),
        }
    }
}

/// A REST endpoint generic over its request parameters `P` and response schema `R`.
pub struct BybitHttpEndpoint<P, R> {
    client: BybitHttpClient,
    descriptor: Arc<EndpointDescriptor>,
    _phantom: PhantomData<fn(&P) -> R>,
}

impl<P, R> Clone for BybitHttpEndpoint<P, R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            descriptor: Arc::clone(&self.descriptor),
            _phantom: PhantomData,
        }
    }
}

impl<P, R> Debug for BybitHttpEndpoint<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(BybitHttpEndpoint))
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl<P, R> BybitHttpEndpoint<P, R>
where
    P: Serialize,
    R: DeserializeOwned,
{
    /// Creates a new endpoint at `base_endpoint` + `path` on the shared `client`.
    #[must_use]
    pub fn new(
        client: &BybitHttpClient,
        endpoint_type: BybitEndpointType,
        http_method: Method,
        base_endpoint: &str,
        path: &str,
    ) -> Self {
        let descriptor =
            EndpointDescriptor::new(endpoint_type, http_method, format!("{base_endpoint}{path}"));
        Self {
            client: client.clone(),
            descriptor: Arc::new(descriptor),
            _phantom: PhantomData,
        }
    }

    /// Returns the endpoint descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &EndpointDescriptor {
        &self.descriptor
    }

    /// Returns the URL path of the endpoint.
    #[must_use]
    pub fn url_path(&self) -> &str {
        &self.descriptor.url_path
    }

    /// Calls the endpoint and decodes the response.
    ///
    /// Waits for a token in the endpoint's rate-limit bucket, encodes and signs `params`,
    /// sends the request once and decodes the payload. A non-zero `retCode` is returned as
    /// data, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `params` cannot be encoded or signed (no token is spent).
    /// - The request fails in transport.
    /// - The client is canceled.
    /// - The payload does not fit `R`.
    pub async fn call(&self, params: &P) -> Result<R, BybitHttpError> {
        let inner = &self.client.inner;
        let descriptor = self.descriptor.as_ref();

        let permit = inner.acquire(descriptor.endpoint_type).await?;
        let request = inner.prepare(descriptor, params)?;
        permit.consume();

        let response = inner.dispatch(request).await?;
        decode_response(&descriptor.url_path, &response)
    }
}

/// `POST /v5/position/set-leverage`.
pub type BybitSetLeverageEndpoint =
    BybitHttpEndpoint<BybitSetLeverageParams, BybitSetLeverageResponse>;

/// `POST /v5/position/switch-mode`.
pub type BybitSwitchModeEndpoint = BybitHttpEndpoint<BybitSwitchModeParams, BybitSwitchModeResponse>;

/// `GET /v5/position/list`.
pub type BybitPositionListEndpoint =
    BybitHttpEndpoint<BybitPositionListParams, BybitPositionListResponse>;

/// `GET /v5/account/fee-rate`.
pub type BybitFeeRateEndpoint = BybitHttpEndpoint<BybitFeeRateParams, BybitFeeRateResponse>;

/// `GET /v5/market/time`.
pub type BybitServerTimeEndpoint = BybitHttpEndpoint<(), BybitServerTimeResponse>;

impl BybitSetLeverageEndpoint {
    /// Creates the set leverage endpoint.
    ///
    /// # References
    /// - <https://bybit-exchange.github.io/docs/v5/position/leverage>
    #[must_use]
    pub fn set_leverage(client: &BybitHttpClient, base_endpoint: &str) -> Self {
        Self::new(
            client,
            BybitEndpointType::Position,
            Method::POST,
            base_endpoint,
            "/position/set-leverage",
        )
    }
}

impl BybitSwitchModeEndpoint {
    /// Creates the switch position mode endpoint.
    ///
    /// # References
    /// - <https://bybit-exchange.github.io/docs/v5/position/position-mode>
    #[must_use]
    pub fn switch_mode(client: &BybitHttpClient, base_endpoint: &str) -> Self {
        Self::new(
            client,
            BybitEndpointType::Position,
            Method::POST,
            base_endpoint,
            "/position/switch-mode",
        )
    }
}

impl BybitPositionListEndpoint {
    /// Creates the position list endpoint.
    ///
    /// # References
    /// - <https://bybit-exchange.github.io/docs/v5/position>
    #[must_use]
    pub fn position_list(client: &BybitHttpClient, base_endpoint: &str) -> Self {
        Self::new(
            client,
            BybitEndpointType::Position,
            Method::GET,
            base_endpoint,
            "/position/list",
        )
    }
}

impl BybitFeeRateEndpoint {
    /// Creates the fee rate endpoint.
    ///
    /// # References
    /// - <https://bybit-exchange.github.io/docs/v5/account/fee-rate>
    #[must_use]
    pub fn fee_rate(client: &BybitHttpClient, base_endpoint: &str) -> Self {
        Self::new(
            client,
            BybitEndpointType::Account,
            Method::GET,
            base_endpoint,
            "/account/fee-rate",
        )
    }
}

impl BybitServerTimeEndpoint {
    /// Creates the server time endpoint.
    ///
    /// # References
    /// - <https://bybit-exchange.github.io/docs/v5/market/time>
    #[must_use]
    pub fn server_time(client: &BybitHttpClient, base_endpoint: &str) -> Self {
        Self::new(
            client,
            BybitEndpointType::Market,
            Method::GET,
            base_endpoint,
            "/market/time",
        )
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{common::consts::BYBIT_BASE_ENDPOINT, config::BybitHttpClientConfig};

    fn client() -> BybitHttpClient {
        let config = BybitHttpClientConfig {
            base_url_http: Some("http://127.0.0.1:1".to_string()),
            ..BybitHttpClientConfig::default()
        };
        BybitHttpClient::with_signer(&config, None).unwrap()
    }

    #[rstest]
    fn test_set_leverage_descriptor() {
        let endpoint = BybitSetLeverageEndpoint::set_leverage(&client(), BYBIT_BASE_ENDPOINT);
        let descriptor = endpoint.descriptor();

        assert_eq!(descriptor.endpoint_type, BybitEndpointType::Position);
        assert_eq!(descriptor.http_method, Method::POST);
        assert_eq!(descriptor.url_path, "/v5/position/set-leverage");
    }

    #[rstest]
    #[case(BybitSwitchModeEndpoint::switch_mode(&client(), "/v5").descriptor().clone(), BybitEndpointType::Position, Method::POST, "/v5/position/switch-mode")]
    #[case(BybitPositionListEndpoint::position_list(&client(), "/v5").descriptor().clone(), BybitEndpointType::Position, Method::GET, "/v5/position/list")]
    #[case(BybitFeeRateEndpoint::fee_rate(&client(), "/v5").descriptor().clone(), BybitEndpointType::Account, Method::GET, "/v5/account/fee-rate")]
    #[case(BybitServerTimeEndpoint::server_time(&client(), "/v5").descriptor().clone(), BybitEndpointType::Market, Method::GET, "/v5/market/time")]
    fn test_endpoint_bindings(
        #[case] descriptor: EndpointDescriptor,
        #[case] endpoint_type: BybitEndpointType,
        #[case] method: Method,
        #[case] path: &str,
    ) {
        assert_eq!(
            descriptor,
            EndpointDescriptor::new(endpoint_type, method, path)
        );
    }

    #[rstest]
    fn test_clones_share_descriptor() {
        let endpoint = BybitServerTimeEndpoint::server_time(&client(), BYBIT_BASE_ENDPOINT);
        let clone = endpoint.clone();
        assert!(Arc::ptr_eq(&endpoint.descriptor, &clone.descriptor));
    }
}
