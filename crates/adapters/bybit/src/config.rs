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

//! Configuration structures for the Bybit HTTP client.

use std::{collections::HashMap, fmt::Debug, num::NonZeroU32};

use serde::Deserialize;
use tradeport_core::env::get_or_env_var_opt;
use tradeport_network::ratelimiter::quota::Quota;

use crate::{
    common::{
        consts::{
            BYBIT_DEFAULT_HTTP_TIMEOUT_SECS, BYBIT_DEFAULT_RECV_WINDOW_MS,
            BYBIT_REST_CATEGORY_QUOTAS, BYBIT_REST_QUOTA,
        },
        credential::Credential,
        enums::{BybitEndpointType, BybitEnvironment},
        urls::bybit_http_base_url,
    },
    http::error::BybitHttpError,
};

/// Configuration for the Bybit HTTP client.
///
/// Credentials left unset fall back to the environment: `BYBIT_API_KEY`/`BYBIT_API_SECRET`,
/// or the `BYBIT_TESTNET_*` and `BYBIT_DEMO_*` variants for the other environments.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct BybitHttpClientConfig {
    /// API key for signed endpoints.
    pub api_key: Option<String>,
    /// API secret for signed endpoints.
    pub api_secret: Option<String>,
    /// The Bybit environment to connect to.
    pub environment: BybitEnvironment,
    /// Override for the HTTP base URL.
    pub base_url_http: Option<String>,
    /// HTTP timeout in seconds.
    pub http_timeout_secs: Option<u64>,
    /// Receive window attached to signed requests in milliseconds.
    pub recv_window_ms: u64,
    /// Requests per second for categories without an explicit quota.
    pub default_quota_per_sec: Option<u32>,
    /// Requests per second per endpoint category, overriding the built-in quotas.
    pub category_quotas_per_sec: HashMap<BybitEndpointType, u32>,
}

impl Default for BybitHttpClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            environment: BybitEnvironment::Mainnet,
            base_url_http: None,
            http_timeout_secs: Some(BYBIT_DEFAULT_HTTP_TIMEOUT_SECS),
            recv_window_ms: BYBIT_DEFAULT_RECV_WINDOW_MS,
            default_quota_per_sec: None,
            category_quotas_per_sec: HashMap::new(),
        }
    }
}

impl Debug for BybitHttpClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(BybitHttpClientConfig))
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("environment", &self.environment)
            .field("base_url_http", &self.base_url_http)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("recv_window_ms", &self.recv_window_ms)
            .field("default_quota_per_sec", &self.default_quota_per_sec)
            .field("category_quotas_per_sec", &self.category_quotas_per_sec)
            .finish()
    }
}

impl BybitHttpClientConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new configuration with explicit credentials.
    #[must_use]
    pub fn with_credentials(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            api_secret: Some(api_secret.into()),
            ..Self::default()
        }
    }

    /// Returns the HTTP base URL, respecting the environment and overrides.
    #[must_use]
    pub fn http_base_url(&self) -> String {
        self.base_url_http
            .clone()
            .unwrap_or_else(|| bybit_http_base_url(self.environment).to_string())
    }

    fn env_var_names(&self) -> (&'static str, &'static str) {
        match self.environment {
            BybitEnvironment::Mainnet => ("BYBIT_API_KEY", "BYBIT_API_SECRET"),
            BybitEnvironment::Demo => ("BYBIT_DEMO_API_KEY", "BYBIT_DEMO_API_SECRET"),
            BybitEnvironment::Testnet => ("BYBIT_TESTNET_API_KEY", "BYBIT_TESTNET_API_SECRET"),
        }
    }

    /// Resolves the signing credential from the configuration or the environment.
    ///
    /// Returns `None` unless both the key and the secret are available.
    #[must_use]
    pub fn resolve_credential(&self) -> Option<Credential> {
        let (key_var, secret_var) = self.env_var_names();
        let api_key = get_or_env_var_opt(self.api_key.clone(), key_var)?;
        let api_secret = get_or_env_var_opt(self.api_secret.clone(), secret_var)?;

        Some(Credential::new(api_key, api_secret).with_recv_window(self.recv_window_ms))
    }

    /// Returns the default quota and the per-category quotas for the rate limiter.
    ///
    /// # Errors
    ///
    /// Returns an error if any configured rate is zero.
    pub fn rate_limit_quotas(
        &self,
    ) -> Result<(Quota, Vec<(BybitEndpointType, Quota)>), BybitHttpError> {
        let per_second = |rate: u32, what: &str| {
            NonZeroU32::new(rate)
                .map(Quota::per_second)
                .ok_or_else(|| BybitHttpError::ValidationError(format!("{what} must be positive")))
        };

        let default_quota = match self.default_quota_per_sec {
            Some(rate) => per_second(rate, "default_quota_per_sec")?,
            None => *BYBIT_REST_QUOTA,
        };

        let mut quotas: HashMap<BybitEndpointType, Quota> =
            BYBIT_REST_CATEGORY_QUOTAS.iter().copied().collect();
        for (endpoint_type, rate) in &self.category_quotas_per_sec {
            let quota = per_second(*rate, &format!("quota for {endpoint_type}"))?;
            quotas.insert(*endpoint_type, quota);
        }

        Ok((default_quota, quotas.into_iter().collect()))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the receive window or timeout is zero, or a quota is invalid.
    pub fn validate(&self) -> Result<(), BybitHttpError> {
        if self.recv_window_ms == 0 {
            return Err(BybitHttpError::ValidationError(
                "recv_window_ms must be positive".to_string(),
            ));
        }

        if self.http_timeout_secs == Some(0) {
            return Err(BybitHttpError::ValidationError(
                "http_timeout_secs must be positive".to_string(),
            ));
        }

        self.rate_limit_quotas().map(|_| ())
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
