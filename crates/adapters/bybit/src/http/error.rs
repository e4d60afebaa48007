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

//! Error taxonomy for the Bybit HTTP integration.
//!
//! Failures are classified by where they arise:
//! - validation (before any network activity),
//! - transport (no response obtained),
//! - decode (a response arrived but does not fit the declared schema),
//! - business (non-zero `retCode`, raised only by callers via `ensure_success`).
//!
//! The error schema is described in the Bybit documentation under *Error Codes*
//! <https://bybit-exchange.github.io/docs/v5/error>.

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;
use tradeport_network::{auth::SigningError, http::HttpClientError};

use crate::common::decimal::BybitDecimalError;

/// Build error for request parameter validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BybitBuildError {
    /// A required field was not set on the builder.
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
    /// Missing required symbol.
    #[error("Missing required symbol")]
    MissingSymbol,
    /// The product category does not support the operation.
    #[error("Unsupported category '{0}' for this endpoint")]
    UnsupportedCategory(String),
    /// Neither `symbol` nor the alternative coin filter was provided.
    #[error("Either 'symbol' or '{0}' must be provided")]
    MissingSymbolOrCoin(&'static str),
    /// Invalid limit value.
    #[error("Invalid limit: must be between 1 and {max}")]
    InvalidLimit { max: u32 },
    /// Leverage must be strictly positive.
    #[error("Invalid leverage '{0}': must be greater than zero")]
    InvalidLeverage(String),
    /// A decimal field failed to parse.
    #[error(transparent)]
    InvalidDecimal(#[from] BybitDecimalError),
}

impl From<derive_builder::UninitializedFieldError> for BybitBuildError {
    fn from(error: derive_builder::UninitializedFieldError) -> Self {
        Self::MissingField(error.field_name())
    }
}

/// A typed error enumeration for the Bybit HTTP client.
#[derive(Debug, Clone, Error)]
pub enum BybitHttpError {
    /// Parameters failed to construct or encode; nothing was sent.
    #[error("Parameter validation error: {0}")]
    ValidationError(String),
    /// A signed endpoint was called on a client without credentials; nothing was sent.
    #[error("Missing credentials for authenticated request")]
    MissingCredentials,
    /// No response was obtained (connect failure, timeout, reset).
    #[error("Transport error on {url_path}: {source}")]
    TransportError {
        url_path: String,
        source: HttpClientError,
    },
    /// A response arrived whose payload does not fit the declared schema.
    ///
    /// `raw` holds the response body exactly as received.
    #[error(
        "Failed to decode response from {url_path} (HTTP {status}): {message}: {}",
        String::from_utf8_lossy(.raw)
    )]
    DecodeError {
        url_path: String,
        status: StatusCode,
        raw: Bytes,
        message: String,
    },
    /// The request was canceled through the client cancellation token.
    #[error("Request canceled: {0}")]
    Canceled(String),
    /// Errors returned by Bybit as a non-zero `retCode`.
    #[error("Bybit error {error_code}: {message}")]
    BybitError { error_code: i64, message: String },
}

impl BybitHttpError {
    /// Returns `true` for failures a caller may reasonably retry.
    ///
    /// Only transport failures qualify: a decoded rejection or a schema mismatch would fail
    /// again identically.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportError { .. })
    }

    /// Returns `true` if the error was raised before any request left the process.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::MissingCredentials)
    }
}

impl From<BybitBuildError> for BybitHttpError {
    fn from(error: BybitBuildError) -> Self {
        Self::ValidationError(error.to_string())
    }
}

impl From<BybitDecimalError> for BybitHttpError {
    fn from(error: BybitDecimalError) -> Self {
        Self::ValidationError(error.to_string())
    }
}

impl From<SigningError> for BybitHttpError {
    fn from(error: SigningError) -> Self {
        Self::ValidationError(error.to_string())
    }
}

impl From<String> for BybitHttpError {
    fn from(error: String) -> Self {
        Self::ValidationError(error)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
