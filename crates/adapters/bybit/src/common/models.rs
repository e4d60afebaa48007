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

//! Response envelopes shared by every Bybit v5 REST endpoint.
//!
//! Every v5 response carries `retCode`/`retMsg` alongside the endpoint specific `result`.
//! Decoding an envelope never depends on `retCode`: a business rejection is ordinary data and
//! callers opt in to treating it as an error with `ensure_success`.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::http::error::BybitHttpError;

/// Generic Bybit v5 response envelope with a required `result` payload.
///
/// An empty `result` object (as sent alongside most rejections) or `null` decodes to `None`.
/// A missing `result` key is a decode failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct BybitResponse<T> {
    /// Business return code, `0` on success.
    pub ret_code: i64,
    /// Human readable return message.
    pub ret_msg: String,
    /// Endpoint specific payload.
    #[serde(deserialize_with = "deserialize_result")]
    pub result: Option<T>,
    /// Extended information attached by some endpoints.
    #[serde(default)]
    pub ret_ext_info: Option<serde_json::Value>,
    /// Server timestamp in milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
}

/// Envelope for write endpoints whose `result` carries no useful payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitAckResponse {
    /// Business return code, `0` on success.
    pub ret_code: i64,
    /// Human readable return message.
    pub ret_msg: String,
    /// Raw result payload, if any.
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Extended information attached by some endpoints.
    #[serde(default)]
    pub ret_ext_info: Option<serde_json::Value>,
    /// Server timestamp in milliseconds.
    #[serde(default)]
    pub time: Option<i64>,
}

/// A `result` holding a plain list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitListResult<T> {
    pub list: Vec<T>,
}

/// A `result` holding a paginated list.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitCursorListResult<T> {
    #[serde(default)]
    pub category: Option<String>,
    pub list: Vec<T>,
    #[serde(default)]
    pub next_page_cursor: Option<String>,
}

fn deserialize_result<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(ref map) if map.is_empty() => Ok(None),
        value => T::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

fn check_ret_code(ret_code: i64, ret_msg: &str) -> Result<(), BybitHttpError> {
    if ret_code == 0 {
        Ok(())
    } else {
        Err(BybitHttpError::BybitError {
            error_code: ret_code,
            message: ret_msg.to_string(),
        })
    }
}

impl<T> BybitResponse<T> {
    /// Returns `true` if `retCode` is zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.ret_code == 0
    }

    /// Returns the response unchanged if `retCode` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`BybitHttpError::BybitError`] for a non-zero `retCode`.
    pub fn ensure_success(self) -> Result<Self, BybitHttpError> {
        check_ret_code(self.ret_code, &self.ret_msg)?;
        Ok(self)
    }

    /// Returns the `result` payload of a successful response.
    ///
    /// # Errors
    ///
    /// Returns [`BybitHttpError::BybitError`] for a non-zero `retCode`, or
    /// [`BybitHttpError::ValidationError`] if a successful response carried no result.
    pub fn into_result(self) -> Result<T, BybitHttpError> {
        check_ret_code(self.ret_code, &self.ret_msg)?;
        self.result.ok_or_else(|| {
            BybitHttpError::ValidationError("successful response carried an empty result".into())
        })
    }
}

impl BybitAckResponse {
    /// Returns `true` if `retCode` is zero.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.ret_code == 0
    }

    /// Returns the response unchanged if `retCode` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`BybitHttpError::BybitError`] for a non-zero `retCode`.
    pub fn ensure_success(self) -> Result<Self, BybitHttpError> {
        check_ret_code(self.ret_code, &self.ret_msg)?;
        Ok(self)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
