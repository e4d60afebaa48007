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

//! Bybit API credential storage and request signing.

#![allow(unused_assignments)] // Fields are used in methods, false positive from nightly

use std::fmt::Debug;

use aws_lc_rs::hmac;
use tradeport_network::auth::{RequestSigner, SigningContext, SigningError};
use ustr::Ustr;
use zeroize::ZeroizeOnDrop;

use super::consts::BYBIT_DEFAULT_RECV_WINDOW_MS;

pub const HEADER_API_KEY: &str = "X-BAPI-API-KEY";
pub const HEADER_TIMESTAMP: &str = "X-BAPI-TIMESTAMP";
pub const HEADER_SIGN: &str = "X-BAPI-SIGN";
pub const HEADER_RECV_WINDOW: &str = "X-BAPI-RECV-WINDOW";

/// API credentials required for signing Bybit REST requests.
///
/// Signatures are HMAC-SHA256 over `timestamp + api_key + recv_window + payload`, hex encoded.
#[derive(Clone, ZeroizeOnDrop)]
pub struct Credential {
    #[zeroize(skip)]
    api_key: Ustr,
    api_secret: Box<[u8]>,
    #[zeroize(skip)]
    recv_window_ms: u64,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(Credential))
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("recv_window_ms", &self.recv_window_ms)
            .finish()
    }
}

impl Credential {
    /// Creates a new [`Credential`] instance from the API key and secret.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        let api_key = Ustr::from(api_key.into().as_str());
        let api_secret = api_secret.into().into_bytes().into_boxed_slice();

        Self {
            api_key,
            api_secret,
            recv_window_ms: BYBIT_DEFAULT_RECV_WINDOW_MS,
        }
    }

    /// Sets the receive window attached to signed requests.
    #[must_use]
    pub const fn with_recv_window(mut self, recv_window_ms: u64) -> Self {
        self.recv_window_ms = recv_window_ms;
        self
    }

    /// Returns the API key associated with this credential.
    #[must_use]
    pub fn api_key(&self) -> &Ustr {
        &self.api_key
    }

    /// Returns the receive window in milliseconds.
    #[must_use]
    pub const fn recv_window_ms(&self) -> u64 {
        self.recv_window_ms
    }

    /// Produces the Bybit HMAC signature for the provided payload.
    ///
    /// `payload` should contain either a URL-encoded query string (for GET requests)
    /// or a JSON body (for POST requests). Callers are responsible for ensuring that
    /// the encoding matches the bytes sent over the wire.
    #[must_use]
    pub fn sign_with_payload(
        &self,
        timestamp: &str,
        recv_window_ms: u64,
        payload: Option<&str>,
    ) -> String {
        let recv_window = recv_window_ms.to_string();
        let payload_len = payload.map_or(0usize, str::len);
        let mut message = String::with_capacity(
            timestamp.len() + self.api_key.len() + recv_window.len() + payload_len,
        );

        message.push_str(timestamp);
        message.push_str(self.api_key.as_str());
        message.push_str(&recv_window);
        if let Some(payload) = payload {
            message.push_str(payload);
        }

        let key = hmac::Key::new(hmac::HMAC_SHA256, &self.api_secret);
        let tag = hmac::sign(&key, message.as_bytes());
        hex::encode(tag.as_ref())
    }
}

impl RequestSigner for Credential {
    fn auth_headers(
        &self,
        context: &SigningContext<'_>,
    ) -> Result<Vec<(String, String)>, SigningError> {
        if self.api_key.is_empty() {
            return Err(SigningError("empty API key".to_string()));
        }

        let timestamp = context.timestamp_ms.to_string();
        let signature = self.sign_with_payload(&timestamp, self.recv_window_ms, context.payload);

        Ok(vec![
            (HEADER_API_KEY.to_string(), self.api_key.to_string()),
            (HEADER_TIMESTAMP.to_string(), timestamp),
            (HEADER_SIGN.to_string(), signature),
            (HEADER_RECV_WINDOW.to_string(), self.recv_window_ms.to_string()),
        ])
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use rstest::rstest;

    use super::*;

    const API_KEY: &str = "test_api_key";
    const API_SECRET: &str = "test_secret";
    const RECV_WINDOW: u64 = 5_000;
    const TIMESTAMP: &str = "1700000000000";

    #[rstest]
    fn sign_with_payload_matches_reference_get() {
        let credential = Credential::new(API_KEY, API_SECRET);
        let query = "category=linear&symbol=BTCUSDT";

        let signature = credential.sign_with_payload(TIMESTAMP, RECV_WINDOW, Some(query));

        assert_eq!(
            signature,
            "fd4f31228a46109dc6673062328693696df9a96c7ff04e6491a45e7f63a0fdd7"
        );
    }

    #[rstest]
    fn sign_with_payload_matches_reference_post() {
        let credential = Credential::new(API_KEY, API_SECRET);
        let body = "{\"category\": \"linear\", \"symbol\": \"BTCUSDT\", \"orderLinkId\": \"test-order-1\"}";

        let signature = credential.sign_with_payload(TIMESTAMP, RECV_WINDOW, Some(body));

        assert_eq!(
            signature,
            "2df4a0603d69c08d5dea29ba85b46eb7db64ce9e9ebd34a7802a3d69700cb2a1"
        );
    }

    #[rstest]
    fn sign_with_empty_payload_omits_tail() {
        let credential = Credential::new(API_KEY, API_SECRET);

        let signature = credential.sign_with_payload(TIMESTAMP, RECV_WINDOW, None);

        let expected = credential.sign_with_payload(TIMESTAMP, RECV_WINDOW, Some(""));
        assert_eq!(signature, expected);
    }

    #[rstest]
    fn auth_headers_match_signature() {
        let credential = Credential::new(API_KEY, API_SECRET);
        let context = SigningContext {
            method: &Method::GET,
            path: "/v5/position/list",
            payload: Some("category=linear&symbol=BTCUSDT"),
            timestamp_ms: 1_700_000_000_000,
        };

        let headers = credential.auth_headers(&context).unwrap();
        let get = |name: &str| {
            headers
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
                .unwrap()
        };

        assert_eq!(get(HEADER_API_KEY), API_KEY);
        assert_eq!(get(HEADER_TIMESTAMP), TIMESTAMP);
        assert_eq!(get(HEADER_RECV_WINDOW), "5000");
        assert_eq!(
            get(HEADER_SIGN),
            "fd4f31228a46109dc6673062328693696df9a96c7ff04e6491a45e7f63a0fdd7"
        );
    }

    #[rstest]
    fn recv_window_is_signed() {
        let credential = Credential::new(API_KEY, API_SECRET).with_recv_window(10_000);
        let context = SigningContext {
            method: &Method::POST,
            path: "/v5/position/set-leverage",
            payload: Some("{}"),
            timestamp_ms: 1_700_000_000_000,
        };

        let headers = credential.auth_headers(&context).unwrap();
        let sign = headers.iter().find(|(k, _)| k == HEADER_SIGN).unwrap();

        assert_eq!(
            sign.1,
            credential.sign_with_payload(TIMESTAMP, 10_000, Some("{}"))
        );
        assert_ne!(
            sign.1,
            credential.sign_with_payload(TIMESTAMP, RECV_WINDOW, Some("{}"))
        );
    }

    #[rstest]
    fn debug_redacts_secret() {
        let credential = Credential::new(API_KEY, API_SECRET);
        let debug = format!("{credential:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(API_SECRET));
    }
}
