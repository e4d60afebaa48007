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

//! Strict decoding of raw Bybit responses into typed schemas.

use serde::de::DeserializeOwned;
use tradeport_network::http::HttpResponse;

use super::error::BybitHttpError;

/// Decodes the body of `response` into `R`.
///
/// Decoding depends only on the payload shape: the HTTP status and the business `retCode`
/// are not consulted. Unknown fields are ignored; missing or mistyped required fields fail.
///
/// # Errors
///
/// Returns [`BybitHttpError::DecodeError`] carrying `url_path`, the HTTP status and the raw
/// body bytes if the payload does not fit `R`.
pub fn decode_response<R: DeserializeOwned>(
    url_path: &str,
    response: &HttpResponse,
) -> Result<R, BybitHttpError> {
    serde_json::from_slice(&response.body).map_err(|e| {
        tracing::error!(
            "Failed to decode response from {url_path} (HTTP {}): {e}: {}",
            response.status,
            String::from_utf8_lossy(&response.body),
        );
        BybitHttpError::DecodeError {
            url_path: url_path.to_string(),
            status: response.status,
            raw: response.body.clone(),
            message: e.to_string(),
        }
    })
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bytes::Bytes;
    use reqwest::StatusCode;
    use rstest::rstest;

    use super::*;
    use crate::http::models::{BybitServerTimeResponse, BybitSetLeverageResponse};

    const PATH: &str = "/v5/position/set-leverage";

    fn response(status: StatusCode, body: &'static str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[rstest]
    fn test_decodes_ack() {
        let response = response(StatusCode::OK, r#"{"retCode":0,"retMsg":"OK"}"#);
        let decoded: BybitSetLeverageResponse = decode_response(PATH, &response).unwrap();
        assert_eq!(decoded.ret_code, 0);
    }

    #[rstest]
    fn test_business_rejection_decodes() {
        let response = response(
            StatusCode::OK,
            r#"{"retCode":110043,"retMsg":"Set leverage not modified","result":{},"time":1}"#,
        );
        let decoded: BybitSetLeverageResponse = decode_response(PATH, &response).unwrap();
        assert_eq!(decoded.ret_code, 110_043);
    }

    #[rstest]
    fn test_error_status_with_envelope_decodes() {
        let response = response(
            StatusCode::FORBIDDEN,
            r#"{"retCode":10003,"retMsg":"API key is invalid."}"#,
        );
        let decoded: BybitSetLeverageResponse = decode_response(PATH, &response).unwrap();
        assert_eq!(decoded.ret_code, 10_003);
    }

    #[rstest]
    #[case(StatusCode::OK, r#"{"retCode":0,"ret"#)]
    #[case(StatusCode::OK, r#"{"retMsg":"OK"}"#)]
    #[case(StatusCode::OK, r#"{"retCode":"zero","retMsg":"OK"}"#)]
    #[case(StatusCode::BAD_GATEWAY, "<html>502 Bad Gateway</html>")]
    fn test_incompatible_payload_is_decode_error(
        #[case] status: StatusCode,
        #[case] body: &'static str,
    ) {
        let response = response(status, body);
        let error = decode_response::<BybitSetLeverageResponse>(PATH, &response).unwrap_err();

        match &error {
            BybitHttpError::DecodeError {
                url_path,
                status: error_status,
                raw,
                ..
            } => {
                assert_eq!(url_path, PATH);
                assert_eq!(*error_status, status);
                assert_eq!(&raw[..], body.as_bytes());
            }
            other => panic!("expected DecodeError, got {other:?}"),
        }
        assert!(error.to_string().contains(PATH));
        assert!(error.to_string().contains(body));
    }

    #[rstest]
    fn test_decode_error_keeps_non_utf8_body() {
        let body: &'static [u8] = b"<html>\xff\xfe bad gateway</html>";
        let response = HttpResponse {
            status: StatusCode::BAD_GATEWAY,
            headers: HashMap::new(),
            body: Bytes::from_static(body),
        };

        let error = decode_response::<BybitSetLeverageResponse>(PATH, &response).unwrap_err();

        match &error {
            BybitHttpError::DecodeError { raw, .. } => assert_eq!(&raw[..], body),
            other => panic!("expected DecodeError, got {other:?}"),
        }
        assert!(error.to_string().contains("bad gateway"));
    }

    #[rstest]
    fn test_missing_required_result_is_decode_error() {
        let response = response(StatusCode::OK, r#"{"retCode":0,"retMsg":"OK"}"#);
        let result = decode_response::<BybitServerTimeResponse>("/v5/market/time", &response);
        assert!(matches!(result, Err(BybitHttpError::DecodeError { .. })));
    }
}
