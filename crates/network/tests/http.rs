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

//! Integration tests for the HTTP transport using a mock Axum server.

use std::{collections::HashMap, net::SocketAddr, time::Duration};

use axum::{
    Router,
    body::Bytes,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use reqwest::Method;
use rstest::rstest;
use tradeport_network::http::{HttpClient, HttpClientError};

fn create_router() -> Router {
    Router::new()
        .route("/ok", get(|| async { r#"{"retCode":0}"# }))
        .route(
            "/error",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        )
        .route(
            "/echo",
            post(|headers: HeaderMap, body: Bytes| async move {
                let agent = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let custom = headers
                    .get("x-custom")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                (
                    [("x-agent", agent), ("x-echo-custom", custom)],
                    body,
                )
                    .into_response()
            }),
        )
}

async fn start_test_server() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test server");
    let addr = listener.local_addr().expect("missing local addr");

    tokio::spawn(async move {
        axum::serve(listener, create_router().into_make_service())
            .await
            .expect("test server failed");
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

fn client() -> HttpClient {
    let headers = HashMap::from([("user-agent".to_string(), "tradeport-test".to_string())]);
    HttpClient::new(headers, Some(10)).expect("failed to create http client")
}

#[rstest]
#[tokio::test]
async fn test_success_body_returned() {
    let addr = start_test_server().await;

    let response = client()
        .request(Method::GET, format!("http://{addr}/ok"), None, None, None)
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_ref(), br#"{"retCode":0}"#);
}

#[rstest]
#[tokio::test]
async fn test_error_status_still_returns_body() {
    let addr = start_test_server().await;

    let response = client()
        .request(Method::GET, format!("http://{addr}/error"), None, None, None)
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body.as_ref(), b"upstream exploded");
}

#[rstest]
#[tokio::test]
async fn test_default_and_request_headers_sent_with_body() {
    let addr = start_test_server().await;
    let headers = HashMap::from([("x-custom".to_string(), "abc".to_string())]);

    let response = client()
        .request(
            Method::POST,
            format!("http://{addr}/echo"),
            Some(headers),
            Some(br#"{"buyLeverage":"10"}"#.to_vec()),
            None,
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers.get("x-agent").unwrap(), "tradeport-test");
    assert_eq!(response.headers.get("x-echo-custom").unwrap(), "abc");
    assert_eq!(response.body.as_ref(), br#"{"buyLeverage":"10"}"#);
}

#[rstest]
#[tokio::test]
async fn test_connection_refused_is_connect_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = client()
        .request(Method::GET, format!("http://{addr}/ok"), None, None, None)
        .await;

    match result {
        Err(HttpClientError::ConnectError(_)) => {}
        other => panic!("expected ConnectError, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn test_request_timeout_is_timeout_error() {
    let addr = start_test_server().await;

    let result = client()
        .request(Method::GET, format!("http://{addr}/slow"), None, None, Some(1))
        .await;

    match result {
        Err(e @ HttpClientError::TimeoutError(_)) => assert!(e.is_transport()),
        other => panic!("expected TimeoutError, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn test_invalid_request_header_rejected() {
    let addr = start_test_server().await;
    let headers = HashMap::from([("x-bad".to_string(), "line\nbreak".to_string())]);

    let result = client()
        .request(Method::GET, format!("http://{addr}/ok"), Some(headers), None, None)
        .await;

    assert!(matches!(result, Err(HttpClientError::InvalidRequest(_))));
}
