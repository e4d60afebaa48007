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

//! The request signing seam between the HTTP transport and exchange credentials.

use std::fmt::Debug;

use http::Method;
use thiserror::Error;

/// Everything a signer may cover with its signature for a single outgoing request.
#[derive(Clone, Copy, Debug)]
pub struct SigningContext<'a> {
    /// The HTTP method of the request.
    pub method: &'a Method,
    /// The URL path (without query string).
    pub path: &'a str,
    /// The encoded query string (reads) or JSON body (writes), exactly as sent on the wire.
    pub payload: Option<&'a str>,
    /// The realtime UNIX timestamp in milliseconds attached to the request.
    pub timestamp_ms: u64,
}

/// An error raised by a [`RequestSigner`].
#[derive(Debug, Clone, Error)]
#[error("Failed to sign request: {0}")]
pub struct SigningError(pub String);

/// Produces the authentication headers for an outgoing request.
///
/// Implementations are exchange specific (HMAC, Ed25519, ...) and are supplied to transport
/// clients at construction time. Every signed request passes through exactly one call to
/// [`RequestSigner::auth_headers`] immediately before it is dispatched.
pub trait RequestSigner: Debug + Send + Sync {
    /// Returns the headers which authenticate the request described by `context`.
    ///
    /// # Errors
    ///
    /// Returns an error if the signature cannot be produced.
    fn auth_headers(
        &self,
        context: &SigningContext<'_>,
    ) -> Result<Vec<(String, String)>, SigningError>;
}
