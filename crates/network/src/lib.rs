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

//! Network communication machinery for tradeport.
//!
//! The `tradeport-network` crate provides the exchange-agnostic building blocks of the REST
//! endpoint framework:
//!
//! - An HTTP transport ([`http::HttpClient`]) that returns raw responses on any status and
//!   classifies connection level failures.
//! - A keyed token-bucket rate limiter ([`ratelimiter::RateLimiter`]) with FIFO waiters and
//!   cancellation-safe permits.
//! - The request signing seam ([`auth::RequestSigner`]) through which exchange adapters plug
//!   in authentication.
//! - Opt-in retry machinery ([`retry::RetryManager`]) with exponential backoff, for use by
//!   orchestration layers above individual endpoints.

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod backoff;
pub mod http;
pub mod ratelimiter;
pub mod retry;
