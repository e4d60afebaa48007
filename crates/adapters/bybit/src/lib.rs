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

//! Typed, rate-governed REST endpoints for the [Bybit](https://www.bybit.com/) v5 API.
//!
//! The `tradeport-bybit` crate binds each REST operation to a request parameter type, a
//! response schema and a rate-limit category. Calls share one HTTP client and one keyed rate
//! limiter, spend exactly one token per network round trip, and decode responses strictly.
//!
//! The official Bybit API reference can be found at <https://bybit-exchange.github.io/docs/v5/intro>.
//! All public links inside this crate reference the English version of the documentation.
//!
//! # Example
//!
//! ```no_run
//! use tradeport_bybit::{
//!     common::enums::BybitProductType,
//!     config::BybitHttpClientConfig,
//!     http::{api::BybitHttpApi, query::BybitSetLeverageParams},
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let api = BybitHttpApi::from_config(&BybitHttpClientConfig::new())?;
//! let params = BybitSetLeverageParams::new(BybitProductType::Linear, "BTCUSDT", "10.5", "10.5")?;
//! let response = api.set_leverage(&params).await?;
//! println!("{}: {}", response.ret_code, response.ret_msg);
//! # Ok(())
//! # }
//! ```

#![warn(rustc::all)]
#![deny(unsafe_code)]
#![deny(nonstandard_style)]
#![deny(missing_debug_implementations)]
// #![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod common;
pub mod config;
pub mod http;
