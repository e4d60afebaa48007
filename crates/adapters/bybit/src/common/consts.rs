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

//! Core constants shared across the Bybit adapter components.

use std::{num::NonZeroU32, sync::LazyLock};

use tradeport_network::ratelimiter::quota::Quota;

use super::enums::BybitEndpointType;

pub const BYBIT: &str = "BYBIT";

/// See <https://www.bybit.com/en/broker> for further details.
pub const BYBIT_BROKER_ID: &str = "Qy000878";

/// Version prefix prepended to every REST path.
pub const BYBIT_BASE_ENDPOINT: &str = "/v5";

pub const BYBIT_HTTP_URL: &str = "https://api.bybit.com";
pub const BYBIT_HTTP_DEMO_URL: &str = "https://api-demo.bybit.com";
pub const BYBIT_HTTP_TESTNET_URL: &str = "https://api-testnet.bybit.com";

pub const BYBIT_DEFAULT_RECV_WINDOW_MS: u64 = 5_000;
pub const BYBIT_DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Default Bybit REST rate limit for categories without an explicit quota.
///
/// Bybit limits most private endpoints to 10 requests per second per UID.
pub static BYBIT_REST_QUOTA: LazyLock<Quota> = LazyLock::new(|| per_second(10));

/// Per-category quotas applied unless overridden by configuration.
///
/// Public market data is limited per IP (600 requests per 5 seconds).
pub static BYBIT_REST_CATEGORY_QUOTAS: LazyLock<Vec<(BybitEndpointType, Quota)>> =
    LazyLock::new(|| {
        vec![
            (BybitEndpointType::Market, per_second(120)),
            (BybitEndpointType::Trade, per_second(10)),
            (BybitEndpointType::Position, per_second(10)),
            (BybitEndpointType::Account, per_second(10)),
            (BybitEndpointType::Asset, per_second(5)),
            (BybitEndpointType::User, per_second(5)),
        ]
    });

fn per_second(n: u32) -> Quota {
    Quota::per_second(NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN))
}
