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

//! Data transfer objects for deserializing Bybit HTTP API payloads.

use serde::{Deserialize, Serialize};
use ustr::Ustr;

use crate::common::{
    decimal::BybitDecimal,
    enums::{BybitPositionIdx, BybitPositionSide, BybitPositionStatus},
    models::{BybitAckResponse, BybitCursorListResult, BybitListResult, BybitResponse},
};

/// Response returned by `POST /v5/position/set-leverage`.
///
/// # References
/// - <https://bybit-exchange.github.io/docs/v5/position/leverage>
pub type BybitSetLeverageResponse = BybitAckResponse;

/// Response returned by `POST /v5/position/switch-mode`.
///
/// # References
/// - <https://bybit-exchange.github.io/docs/v5/position/position-mode>
pub type BybitSwitchModeResponse = BybitAckResponse;

/// Response payload returned by `GET /v5/market/time`.
///
/// # References
/// - <https://bybit-exchange.github.io/docs/v5/market/time>
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitServerTime {
    /// Server timestamp in seconds represented as string.
    pub time_second: String,
    /// Server timestamp in nanoseconds represented as string.
    pub time_nano: String,
}

/// Type alias for the server time response envelope.
pub type BybitServerTimeResponse = BybitResponse<BybitServerTime>;

/// An open position as returned by `GET /v5/position/list`.
///
/// # References
/// - <https://bybit-exchange.github.io/docs/v5/position>
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitPosition {
    pub position_idx: BybitPositionIdx,
    pub symbol: Ustr,
    pub side: BybitPositionSide,
    pub size: BybitDecimal,
    pub avg_price: BybitDecimal,
    pub position_value: String,
    pub leverage: BybitDecimal,
    pub mark_price: BybitDecimal,
    pub liq_price: String,
    pub unrealised_pnl: String,
    pub cum_realised_pnl: String,
    pub position_status: BybitPositionStatus,
    pub created_time: String,
    pub updated_time: String,
}

/// Type alias for the position list response envelope.
pub type BybitPositionListResponse = BybitResponse<BybitCursorListResult<BybitPosition>>;

/// Trading fee rates for a symbol as returned by `GET /v5/account/fee-rate`.
///
/// # References
/// - <https://bybit-exchange.github.io/docs/v5/account/fee-rate>
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitFeeRate {
    pub symbol: Ustr,
    #[serde(default)]
    pub base_coin: Option<String>,
    pub taker_fee_rate: BybitDecimal,
    pub maker_fee_rate: BybitDecimal,
}

/// Type alias for the fee rate response envelope.
pub type BybitFeeRateResponse = BybitResponse<BybitListResult<BybitFeeRate>>;

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
