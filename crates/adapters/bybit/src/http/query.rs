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

//! Request parameter types for Bybit REST endpoints.
//!
//! Parameter values are validated when they are constructed, so an instance that exists can
//! always be encoded. Optional fields are omitted from the payload when unset.

use std::str::FromStr;

use derive_builder::Builder;
use serde::Serialize;

use super::error::BybitBuildError;
use crate::common::{
    decimal::BybitDecimal,
    enums::{BybitPositionMode, BybitProductType},
};

const POSITION_LIST_MAX_LIMIT: u32 = 200;

/// Body parameters for `POST /v5/position/set-leverage`.
///
/// # References
/// - <https://bybit-exchange.github.io/docs/v5/position/leverage>
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitSetLeverageParams {
    category: BybitProductType,
    symbol: String,
    buy_leverage: BybitDecimal,
    sell_leverage: BybitDecimal,
}

impl BybitSetLeverageParams {
    /// Creates new validated [`BybitSetLeverageParams`] from leverage strings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `category` is not a leveraged derivatives category.
    /// - `symbol` is empty.
    /// - Either leverage is not a canonical decimal or is not strictly positive.
    pub fn new(
        category: BybitProductType,
        symbol: impl Into<String>,
        buy_leverage: &str,
        sell_leverage: &str,
    ) -> Result<Self, BybitBuildError> {
        Self::from_decimals(
            category,
            symbol,
            BybitDecimal::from_str(buy_leverage)?,
            BybitDecimal::from_str(sell_leverage)?,
        )
    }

    /// Creates new validated [`BybitSetLeverageParams`] from decimal values.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`Self::new`].
    pub fn from_decimals(
        category: BybitProductType,
        symbol: impl Into<String>,
        buy_leverage: BybitDecimal,
        sell_leverage: BybitDecimal,
    ) -> Result<Self, BybitBuildError> {
        if !category.supports_leverage() {
            return Err(BybitBuildError::UnsupportedCategory(category.to_string()));
        }

        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(BybitBuildError::MissingSymbol);
        }

        for leverage in [buy_leverage, sell_leverage] {
            if !leverage.is_positive() {
                return Err(BybitBuildError::InvalidLeverage(leverage.to_string()));
            }
        }

        Ok(Self {
            category,
            symbol,
            buy_leverage,
            sell_leverage,
        })
    }

    #[must_use]
    pub const fn category(&self) -> BybitProductType {
        self.category
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub const fn buy_leverage(&self) -> BybitDecimal {
        self.buy_leverage
    }

    #[must_use]
    pub const fn sell_leverage(&self) -> BybitDecimal {
        self.sell_leverage
    }
}

/// Body parameters for `POST /v5/position/switch-mode`.
///
/// # References
/// - <https://bybit-exchange.github.io/docs/v5/position/position-mode>
///
/// Only constructible through [`BybitSwitchModeParamsBuilder`], which validates the fields:
///
/// ```compile_fail
/// use tradeport_bybit::{
///     common::enums::{BybitPositionMode, BybitProductType},
///     http::query::BybitSwitchModeParams,
/// };
///
/// let params = BybitSwitchModeParams {
///     category: BybitProductType::Spot,
///     symbol: None,
///     coin: None,
///     mode: BybitPositionMode::BothSides,
/// };
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(build_fn(validate = "Self::validate", error = "BybitBuildError"))]
pub struct BybitSwitchModeParams {
    category: BybitProductType,
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    coin: Option<String>,
    mode: BybitPositionMode,
}

impl BybitSwitchModeParams {
    #[must_use]
    pub const fn category(&self) -> BybitProductType {
        self.category
    }

    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    #[must_use]
    pub fn coin(&self) -> Option<&str> {
        self.coin.as_deref()
    }

    #[must_use]
    pub const fn mode(&self) -> BybitPositionMode {
        self.mode
    }
}

impl BybitSwitchModeParamsBuilder {
    fn validate(&self) -> Result<(), BybitBuildError> {
        if let Some(category) = self.category
            && !category.supports_leverage()
        {
            return Err(BybitBuildError::UnsupportedCategory(category.to_string()));
        }

        let has_symbol = matches!(&self.symbol, Some(Some(s)) if !s.is_empty());
        let has_coin = matches!(&self.coin, Some(Some(c)) if !c.is_empty());
        if !has_symbol && !has_coin {
            return Err(BybitBuildError::MissingSymbolOrCoin("coin"));
        }

        Ok(())
    }
}

/// Query parameters for `GET /v5/position/list`.
///
/// # References
/// - <https://bybit-exchange.github.io/docs/v5/position>
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(build_fn(validate = "Self::validate", error = "BybitBuildError"))]
pub struct BybitPositionListParams {
    category: BybitProductType,
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    base_coin: Option<String>,
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    settle_coin: Option<String>,
    #[builder(default, setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[builder(default, setter(into, strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<String>,
}

impl BybitPositionListParams {
    #[must_use]
    pub const fn category(&self) -> BybitProductType {
        self.category
    }

    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    #[must_use]
    pub fn base_coin(&self) -> Option<&str> {
        self.base_coin.as_deref()
    }

    #[must_use]
    pub fn settle_coin(&self) -> Option<&str> {
        self.settle_coin.as_deref()
    }

    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        self.limit
    }

    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

impl BybitPositionListParamsBuilder {
    fn validate(&self) -> Result<(), BybitBuildError> {
        if let Some(Some(limit)) = self.limit
            && !(1..=POSITION_LIST_MAX_LIMIT).contains(&limit)
        {
            return Err(BybitBuildError::InvalidLimit {
                max: POSITION_LIST_MAX_LIMIT,
            });
        }

        // Linear positions must be narrowed by symbol or settlement coin
        if self.category == Some(BybitProductType::Linear)
            && matches!(self.symbol, None | Some(None))
            && matches!(self.settle_coin, None | Some(None))
        {
            return Err(BybitBuildError::MissingSymbolOrCoin("settleCoin"));
        }

        Ok(())
    }
}

/// Query parameters for `GET /v5/account/fee-rate`.
///
/// # References
/// - <https://bybit-exchange.github.io/docs/v5/account/fee-rate>
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(default)]
#[builder(setter(into))]
#[builder(build_fn(error = "BybitBuildError"))]
pub struct BybitFeeRateParams {
    category: BybitProductType,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    symbol: Option<String>,
    #[builder(setter(strip_option))]
    #[serde(skip_serializing_if = "Option::is_none")]
    base_coin: Option<String>,
}

impl BybitFeeRateParams {
    #[must_use]
    pub const fn category(&self) -> BybitProductType {
        self.category
    }

    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    #[must_use]
    pub fn base_coin(&self) -> Option<&str> {
        self.base_coin.as_deref()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_set_leverage_serializes_decimals_as_strings() {
        let params =
            BybitSetLeverageParams::new(BybitProductType::Linear, "BTCUSDT", "10.5", "10.5")
                .unwrap();

        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(
            json,
            r#"{"category":"linear","symbol":"BTCUSDT","buyLeverage":"10.5","sellLeverage":"10.5"}"#
        );
    }

    #[rstest]
    #[case(BybitProductType::Spot)]
    #[case(BybitProductType::Option)]
    fn test_set_leverage_rejects_unleveraged_category(#[case] category: BybitProductType) {
        let result = BybitSetLeverageParams::new(category, "BTCUSDT", "10", "10");
        assert!(matches!(
            result,
            Err(BybitBuildError::UnsupportedCategory(_))
        ));
    }

    #[rstest]
    #[case("abc", "10")]
    #[case("10", "+10")]
    #[case("010", "10")]
    fn test_set_leverage_rejects_invalid_decimal(#[case] buy: &str, #[case] sell: &str) {
        let result = BybitSetLeverageParams::new(BybitProductType::Linear, "BTCUSDT", buy, sell);
        assert!(matches!(result, Err(BybitBuildError::InvalidDecimal(_))));
    }

    #[rstest]
    #[case("0", "10")]
    #[case("10", "-1")]
    fn test_set_leverage_rejects_non_positive(#[case] buy: &str, #[case] sell: &str) {
        let result = BybitSetLeverageParams::new(BybitProductType::Linear, "BTCUSDT", buy, sell);
        assert!(matches!(result, Err(BybitBuildError::InvalidLeverage(_))));
    }

    #[rstest]
    fn test_set_leverage_rejects_empty_symbol() {
        let result = BybitSetLeverageParams::new(BybitProductType::Inverse, " ", "5", "5");
        assert_eq!(result.unwrap_err(), BybitBuildError::MissingSymbol);
    }

    #[rstest]
    fn test_switch_mode_requires_symbol_or_coin() {
        let result = BybitSwitchModeParamsBuilder::default()
            .category(BybitProductType::Linear)
            .mode(BybitPositionMode::BothSides)
            .build();
        assert_eq!(
            result.unwrap_err(),
            BybitBuildError::MissingSymbolOrCoin("coin")
        );
    }

    #[rstest]
    fn test_switch_mode_missing_mode() {
        let result = BybitSwitchModeParamsBuilder::default()
            .category(BybitProductType::Linear)
            .coin("USDT")
            .build();
        assert_eq!(result.unwrap_err(), BybitBuildError::MissingField("mode"));
    }

    #[rstest]
    fn test_switch_mode_serializes_mode_as_integer() {
        let params = BybitSwitchModeParamsBuilder::default()
            .category(BybitProductType::Linear)
            .coin("USDT")
            .mode(BybitPositionMode::BothSides)
            .build()
            .unwrap();

        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"category":"linear","coin":"USDT","mode":3}"#);
    }

    #[rstest]
    fn test_position_list_query_omits_unset_fields() {
        let params = BybitPositionListParamsBuilder::default()
            .category(BybitProductType::Linear)
            .symbol("BTCUSDT")
            .limit(50)
            .build()
            .unwrap();

        let query = serde_urlencoded::to_string(&params).unwrap();
        assert_eq!(query, "category=linear&symbol=BTCUSDT&limit=50");
    }

    #[rstest]
    fn test_position_list_linear_requires_symbol_or_settle_coin() {
        let result = BybitPositionListParamsBuilder::default()
            .category(BybitProductType::Linear)
            .build();
        assert_eq!(
            result.unwrap_err(),
            BybitBuildError::MissingSymbolOrCoin("settleCoin")
        );

        let params = BybitPositionListParamsBuilder::default()
            .category(BybitProductType::Inverse)
            .build()
            .unwrap();
        assert_eq!(params.category(), BybitProductType::Inverse);
    }

    #[rstest]
    #[case(0)]
    #[case(201)]
    fn test_position_list_rejects_limit_out_of_range(#[case] limit: u32) {
        let result = BybitPositionListParamsBuilder::default()
            .category(BybitProductType::Inverse)
            .limit(limit)
            .build();
        assert_eq!(
            result.unwrap_err(),
            BybitBuildError::InvalidLimit { max: 200 }
        );
    }

    #[rstest]
    fn test_fee_rate_defaults() {
        let params = BybitFeeRateParamsBuilder::default()
            .category(BybitProductType::Spot)
            .build()
            .unwrap();

        let query = serde_urlencoded::to_string(&params).unwrap();
        assert_eq!(query, "category=spot");
    }

    #[rstest]
    fn test_validated_params_expose_fields_read_only() {
        let switch = BybitSwitchModeParamsBuilder::default()
            .category(BybitProductType::Inverse)
            .symbol("BTCUSD")
            .mode(BybitPositionMode::MergedSingle)
            .build()
            .unwrap();
        assert_eq!(switch.category(), BybitProductType::Inverse);
        assert_eq!(switch.symbol(), Some("BTCUSD"));
        assert_eq!(switch.coin(), None);
        assert_eq!(switch.mode(), BybitPositionMode::MergedSingle);

        let positions = BybitPositionListParamsBuilder::default()
            .category(BybitProductType::Linear)
            .settle_coin("USDT")
            .limit(200)
            .cursor("page-2")
            .build()
            .unwrap();
        assert_eq!(positions.settle_coin(), Some("USDT"));
        assert_eq!(positions.limit(), Some(200));
        assert_eq!(positions.cursor(), Some("page-2"));
        assert_eq!(positions.symbol(), None);
    }
}
