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

//! Demonstration binary for the Bybit REST endpoints.
//!
//! Run with:
//! ```bash
//! cargo run -p tradeport-bybit --bin bybit-http
//! ```
//!
//! For signed endpoints, set credentials (a `.env` file is also read):
//! ```bash
//! export BYBIT_ENVIRONMENT=testnet
//! export BYBIT_TESTNET_API_KEY=your_key
//! export BYBIT_TESTNET_API_SECRET=your_secret
//! export BYBIT_LEVERAGE=5   # optional, applies set-leverage to BYBIT_SYMBOL
//! cargo run -p tradeport-bybit --bin bybit-http
//! ```

use std::{env, str::FromStr};

use tradeport_bybit::{
    common::enums::{BybitEnvironment, BybitProductType},
    config::BybitHttpClientConfig,
    http::{
        api::BybitHttpApi,
        error::BybitHttpError,
        query::{BybitFeeRateParamsBuilder, BybitPositionListParamsBuilder, BybitSetLeverageParams},
    },
};
use tradeport_network::retry::{RetryConfig, RetryManager};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_target(false).with_env_filter(filter).init();

    let environment = match env::var("BYBIT_ENVIRONMENT") {
        Ok(value) => BybitEnvironment::from_str(&value)?,
        Err(_) => BybitEnvironment::Mainnet,
    };
    let symbol = env::var("BYBIT_SYMBOL").unwrap_or_else(|_| "BTCUSDT".to_string());

    let config = BybitHttpClientConfig {
        environment,
        ..BybitHttpClientConfig::default()
    };
    let api = BybitHttpApi::from_config(&config)?;
    tracing::info!("Connected to {} ({environment})", api.client().base_url());

    let retry_manager = RetryManager::<BybitHttpError>::new(RetryConfig::default())?;
    let server_time = retry_manager
        .execute_with_retry(
            "fetch_server_time",
            || api.fetch_server_time(),
            BybitHttpError::is_retryable,
            BybitHttpError::from,
        )
        .await?;
    tracing::info!("Server time: {}s", server_time.time_second);

    if !api.client().has_credentials() {
        tracing::warn!("No credentials configured, skipping signed endpoints");
        return Ok(());
    }

    let params = BybitPositionListParamsBuilder::default()
        .category(BybitProductType::Linear)
        .symbol(symbol.clone())
        .build()?;
    let positions = api.fetch_positions(&params).await?;
    for position in &positions.list {
        tracing::info!(
            "Position {}: side={:?} size={} leverage={}",
            position.symbol,
            position.side,
            position.size,
            position.leverage,
        );
    }

    let params = BybitFeeRateParamsBuilder::default()
        .category(BybitProductType::Linear)
        .symbol(symbol.clone())
        .build()?;
    for fee in api.fetch_fee_rates(&params).await? {
        tracing::info!(
            "Fee rate {}: maker={} taker={}",
            fee.symbol,
            fee.maker_fee_rate,
            fee.taker_fee_rate,
        );
    }

    if let Ok(leverage) = env::var("BYBIT_LEVERAGE") {
        let params =
            BybitSetLeverageParams::new(BybitProductType::Linear, &symbol, &leverage, &leverage)?;
        let response = api.set_leverage(&params).await?;
        if response.is_success() {
            tracing::info!("Leverage for {symbol} set to {leverage}");
        } else {
            // 110043 means the leverage is unchanged
            tracing::warn!(
                "Set leverage rejected: {} ({})",
                response.ret_msg,
                response.ret_code
            );
        }
    }

    Ok(())
}
