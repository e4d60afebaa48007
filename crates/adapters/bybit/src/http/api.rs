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

//! Grouped access to the Bybit v5 REST endpoints used by the adapter.

use super::{
    client::BybitHttpClient,
    endpoint::{
        BybitFeeRateEndpoint, BybitPositionListEndpoint, BybitServerTimeEndpoint,
        BybitSetLeverageEndpoint, BybitSwitchModeEndpoint,
    },
    error::BybitHttpError,
    models::{
        BybitFeeRate, BybitPosition, BybitServerTime, BybitSetLeverageResponse,
        BybitSwitchModeResponse,
    },
    query::{
        BybitFeeRateParams, BybitPositionListParams, BybitSetLeverageParams,
        BybitSwitchModeParams,
    },
};
use crate::{
    common::{consts::BYBIT_BASE_ENDPOINT, models::BybitCursorListResult},
    config::BybitHttpClientConfig,
};

/// Every adapter endpoint, constructed once against one shared [`BybitHttpClient`].
///
/// Write methods return the raw acknowledgement so callers can inspect `retCode`. Read
/// methods unwrap the envelope and fail with [`BybitHttpError::BybitError`] on rejection.
#[derive(Clone, Debug)]
pub struct BybitHttpApi {
    client: BybitHttpClient,
    set_leverage: BybitSetLeverageEndpoint,
    switch_mode: BybitSwitchModeEndpoint,
    position_list: BybitPositionListEndpoint,
    fee_rate: BybitFeeRateEndpoint,
    server_time: BybitServerTimeEndpoint,
}

impl BybitHttpApi {
    /// Creates a new [`BybitHttpApi`] on top of an existing client.
    #[must_use]
    pub fn new(client: BybitHttpClient) -> Self {
        let base = BYBIT_BASE_ENDPOINT;
        Self {
            set_leverage: BybitSetLeverageEndpoint::set_leverage(&client, base),
            switch_mode: BybitSwitchModeEndpoint::switch_mode(&client, base),
            position_list: BybitPositionListEndpoint::position_list(&client, base),
            fee_rate: BybitFeeRateEndpoint::fee_rate(&client, base),
            server_time: BybitServerTimeEndpoint::server_time(&client, base),
            client,
        }
    }

    /// Creates a new [`BybitHttpApi`] and its client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client cannot be built.
    pub fn from_config(config: &BybitHttpClientConfig) -> Result<Self, BybitHttpError> {
        Ok(Self::new(BybitHttpClient::new(config)?))
    }

    /// Returns the shared client.
    #[must_use]
    pub fn client(&self) -> &BybitHttpClient {
        &self.client
    }

    /// Cancel all pending HTTP requests.
    pub fn cancel_all_requests(&self) {
        self.client.cancel_all_requests();
    }

    /// Sets the buy and sell leverage for a symbol.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    pub async fn set_leverage(
        &self,
        params: &BybitSetLeverageParams,
    ) -> Result<BybitSetLeverageResponse, BybitHttpError> {
        self.set_leverage.call(params).await
    }

    /// Switches between one-way and hedge position mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be decoded.
    pub async fn switch_mode(
        &self,
        params: &BybitSwitchModeParams,
    ) -> Result<BybitSwitchModeResponse, BybitHttpError> {
        self.switch_mode.call(params).await
    }

    /// Fetches one page of open positions.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response cannot be decoded or Bybit rejects
    /// the request.
    pub async fn fetch_positions(
        &self,
        params: &BybitPositionListParams,
    ) -> Result<BybitCursorListResult<BybitPosition>, BybitHttpError> {
        self.position_list.call(params).await?.into_result()
    }

    /// Fetches the trading fee rates matching `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response cannot be decoded or Bybit rejects
    /// the request.
    pub async fn fetch_fee_rates(
        &self,
        params: &BybitFeeRateParams,
    ) -> Result<Vec<BybitFeeRate>, BybitHttpError> {
        Ok(self.fee_rate.call(params).await?.into_result()?.list)
    }

    /// Fetches the exchange server time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response cannot be decoded or Bybit rejects
    /// the request.
    pub async fn fetch_server_time(&self) -> Result<BybitServerTime, BybitHttpError> {
        self.server_time.call(&()).await?.into_result()
    }
}
