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

//! Core constants.

/// The crate version string (from the workspace manifest).
pub const TRADEPORT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The `User-Agent` header value sent with every outgoing HTTP request.
pub const TRADEPORT_USER_AGENT: &str = concat!("tradeport/", env!("CARGO_PKG_VERSION"));

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_user_agent_contains_version() {
        assert!(TRADEPORT_USER_AGENT.starts_with("tradeport/"));
        assert!(TRADEPORT_USER_AGENT.ends_with(TRADEPORT_VERSION));
    }
}
