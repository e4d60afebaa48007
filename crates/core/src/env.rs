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

//! Helpers for reading configuration values from the process environment.

/// Returns `value` when provided, otherwise the environment variable `key` if it is set.
#[must_use]
pub fn get_or_env_var_opt(value: Option<String>, key: &str) -> Option<String> {
    value.or_else(|| std::env::var(key).ok())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn test_get_or_env_var_opt_prefers_value() {
        let result = get_or_env_var_opt(Some("abc".to_string()), "PATH");
        assert_eq!(result.as_deref(), Some("abc"));
    }

    #[rstest]
    fn test_get_or_env_var_opt_missing() {
        assert!(get_or_env_var_opt(None, "TRADEPORT_TEST_SURELY_NOT_SET_3").is_none());
    }

    #[rstest]
    fn test_get_or_env_var_opt_reads_environment() {
        // PATH is set in every test environment
        assert!(get_or_env_var_opt(None, "PATH").is_some());
    }
}
