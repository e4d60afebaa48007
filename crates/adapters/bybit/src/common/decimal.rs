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

//! Exact decimal values as exchanged with Bybit.
//!
//! Bybit encodes prices, quantities and leverage as JSON strings. [`BybitDecimal`] keeps the
//! value as an exact decimal and only accepts the canonical textual form, so the string read
//! from a caller or a payload is the string written back to the wire.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Visitor};
use thiserror::Error;

/// An error raised when text is not a canonical decimal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid decimal '{input}': {reason}")]
pub struct BybitDecimalError {
    /// The rejected text.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

/// An exact decimal encoded as a JSON string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BybitDecimal(Decimal);

impl BybitDecimal {
    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the value is strictly greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl FromStr for BybitDecimal {
    type Err = BybitDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: &str| BybitDecimalError {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let value = Decimal::from_str(s).map_err(|e| error(&e.to_string()))?;

        // Leading zeros, a '+' sign, a bare '.' and similar spellings would not survive
        // re-encoding, so only the form the decimal prints as is accepted
        if value.to_string() != s {
            return Err(error("not in canonical form"));
        }

        Ok(Self(value))
    }
}

impl From<Decimal> for BybitDecimal {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<BybitDecimal> for Decimal {
    fn from(value: BybitDecimal) -> Self {
        value.0
    }
}

impl Display for BybitDecimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for BybitDecimal {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

struct BybitDecimalVisitor;

impl Visitor<'_> for BybitDecimalVisitor {
    type Value = BybitDecimal;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("a decimal encoded as a string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        BybitDecimal::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for BybitDecimal {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(BybitDecimalVisitor)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
