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

use std::{num::NonZeroU32, time::Duration};

/// A rate-limiting quota.
///
/// Quotas are expressed as a positive number of tokens (the maximum burst a bucket can hold) and
/// the amount of time for the bucket to replenish a single token.
///
/// Neither the number of tokens nor the replenishment interval may be zero.
///
/// # Burst sizes
///
/// There are multiple ways of expressing the same average rate: `Quota::per_second(1)` and
/// `Quota::per_minute(60)` let through the same number of requests over time, but the latter
/// can absorb a burst of 60 requests at once, after which a minute of inactivity is required
/// before the full burst is available again.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Quota {
    pub(crate) max_burst: NonZeroU32,
    pub(crate) replenish_1_per: Duration,
}

/// Constructors for Quotas
impl Quota {
    /// Construct a quota for a number of tokens per second. The given number of tokens is also
    /// assumed to be the maximum burst size.
    #[must_use]
    pub const fn per_second(max_burst: NonZeroU32) -> Self {
        Self::replenish_all_per(max_burst, Duration::from_secs(1))
    }

    /// Construct a quota for a number of tokens per 60-second period. The given number of tokens
    /// is also assumed to be the maximum burst size.
    #[must_use]
    pub const fn per_minute(max_burst: NonZeroU32) -> Self {
        Self::replenish_all_per(max_burst, Duration::from_secs(60))
    }

    /// Construct a quota for a number of tokens per 3600-second period. The given number of
    /// tokens is also assumed to be the maximum burst size.
    #[must_use]
    pub const fn per_hour(max_burst: NonZeroU32) -> Self {
        Self::replenish_all_per(max_burst, Duration::from_secs(60 * 60))
    }

    /// Construct a quota that replenishes one token in the given interval, with a burst size
    /// of one.
    ///
    /// Returns `None` if the interval is zero.
    #[must_use]
    pub const fn with_period(replenish_1_per: Duration) -> Option<Self> {
        if replenish_1_per.is_zero() {
            None
        } else {
            Some(Self {
                max_burst: NonZeroU32::MIN,
                replenish_1_per,
            })
        }
    }

    /// Adjusts the maximum burst size of a quota, keeping its replenishment interval.
    #[must_use]
    pub const fn allow_burst(self, max_burst: NonZeroU32) -> Self {
        Self { max_burst, ..self }
    }

    const fn replenish_all_per(max_burst: NonZeroU32, period: Duration) -> Self {
        let interval_ns = period.as_nanos() / (max_burst.get() as u128);
        // At least one nanosecond so that refill arithmetic never divides by zero
        let interval_ns = if interval_ns == 0 { 1 } else { interval_ns };
        Self {
            max_burst,
            replenish_1_per: Duration::from_nanos(interval_ns as u64),
        }
    }
}

/// Retrieving information about a quota
impl Quota {
    /// The time it takes for an exhausted bucket to replenish a single token.
    #[must_use]
    pub const fn replenish_interval(&self) -> Duration {
        self.replenish_1_per
    }

    /// The maximum number of tokens a bucket can hold.
    #[must_use]
    pub const fn burst_size(&self) -> NonZeroU32 {
        self.max_burst
    }

    /// The time it takes to replenish the entire burst from empty.
    #[must_use]
    pub const fn burst_size_replenished_in(&self) -> Duration {
        let fill_in_ns = self.replenish_1_per.as_nanos() * self.max_burst.get() as u128;
        Duration::from_nanos(fill_in_ns as u64)
    }
}
