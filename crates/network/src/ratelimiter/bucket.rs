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

//! Token bucket state for a single rate-limit key.

use std::time::Duration;

use tokio::time::Instant;

use super::quota::Quota;

/// A point-in-time view of a [`TokenBucket`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BucketSnapshot {
    /// The maximum number of tokens the bucket can hold.
    pub capacity: u32,
    /// The number of tokens currently available.
    pub tokens: u32,
    /// The instant from which partial refill progress is measured.
    pub last_refill: Instant,
}

/// Token bucket refilled continuously at one token per replenish interval.
///
/// The token count is always within `0..=capacity`. Refill is computed lazily from the elapsed
/// time whenever the bucket is inspected, so no background task is required. Partial progress
/// towards the next token is preserved by advancing `last_refill` only by whole intervals.
#[derive(Clone, Debug)]
pub struct TokenBucket {
    capacity: u32,
    tokens: u32,
    replenish_interval: Duration,
    last_refill: Instant,
}

impl TokenBucket {
    /// Creates a new full [`TokenBucket`] for the given quota.
    #[must_use]
    pub fn new(quota: Quota, now: Instant) -> Self {
        let capacity = quota.burst_size().get();
        Self {
            capacity,
            tokens: capacity,
            replenish_interval: quota.replenish_interval(),
            last_refill: now,
        }
    }

    /// Returns the maximum number of tokens.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the number of tokens available as of the last refill.
    #[must_use]
    pub const fn tokens(&self) -> u32 {
        self.tokens
    }

    /// Returns the replenish interval for a single token.
    #[must_use]
    pub const fn replenish_interval(&self) -> Duration {
        self.replenish_interval
    }

    /// Returns a snapshot of the bucket after refilling up to `now`.
    pub fn snapshot(&mut self, now: Instant) -> BucketSnapshot {
        self.refill(now);
        BucketSnapshot {
            capacity: self.capacity,
            tokens: self.tokens,
            last_refill: self.last_refill,
        }
    }

    /// Adds every whole token earned between `last_refill` and `now`.
    pub fn refill(&mut self, now: Instant) {
        if now <= self.last_refill {
            return;
        }

        if self.tokens >= self.capacity {
            // A full bucket does not bank progress towards tokens it cannot hold
            self.last_refill = now;
            return;
        }

        let elapsed = now.duration_since(self.last_refill);
        let periods = elapsed.as_nanos() / self.replenish_interval.as_nanos();
        if periods == 0 {
            return;
        }

        let missing = self.capacity - self.tokens;
        match u32::try_from(periods) {
            Ok(periods) if periods < missing => {
                self.tokens += periods;
                self.last_refill += self.replenish_interval * periods;
            }
            _ => {
                self.tokens = self.capacity;
                self.last_refill = now;
            }
        }
    }

    /// Attempts to take a single token at `now`.
    ///
    /// # Errors
    ///
    /// Returns the time to wait until the next token becomes available if the bucket is empty.
    pub fn try_take(&mut self, now: Instant) -> Result<(), Duration> {
        self.refill(now);

        if self.tokens > 0 {
            self.tokens -= 1;
            return Ok(());
        }

        let progress = now.saturating_duration_since(self.last_refill);
        let wait = self.replenish_interval.saturating_sub(progress);
        Err(if wait.is_zero() {
            self.replenish_interval
        } else {
            wait
        })
    }

    /// Returns a previously taken token to the bucket, never exceeding capacity.
    pub fn give_back(&mut self) {
        if self.tokens < self.capacity {
            self.tokens += 1;
        }
    }
}
