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

//! Exponential backoff with jitter, used to space out retried requests.
//!
//! Each delay grows by a constant factor from an initial value up to a cap. A random jitter
//! of up to `jitter_ms` is added on top of the base delay so that concurrent callers which
//! failed together do not all retry at the same instant.

use std::time::Duration;

use anyhow::ensure;
use rand::Rng;

/// Successive retry delays growing exponentially up to a cap.
#[derive(Clone, Debug)]
pub struct ExponentialBackoff {
    delay_initial: Duration,
    delay_max: Duration,
    delay_current: Duration,
    factor: f64,
    jitter_ms: u64,
    immediate_first: bool,
    immediate_pending: bool,
}

impl ExponentialBackoff {
    /// Creates a new [`ExponentialBackoff`] instance.
    ///
    /// When `immediate_first` is set the first delay after creation (or [`Self::reset`]) is
    /// zero.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `delay_initial` is zero or greater than `delay_max`.
    /// - `factor` is not finite or is outside `[1.0, 100.0]`.
    pub fn new(
        delay_initial: Duration,
        delay_max: Duration,
        factor: f64,
        jitter_ms: u64,
        immediate_first: bool,
    ) -> anyhow::Result<Self> {
        ensure!(!delay_initial.is_zero(), "delay_initial must be non-zero");
        ensure!(
            delay_initial <= delay_max,
            "delay_initial {delay_initial:?} exceeds delay_max {delay_max:?}"
        );
        ensure!(
            factor.is_finite() && (1.0..=100.0).contains(&factor),
            "factor must be within [1.0, 100.0], was {factor}"
        );

        Ok(Self {
            delay_initial,
            delay_max,
            delay_current: delay_initial,
            factor,
            jitter_ms,
            immediate_first,
            immediate_pending: immediate_first,
        })
    }

    /// Returns the next delay (base plus jitter) and advances the base delay.
    pub fn next_duration(&mut self) -> Duration {
        if self.immediate_pending {
            self.immediate_pending = false;
            return Duration::ZERO;
        }

        let jitter = if self.jitter_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=self.jitter_ms)
        };
        let delay = self.delay_current + Duration::from_millis(jitter);

        let next = self.delay_current.mul_f64(self.factor);
        self.delay_current = next.min(self.delay_max);

        delay
    }

    /// Resets the backoff to its initial state.
    pub const fn reset(&mut self) {
        self.delay_current = self.delay_initial;
        self.immediate_pending = self.immediate_first;
    }

    /// Returns the base delay (without jitter) the next call will use.
    #[must_use]
    pub const fn current_delay(&self) -> Duration {
        self.delay_current
    }
}
