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

//! Realtime clock access.
//!
//! Exchanges authenticate requests against their own server clock, so signing code needs wall
//! clock time (not a monotonic instant) in whole milliseconds.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// Saturates to zero for clocks set before the epoch
fn duration_since_unix_epoch() -> Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
}

/// Returns the current UNIX time in milliseconds.
#[must_use]
pub fn unix_time_ms() -> u64 {
    u64::try_from(duration_since_unix_epoch().as_millis()).unwrap_or(u64::MAX)
}
