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

//! Concurrency and cancellation behavior of the keyed rate limiter.

use std::{
    num::NonZeroU32,
    sync::{Arc, Mutex},
    time::Duration,
};

use futures::future::join_all;
use rstest::rstest;
use tokio::time::Instant;
use tradeport_network::ratelimiter::{RateLimiter, quota::Quota};

const KEY: &str = "position";

fn limiter(capacity: u32, interval_ms: u64) -> Arc<RateLimiter<&'static str>> {
    let quota = Quota::with_period(Duration::from_millis(interval_ms))
        .unwrap()
        .allow_burst(NonZeroU32::new(capacity).unwrap());
    Arc::new(RateLimiter::new_with_quota(quota, vec![(KEY, quota)]))
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_waiters_granted_in_arrival_order() {
    let limiter = limiter(1, 100);
    limiter.acquire(&KEY).await.consume();

    let order = Arc::new(Mutex::new(Vec::new()));
    let mut handles = Vec::new();

    for i in 0..5 {
        let limiter = limiter.clone();
        let order = order.clone();
        handles.push(tokio::spawn(async move {
            limiter.acquire(&KEY).await.consume();
            order.lock().unwrap().push(i);
        }));
        // Let the task enqueue before spawning the next one
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    join_all(handles).await;
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_all_concurrent_callers_complete() {
    let limiter = limiter(2, 50);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let limiter = limiter.clone();
            tokio::spawn(async move {
                limiter.acquire(&KEY).await.consume();
            })
        })
        .collect();

    let results = join_all(handles).await;
    assert_eq!(results.len(), 10);
    assert!(results.iter().all(Result::is_ok));
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_grants_never_exceed_capacity_within_interval() {
    let capacity = 3;
    let interval = Duration::from_millis(100);
    let limiter = limiter(capacity, 100);

    let grants = Arc::new(Mutex::new(Vec::new()));
    let handles: Vec<_> = (0..12)
        .map(|_| {
            let limiter = limiter.clone();
            let grants = grants.clone();
            tokio::spawn(async move {
                limiter.acquire(&KEY).await.consume();
                grants.lock().unwrap().push(Instant::now());
            })
        })
        .collect();
    join_all(handles).await;

    let mut grants = grants.lock().unwrap().clone();
    grants.sort();
    assert_eq!(grants.len(), 12);

    // Any window shorter than the interval contains at most `capacity` grants
    for pair in grants.windows(capacity as usize + 1) {
        let span = pair[capacity as usize].duration_since(pair[0]);
        assert!(span >= interval, "{} grants within {span:?}", capacity + 1);
    }
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_cancel_while_waiting_takes_no_token() {
    let limiter = limiter(1, 100);
    limiter.acquire(&KEY).await.consume();

    let result = tokio::time::timeout(Duration::from_millis(50), limiter.acquire(&KEY)).await;
    assert!(result.is_err());

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(limiter.snapshot(&KEY).unwrap().tokens, 1);

    // The next caller is served without waiting for a further refill
    let start = Instant::now();
    limiter.acquire(&KEY).await.consume();
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_cancel_after_grant_restores_token() {
    let limiter = limiter(2, 1_000);

    let holder = {
        let limiter = limiter.clone();
        tokio::spawn(async move {
            let _permit = limiter.acquire(&KEY).await;
            std::future::pending::<()>().await;
        })
    };

    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(limiter.snapshot(&KEY).unwrap().tokens, 1);

    holder.abort();
    let _ = holder.await;

    assert_eq!(limiter.snapshot(&KEY).unwrap().tokens, 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn test_canceled_waiter_does_not_block_queue() {
    let limiter = limiter(1, 100);
    let origin = Instant::now();
    limiter.acquire(&KEY).await.consume();

    let canceled = {
        let limiter = limiter.clone();
        tokio::spawn(async move {
            limiter.acquire(&KEY).await.consume();
        })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;

    let served = {
        let limiter = limiter.clone();
        tokio::spawn(async move {
            limiter.acquire(&KEY).await.consume();
            Instant::now()
        })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;

    canceled.abort();
    let granted_at = served.await.unwrap();

    // Served by the first refill, which the canceled waiter never took
    let waited = granted_at.duration_since(origin);
    assert!(waited >= Duration::from_millis(100));
    assert!(waited < Duration::from_millis(200));
}
