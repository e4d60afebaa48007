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

//! A keyed token-bucket rate limiter with FIFO waiters and cancellation-safe permits.
//!
//! Every key (for example an exchange endpoint category) owns exactly one [`TokenBucket`].
//! Callers contending for the same key are granted tokens strictly in arrival order, and a
//! granted token is only spent once the caller calls [`RateLimitPermit::consume`]. Dropping a
//! permit (for example because the surrounding future was cancelled) returns its token.

pub mod bucket;
pub mod quota;

use std::{
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use dashmap::DashMap;
use tokio::time::Instant;

use self::{
    bucket::{BucketSnapshot, TokenBucket},
    quota::Quota,
};

/// Shared state for a single key.
#[derive(Debug)]
struct KeyedBucket {
    /// Fair (FIFO) turnstile, held by the waiter at the head of the queue.
    turnstile: tokio::sync::Mutex<()>,
    state: Mutex<TokenBucket>,
}

impl KeyedBucket {
    fn new(quota: Quota) -> Self {
        Self {
            turnstile: tokio::sync::Mutex::new(()),
            state: Mutex::new(TokenBucket::new(quota, Instant::now())),
        }
    }

    fn state(&self) -> MutexGuard<'_, TokenBucket> {
        // Bucket mutations cannot panic midway, so a poisoned lock still holds a valid state
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A token granted by [`RateLimiter::acquire`].
///
/// The token is returned to its bucket when the permit is dropped, unless it was spent with
/// [`RateLimitPermit::consume`].
#[derive(Debug)]
#[must_use = "dropping a permit returns its token to the bucket"]
pub struct RateLimitPermit {
    bucket: Option<Arc<KeyedBucket>>,
}

impl RateLimitPermit {
    fn new(bucket: Arc<KeyedBucket>) -> Self {
        Self {
            bucket: Some(bucket),
        }
    }

    /// Spends the token. Call this immediately before dispatching the rate-limited operation.
    pub fn consume(mut self) {
        self.bucket = None;
    }
}

impl Drop for RateLimitPermit {
    fn drop(&mut self) {
        if let Some(bucket) = self.bucket.take() {
            bucket.state().give_back();
            tracing::trace!("Rate limit permit released unused, token returned");
        }
    }
}

/// Keyed token-bucket rate limiter.
///
/// Keys with an explicit quota get their bucket at construction. Any other key gets a bucket
/// using the default quota the first time it is seen. Either way a key maps to exactly one
/// bucket for the lifetime of the limiter.
pub struct RateLimiter<K>
where
    K: Hash + Eq + Clone,
{
    default_quota: Quota,
    quotas: HashMap<K, Quota>,
    buckets: DashMap<K, Arc<KeyedBucket>>,
}

impl<K> Debug for RateLimiter<K>
where
    K: Hash + Eq + Clone + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(RateLimiter))
            .field("default_quota", &self.default_quota)
            .field("quotas", &self.quotas)
            .field("buckets", &self.buckets.len())
            .finish()
    }
}

impl<K> RateLimiter<K>
where
    K: Hash + Eq + Clone + Debug,
{
    /// Creates a new [`RateLimiter`] with a default quota and explicit per-key quotas.
    #[must_use]
    pub fn new_with_quota(default_quota: Quota, keyed_quotas: Vec<(K, Quota)>) -> Self {
        let buckets = DashMap::with_capacity(keyed_quotas.len());
        let mut quotas = HashMap::with_capacity(keyed_quotas.len());

        for (key, quota) in keyed_quotas {
            buckets.insert(key.clone(), Arc::new(KeyedBucket::new(quota)));
            quotas.insert(key, quota);
        }

        Self {
            default_quota,
            quotas,
            buckets,
        }
    }

    /// Returns the quota governing `key`.
    #[must_use]
    pub fn quota(&self, key: &K) -> Quota {
        self.quotas.get(key).copied().unwrap_or(self.default_quota)
    }

    fn bucket(&self, key: &K) -> Arc<KeyedBucket> {
        if let Some(bucket) = self.buckets.get(key) {
            return Arc::clone(bucket.value());
        }

        let quota = self.quota(key);
        let entry = self
            .buckets
            .entry(key.clone())
            .or_insert_with(|| Arc::new(KeyedBucket::new(quota)));
        Arc::clone(entry.value())
    }

    /// Waits until a token for `key` is available and returns a permit holding it.
    ///
    /// Waiters on the same key are served in first-come-first-served order. The wait never
    /// fails; it is cancelled by dropping the returned future, in which case no token is taken.
    pub async fn acquire(&self, key: &K) -> RateLimitPermit {
        let bucket = self.bucket(key);
        let _turn = bucket.turnstile.lock().await;

        loop {
            let result = bucket.state().try_take(Instant::now());
            match result {
                Ok(()) => return RateLimitPermit::new(Arc::clone(&bucket)),
                Err(wait) => {
                    tracing::trace!("Rate limited on {key:?}, waiting {wait:?}");
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Takes a token for `key` without waiting.
    ///
    /// Returns `None` if the bucket is empty or other callers are already queued for it.
    pub fn try_acquire(&self, key: &K) -> Option<RateLimitPermit> {
        let bucket = self.bucket(key);
        let _turn = bucket.turnstile.try_lock().ok()?;
        let result = bucket.state().try_take(Instant::now());
        result.ok().map(|()| RateLimitPermit::new(Arc::clone(&bucket)))
    }

    /// Returns a snapshot of the bucket for `key`, if one has been created.
    #[must_use]
    pub fn snapshot(&self, key: &K) -> Option<BucketSnapshot> {
        let bucket = self.buckets.get(key).map(|b| Arc::clone(b.value()))?;
        let snapshot = bucket.state().snapshot(Instant::now());
        Some(snapshot)
    }
}
