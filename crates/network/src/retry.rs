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

//! Opt-in retry machinery for callers orchestrating several endpoint calls.
//!
//! Endpoints never retry on their own. A caller that wants retries wraps its call in
//! [`RetryManager::execute_with_retry`] and decides, through `should_retry`, which errors
//! qualify.

use std::{future::Future, marker::PhantomData, time::Duration};

use tokio_util::sync::CancellationToken;

use crate::backoff::ExponentialBackoff;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries (total attempts = 1 + `max_retries`).
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
    /// Backoff multiplier factor.
    pub backoff_factor: f64,
    /// Maximum jitter in milliseconds added to each delay.
    pub jitter_ms: u64,
    /// Optional timeout for each individual attempt in milliseconds.
    pub operation_timeout_ms: Option<u64>,
    /// Optional budget for the total elapsed time across all attempts in milliseconds.
    pub max_elapsed_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 10_000,
            backoff_factor: 2.0,
            jitter_ms: 100,
            operation_timeout_ms: Some(60_000),
            max_elapsed_ms: Some(180_000),
        }
    }
}

/// Runs fallible async operations with exponential backoff between attempts.
///
/// The manager is stateless; every execution creates its own backoff.
#[derive(Debug)]
pub struct RetryManager<E> {
    config: RetryConfig,
    _phantom: PhantomData<E>,
}

impl<E> RetryManager<E>
where
    E: std::error::Error,
{
    /// Creates a new [`RetryManager`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the backoff parameters in `config` are invalid.
    pub fn new(config: RetryConfig) -> anyhow::Result<Self> {
        Self::backoff(&config)?;
        Ok(Self {
            config,
            _phantom: PhantomData,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    fn backoff(config: &RetryConfig) -> anyhow::Result<ExponentialBackoff> {
        ExponentialBackoff::new(
            Duration::from_millis(config.initial_delay_ms),
            Duration::from_millis(config.max_delay_ms),
            config.backoff_factor,
            config.jitter_ms,
            false,
        )
    }

    /// Executes `operation` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the last error from `operation`, or an error built with `create_error` when an
    /// attempt times out or the elapsed time budget is exceeded.
    pub async fn execute_with_retry<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
        should_retry: impl Fn(&E) -> bool,
        create_error: impl Fn(String) -> E,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.execute_with_retry_with_cancel(
            operation_name,
            operation,
            should_retry,
            create_error,
            &CancellationToken::new(),
        )
        .await
    }

    /// Executes `operation` with retries, stopping early when `cancel` is triggered.
    ///
    /// # Errors
    ///
    /// As [`Self::execute_with_retry`]; additionally returns an error built with
    /// `create_error` when canceled.
    pub async fn execute_with_retry_with_cancel<F, Fut, T>(
        &self,
        operation_name: &str,
        mut operation: F,
        should_retry: impl Fn(&E) -> bool,
        create_error: impl Fn(String) -> E,
        cancel: &CancellationToken,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut backoff = Self::backoff(&self.config)
            .map_err(|e| create_error(format!("Invalid backoff configuration: {e}")))?;
        let start = tokio::time::Instant::now();
        let mut attempt: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(create_error(format!("Operation '{operation_name}' canceled")));
            }

            let attempt_future = operation();
            let result = tokio::select! {
                () = cancel.cancelled() => {
                    return Err(create_error(format!("Operation '{operation_name}' canceled")));
                }
                result = async {
                    match self.config.operation_timeout_ms {
                        Some(ms) => tokio::time::timeout(Duration::from_millis(ms), attempt_future)
                            .await
                            .unwrap_or_else(|_| {
                                Err(create_error(format!(
                                    "Operation '{operation_name}' timed out after {ms}ms"
                                )))
                            }),
                        None => attempt_future.await,
                    }
                } => result,
            };

            let error = match result {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!(
                            "Operation '{operation_name}' succeeded after {} attempts",
                            attempt + 1
                        );
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !should_retry(&error) {
                tracing::debug!("Operation '{operation_name}' failed with non-retryable error: {error}");
                return Err(error);
            }

            if attempt >= self.config.max_retries {
                tracing::warn!(
                    "Operation '{operation_name}' failed after {} attempts: {error}",
                    attempt + 1
                );
                return Err(error);
            }

            let delay = backoff.next_duration();

            if let Some(budget_ms) = self.config.max_elapsed_ms {
                let budget = Duration::from_millis(budget_ms);
                if start.elapsed() + delay > budget {
                    tracing::warn!(
                        "Operation '{operation_name}' exceeded time budget of {budget_ms}ms: {error}"
                    );
                    return Err(error);
                }
            }

            tracing::debug!(
                "Operation '{operation_name}' failed (attempt {}), retrying in {delay:?}: {error}",
                attempt + 1
            );

            tokio::select! {
                () = cancel.cancelled() => {
                    return Err(create_error(format!("Operation '{operation_name}' canceled")));
                }
                () = tokio::time::sleep(delay) => {}
            }
            attempt += 1;
        }
    }
}
