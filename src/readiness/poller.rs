// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Deadline-bounded fetch-and-check loop

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl PollSettings {
    pub fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }
}

/// How a wait ended.
///
/// `last` is the most recent snapshot that was fetched successfully, kept for
/// diagnostics. It is `None` when every fetch failed.
#[derive(Debug, Clone)]
pub struct PollOutcome<T> {
    pub ready: bool,
    pub cancelled: bool,
    pub attempts: u32,
    pub last: Option<T>,
}

impl<T> PollOutcome<T> {
    fn finished(ready: bool, attempts: u32, last: Option<T>) -> Self {
        Self {
            ready,
            cancelled: false,
            attempts,
            last,
        }
    }

    fn cancelled(attempts: u32, last: Option<T>) -> Self {
        Self {
            ready: false,
            cancelled: true,
            attempts,
            last,
        }
    }
}

/// Fetch a snapshot and test `condition` until it holds or the timeout elapses.
///
/// Returns as soon as a snapshot satisfies the condition. Fetch errors are
/// logged and count as "not yet"; they never end the wait early. The first
/// fetch always happens, even when the timeout is shorter than the interval.
/// Every fetch is bounded by the deadline, and no new fetch starts once the
/// deadline has passed, so the wait never outlives its timeout. Cancelling the
/// token ends the wait immediately with a not-ready outcome.
pub async fn wait_until_ready<T, F, Fut, C>(
    description: &str,
    mut fetch: F,
    condition: C,
    settings: PollSettings,
    cancel: &CancellationToken,
) -> PollOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Fn(&T) -> bool,
{
    let started = Instant::now();
    let deadline = started + settings.timeout;
    let mut attempts = 0;
    let mut last = None;

    loop {
        attempts += 1;
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Wait for {} cancelled after {} attempts", description, attempts);
                return PollOutcome::cancelled(attempts, last);
            }
            fetched = timeout_at(deadline, fetch()) => fetched,
        };

        match fetched {
            Ok(Ok(snapshot)) if condition(&snapshot) => {
                info!(
                    "Condition met for {} after {:?} ({} attempts)",
                    description,
                    started.elapsed(),
                    attempts
                );
                return PollOutcome::finished(true, attempts, Some(snapshot));
            }
            Ok(Ok(snapshot)) => last = Some(snapshot),
            Ok(Err(e)) => warn!("Fetch failed while waiting for {}: {}", description, e),
            Err(_) => {
                warn!("Fetch for {} still pending at the deadline", description);
                return timed_out(description, settings, attempts, last);
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return timed_out(description, settings, attempts, last);
        }

        let pause = settings.interval.min(deadline - now);
        debug!("Condition for {} not met, retrying in {:?}", description, pause);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Wait for {} cancelled after {} attempts", description, attempts);
                return PollOutcome::cancelled(attempts, last);
            }
            _ = sleep(pause) => {}
        }

        if Instant::now() >= deadline {
            return timed_out(description, settings, attempts, last);
        }
    }
}

fn timed_out<T>(
    description: &str,
    settings: PollSettings,
    attempts: u32,
    last: Option<T>,
) -> PollOutcome<T> {
    warn!(
        "Timed out after {:?} waiting for {} ({} attempts)",
        settings.timeout, description, attempts
    );
    PollOutcome::finished(false, attempts, last)
}
