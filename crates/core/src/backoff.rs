// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnect delay policy.

use std::time::Duration;

/// Delay before the first reconnect, and after every successful open.
pub const INITIAL_RECONNECT_DELAY: Duration = Duration::from_millis(1000);

/// Ceiling for the request channel.
pub const REQUEST_CHANNEL_MAX_DELAY: Duration = Duration::from_secs(30);

/// Ceiling for location-share channels.
pub const LOCATION_CHANNEL_MAX_DELAY: Duration = Duration::from_secs(15);

/// Exponential backoff: `min(initial * 2^(k-1), max)` for the k-th retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.min(max);
        Backoff {
            initial,
            max,
            current: initial,
        }
    }

    /// Delay to wait before the next attempt. Doubles the following one.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }

    /// Called when a connection opens.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
