// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Trailing-edge debounce with an injected clock.

use std::time::Duration;

use tokio::time::Instant;

/// Holds the most recent value until `quiet` has passed without a newer one.
///
/// The buffer never sleeps itself; the owner asks for [`deadline`](Self::deadline),
/// waits until then and calls [`poll`](Self::poll).
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if *at <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    /// Drop the pending value without emitting it.  Returns whether anything
    /// was dropped.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
