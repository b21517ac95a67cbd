// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Anti-flicker floor for the pending indicator.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Release {
    id: u64,
    at: Instant,
}

/// Raises the pending flag on issue and lowers it no sooner than `floor`
/// after the issue instant, and only for the request that is still current.
#[derive(Debug)]
pub struct PendingGate {
    floor: Duration,
    pending: bool,
    release: Option<Release>,
}

impl PendingGate {
    pub fn new(floor: Duration) -> Self {
        Self { floor, pending: false, release: None }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// A new request went out.  Any release scheduled for an older one is
    /// moot: the new request's own release owns the flag now.
    pub fn on_issue(&mut self) {
        self.pending = true;
        self.release = None;
    }

    /// The current request `id`, issued at `issued_at`, resolved.  Schedules
    /// the release and returns its instant.
    pub fn on_resolved(&mut self, id: u64, issued_at: Instant) -> Instant {
        let at = issued_at + self.floor;
        self.release = Some(Release { id, at });
        at
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.release.map(|r| r.at)
    }

    /// Fire a due release.  Lowers the flag only when the released id is
    /// still `current_id`; returns whether the flag changed.
    pub fn fire(&mut self, now: Instant, current_id: u64) -> bool {
        match self.release {
            Some(r) if r.at <= now => {
                self.release = None;
                if r.id == current_id && self.pending {
                    self.pending = false;
                    return true;
                }
                false
            }
            _ => false,
        }
    }
}
