// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Last-response-wins sequencing.
//!
//! Every issued request gets the next id.  An outcome is applied only while
//! its id is still the current one; anything older is dropped on arrival.

use regplay_matcher::{MatchError, MatchRequest, MatchResponse};
use tokio::time::Instant;
use tracing::debug;

use crate::{Outcome, ResultSet, RunInput};

/// A request between issue and resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub id: u64,
    pub input: RunInput,
    pub issued_at: Instant,
}

impl RunRequest {
    pub fn to_match_request(&self, max_matches: u32) -> MatchRequest {
        self.input.to_request(max_matches)
    }
}

#[derive(Debug, Default)]
pub struct Sequencer {
    current: u64,
    issued_at: Option<Instant>,
    /// Evaluated input of the current request, stamped onto its result set.
    current_input: Option<RunInput>,
    outcome: Outcome,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_id(&self) -> u64 {
        self.current
    }

    pub fn is_current(&self, id: u64) -> bool {
        id != 0 && id == self.current
    }

    pub fn issued_at(&self) -> Option<Instant> {
        self.issued_at
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// Allocate the next id and make it current.  A visible error is cleared;
    /// a visible result set stays until the new outcome replaces it.
    pub fn issue(&mut self, input: RunInput, now: Instant) -> RunRequest {
        self.current += 1;
        self.issued_at = Some(now);
        self.current_input = Some(input.clone());
        if matches!(self.outcome, Outcome::Failed(_)) {
            self.outcome = Outcome::Idle;
        }
        RunRequest {
            id: self.current,
            input,
            issued_at: now,
        }
    }

    /// Apply an outcome if `id` is still current.  Returns `false` (and
    /// changes nothing) for a superseded id.
    pub fn resolve(&mut self, id: u64, result: Result<MatchResponse, MatchError>) -> bool {
        if !self.is_current(id) {
            debug!(id, current = self.current, "discarding stale outcome");
            return false;
        }
        let input = self.current_input.clone().unwrap_or_default();
        self.outcome = match result {
            Ok(resp) => Outcome::Matches(ResultSet::from_response(id, input, resp)),
            Err(e) => Outcome::Failed(e.to_string()),
        };
        true
    }
}
