// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The whole edit → run → display pipeline as one owned state machine.
//!
//! Nothing here sleeps or spawns.  Every operation takes the current instant
//! and the caller (the engine actor, or a test) drives the deadlines.

use regplay_config::EngineConfig;
use regplay_matcher::{MatchError, MatchResponse};
use tokio::time::Instant;
use tracing::debug;

use crate::{
    Debouncer, EngineEvent, MatchCursor, PendingGate, RunGuard, RunInput, RunRequest, Sequencer,
    ViewState,
};

/// Result of a debounce period elapsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub input: RunInput,
    /// `None` when the dedupe guard dropped the input.
    pub request: Option<RunRequest>,
}

#[derive(Debug)]
pub struct Orchestrator {
    debounce: Debouncer<RunInput>,
    guard: RunGuard<RunInput>,
    sequencer: Sequencer,
    gate: PendingGate,
    cursor: MatchCursor,
    draft: RunInput,
}

impl Orchestrator {
    pub fn new(config: &EngineConfig, initial: RunInput) -> Self {
        Self {
            debounce: Debouncer::new(config.debounce()),
            guard: RunGuard::new(),
            sequencer: Sequencer::new(),
            gate: PendingGate::new(config.min_pending()),
            cursor: MatchCursor::new(),
            draft: initial,
        }
    }

    pub fn draft(&self) -> &RunInput {
        &self.draft
    }

    /// Record an edit and restart the quiet period.
    pub fn edit(&mut self, input: RunInput, now: Instant) {
        self.draft = input.clone();
        self.debounce.push(input, now);
    }

    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn release_deadline(&self) -> Option<Instant> {
        self.gate.deadline()
    }

    /// Emit the debounced input if its quiet period is over and pass it
    /// through the dedupe guard.
    pub fn settle(&mut self, now: Instant) -> Option<Settled> {
        let input = self.debounce.poll(now)?;
        let request = self.try_issue(input.clone(), now);
        Some(Settled { input, request })
    }

    /// Run the latest draft right away, skipping the quiet period but not
    /// the dedupe guard.
    pub fn run_now(&mut self, now: Instant) -> Option<RunRequest> {
        self.try_issue(self.draft.clone(), now)
    }

    fn try_issue(&mut self, input: RunInput, now: Instant) -> Option<RunRequest> {
        if !self.guard.admit(&input) {
            debug!(pattern = %input.pattern, "input unchanged since last run; not issuing");
            return None;
        }
        let req = self.sequencer.issue(input, now);
        self.gate.on_issue();
        debug!(id = req.id, pattern = %req.input.pattern, "issued run");
        Some(req)
    }

    /// Apply the outcome of request `id`.  Returns `false` for a stale id.
    pub fn resolve(
        &mut self,
        id: u64,
        result: Result<MatchResponse, MatchError>,
        now: Instant,
    ) -> bool {
        if !self.sequencer.resolve(id, result) {
            return false;
        }
        self.cursor.reclamp(self.sequencer.outcome().match_count());
        if let Some(issued_at) = self.sequencer.issued_at() {
            self.gate.on_resolved(id, issued_at);
        }
        // A response slower than the floor releases at once.
        self.gate.fire(now, self.sequencer.current_id());
        true
    }

    /// Fire a due pending-flag release.  Returns whether the flag dropped.
    pub fn release(&mut self, now: Instant) -> bool {
        self.gate.fire(now, self.sequencer.current_id())
    }

    fn match_count(&self) -> usize {
        self.sequencer.outcome().match_count()
    }

    pub fn select(&mut self, i: usize) -> Option<EngineEvent> {
        if !self.cursor.select(i, self.match_count()) {
            debug!(index = i, count = self.match_count(), "ignoring out-of-range selection");
            return None;
        }
        self.reveal()
    }

    pub fn previous(&mut self) -> Option<EngineEvent> {
        self.cursor.previous(self.match_count());
        self.reveal()
    }

    pub fn next(&mut self) -> Option<EngineEvent> {
        self.cursor.next(self.match_count());
        self.reveal()
    }

    fn reveal(&self) -> Option<EngineEvent> {
        let i = self.cursor.active()?;
        let row = self.sequencer.outcome().rows().get(i)?;
        Some(EngineEvent::Reveal { match_index: i, start: row.start, end: row.end })
    }

    /// Drop any pending debounced input without emitting it.
    pub fn shutdown(&mut self) {
        if self.debounce.cancel() {
            debug!("dropped pending edit on shutdown");
        }
    }

    pub fn view(&self) -> ViewState {
        ViewState {
            current_id: self.sequencer.current_id(),
            pending: self.gate.is_pending(),
            outcome: self.sequencer.outcome().clone(),
            active: self.cursor.active(),
            draft: self.draft.clone(),
        }
    }
}
