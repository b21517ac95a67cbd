// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use crate::RunInput;

/// Notifications emitted by the engine alongside state snapshots.
/// Frontends subscribe to these for side effects that are not state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The debounce period elapsed on this input.  Fired whether or not the
    /// dedupe guard let it through; persist the view state here.
    Settled(RunInput),
    /// A request went out to the matcher
    Issued { id: u64 },
    /// The outcome of the current request was applied
    Applied { id: u64, ok: bool },
    /// An outcome arrived for a superseded request and was dropped
    Discarded { id: u64 },
    /// Navigation moved the active match; bring it into view.
    /// Offsets are chars into the evaluated text.
    Reveal { match_index: usize, start: usize, end: usize },
}
