// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
mod input;
mod debounce;
mod dedup;
mod sequencer;
mod gate;
mod highlight;
mod navigation;
mod state;
mod orchestrator;
mod events;
mod error;
mod engine;
pub mod permalink;
pub mod presets;
pub mod textfile;

pub use input::{Flags, RunInput};
pub use debounce::Debouncer;
pub use dedup::RunGuard;
pub use sequencer::{RunRequest, Sequencer};
pub use gate::PendingGate;
pub use highlight::{active_segment, compose, compose_text, CharMap, Segment};
pub use navigation::MatchCursor;
pub use state::{Outcome, ResultSet, ViewState};
pub use orchestrator::{Orchestrator, Settled};
pub use events::EngineEvent;
pub use error::EngineError;
pub use engine::{Engine, EngineHandle};
