// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

pub use regplay_matcher::Flags;
use regplay_matcher::MatchRequest;

/// Snapshot of everything a run depends on.
///
/// Equality is structural and doubles as the dedupe key: two snapshots that
/// compare equal never produce two requests in a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunInput {
    pub text: String,
    pub pattern: String,
    pub flags: Flags,
}

impl RunInput {
    pub fn new(text: impl Into<String>, pattern: impl Into<String>, flags: Flags) -> Self {
        Self {
            text: text.into(),
            pattern: pattern.into(),
            flags,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn to_request(&self, max_matches: u32) -> MatchRequest {
        MatchRequest {
            text: self.text.clone(),
            pattern: self.pattern.clone(),
            flags: self.flags,
            max_matches,
        }
    }
}
