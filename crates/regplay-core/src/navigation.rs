// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
/// Which match, if any, is active.  Always `None` or `< count` of the
/// result set it was last clamped against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCursor {
    active: Option<usize>,
}

impl MatchCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Jump to match `i`.  Rejected (state unchanged) when `i >= count`.
    pub fn select(&mut self, i: usize, count: usize) -> bool {
        if i >= count {
            return false;
        }
        self.active = Some(i);
        true
    }

    /// Step backwards, wrapping from the first match to the last.
    pub fn previous(&mut self, count: usize) -> Option<usize> {
        if count == 0 {
            return self.active;
        }
        self.active = Some(match self.active {
            None => 0,
            Some(i) => (i + count - 1) % count,
        });
        self.active
    }

    /// Step forwards, wrapping from the last match to the first.
    pub fn next(&mut self, count: usize) -> Option<usize> {
        if count == 0 {
            return self.active;
        }
        self.active = Some(match self.active {
            None => 0,
            Some(i) => (i + 1) % count,
        });
        self.active
    }

    /// A new result set landed; forget an index it no longer contains.
    pub fn reclamp(&mut self, count: usize) {
        if self.active.is_some_and(|i| i >= count) {
            self.active = None;
        }
    }
}
