// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use regplay_matcher::{GroupMeta, MatchResponse, MatchRow};
use serde::Serialize;

use crate::{compose_text, RunInput, Segment};

/// Rows produced by one resolved request, stamped with that request's id.
///
/// `input` is the snapshot that was evaluated, so highlighting always slices
/// the text the offsets refer to, even while the user keeps typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSet {
    pub id: u64,
    pub input: RunInput,
    pub rows: Vec<MatchRow>,
    pub group_meta: GroupMeta,
    pub elapsed_ms: u64,
}

impl ResultSet {
    pub fn from_response(id: u64, input: RunInput, resp: MatchResponse) -> Self {
        Self {
            id,
            input,
            rows: resp.matches,
            group_meta: resp.group_meta,
            elapsed_ms: resp.elapsed_ms,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn segments(&self) -> Vec<Segment> {
        compose_text(&self.input.text, &self.rows)
    }
}

/// What the result area currently shows.  A result set and an error are
/// never visible together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing resolved yet, or the last error was cleared by a new run.
    #[default]
    Idle,
    Matches(ResultSet),
    Failed(String),
}

impl Outcome {
    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            Outcome::Matches(rs) => Some(rs),
            _ => None,
        }
    }

    pub fn rows(&self) -> &[MatchRow] {
        self.result_set().map(|rs| rs.rows.as_slice()).unwrap_or(&[])
    }

    pub fn match_count(&self) -> usize {
        self.rows().len()
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Snapshot published to renderers after every state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Id of the most recently issued request; 0 before the first run.
    pub current_id: u64,
    /// "Working" indicator, held for at least the configured floor.
    pub pending: bool,
    pub outcome: Outcome,
    pub active: Option<usize>,
    /// Latest edited input, possibly not yet run.
    pub draft: RunInput,
}

impl ViewState {
    /// Segments to draw and the text they index into.  Before any result
    /// lands the draft text is shown as a single plain segment.
    pub fn highlight(&self) -> (&str, Vec<Segment>) {
        match self.outcome.result_set() {
            Some(rs) => (rs.input.text.as_str(), rs.segments()),
            None => (self.draft.text.as_str(), compose_text(&self.draft.text, &[])),
        }
    }

    /// The row under the navigation cursor.
    pub fn active_row(&self) -> Option<&MatchRow> {
        self.active.and_then(|i| self.outcome.rows().get(i))
    }

    /// True once a run was issued and its outcome is on screen.
    pub fn is_settled(&self) -> bool {
        self.current_id > 0 && !self.pending && self.outcome != Outcome::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Flags;

    fn rs(rows: Vec<MatchRow>) -> ResultSet {
        ResultSet::from_response(
            3,
            RunInput::new("hello world", "o", Flags::default()),
            MatchResponse::from_rows(rows),
        )
    }

    #[test]
    fn outcome_accessors() {
        let ok = Outcome::Matches(rs(vec![MatchRow::new("o", 4, 5)]));
        assert_eq!(ok.match_count(), 1);
        assert_eq!(ok.error(), None);

        let failed = Outcome::Failed("bad pattern".into());
        assert_eq!(failed.match_count(), 0);
        assert_eq!(failed.error(), Some("bad pattern"));
        assert!(failed.result_set().is_none());
    }

    #[test]
    fn highlight_before_first_result_shows_draft() {
        let v = ViewState {
            draft: RunInput::new("abc", "", Flags::default()),
            ..ViewState::default()
        };
        let (text, segs) = v.highlight();
        assert_eq!(text, "abc");
        assert_eq!(segs.len(), 1);
        assert!(!segs[0].hit);
    }

    #[test]
    fn highlight_uses_evaluated_text_not_draft() {
        let v = ViewState {
            current_id: 3,
            outcome: Outcome::Matches(rs(vec![MatchRow::new("o", 4, 5)])),
            draft: RunInput::new("typing ahead", "o", Flags::default()),
            ..ViewState::default()
        };
        let (text, segs) = v.highlight();
        assert_eq!(text, "hello world");
        assert_eq!(segs.last().map(|s| s.end), Some(11));
    }

    #[test]
    fn active_row_follows_cursor() {
        let v = ViewState {
            outcome: Outcome::Matches(rs(vec![MatchRow::new("o", 4, 5), MatchRow::new("o", 7, 8)])),
            active: Some(1),
            ..ViewState::default()
        };
        assert_eq!(v.active_row().map(|r| r.start), Some(7));
    }
}
