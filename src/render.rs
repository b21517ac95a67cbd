// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Terminal output for view snapshots.
//!
//! Everything is rendered into a `String` so the layout can be tested
//! without a terminal; `color` switches between crossterm styling and
//! bracket markers for pipes and logs.

use std::fmt::Write as _;

use crossterm::style::Stylize;
use regplay_core::{CharMap, Outcome, Segment, ViewState};
use regplay_matcher::{has_any_group, MatchRow};

/// The text with hits marked.  The active hit is reversed.
pub fn highlighted(text: &str, segments: &[Segment], active: Option<usize>, color: bool) -> String {
    let map = CharMap::new(text);
    let mut out = String::with_capacity(text.len() + segments.len() * 8);
    for seg in segments {
        let piece = map.segment(text, seg);
        if !seg.hit {
            out.push_str(piece);
            continue;
        }
        let is_active = seg.is_active(active);
        if color {
            let styled = piece.black().on_yellow();
            let styled = if is_active { styled.reverse() } else { styled };
            let _ = write!(out, "{styled}");
        } else if is_active {
            let _ = write!(out, "[[{piece}]]");
        } else {
            let _ = write!(out, "[{piece}]");
        }
    }
    out
}

/// One line per match: `#`, matched text, start and end.  Numbering starts
/// at 1.
pub fn results_table(rows: &[MatchRow], active: Option<usize>) -> String {
    if rows.is_empty() {
        return "No matches.\n".to_string();
    }
    let match_w = rows
        .iter()
        .map(|r| r.matched_text.chars().count())
        .max()
        .unwrap_or(5)
        .clamp(5, 40);
    let num_w = rows.len().to_string().len().max(1);

    let mut out = String::new();
    let _ = writeln!(out, "  {:>num_w$}  {:<match_w$}  {:>6}  {:>6}", "#", "MATCH", "START", "END");
    for (i, row) in rows.iter().enumerate() {
        let marker = if active == Some(i) { '>' } else { ' ' };
        let shown: String = row.matched_text.chars().take(match_w).collect();
        let _ = writeln!(
            out,
            "{marker} {:>num_w$}  {:<match_w$}  {:>6}  {:>6}",
            i + 1,
            shown.escape_debug().to_string(),
            row.start,
            row.end,
        );
    }
    out
}

/// Capture groups per match, or an empty string when no row carries any.
/// Positional groups print as `$n`; a group that did not participate prints
/// as empty.
pub fn groups_list(rows: &[MatchRow]) -> String {
    if !has_any_group(rows) {
        return String::new();
    }
    let mut out = String::from("Groups:\n");
    for (i, row) in rows.iter().enumerate().filter(|(_, r)| r.has_groups()) {
        let _ = writeln!(out, "  #{}", i + 1);
        for (n, value) in row.positional_groups().iter().enumerate() {
            let _ = writeln!(out, "    ${}: {}", n + 1, value.as_deref().unwrap_or(""));
        }
        for (name, value) in row.named_groups.iter().flatten() {
            let _ = writeln!(out, "    {name}: {}", value.as_deref().unwrap_or(""));
        }
    }
    out
}

/// Full frame for a snapshot: status line, text, then results or error.
pub fn view(state: &ViewState, color: bool) -> String {
    let mut out = String::new();

    let status = match (&state.outcome, state.pending) {
        (_, true) => "running…".to_string(),
        (Outcome::Idle, false) => "idle".to_string(),
        (Outcome::Matches(rs), false) => {
            format!("{} match(es) in {} ms", rs.len(), rs.elapsed_ms)
        }
        (Outcome::Failed(_), false) => "error".to_string(),
    };
    // The header names the input the highlights below were computed from.
    let shown = state.outcome.result_set().map_or(&state.draft, |rs| &rs.input);
    let _ = writeln!(out, "/{}/{}  [{status}]", shown.pattern, shown.flags.letters());
    if *shown != state.draft {
        let draft = &state.draft;
        let _ = writeln!(out, "  edited since: /{}/{}", draft.pattern, draft.flags.letters());
    }

    let (text, segments) = state.highlight();
    let _ = writeln!(out, "{}", highlighted(text, &segments, state.active, color));

    match &state.outcome {
        Outcome::Failed(msg) => {
            let line = format!("Error: {msg}");
            let _ = writeln!(out, "{}", if color { line.red().to_string() } else { line });
        }
        Outcome::Matches(rs) => {
            out.push_str(&results_table(&rs.rows, state.active));
            out.push_str(&groups_list(&rs.rows));
        }
        Outcome::Idle => {}
    }
    out
}
