// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use serde::{Deserialize, Serialize};

use crate::NamedGroups;

/// Half-open `[start, end)` char-offset range; serialised as a two-element array.
pub type Span = (usize, usize);

/// Matching options forwarded to the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags {
    #[serde(rename = "IGNORECASE", default)]
    pub ignore_case: bool,
    #[serde(rename = "MULTILINE", default)]
    pub multiline: bool,
    #[serde(rename = "DOTALL", default)]
    pub dot_all: bool,
}

impl Flags {
    /// Compact `ims` style rendering of the enabled options, `-` when none are.
    pub fn letters(&self) -> String {
        let mut s = String::new();
        if self.ignore_case {
            s.push('i');
        }
        if self.multiline {
            s.push('m');
        }
        if self.dot_all {
            s.push('s');
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

/// Body of `POST /api/regex/match`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub text: String,
    pub pattern: String,
    pub flags: Flags,
    pub max_matches: u32,
}

/// One match reported by the service.
///
/// `start`/`end` are char offsets into the evaluated text.  The service emits
/// snake_case keys; the camelCase spellings are accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRow {
    #[serde(rename = "match")]
    pub matched_text: String,
    pub start: usize,
    pub end: usize,
    /// Positional groups `1..=n`; `None` for a group that did not participate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Option<String>>>,
    #[serde(default, alias = "groupSpans", skip_serializing_if = "Option::is_none")]
    pub group_spans: Option<Vec<Option<Span>>>,
    #[serde(default, alias = "namedGroups", skip_serializing_if = "Option::is_none")]
    pub named_groups: Option<NamedGroups<Option<String>>>,
    #[serde(default, alias = "namedGroupSpans", skip_serializing_if = "Option::is_none")]
    pub named_group_spans: Option<NamedGroups<Option<Span>>>,
}

impl MatchRow {
    pub fn new(matched_text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            matched_text: matched_text.into(),
            start,
            end,
            ..Default::default()
        }
    }

    pub fn with_groups(mut self, groups: Vec<Option<&str>>) -> Self {
        self.groups = Some(groups.into_iter().map(|g| g.map(str::to_string)).collect());
        self
    }

    pub fn with_named_group(mut self, name: &str, value: Option<&str>) -> Self {
        self.named_groups
            .get_or_insert_with(NamedGroups::new)
            .insert(name, value.map(str::to_string));
        self
    }

    pub fn positional_groups(&self) -> &[Option<String>] {
        self.groups.as_deref().unwrap_or(&[])
    }

    pub fn has_groups(&self) -> bool {
        !self.positional_groups().is_empty()
            || self.named_groups.as_ref().is_some_and(|m| !m.is_empty())
    }
}

/// True when any row carries positional or named groups.
pub fn has_any_group(rows: &[MatchRow]) -> bool {
    rows.iter().any(MatchRow::has_groups)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMeta {
    /// Number of capture groups in the pattern, group 0 excluded.
    pub count: usize,
    pub named: Vec<String>,
}

/// Successful reply of the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub ok: bool,
    pub count: usize,
    pub matches: Vec<MatchRow>,
    #[serde(default, alias = "groupMeta")]
    pub group_meta: GroupMeta,
    #[serde(default, alias = "elapsedMs")]
    pub elapsed_ms: u64,
}

impl MatchResponse {
    pub fn from_rows(matches: Vec<MatchRow>) -> Self {
        Self {
            ok: true,
            count: matches.len(),
            matches,
            group_meta: GroupMeta::default(),
            elapsed_ms: 0,
        }
    }
}
