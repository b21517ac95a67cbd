// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Highlight compositor: turn match rows into a gap-free run of plain and hit
//! segments covering the whole text.
//!
//! Offsets are char (Unicode scalar value) offsets, the unit the matcher
//! reports.  [`CharMap`] converts them to byte ranges for slicing.

use regplay_matcher::MatchRow;
use serde::Serialize;

/// A contiguous piece of the text, either matched or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
    pub hit: bool,
    /// Index of the originating row; set on hit segments only.
    pub match_index: Option<usize>,
}

impl Segment {
    pub fn plain(start: usize, end: usize) -> Self {
        Self { start, end, hit: false, match_index: None }
    }

    pub fn hit(start: usize, end: usize, match_index: usize) -> Self {
        Self { start, end, hit: true, match_index: Some(match_index) }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_active(&self, active: Option<usize>) -> bool {
        self.hit && active.is_some() && self.match_index == active
    }
}

/// Build the segment list for a text of `text_len` chars.
///
/// Rows are expected sorted by `start` and pairwise non-overlapping.  They are
/// stable-sorted by `start` first, which leaves row indices untouched;
/// overlapping rows are not trimmed and break the partition.  Zero-length
/// rows yield zero-length hit segments so hit and row counts agree.  An
/// empty text yields no segments.
pub fn compose(text_len: usize, rows: &[MatchRow]) -> Vec<Segment> {
    if text_len == 0 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by_key(|&i| rows[i].start);

    let mut segments = Vec::with_capacity(rows.len() * 2 + 1);
    let mut cursor = 0;
    for i in order {
        let row = &rows[i];
        if row.start > cursor {
            segments.push(Segment::plain(cursor, row.start));
        }
        segments.push(Segment::hit(row.start, row.end, i));
        cursor = row.end;
    }
    if cursor < text_len {
        segments.push(Segment::plain(cursor, text_len));
    }
    segments
}

/// [`compose`] for `text`, measuring its length in chars.
pub fn compose_text(text: &str, rows: &[MatchRow]) -> Vec<Segment> {
    compose(text.chars().count(), rows)
}

/// The hit segment of the active match, for scroll-into-view.
pub fn active_segment(segments: &[Segment], active: Option<usize>) -> Option<&Segment> {
    segments.iter().find(|s| s.is_active(active))
}

/// Char offset → byte offset table for one text.
#[derive(Debug, Clone)]
pub struct CharMap {
    /// `bytes[i]` is the byte offset of char `i`; one extra entry for the end.
    bytes: Vec<usize>,
}

impl CharMap {
    pub fn new(text: &str) -> Self {
        let mut bytes: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        bytes.push(text.len());
        Self { bytes }
    }

    pub fn char_len(&self) -> usize {
        self.bytes.len() - 1
    }

    fn byte(&self, char_offset: usize) -> usize {
        self.bytes[char_offset.min(self.char_len())]
    }

    /// Slice `text` by char offsets, clamped to its bounds.
    pub fn slice<'a>(&self, text: &'a str, start: usize, end: usize) -> &'a str {
        let (s, e) = (self.byte(start), self.byte(end));
        if s >= e {
            return "";
        }
        &text[s..e]
    }

    pub fn segment<'a>(&self, text: &'a str, seg: &Segment) -> &'a str {
        self.slice(text, seg.start, seg.end)
    }
}
