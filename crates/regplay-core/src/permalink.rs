// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Shareable view state carried in URL query parameters.
//!
//! Keys: `t` text, `r` pattern, `ic`/`ml`/`ds` flags as `"1"` or `"0"`.

use anyhow::{Context, Result};
use url::Url;

use crate::{Flags, RunInput};

const TEXT: &str = "t";
const PATTERN: &str = "r";
const IGNORE_CASE: &str = "ic";
const MULTILINE: &str = "ml";
const DOT_ALL: &str = "ds";

fn bit(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}

/// `base` with its query replaced by the encoded `input`.
pub fn encode(base: &Url, input: &RunInput) -> Url {
    let mut url = base.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair(TEXT, &input.text)
        .append_pair(PATTERN, &input.pattern)
        .append_pair(IGNORE_CASE, bit(input.flags.ignore_case))
        .append_pair(MULTILINE, bit(input.flags.multiline))
        .append_pair(DOT_ALL, bit(input.flags.dot_all));
    url
}

/// Restore an input from a URL's query.  Missing `t` or `r` keep the values
/// in `defaults`; a flag is on only when its value is exactly `"1"`.
pub fn decode(url: &Url, defaults: RunInput) -> RunInput {
    let mut input = defaults;
    let mut flags = Flags::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            TEXT => input.text = value.into_owned(),
            PATTERN => input.pattern = value.into_owned(),
            IGNORE_CASE => flags.ignore_case = value == "1",
            MULTILINE => flags.multiline = value == "1",
            DOT_ALL => flags.dot_all = value == "1",
            _ => {}
        }
    }
    input.flags = flags;
    input
}

/// [`decode`] for a URL given as a string.
pub fn decode_str(url: &str, defaults: RunInput) -> Result<RunInput> {
    let url = Url::parse(url).with_context(|| format!("not a valid URL: {url}"))?;
    Ok(decode(&url, defaults))
}
