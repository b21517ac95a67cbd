// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Client side of the matching service: wire types, the [`Matcher`] seam the
//! engine talks through, an HTTP implementation and a scripted mock.

mod error;
mod http;
mod mock;
mod named;
mod provider;
mod types;

use std::sync::Arc;

use regplay_config::{MatcherConfig, MatcherKind};

pub use error::MatchError;
pub use http::{rejection_message, HttpMatcher, MATCH_PATH, PING_PATH};
pub use mock::MockMatcher;
pub use named::NamedGroups;
pub use provider::Matcher;
pub use types::{has_any_group, Flags, GroupMeta, MatchRequest, MatchResponse, MatchRow, Span};

/// Build the matcher selected by the configuration.
pub fn from_config(cfg: &MatcherConfig) -> Result<Arc<dyn Matcher>, MatchError> {
    match cfg.provider {
        MatcherKind::Http => Ok(Arc::new(HttpMatcher::new(&cfg.base_url, cfg.timeout())?)),
        MatcherKind::Mock => Ok(Arc::new(MockMatcher::new())),
    }
}
