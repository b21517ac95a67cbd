// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use thiserror::Error;

/// Why a matcher call produced no result set.
///
/// The `Display` text is what the user sees in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("matcher unreachable: {0}")]
    Transport(String),

    #[error("matcher did not answer within {0} ms")]
    Timeout(u64),

    /// Non-success status; `message` is the service's own explanation
    /// (e.g. a pattern syntax error) and is shown verbatim.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response from matcher: {0}")]
    Malformed(String),
}
