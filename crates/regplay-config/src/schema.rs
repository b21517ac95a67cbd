// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub share: ShareConfig,
}

/// Which matcher implementation backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    /// Remote matching service over HTTP
    #[default]
    Http,
    /// In-process stand-in that reports no matches; for offline demos
    Mock,
}

impl std::fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatcherKind::Http => write!(f, "http"),
            MatcherKind::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    #[serde(default)]
    pub provider: MatcherKind,
    /// Root URL of the matching service; `/api/regex/match` is appended.
    #[serde(default = "default_matcher_url")]
    pub base_url: String,
    /// Per-request timeout.  A request that exceeds it resolves as an error
    /// outcome like any other transport failure.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Upper bound on rows the matcher may return for one request
    #[serde(default = "default_max_matches")]
    pub max_matches: u32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            provider: MatcherKind::Http,
            base_url: default_matcher_url(),
            timeout_ms: default_timeout_ms(),
            max_matches: default_max_matches(),
        }
    }
}

impl MatcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_matcher_url() -> String {
    "http://localhost:8000".into()
}
fn default_timeout_ms() -> u64 {
    1500
}
fn default_max_matches() -> u32 {
    5000
}

/// Timing knobs for the orchestration engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Quiet period after the last edit before a run is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Minimum time the "running" indicator stays up after a run is issued
    #[serde(default = "default_min_pending_ms")]
    pub min_pending_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_pending_ms: default_min_pending_ms(),
        }
    }
}

impl EngineConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn min_pending(&self) -> Duration {
        Duration::from_millis(self.min_pending_ms)
    }
}

fn default_debounce_ms() -> u64 {
    250
}
fn default_min_pending_ms() -> u64 {
    160
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Page that permalinks point at.  The view state is carried in its query.
    #[serde(default = "default_share_url")]
    pub base_url: String,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self { base_url: default_share_url() }
    }
}

fn default_share_url() -> String {
    "http://localhost:5173/".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matcher_points_at_local_service() {
        let c = Config::default();
        assert_eq!(c.matcher.provider, MatcherKind::Http);
        assert_eq!(c.matcher.base_url, "http://localhost:8000");
        assert_eq!(c.matcher.max_matches, 5000);
        assert_eq!(c.matcher.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn default_engine_timings() {
        let c = EngineConfig::default();
        assert_eq!(c.debounce(), Duration::from_millis(250));
        assert_eq!(c.min_pending(), Duration::from_millis(160));
    }

    #[test]
    fn partial_section_keeps_field_defaults() {
        let c: Config = toml::from_str("[engine]\ndebounce_ms = 100\n").unwrap();
        assert_eq!(c.engine.debounce_ms, 100);
        assert_eq!(c.engine.min_pending_ms, 160);
        assert_eq!(c.matcher.base_url, "http://localhost:8000");
    }

    #[test]
    fn matcher_kind_parses_lowercase() {
        let c: Config = toml::from_str("[matcher]\nprovider = \"mock\"\n").unwrap();
        assert_eq!(c.matcher.provider, MatcherKind::Mock);
        assert_eq!(c.matcher.provider.to_string(), "mock");
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let c = Config::default();
        let text = toml::to_string(&c).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.share.base_url, c.share.base_url);
    }
}
