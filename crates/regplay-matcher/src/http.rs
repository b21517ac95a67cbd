// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! HTTP client for the matching service.
//!
//! `POST /api/regex/match` with a JSON [`MatchRequest`]; a 2xx reply carries a
//! [`MatchResponse`], anything else carries `{"detail": ...}` whose message is
//! surfaced to the user.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::{MatchError, MatchRequest, MatchResponse};

pub const MATCH_PATH: &str = "/api/regex/match";
pub const PING_PATH: &str = "/ping";

pub struct HttpMatcher {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpMatcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, MatchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MatchError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn transport_error(&self, e: reqwest::Error) -> MatchError {
        if e.is_timeout() {
            MatchError::Timeout(self.timeout.as_millis() as u64)
        } else {
            MatchError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl crate::Matcher for HttpMatcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn run(&self, req: MatchRequest) -> Result<MatchResponse, MatchError> {
        debug!(
            url = %self.url(MATCH_PATH),
            text_len = req.text.len(),
            flags = %req.flags.letters(),
            "sending match request"
        );

        let resp = self
            .client
            .post(self.url(MATCH_PATH))
            .json(&req)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MatchError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }

        let bytes = resp.bytes().await.map_err(|e| self.transport_error(e))?;
        let parsed: MatchResponse =
            serde_json::from_slice(&bytes).map_err(|e| MatchError::Malformed(e.to_string()))?;
        if !parsed.ok {
            return Err(MatchError::Malformed("reply is not marked ok".into()));
        }
        Ok(parsed)
    }

    async fn ping(&self) -> Result<(), MatchError> {
        let resp = self
            .client
            .get(self.url(PING_PATH))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MatchError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }
        let v: Value = resp.json().await.map_err(|e| MatchError::Malformed(e.to_string()))?;
        match v.get("msg").and_then(Value::as_str) {
            Some("pong") => Ok(()),
            _ => Err(MatchError::Malformed(format!("unexpected ping reply: {v}"))),
        }
    }
}

/// Pick the user-facing message out of an error reply.
///
/// Preference: `detail.message`, then `detail`, then the status reason.
/// Only a null/missing value falls through to the next candidate; a chosen
/// value that is not a string becomes `"Request error"`.
pub fn rejection_message(status: StatusCode, body: &str) -> String {
    const GENERIC: &str = "Request error";

    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let detail = parsed
        .as_ref()
        .and_then(|v| v.get("detail"))
        .filter(|d| !d.is_null());
    let chosen = detail
        .and_then(|d| d.get("message"))
        .filter(|m| !m.is_null())
        .or(detail);

    match chosen {
        Some(Value::String(s)) => s.clone(),
        Some(_) => GENERIC.to_string(),
        None => status.canonical_reason().unwrap_or(GENERIC).to_string(),
    }
}
