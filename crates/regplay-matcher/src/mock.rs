// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::{MatchError, MatchRequest, MatchResponse, MatchRow};

#[derive(Clone)]
struct Scripted {
    delay: Duration,
    outcome: Result<MatchResponse, MatchError>,
}

/// A pre-scripted matcher.  Each call to `run` pops the next scripted reply,
/// waits its delay on the tokio clock and returns it.  With the script
/// exhausted every call answers immediately with no matches.
///
/// Replies registered with [`when_pattern`](Self::when_pattern) take
/// precedence and are reused for every request carrying that pattern, which
/// keeps racing tests independent of task scheduling order.
#[derive(Default)]
pub struct MockMatcher {
    script: Mutex<VecDeque<Scripted>>,
    by_pattern: HashMap<String, Scripted>,
    /// Every request seen, in call order.
    requests: Arc<Mutex<Vec<MatchRequest>>>,
}

impl MockMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply carrying `rows`.
    pub fn then_rows(self, delay: Duration, rows: Vec<MatchRow>) -> Self {
        self.then_reply(delay, Ok(MatchResponse::from_rows(rows)))
    }

    /// Queue a failing reply.
    pub fn then_error(self, delay: Duration, err: MatchError) -> Self {
        self.then_reply(delay, Err(err))
    }

    pub fn then_reply(self, delay: Duration, outcome: Result<MatchResponse, MatchError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Scripted { delay, outcome });
        self
    }

    /// Answer every request for `pattern` with `outcome` after `delay`.
    pub fn when_pattern(
        mut self,
        pattern: &str,
        delay: Duration,
        outcome: Result<MatchResponse, MatchError>,
    ) -> Self {
        self.by_pattern.insert(pattern.to_string(), Scripted { delay, outcome });
        self
    }

    /// Shared handle on the request log; stays valid after the matcher is
    /// moved into an engine.
    pub fn request_log(&self) -> Arc<Mutex<Vec<MatchRequest>>> {
        Arc::clone(&self.requests)
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl crate::Matcher for MockMatcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, req: MatchRequest) -> Result<MatchResponse, MatchError> {
        let keyed = self.by_pattern.get(&req.pattern).cloned();
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(req);
        let next = keyed.or_else(|| {
            self.script
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .pop_front()
        });
        match next {
            Some(Scripted { delay, outcome }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                outcome
            }
            None => Ok(MatchResponse::from_rows(Vec::new())),
        }
    }
}
