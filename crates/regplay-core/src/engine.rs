// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! The engine actor.
//!
//! One task owns the [`Orchestrator`] and is the only writer of its state.
//! Matcher calls run in their own tasks and report back over a channel, so
//! outcomes are applied strictly one at a time no matter how they race.

use std::sync::Arc;

use regplay_config::EngineConfig;
use regplay_matcher::{MatchError, MatchResponse, Matcher};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::{EngineError, EngineEvent, Orchestrator, RunInput, RunRequest, ViewState};

#[derive(Debug)]
enum Command {
    Edit(RunInput),
    RunNow,
    Select(usize),
    Previous,
    Next,
    Shutdown,
}

type Completion = (u64, Result<MatchResponse, MatchError>);

/// Builder/entry point for the actor.
pub struct Engine {
    matcher: Arc<dyn Matcher>,
    config: EngineConfig,
    max_matches: u32,
}

impl Engine {
    pub fn new(matcher: Arc<dyn Matcher>, config: EngineConfig, max_matches: u32) -> Self {
        Self { matcher, config, max_matches }
    }

    /// Start the actor with `initial` as the draft.  Nothing runs until the
    /// first edit settles or [`EngineHandle::run_now`] is called.
    ///
    /// Returns the handle and the event stream.  Dropping the event receiver
    /// is fine; events are then discarded.
    pub fn spawn(self, initial: RunInput) -> (EngineHandle, mpsc::UnboundedReceiver<EngineEvent>) {
        let orchestrator = Orchestrator::new(&self.config, initial);
        let (state_tx, state_rx) = watch::channel(orchestrator.view());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let actor = Actor {
            orchestrator,
            matcher: self.matcher,
            max_matches: self.max_matches,
            state_tx,
            event_tx,
        };
        let task = tokio::spawn(actor.run(cmd_rx));

        let handle = EngineHandle { commands: cmd_tx, state: state_rx, task };
        (handle, event_rx)
    }
}

/// Front end of a running engine.
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ViewState>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    fn send(&self, cmd: Command) -> Result<(), EngineError> {
        self.commands.send(cmd).map_err(|_| EngineError::Closed)
    }

    /// Replace the draft input; a run follows once edits pause.
    pub fn edit(&self, input: RunInput) -> Result<(), EngineError> {
        self.send(Command::Edit(input))
    }

    /// Run the latest draft now (the keyboard shortcut path).
    pub fn run_now(&self) -> Result<(), EngineError> {
        self.send(Command::RunNow)
    }

    pub fn select(&self, index: usize) -> Result<(), EngineError> {
        self.send(Command::Select(index))
    }

    pub fn previous(&self) -> Result<(), EngineError> {
        self.send(Command::Previous)
    }

    pub fn next(&self) -> Result<(), EngineError> {
        self.send(Command::Next)
    }

    /// Latest published snapshot.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// A receiver that wakes on every published change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Wait for the first snapshot satisfying `pred`.
    pub async fn wait_for(
        &self,
        pred: impl FnMut(&ViewState) -> bool,
    ) -> Result<ViewState, EngineError> {
        let mut rx = self.state.clone();
        let state = rx.wait_for(pred).await.map_err(|_| EngineError::Closed)?;
        Ok(state.clone())
    }

    /// Stop the actor.  A pending debounced edit is dropped without running;
    /// in-flight matcher calls finish but their outcomes are ignored.
    pub async fn shutdown(self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            warn!("engine task ended abnormally: {e}");
        }
    }
}

struct Actor {
    orchestrator: Orchestrator,
    matcher: Arc<dyn Matcher>,
    max_matches: u32,
    state_tx: watch::Sender<ViewState>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
}

/// Sleep until `at`, or forever when there is nothing scheduled.
async fn until(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}

impl Actor {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

        loop {
            let debounce_at = self.orchestrator.debounce_deadline();
            let release_at = self.orchestrator.release_deadline();

            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle(cmd, &done_tx),
                },
                Some((id, result)) = done_rx.recv() => {
                    self.apply(id, result);
                }
                _ = until(debounce_at) => {
                    if let Some(settled) = self.orchestrator.settle(Instant::now()) {
                        self.emit(EngineEvent::Settled(settled.input));
                        if let Some(req) = settled.request {
                            self.dispatch(req, &done_tx);
                        }
                    }
                }
                _ = until(release_at) => {
                    self.orchestrator.release(Instant::now());
                }
            }

            self.publish();
        }

        self.orchestrator.shutdown();
        self.publish();
        debug!("engine stopped");
    }

    fn handle(&mut self, cmd: Command, done_tx: &mpsc::UnboundedSender<Completion>) {
        let now = Instant::now();
        let reveal = match cmd {
            Command::Edit(input) => {
                self.orchestrator.edit(input, now);
                None
            }
            Command::RunNow => {
                if let Some(req) = self.orchestrator.run_now(now) {
                    self.dispatch(req, done_tx);
                }
                None
            }
            Command::Select(i) => self.orchestrator.select(i),
            Command::Previous => self.orchestrator.previous(),
            Command::Next => self.orchestrator.next(),
            Command::Shutdown => None,
        };
        if let Some(ev) = reveal {
            self.emit(ev);
        }
    }

    /// Send `req` to the matcher on its own task.  The task only reports
    /// back; it never touches engine state.
    fn dispatch(&self, req: RunRequest, done_tx: &mpsc::UnboundedSender<Completion>) {
        self.emit(EngineEvent::Issued { id: req.id });
        let matcher = Arc::clone(&self.matcher);
        let body = req.to_match_request(self.max_matches);
        let done_tx = done_tx.clone();
        let id = req.id;
        tokio::spawn(async move {
            let result = matcher.run(body).await;
            let _ = done_tx.send((id, result));
        });
    }

    fn apply(&mut self, id: u64, result: Result<MatchResponse, MatchError>) {
        let ok = result.is_ok();
        if let Err(e) = &result {
            debug!(id, "matcher reported: {e}");
        }
        if self.orchestrator.resolve(id, result, Instant::now()) {
            if !ok {
                warn!(id, "run failed");
            }
            self.emit(EngineEvent::Applied { id, ok });
        } else {
            self.emit(EngineEvent::Discarded { id });
        }
    }

    fn emit(&self, ev: EngineEvent) {
        let _ = self.event_tx.send(ev);
    }

    fn publish(&self) {
        let next = self.orchestrator.view();
        self.state_tx.send_if_modified(|cur| {
            if *cur == next {
                return false;
            }
            *cur = next;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use regplay_matcher::MockMatcher;

    use super::*;

    #[tokio::test]
    async fn commands_fail_once_the_actor_is_gone() {
        let engine = Engine::new(Arc::new(MockMatcher::new()), EngineConfig::default(), 10);
        let (mut handle, _events) = engine.spawn(RunInput::default());
        handle.task.abort();
        let _ = (&mut handle.task).await;

        assert_eq!(handle.edit(RunInput::default()), Err(EngineError::Closed));
        assert_eq!(handle.run_now(), Err(EngineError::Closed));
        assert_eq!(handle.wait_for(|_| false).await.unwrap_err(), EngineError::Closed);
    }
}
