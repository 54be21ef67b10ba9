//! Test doubles for the provider and event seams
//!
//! Used by this crate's integration tests and by downstream crates'
//! tests; not compiled out so adaptors can reuse them in their own
//! test suites.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::advisor::AdvisorEvents;
use crate::provider::ChatProvider;
use crate::types::ChatRequest;
use crate::{LumiereError, Result};

/// A provider that replays scripted outcomes in order and records every
/// request it receives
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    /// Create an empty provider; every call fails until replies are queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful completion
    pub fn push_reply(&self, text: impl Into<String>) {
        self.script.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a relay failure
    pub fn push_failure(&self, detail: impl Into<String>) {
        self.script.lock().unwrap().push_back(Err(detail.into()));
    }

    /// Requests seen so far, in call order
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(detail)) => Err(LumiereError::relay(detail)),
            None => Err(LumiereError::relay("no scripted reply")),
        }
    }
}

/// Counts busy-indicator transitions
#[derive(Default)]
pub struct CountingEvents {
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl CountingEvents {
    /// Create a fresh counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `thinking_started` calls
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    /// Number of `thinking_finished` calls
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl AdvisorEvents for CountingEvents {
    fn thinking_started(&self, _label: &str) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn thinking_finished(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}
