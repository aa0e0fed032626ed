//! Mock Command Runner for Testing
//!
//! Records every invocation and replays scripted outputs, so operations can be
//! exercised without a real signal-cli install.

use super::invocation::Invocation;
use super::linking::LinkSession;
use super::traits::*;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock runner for testing
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    invocations: Vec<Invocation>,
    outputs: VecDeque<CommandOutput>,
    link_uri: Option<String>,
    link_succeeds: bool,
}

impl MockRunner {
    /// Create new mock runner; unscripted runs succeed with empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the output for the next run
    pub fn push_output(&self, output: CommandOutput) {
        self.state.lock().unwrap().outputs.push_back(output);
    }

    /// Script the provisioning URI and outcome for the next link only
    pub fn set_link(&self, uri: impl Into<String>, succeeds: bool) {
        let mut state = self.state.lock().unwrap();
        state.link_uri = Some(uri.into());
        state.link_succeeds = succeeds;
    }

    /// Get recorded invocations for assertions
    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.lock().unwrap().invocations.clone()
    }

    /// Tokens of the most recent invocation
    pub fn last_tokens(&self) -> Option<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .invocations
            .last()
            .map(|inv| inv.tokens().to_vec())
    }

    /// Clear all state
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        *state = MockState::default();
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(&self, invocation: &Invocation) -> AdapterResult<CommandOutput> {
        let mut state = self.state.lock().unwrap();
        state.invocations.push(invocation.clone());
        Ok(state
            .outputs
            .pop_front()
            .unwrap_or_else(|| CommandOutput::ok("")))
    }

    async fn spawn_link(
        &self,
        invocation: &Invocation,
        uri_wait: Duration,
    ) -> AdapterResult<LinkSession> {
        let mut state = self.state.lock().unwrap();
        state.invocations.push(invocation.clone());
        match state.link_uri.take() {
            Some(uri) => Ok(LinkSession::completed(uri, state.link_succeeds)),
            None => Err(AdapterError::Link(format!(
                "no provisioning URI within {:?}",
                uri_wait
            ))),
        }
    }
}
