//! Signal Device Linking
//!
//! `signal-cli link` prints a provisioning URI and then blocks until the
//! primary device scans it. The runner hands back a `LinkSession` as soon as
//! the URI is read; the session's completion resolves when the process exits.

use super::traits::{AdapterError, AdapterResult};
use futures::channel::oneshot;
use std::time::Duration;

/// Default time to wait for signal-cli to print the provisioning URI
pub const DEFAULT_URI_WAIT: Duration = Duration::from_secs(30);

/// URI prefixes printed by `signal-cli link` (current and legacy)
pub const PROVISIONING_PREFIXES: [&str; 2] = ["sgnl://linkdevice", "tsdevice:"];

/// In-flight device link
pub struct LinkSession {
    uri: String,
    completion: oneshot::Receiver<AdapterResult<bool>>,
}

impl LinkSession {
    /// Create a session from a provisioning URI and a completion channel
    ///
    /// The sender side reports whether the link process exited successfully.
    pub fn new(uri: impl Into<String>, completion: oneshot::Receiver<AdapterResult<bool>>) -> Self {
        Self {
            uri: uri.into(),
            completion,
        }
    }

    /// Session whose outcome is already known
    pub fn completed(uri: impl Into<String>, linked: bool) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Ok(linked));
        Self::new(uri, rx)
    }

    /// Provisioning URI to scan from the primary device
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Wait for the link process to exit
    ///
    /// Returns `true` if signal-cli exited successfully, meaning the device
    /// was linked.
    ///
    /// # Errors
    /// Returns `AdapterError::Link` if the process monitor went away without
    /// reporting a result.
    pub async fn finish(self) -> AdapterResult<bool> {
        match self.completion.await {
            Ok(result) => result,
            Err(_) => Err(AdapterError::Link(
                "link process monitor dropped before completion".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for LinkSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSession")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}
