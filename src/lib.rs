//! sigwrap - signal-cli binding
//!
//! A thin adapter around the `signal-cli` messaging client. Each operation
//! becomes one invocation of the external binary; results come back as a
//! completion flag or as the captured output (plain text or JSON lines).

pub mod signal_cli;
