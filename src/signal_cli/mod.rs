//! signal-cli Command Adapter
//!
//! Wraps the external `signal-cli` binary. All protocol work (registration,
//! encryption, group state, device linking) happens inside that binary; this
//! module only builds argument lists, runs the process and captures output.

pub mod client;
pub mod commands;
pub mod invocation;
pub mod linking;
pub mod mock;
pub mod output;
pub mod process;
pub mod traits;

pub use client::SignalCli;
pub use commands::CommandBuilder;
pub use invocation::Invocation;
pub use linking::LinkSession;
pub use mock::MockRunner;
pub use output::UserStatus;
pub use process::ProcessRunner;
pub use traits::{AdapterError, AdapterResult, CommandOutput, CommandRunner, OutputFormat};
