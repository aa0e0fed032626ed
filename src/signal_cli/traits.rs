//! signal-cli Adapter Trait Abstractions
//!
//! The `CommandRunner` trait is the seam between building an invocation and
//! executing it. `ProcessRunner` spawns the real binary; `MockRunner` records
//! invocations so every operation can be tested without signal-cli installed.

use super::invocation::Invocation;
use super::linking::LinkSession;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Output format requested from signal-cli
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One JSON object per line
    Json,
    /// Human-readable text (many subcommands only support this)
    #[default]
    PlainText,
}

impl OutputFormat {
    pub fn is_structured(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::PlainText => write!(f, "plain-text"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "plain-text" | "plain" | "text" => Ok(OutputFormat::PlainText),
            other => Err(AdapterError::Config(format!(
                "Invalid output format: {}. Use 'json' or 'plain-text'",
                other
            ))),
        }
    }
}

/// Raw outcome of one signal-cli run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// Exit code, `None` if the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful run with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed run with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Adapter errors
///
/// A non-zero exit from signal-cli is NOT an error here; it surfaces as
/// `false` (or as whatever the process printed). These variants cover
/// failures where there is no exit status to report.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Failed to start {binary}: {source}")]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Device linking failed: {0}")]
    Link(String),

    #[error("Unparseable output: {0}")]
    Output(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Executes invocations built by the command builders
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation to completion and capture its output
    async fn run(&self, invocation: &Invocation) -> AdapterResult<CommandOutput>;

    /// Start a `link` invocation and return once the provisioning URI is known
    ///
    /// `uri_wait` bounds how long to wait for the URI line. The returned
    /// session resolves when the process exits.
    async fn spawn_link(
        &self,
        invocation: &Invocation,
        uri_wait: Duration,
    ) -> AdapterResult<LinkSession>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "plain-text".parse::<OutputFormat>().unwrap(),
            OutputFormat::PlainText
        );
        assert_eq!(
            "text".parse::<OutputFormat>().unwrap(),
            OutputFormat::PlainText
        );
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display_round_trips() {
        for format in [OutputFormat::Json, OutputFormat::PlainText] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_default_format_is_plain_text() {
        assert_eq!(OutputFormat::default(), OutputFormat::PlainText);
        assert!(!OutputFormat::default().is_structured());
        assert!(OutputFormat::Json.is_structured());
    }

    #[test]
    fn test_command_output_constructors() {
        let ok = CommandOutput::ok("hello\n");
        assert!(ok.success);
        assert_eq!(ok.code, Some(0));
        assert_eq!(ok.stdout, "hello\n");

        let failed = CommandOutput::failed(3, "User is not registered.");
        assert!(!failed.success);
        assert_eq!(failed.code, Some(3));
        assert_eq!(failed.stderr, "User is not registered.");
    }

    #[test]
    fn test_error_messages() {
        let err = AdapterError::Spawn {
            binary: PathBuf::from("/opt/signal-cli/bin/signal-cli"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/opt/signal-cli/bin/signal-cli"));

        let err = AdapterError::Link("process exited".to_string());
        assert_eq!(err.to_string(), "Device linking failed: process exited");
    }
}
