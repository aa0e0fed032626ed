//! sigwrap configuration file handling
//!
//! Provides default configuration generation and loading for the operator CLI.
//! Configuration files are TOML. Command-line flags override file values.

use serde::{Deserialize, Serialize};
use sigwrap::signal_cli::linking::DEFAULT_URI_WAIT;
use sigwrap::signal_cli::OutputFormat;
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Binary looked up on PATH when no path is configured
const DEFAULT_BINARY: &str = "signal-cli";

/// sigwrap configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SigwrapConfig {
    /// External binary and account settings
    #[serde(default)]
    pub signal_cli: SignalCliConfig,

    /// Device linking settings
    #[serde(default)]
    pub link: LinkConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// signal-cli settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCliConfig {
    /// Path to the signal-cli binary
    #[serde(default = "default_binary")]
    pub binary_path: PathBuf,

    /// Account phone number in E.164 format (e.g., +15551234567)
    #[serde(default)]
    pub account: Option<String>,

    /// Output format: "json" or "plain-text"
    #[serde(default)]
    pub format: OutputFormat,
}

/// Device linking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Seconds to wait for signal-cli to print the provisioning URI
    #[serde(default = "default_uri_wait_secs")]
    pub uri_wait_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_binary() -> PathBuf {
    PathBuf::from(DEFAULT_BINARY)
}

fn default_uri_wait_secs() -> u64 {
    DEFAULT_URI_WAIT.as_secs()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for SignalCliConfig {
    fn default() -> Self {
        Self {
            binary_path: default_binary(),
            account: None,
            format: OutputFormat::default(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            uri_wait_secs: default_uri_wait_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl SigwrapConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: SigwrapConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Load the file if given, else the default file if present, else defaults
    ///
    /// An explicitly requested file must exist.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml(binary_path: &Path, account: Option<&str>) -> String {
        let account_line = match account {
            Some(account) => format!("account = \"{}\"", account),
            None => "# account = \"+15551234567\"".to_string(),
        };
        format!(
            r#"# sigwrap configuration
#
# Command-line flags (--binary, --account, --json, --log-level) override
# the values below.

[signal_cli]
# Path to the signal-cli binary. The binary runs from its own directory so
# it can find its native libraries.
binary_path = "{binary_path}"

# Account phone number in E.164 format
{account_line}

# Output format: "json" or "plain-text"
# Only listGroups, getUserStatus and receive honor "json".
format = "plain-text"

[link]
# Seconds to wait for the provisioning URI when linking a device
uri_wait_secs = {uri_wait}

[logging]
# Log level: trace, debug, info, warn, error
# RUST_LOG takes precedence when set
level = "info"
"#,
            binary_path = binary_path.display(),
            account_line = account_line,
            uri_wait = default_uri_wait_secs(),
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(
        config_path: &Path,
        binary_path: &Path,
        account: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml(binary_path, account);

        // Create parent directory if needed
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default config file path
///
/// - Linux: ~/.config/sigwrap/config.toml
/// - macOS: ~/Library/Application Support/sigwrap/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sigwrap").join("config.toml"))
}
