//! Command-line token list for a single signal-cli run.

use std::fmt;
use std::path::{Path, PathBuf};

/// Ordered argument list for one call, dropped after execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single token
    pub fn arg(mut self, token: impl Into<String>) -> Self {
        self.args.push(token.into());
        self
    }

    /// Append every token in order
    pub fn args<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(tokens.into_iter().map(Into::into));
        self
    }

    /// Append `flag value`
    pub fn option(self, flag: &str, value: impl Into<String>) -> Self {
        self.arg(flag).arg(value)
    }

    /// Append `flag value` unless the value is absent or empty
    pub fn option_if_present(self, flag: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.option(flag, v),
            _ => self,
        }
    }

    /// Append `flag v1 v2 ...` unless there are no values
    ///
    /// Empty strings inside the list are dropped.
    pub fn multi_option<S: AsRef<str>>(self, flag: &str, values: &[S]) -> Self {
        let values: Vec<&str> = values
            .iter()
            .map(|v| v.as_ref())
            .filter(|v| !v.is_empty())
            .collect();
        if values.is_empty() {
            return self;
        }
        self.arg(flag).args(values)
    }

    /// Append a bare switch when enabled
    pub fn switch(self, flag: &str, enabled: bool) -> Self {
        if enabled {
            self.arg(flag)
        } else {
            self
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn tokens(&self) -> &[String] {
        &self.args
    }

    /// Working directory for the child process
    ///
    /// signal-cli locates its native libraries (libzkgroup, libsignal_jni)
    /// relative to its own directory, so the child runs from there.
    pub fn working_dir(&self) -> Option<&Path> {
        self.program
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{}'", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}
