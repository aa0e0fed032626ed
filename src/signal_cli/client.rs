//! signal-cli Client Handle
//!
//! `SignalCli` pairs a `CommandBuilder` (binary path, account, output format)
//! with a `CommandRunner`. Each operation builds its invocation, runs it and
//! returns either a completion flag or the captured stdout.
//!
//! A non-zero exit is reported as `Ok(false)` for flag operations and as the
//! (possibly empty) stdout for text operations; `Err` is reserved for runs
//! that never produced an exit status. Use [`SignalCli::run`] to get the full
//! `CommandOutput` including stderr.

use super::commands::{CommandBuilder, DEFAULT_RECEIVE_TIMEOUT_SECS};
use super::invocation::Invocation;
use super::linking::{LinkSession, DEFAULT_URI_WAIT};
use super::output::{parse_json_records, parse_user_statuses, UserStatus};
use super::process::ProcessRunner;
use super::traits::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Client handle for one signal-cli account
#[derive(Debug, Clone)]
pub struct SignalCli<R = ProcessRunner> {
    commands: CommandBuilder,
    runner: R,
    link_uri_wait: Duration,
}

impl SignalCli<ProcessRunner> {
    /// Create a client that spawns the real binary
    ///
    /// # Errors
    /// Returns `AdapterError::Config` if the binary path or account is empty.
    pub fn new(
        binary: impl Into<PathBuf>,
        account: impl Into<String>,
        format: OutputFormat,
    ) -> AdapterResult<Self> {
        Self::with_runner(binary, account, format, ProcessRunner::new())
    }
}

impl<R: CommandRunner> SignalCli<R> {
    /// Create a client with a custom runner
    pub fn with_runner(
        binary: impl Into<PathBuf>,
        account: impl Into<String>,
        format: OutputFormat,
        runner: R,
    ) -> AdapterResult<Self> {
        Ok(Self {
            commands: CommandBuilder::new(binary, account, format)?,
            runner,
            link_uri_wait: DEFAULT_URI_WAIT,
        })
    }

    /// Override how long `link` waits for the provisioning URI
    pub fn with_link_uri_wait(mut self, wait: Duration) -> Self {
        self.link_uri_wait = wait;
        self
    }

    pub fn binary(&self) -> &Path {
        self.commands.binary()
    }

    pub fn account(&self) -> &str {
        self.commands.account()
    }

    pub fn format(&self) -> OutputFormat {
        self.commands.format()
    }

    /// Builders for the invocations this client runs
    pub fn commands(&self) -> &CommandBuilder {
        &self.commands
    }

    /// Run an arbitrary invocation and return the full outcome
    pub async fn run(&self, invocation: &Invocation) -> AdapterResult<CommandOutput> {
        self.runner.run(invocation).await
    }

    async fn run_status(&self, invocation: Invocation) -> AdapterResult<bool> {
        Ok(self.runner.run(&invocation).await?.success)
    }

    async fn run_text(&self, invocation: Invocation) -> AdapterResult<String> {
        Ok(self.runner.run(&invocation).await?.stdout)
    }

    /// Register the account, verifying by SMS or voice call
    ///
    /// Follow up with [`SignalCli::verify`]. A captcha token is required when
    /// signal-cli reports one is needed.
    pub async fn register(&self, voice: bool, captcha: Option<&str>) -> AdapterResult<bool> {
        self.run_status(self.commands.register(voice, captcha)).await
    }

    /// Disable push for this device; other users can no longer message it
    pub async fn unregister(&self) -> AdapterResult<bool> {
        self.run_status(self.commands.unregister()).await
    }

    /// Complete registration with the received code (e.g. `123-456`)
    pub async fn verify(&self, code: &str) -> AdapterResult<bool> {
        self.run_status(self.commands.verify(code)).await
    }

    /// Send a message to recipients and/or a group (base64 group id)
    pub async fn send<S: AsRef<str> + Sync>(
        &self,
        recipients: &[S],
        message: &str,
        group_id: Option<&str>,
    ) -> AdapterResult<bool> {
        self.run_status(self.commands.send(recipients, message, group_id))
            .await
    }

    /// Update the profile name and avatar visible to message recipients
    pub async fn update_profile(
        &self,
        name: &str,
        avatar: Option<&Path>,
        remove_avatar: bool,
    ) -> AdapterResult<bool> {
        self.run_status(self.commands.update_profile(name, avatar, remove_avatar))
            .await
    }

    /// Link as a secondary device to an existing account
    ///
    /// Returns as soon as signal-cli prints the provisioning URI. Render it
    /// as a QR code, scan it from the primary device, then await
    /// [`LinkSession::finish`].
    pub async fn link(&self, device_name: Option<&str>) -> AdapterResult<LinkSession> {
        let invocation = self.commands.link(device_name);
        self.runner
            .spawn_link(&invocation, self.link_uri_wait)
            .await
    }

    /// Link another device using its provisioning URI (primary device only)
    pub async fn add_device(&self, uri: &str) -> AdapterResult<bool> {
        self.run_status(self.commands.add_device(uri)).await
    }

    /// List linked devices (plain text only)
    pub async fn list_devices(&self) -> AdapterResult<String> {
        self.run_text(self.commands.list_devices()).await
    }

    /// Remove a linked device by id (primary device only)
    pub async fn remove_device(&self, device_id: u32) -> AdapterResult<bool> {
        self.run_status(self.commands.remove_device(device_id)).await
    }

    /// Refresh account attributes on the server
    pub async fn update_account(&self) -> AdapterResult<bool> {
        self.run_status(self.commands.update_account()).await
    }

    /// Create a group with a new random id
    pub async fn create_group<S: AsRef<str> + Sync>(
        &self,
        name: &str,
        members: &[S],
        avatar: Option<&Path>,
    ) -> AdapterResult<bool> {
        self.run_status(self.commands.create_group(name, members, avatar))
            .await
    }

    /// Update an existing group's name, members or avatar
    pub async fn update_group<S: AsRef<str> + Sync>(
        &self,
        group_id: &str,
        name: Option<&str>,
        members: &[S],
        avatar: Option<&Path>,
    ) -> AdapterResult<bool> {
        self.run_status(
            self.commands
                .update_group(Some(group_id), name, members, avatar),
        )
        .await
    }

    pub async fn add_members_to_group<S: AsRef<str> + Sync>(
        &self,
        group_id: &str,
        members: &[S],
    ) -> AdapterResult<bool> {
        self.run_status(self.commands.add_members_to_group(group_id, members))
            .await
    }

    pub async fn list_groups(&self) -> AdapterResult<String> {
        self.run_text(self.commands.list_groups()).await
    }

    /// Join a group via an invitation link (`https://signal.group/#...`)
    ///
    /// Joining a v2 group needs a profile; see [`SignalCli::update_profile`].
    pub async fn join_group(&self, uri: &str) -> AdapterResult<bool> {
        self.run_status(self.commands.join_group(uri)).await
    }

    /// Leave a group, or decline the invitation if membership is pending
    pub async fn quit_group(&self, group_id: &str) -> AdapterResult<bool> {
        self.run_status(self.commands.quit_group(group_id)).await
    }

    /// Check which recipients are registered with Signal
    pub async fn get_user_status<S: AsRef<str> + Sync>(
        &self,
        recipients: &[S],
    ) -> AdapterResult<String> {
        self.run_text(self.commands.get_user_status(recipients))
            .await
    }

    /// Poll for new messages for up to `timeout_secs` (negative: no timeout)
    ///
    /// Attachments are downloaded by signal-cli into its config directory.
    pub async fn receive(&self, timeout_secs: i64) -> AdapterResult<String> {
        self.run_text(self.commands.receive(timeout_secs)).await
    }

    /// Poll with the default five second timeout
    pub async fn receive_default(&self) -> AdapterResult<String> {
        self.receive(DEFAULT_RECEIVE_TIMEOUT_SECS).await
    }

    /// `get_user_status` parsed into typed records
    ///
    /// # Errors
    /// Returns `AdapterError::Config` unless the client is in JSON mode.
    pub async fn user_statuses<S: AsRef<str> + Sync>(
        &self,
        recipients: &[S],
    ) -> AdapterResult<Vec<UserStatus>> {
        self.require_json("getUserStatus")?;
        parse_user_statuses(&self.get_user_status(recipients).await?)
    }

    /// `list_groups` parsed into one JSON value per group
    pub async fn groups(&self) -> AdapterResult<Vec<Value>> {
        self.require_json("listGroups")?;
        parse_json_records(&self.list_groups().await?)
    }

    /// `receive` parsed into one JSON envelope per message
    pub async fn receive_envelopes(&self, timeout_secs: i64) -> AdapterResult<Vec<Value>> {
        self.require_json("receive")?;
        parse_json_records(&self.receive(timeout_secs).await?)
    }

    fn require_json(&self, subcommand: &str) -> AdapterResult<()> {
        if self.format().is_structured() {
            Ok(())
        } else {
            Err(AdapterError::Config(format!(
                "{} output is only parseable in json format",
                subcommand
            )))
        }
    }
}
