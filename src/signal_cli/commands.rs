//! signal-cli Command Builders
//!
//! One function per logical operation, each producing the exact token list
//! for the external binary. Builders are pure so that flag ordering, optional
//! flag omission and `--json` placement can be tested without a process.
//!
//! Account-scoped subcommands put the global `-u <account>` pair first.
//! `link` is the only subcommand without it, since it creates the account.

use super::invocation::Invocation;
use super::traits::{AdapterError, AdapterResult, OutputFormat};
use std::path::{Path, PathBuf};

/// Device name used by `link` when none is given
pub const DEFAULT_DEVICE_NAME: &str = "cli";

/// Seconds `receive` waits for new messages by default
pub const DEFAULT_RECEIVE_TIMEOUT_SECS: i64 = 5;

/// Structured-output switch appended to subcommands that support it
pub const JSON_FLAG: &str = "--json";

fn as_strs<S: AsRef<str>>(values: &[S]) -> impl Iterator<Item = &str> {
    values.iter().map(|v| v.as_ref())
}

/// Builds invocations for one account
///
/// Immutable after construction; every builder returns a fresh `Invocation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuilder {
    binary: PathBuf,
    account: String,
    format: OutputFormat,
}

impl CommandBuilder {
    /// Create a builder
    ///
    /// # Errors
    /// Returns `AdapterError::Config` if the binary path or account is empty.
    pub fn new(
        binary: impl Into<PathBuf>,
        account: impl Into<String>,
        format: OutputFormat,
    ) -> AdapterResult<Self> {
        let binary = binary.into();
        let account = account.into();

        if binary.as_os_str().is_empty() {
            return Err(AdapterError::Config(
                "signal-cli binary path is empty".to_string(),
            ));
        }
        if account.trim().is_empty() {
            return Err(AdapterError::Config("account is empty".to_string()));
        }

        Ok(Self {
            binary,
            account,
            format,
        })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn bare(&self) -> Invocation {
        Invocation::new(&self.binary)
    }

    fn scoped(&self, subcommand: &str) -> Invocation {
        self.bare().option("-u", &self.account).arg(subcommand)
    }

    fn with_format(&self, invocation: Invocation) -> Invocation {
        invocation.switch(JSON_FLAG, self.format.is_structured())
    }

    /// `-u U register [--voice] [--captcha C]`
    pub fn register(&self, voice: bool, captcha: Option<&str>) -> Invocation {
        self.scoped("register")
            .switch("--voice", voice)
            .option_if_present("--captcha", captcha)
    }

    /// `-u U unregister`
    pub fn unregister(&self) -> Invocation {
        self.scoped("unregister")
    }

    /// `-u U verify CODE`
    pub fn verify(&self, code: &str) -> Invocation {
        self.scoped("verify").arg(code)
    }

    /// `-u U send R1 R2 .. -m MSG [-g G]`
    pub fn send<S: AsRef<str>>(
        &self,
        recipients: &[S],
        message: &str,
        group_id: Option<&str>,
    ) -> Invocation {
        self.scoped("send")
            .args(as_strs(recipients))
            .option("-m", message)
            .option_if_present("-g", group_id)
    }

    /// `-u U updateProfile --name N [--avatar P] [--removeAvatar]`
    pub fn update_profile(
        &self,
        name: &str,
        avatar: Option<&Path>,
        remove_avatar: bool,
    ) -> Invocation {
        let avatar = avatar.map(|p| p.to_string_lossy().into_owned());
        self.scoped("updateProfile")
            .option("--name", name)
            .option_if_present("--avatar", avatar.as_deref())
            .switch("--removeAvatar", remove_avatar)
    }

    /// `link [-n NAME]`, falling back to `DEFAULT_DEVICE_NAME`
    pub fn link(&self, device_name: Option<&str>) -> Invocation {
        let name = device_name
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_DEVICE_NAME);
        self.bare().arg("link").option("-n", name)
    }

    /// `-u U addDevice --uri URI`
    pub fn add_device(&self, uri: &str) -> Invocation {
        self.scoped("addDevice").option("--uri", uri)
    }

    /// `-u U listDevices` (no structured output support)
    pub fn list_devices(&self) -> Invocation {
        self.scoped("listDevices")
    }

    /// `-u U removeDevice -d ID`
    pub fn remove_device(&self, device_id: u32) -> Invocation {
        self.scoped("removeDevice")
            .option("-d", device_id.to_string())
    }

    /// `-u U updateAccount`
    pub fn update_account(&self) -> Invocation {
        self.scoped("updateAccount")
    }

    /// `-u U updateGroup [-g G] [-n N] [-m M..] [-a P]`
    ///
    /// Without a group id signal-cli creates a new group with a random id.
    pub fn update_group<S: AsRef<str>>(
        &self,
        group_id: Option<&str>,
        name: Option<&str>,
        members: &[S],
        avatar: Option<&Path>,
    ) -> Invocation {
        let avatar = avatar.map(|p| p.to_string_lossy().into_owned());
        self.scoped("updateGroup")
            .option_if_present("-g", group_id)
            .option_if_present("-n", name)
            .multi_option("-m", members)
            .option_if_present("-a", avatar.as_deref())
    }

    /// `-u U updateGroup -n N [-m M..] [-a P]`
    pub fn create_group<S: AsRef<str>>(
        &self,
        name: &str,
        members: &[S],
        avatar: Option<&Path>,
    ) -> Invocation {
        self.update_group(None, Some(name), members, avatar)
    }

    /// `-u U updateGroup -g G -m M..`
    pub fn add_members_to_group<S: AsRef<str>>(
        &self,
        group_id: &str,
        members: &[S],
    ) -> Invocation {
        self.update_group(Some(group_id), None, members, None)
    }

    /// `-u U listGroups [--json]`
    pub fn list_groups(&self) -> Invocation {
        self.with_format(self.scoped("listGroups"))
    }

    /// `-u U joinGroup --uri URI`
    pub fn join_group(&self, uri: &str) -> Invocation {
        self.scoped("joinGroup").option("--uri", uri)
    }

    /// `-u U quitGroup -g G`
    pub fn quit_group(&self, group_id: &str) -> Invocation {
        self.scoped("quitGroup").option("-g", group_id)
    }

    /// `-u U getUserStatus R1 R2 .. [--json]`
    pub fn get_user_status<S: AsRef<str>>(&self, recipients: &[S]) -> Invocation {
        self.with_format(
            self.scoped("getUserStatus")
                .args(as_strs(recipients)),
        )
    }

    /// `-u U receive -t SECS [--json]`
    ///
    /// A negative timeout disables it and signal-cli keeps listening.
    pub fn receive(&self, timeout_secs: i64) -> Invocation {
        self.with_format(
            self.scoped("receive")
                .option("-t", timeout_secs.to_string()),
        )
    }
}
