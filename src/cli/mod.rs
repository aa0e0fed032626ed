use clap::{Parser, Subcommand};
use self::config::SigwrapConfig;
use sigwrap::signal_cli::commands::DEFAULT_RECEIVE_TIMEOUT_SECS;
use sigwrap::signal_cli::{OutputFormat, SignalCli};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

pub mod account;
pub mod config;
pub mod devices;
pub mod groups;
pub mod messaging;
pub mod version;

#[derive(Parser)]
#[command(name = "sigwrap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the signal-cli messaging client", long_about = None)]
pub struct Cli {
    /// Path to config file (default: ~/.config/sigwrap/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the signal-cli binary
    #[arg(long, global = true)]
    pub binary: Option<PathBuf>,

    /// Account phone number in E.164 format (e.g., +15551234567)
    #[arg(long, short = 'a', global = true)]
    pub account: Option<String>,

    /// Request JSON output from subcommands that support it
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register the account with SMS or voice verification
    Register {
        /// Use voice call instead of SMS for verification code
        #[arg(long)]
        voice: bool,

        /// Captcha token (required if signal-cli asks for one)
        #[arg(long)]
        captcha: Option<String>,
    },

    /// Complete registration with the verification code
    Verify {
        /// Code received via SMS or voice (e.g., 123-456)
        code: String,
    },

    /// Disable push support for this device
    Unregister,

    /// Send a message to recipients or a group
    Send {
        /// Recipient phone numbers
        recipients: Vec<String>,

        /// Message text
        #[arg(long, short = 'm')]
        message: String,

        /// Recipient group ID (base64)
        #[arg(long, short = 'g')]
        group: Option<String>,
    },

    /// Update profile name and avatar
    UpdateProfile {
        /// Name visible to message recipients
        #[arg(long)]
        name: String,

        /// Path to a new avatar image
        #[arg(long, conflicts_with = "remove_avatar")]
        avatar: Option<PathBuf>,

        /// Remove the current avatar
        #[arg(long)]
        remove_avatar: bool,
    },

    /// Link as a secondary device to an existing account
    Link {
        /// Device name shown in the primary device's linked devices list
        #[arg(long, short = 'n')]
        name: Option<String>,
    },

    /// Link another device to this (primary) device
    AddDevice {
        /// Provisioning URI from the new device's QR code
        #[arg(long)]
        uri: String,
    },

    /// Show linked devices
    ListDevices,

    /// Remove a linked device (primary device only)
    RemoveDevice {
        /// Device ID from list-devices
        #[arg(long, short = 'd')]
        device_id: u32,
    },

    /// Refresh account attributes on the Signal server
    UpdateAccount,

    /// Create a group with a new random ID
    CreateGroup {
        /// Group name
        #[arg(long, short = 'n')]
        name: String,

        /// Initial members
        #[arg(long, short = 'm', num_args = 1..)]
        members: Vec<String>,

        /// Group avatar image
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// Update a group's name, members or avatar
    UpdateGroup {
        /// Group ID (base64)
        #[arg(long, short = 'g')]
        group: String,

        /// New group name
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Members to add
        #[arg(long, short = 'm', num_args = 1..)]
        members: Vec<String>,

        /// New group avatar image
        #[arg(long)]
        avatar: Option<PathBuf>,
    },

    /// Add members to a group
    AddMembers {
        /// Group ID (base64)
        #[arg(long, short = 'g')]
        group: String,

        /// Members to add
        #[arg(required = true)]
        members: Vec<String>,
    },

    /// List groups
    ListGroups,

    /// Join a group via an invitation link
    JoinGroup {
        /// Invitation link (https://signal.group/#...)
        #[arg(long)]
        uri: String,
    },

    /// Leave a group or decline its invitation
    QuitGroup {
        /// Group ID (base64)
        #[arg(long, short = 'g')]
        group: String,
    },

    /// Check whether recipients are registered with Signal
    UserStatus {
        /// Phone numbers to check
        #[arg(required = true)]
        recipients: Vec<String>,
    },

    /// Fetch new messages
    Receive {
        /// Seconds to wait for new messages (negative disables the timeout)
        #[arg(
            long,
            short = 't',
            default_value_t = DEFAULT_RECEIVE_TIMEOUT_SECS,
            allow_negative_numbers = true
        )]
        timeout: i64,
    },

    /// Write a default config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display version information
    Version,
}

/// Settings after merging the config file with command-line overrides
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub binary: PathBuf,
    pub account: Option<String>,
    pub format: OutputFormat,
    pub link_uri_wait: Duration,
    pub log_level: String,
}

impl Settings {
    pub fn merge(cli: &Cli, config: &SigwrapConfig) -> Self {
        let format = if cli.json {
            OutputFormat::Json
        } else {
            config.signal_cli.format
        };
        Self {
            binary: cli
                .binary
                .clone()
                .unwrap_or_else(|| config.signal_cli.binary_path.clone()),
            account: cli
                .account
                .clone()
                .or_else(|| config.signal_cli.account.clone()),
            format,
            link_uri_wait: Duration::from_secs(config.link.uri_wait_secs),
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| config.logging.level.clone()),
        }
    }

    /// Build the client handle for the configured account
    pub fn client(&self) -> Result<SignalCli, Box<dyn std::error::Error>> {
        let account = self.account.as_deref().ok_or(
            "No account configured. Pass --account or set signal_cli.account in the config file",
        )?;
        Ok(SignalCli::new(&self.binary, account, self.format)?
            .with_link_uri_wait(self.link_uri_wait))
    }
}

/// Initialize the tracing subscriber on stderr
///
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Turn a completion flag into a CLI result
pub(crate) fn report(done: bool, action: &str) -> Result<(), Box<dyn std::error::Error>> {
    if done {
        println!("✅ {}", action);
        Ok(())
    } else {
        Err(format!("signal-cli failed: {}", action).into())
    }
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let file_config = match cli.command {
        // init-config replaces the file, which may be missing or unparsable
        Commands::InitConfig { .. } => SigwrapConfig::default(),
        _ => SigwrapConfig::resolve(cli.config.as_deref())?,
    };
    let settings = Settings::merge(&cli, &file_config);
    init_logging(&settings.log_level);

    match cli.command {
        Commands::Version => {
            version::execute();
            Ok(())
        }
        Commands::InitConfig { force } => {
            let path = cli
                .config
                .clone()
                .or_else(config::default_config_path)
                .ok_or("Could not determine a config directory; pass --config")?;
            if path.exists() && !force {
                return Err(format!(
                    "Config already exists at: {}\nUse --force to overwrite",
                    path.display()
                )
                .into());
            }
            SigwrapConfig::create_default(&path, &settings.binary, settings.account.as_deref())?;
            println!("📝 Created config: {}", path.display());
            Ok(())
        }
        command => {
            let client = settings.client()?;
            dispatch(&client, command).await
        }
    }
}

async fn dispatch(client: &SignalCli, command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Register { voice, captcha } => {
            account::register(client, voice, captcha.as_deref()).await
        }
        Commands::Verify { code } => account::verify(client, &code).await,
        Commands::Unregister => account::unregister(client).await,
        Commands::UpdateProfile {
            name,
            avatar,
            remove_avatar,
        } => account::update_profile(client, &name, avatar.as_deref(), remove_avatar).await,
        Commands::UpdateAccount => account::update_account(client).await,
        Commands::Send {
            recipients,
            message,
            group,
        } => messaging::send(client, &recipients, &message, group.as_deref()).await,
        Commands::UserStatus { recipients } => messaging::user_status(client, &recipients).await,
        Commands::Receive { timeout } => messaging::receive(client, timeout).await,
        Commands::Link { name } => devices::link(client, name.as_deref()).await,
        Commands::AddDevice { uri } => devices::add_device(client, &uri).await,
        Commands::ListDevices => devices::list_devices(client).await,
        Commands::RemoveDevice { device_id } => devices::remove_device(client, device_id).await,
        Commands::CreateGroup {
            name,
            members,
            avatar,
        } => groups::create_group(client, &name, &members, avatar.as_deref()).await,
        Commands::UpdateGroup {
            group,
            name,
            members,
            avatar,
        } => {
            groups::update_group(client, &group, name.as_deref(), &members, avatar.as_deref())
                .await
        }
        Commands::AddMembers { group, members } => {
            groups::add_members(client, &group, &members).await
        }
        Commands::ListGroups => groups::list_groups(client).await,
        Commands::JoinGroup { uri } => groups::join_group(client, &uri).await,
        Commands::QuitGroup { group } => groups::quit_group(client, &group).await,
        Commands::Version | Commands::InitConfig { .. } => Ok(()),
    }
}
