//! Account lifecycle commands: register, verify, unregister, profile.

use super::report;
use sigwrap::signal_cli::{CommandRunner, SignalCli};
use std::path::Path;

/// Register the account, then prompt for `sigwrap verify`
pub async fn register<R: CommandRunner>(
    client: &SignalCli<R>,
    voice: bool,
    captcha: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.register(voice, captcha).await?;
    report(done, &format!("Registration requested for {}", client.account()))?;
    println!(
        "Enter the {} code with: sigwrap verify <CODE>",
        if voice { "voice" } else { "SMS" }
    );
    Ok(())
}

pub async fn verify<R: CommandRunner>(
    client: &SignalCli<R>,
    code: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.verify(code).await?;
    report(done, &format!("Verified {}", client.account()))
}

pub async fn unregister<R: CommandRunner>(
    client: &SignalCli<R>,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.unregister().await?;
    report(done, &format!("Unregistered {}", client.account()))
}

pub async fn update_profile<R: CommandRunner>(
    client: &SignalCli<R>,
    name: &str,
    avatar: Option<&Path>,
    remove_avatar: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.update_profile(name, avatar, remove_avatar).await?;
    report(done, "Profile updated")
}

pub async fn update_account<R: CommandRunner>(
    client: &SignalCli<R>,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.update_account().await?;
    report(done, "Account attributes updated")
}
