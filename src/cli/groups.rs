//! Group commands.

use super::report;
use sigwrap::signal_cli::{CommandRunner, SignalCli};
use std::path::Path;

pub async fn create_group<R: CommandRunner>(
    client: &SignalCli<R>,
    name: &str,
    members: &[String],
    avatar: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.create_group(name, members, avatar).await?;
    report(done, &format!("Group '{}' created", name))
}

pub async fn update_group<R: CommandRunner>(
    client: &SignalCli<R>,
    group: &str,
    name: Option<&str>,
    members: &[String],
    avatar: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.update_group(group, name, members, avatar).await?;
    report(done, "Group updated")
}

pub async fn add_members<R: CommandRunner>(
    client: &SignalCli<R>,
    group: &str,
    members: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.add_members_to_group(group, members).await?;
    report(done, &format!("Added {} member(s)", members.len()))
}

pub async fn list_groups<R: CommandRunner>(
    client: &SignalCli<R>,
) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", client.list_groups().await?);
    Ok(())
}

pub async fn join_group<R: CommandRunner>(
    client: &SignalCli<R>,
    uri: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.join_group(uri).await?;
    report(done, "Joined group")
}

pub async fn quit_group<R: CommandRunner>(
    client: &SignalCli<R>,
    group: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.quit_group(group).await?;
    report(done, "Left group")
}
