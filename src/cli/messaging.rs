//! Messaging commands: send, receive, user status.

use super::report;
use sigwrap::signal_cli::output::{parse_json_records, parse_user_statuses};
use sigwrap::signal_cli::{CommandRunner, SignalCli};
use tracing::{info, warn};

pub async fn send<R: CommandRunner>(
    client: &SignalCli<R>,
    recipients: &[String],
    message: &str,
    group: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    if recipients.is_empty() && group.map_or(true, str::is_empty) {
        return Err("Specify at least one recipient or a group (-g)".into());
    }
    let done = client.send(recipients, message, group).await?;
    report(done, "Message sent")
}

/// Print registration status for each recipient
pub async fn user_status<R: CommandRunner>(
    client: &SignalCli<R>,
    recipients: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let output = client.get_user_status(recipients).await?;
    if client.format().is_structured() {
        match parse_user_statuses(&output) {
            Ok(statuses) => {
                let registered = statuses.iter().filter(|s| s.is_registered).count();
                info!(checked = statuses.len(), registered, "user status");
            }
            Err(e) => warn!(error = %e, "getUserStatus output was not valid JSON"),
        }
    }
    print!("{}", output);
    Ok(())
}

/// Print received messages exactly as signal-cli emitted them
pub async fn receive<R: CommandRunner>(
    client: &SignalCli<R>,
    timeout: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = client.receive(timeout).await?;
    if client.format().is_structured() {
        match parse_json_records(&output) {
            Ok(envelopes) => info!(count = envelopes.len(), "messages received"),
            Err(e) => warn!(error = %e, "receive output was not valid JSON"),
        }
    }
    print!("{}", output);
    Ok(())
}
