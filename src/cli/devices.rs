//! Device commands: link, add, list, remove.

use super::report;
use sigwrap::signal_cli::commands::DEFAULT_DEVICE_NAME;
use sigwrap::signal_cli::{CommandRunner, SignalCli};

/// Link as a secondary device
///
/// Shows the provisioning URI as a QR code and waits until the primary
/// device has scanned it and signal-cli exits.
pub async fn link<R: CommandRunner>(
    client: &SignalCli<R>,
    name: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "🔗 Linking \"{}\" as a secondary device...",
        name.filter(|n| !n.is_empty()).unwrap_or(DEFAULT_DEVICE_NAME)
    );
    println!();

    let session = client.link(name).await?;

    println!("📱 Please scan this QR code with Signal on your phone:");
    println!("   Signal → Settings → Linked Devices → Link New Device");
    println!();

    if let Err(e) = qr2term::print_qr(session.uri()) {
        eprintln!("⚠️  Failed to render QR code: {}", e);
    }

    println!();
    println!("Or use this URI: {}", session.uri());
    println!();
    println!("⏳ Waiting for you to scan the code...");

    let linked = session.finish().await?;
    report(linked, "Device linked")
}

pub async fn add_device<R: CommandRunner>(
    client: &SignalCli<R>,
    uri: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.add_device(uri).await?;
    report(done, "Device added")
}

pub async fn list_devices<R: CommandRunner>(
    client: &SignalCli<R>,
) -> Result<(), Box<dyn std::error::Error>> {
    print!("{}", client.list_devices().await?);
    Ok(())
}

pub async fn remove_device<R: CommandRunner>(
    client: &SignalCli<R>,
    device_id: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let done = client.remove_device(device_id).await?;
    report(done, &format!("Device {} removed", device_id))
}
