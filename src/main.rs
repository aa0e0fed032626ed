//! sigwrap - operator CLI for signal-cli
//!
//! Every subcommand maps to exactly one signal-cli invocation. Logs go to
//! stderr; stdout carries only signal-cli output and confirmations.

mod cli;

use clap::Parser;
use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::execute(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
