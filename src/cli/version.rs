/// Version banner printed by `sigwrap version`
fn banner() -> String {
    format!(
        "sigwrap {}\nOperator CLI for the signal-cli messaging client",
        env!("CARGO_PKG_VERSION")
    )
}

/// Display version information
pub fn execute() {
    println!("{}", banner());
}
