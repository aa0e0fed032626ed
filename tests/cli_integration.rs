// Integration tests for CLI commands
// These drive the built sigwrap binary against a fake signal-cli shell
// script, so no real Signal account or network is involved.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

const ACCOUNT: &str = "+15550001111";

fn get_binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_sigwrap")
}

/// Fake signal-cli that records its arguments (one per line) in `args.txt`
/// next to itself, then runs `tail` for its output and exit status.
#[cfg(unix)]
fn fake_signal_cli(dir: &Path, tail: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("signal-cli");
    let script = format!(
        "#!/bin/sh\nfor a in \"$@\"; do printf '%s\\n' \"$a\"; done > args.txt\n{}\n",
        tail
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn recorded_args(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("args.txt"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Empty config so the developer's own config file never leaks in
fn empty_config() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# test config").unwrap();
    file
}

fn run_sigwrap(config: &Path, binary: &Path, args: &[&str]) -> Output {
    Command::new(get_binary_path())
        .arg("--config")
        .arg(config)
        .arg("--binary")
        .arg(binary)
        .arg("--account")
        .arg(ACCOUNT)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_cli_help() {
    let output = Command::new(get_binary_path())
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Operator CLI for the signal-cli messaging client"));
    for subcommand in [
        "register",
        "verify",
        "send",
        "link",
        "list-devices",
        "create-group",
        "list-groups",
        "user-status",
        "receive",
    ] {
        assert!(stdout.contains(subcommand), "help is missing {}", subcommand);
    }
}

#[test]
fn test_cli_version() {
    let config = empty_config();
    let output = Command::new(get_binary_path())
        .arg("--config")
        .arg(config.path())
        .arg("version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sigwrap"));
    assert!(stdout.contains("Operator CLI"));
}

#[test]
fn test_cli_missing_config_file_fails() {
    let output = Command::new(get_binary_path())
        .arg("--config")
        .arg("/nonexistent/sigwrap/config.toml")
        .arg("version")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read config file"));
}

#[test]
fn test_cli_requires_account() {
    let config = empty_config();
    let output = Command::new(get_binary_path())
        .arg("--config")
        .arg(config.path())
        .arg("list-devices")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No account configured"));
}

#[test]
fn test_cli_init_config_writes_loadable_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("sigwrap").join("config.toml");

    let init = |force: bool| {
        let mut cmd = Command::new(get_binary_path());
        cmd.arg("--config")
            .arg(&config_path)
            .arg("--account")
            .arg(ACCOUNT)
            .arg("init-config");
        if force {
            cmd.arg("--force");
        }
        cmd.output().expect("Failed to execute command")
    };

    let output = init(false);
    assert!(output.status.success(), "{:?}", output);
    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains(&format!("account = \"{}\"", ACCOUNT)));

    // Existing file is kept unless --force is given
    let output = init(false);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));

    assert!(init(true).status.success());

    // --force also replaces a file that no longer parses
    std::fs::write(&config_path, "[signal_cli\nbinary_path = ").unwrap();
    let output = init(true);
    assert!(output.status.success(), "{:?}", output);
    let contents = std::fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("[signal_cli]"));

    // The written file drives later commands
    let output = Command::new(get_binary_path())
        .arg("--config")
        .arg(&config_path)
        .arg("version")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());
}

#[cfg(unix)]
#[test]
fn test_cli_send_builds_expected_arguments() {
    let dir = TempDir::new().unwrap();
    let binary = fake_signal_cli(dir.path(), "exit 0");
    let config = empty_config();

    let output = run_sigwrap(
        config.path(),
        &binary,
        &["send", "+15550002222", "-m", "Hello there; $(whoami)"],
    );

    assert!(output.status.success(), "{:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Message sent"));
    assert_eq!(
        recorded_args(dir.path()),
        vec!["-u", ACCOUNT, "send", "+15550002222", "-m", "Hello there; $(whoami)"]
    );
}

#[cfg(unix)]
#[test]
fn test_cli_failed_status_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let binary = fake_signal_cli(dir.path(), "echo 'Verification failed' >&2\nexit 1");
    let config = empty_config();

    let output = run_sigwrap(config.path(), &binary, &["verify", "123-456"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("signal-cli failed"));
    assert_eq!(
        recorded_args(dir.path()),
        vec!["-u", ACCOUNT, "verify", "123-456"]
    );
}

#[cfg(unix)]
#[test]
fn test_cli_receive_json_passes_output_through() {
    let dir = TempDir::new().unwrap();
    let binary = fake_signal_cli(
        dir.path(),
        r#"echo '{"envelope":{"source":"+15550002222","timestamp":1}}'"#,
    );
    let config = empty_config();

    let output = run_sigwrap(config.path(), &binary, &["--json", "receive", "-t", "-1"]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "{\"envelope\":{\"source\":\"+15550002222\",\"timestamp\":1}}\n"
    );
    assert_eq!(
        recorded_args(dir.path()),
        vec!["-u", ACCOUNT, "receive", "-t", "-1", "--json"]
    );
}

#[cfg(unix)]
#[test]
fn test_cli_list_devices_never_requests_json() {
    let dir = TempDir::new().unwrap();
    let binary = fake_signal_cli(dir.path(), "echo '- Device 1 (this device):'");
    let config = empty_config();

    let output = run_sigwrap(config.path(), &binary, &["--json", "list-devices"]);

    assert!(output.status.success(), "{:?}", output);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Device 1"));
    assert_eq!(
        recorded_args(dir.path()),
        vec!["-u", ACCOUNT, "listDevices"]
    );
}

#[cfg(unix)]
#[test]
fn test_cli_update_group_omits_absent_options() {
    let dir = TempDir::new().unwrap();
    let binary = fake_signal_cli(dir.path(), "exit 0");
    let config = empty_config();

    let output = run_sigwrap(
        config.path(),
        &binary,
        &["update-group", "-g", "Z3JvdXA=", "-n", "Renamed"],
    );

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(
        recorded_args(dir.path()),
        vec!["-u", ACCOUNT, "updateGroup", "-g", "Z3JvdXA=", "-n", "Renamed"]
    );
}

#[cfg(unix)]
#[test]
fn test_cli_link_shows_uri_and_waits() {
    let dir = TempDir::new().unwrap();
    let binary = fake_signal_cli(
        dir.path(),
        "echo 'sgnl://linkdevice?uuid=abc&pub_key=def'\nsleep 0.2\necho 'Associated with: +15550001111'",
    );
    let config = empty_config();

    let output = run_sigwrap(config.path(), &binary, &["link", "-n", "Test Server"]);

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Linking \"Test Server\""));
    assert!(!stdout.contains(ACCOUNT));
    assert!(stdout.contains("sgnl://linkdevice?uuid=abc&pub_key=def"));
    assert!(stdout.contains("Device linked"));
    assert_eq!(recorded_args(dir.path()), vec!["link", "-n", "Test Server"]);
}

#[cfg(unix)]
#[test]
fn test_cli_link_without_uri_fails() {
    let dir = TempDir::new().unwrap();
    let binary = fake_signal_cli(dir.path(), "echo 'Link request error' >&2\nexit 1");
    let config = empty_config();

    let output = run_sigwrap(config.path(), &binary, &["link"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Device linking failed"));
}
