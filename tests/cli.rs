use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::PathBuf;

/// Helper to get a temporary home directory
fn temp_home_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Helper to get config file path in the temp dir
fn config_file_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join(".volby").join("config.json")
}

const BINARY_NAME: &str = "volby-dashboard";

#[test]
/// Help command should display usage information.
fn cli_help_displays_usage() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(contains("Live election results dashboard"))
        .stdout(contains("start"))
        .stdout(contains("export"));
}

#[test]
fn start_help_lists_headless_flag() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["start", "--help"])
        .assert()
        .success()
        .stdout(contains("--headless"))
        .stdout(contains("--region"));
}

#[test]
fn export_rejects_unknown_format() {
    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["export", "--format", "xml"]).assert().failure();
}

#[test]
/// `config set` writes the file and `config show` prints it back.
fn config_set_then_show() {
    let tmp = temp_home_dir();
    let config_path = config_file_path(&tmp);

    Command::cargo_bin(BINARY_NAME)
        .unwrap()
        .args(["config", "set", "--region", "CZ010", "--refresh-secs", "30"])
        .env("HOME", tmp.path())
        .assert()
        .success();
    assert!(config_path.exists());

    Command::cargo_bin(BINARY_NAME)
        .unwrap()
        .args(["config", "show"])
        .env("HOME", tmp.path())
        .assert()
        .success()
        .stdout(contains("\"default_region\": \"CZ010\""))
        .stdout(contains("\"refresh_interval_secs\": 30"));
}

#[test]
fn config_set_rejects_unknown_environment() {
    let tmp = temp_home_dir();
    Command::cargo_bin(BINARY_NAME)
        .unwrap()
        .args(["config", "set", "--env", "staging"])
        .env("HOME", tmp.path())
        .assert()
        .failure();
    assert!(!config_file_path(&tmp).exists());
}

#[test]
/// Clear command should delete an existing config file.
fn config_clear_deletes_config_file() {
    let tmp = temp_home_dir();
    let config_path = config_file_path(&tmp);
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, "{}").unwrap();

    // Ensure the file exists
    assert!(config_path.exists());

    let mut cmd = Command::cargo_bin(BINARY_NAME).unwrap();
    cmd.args(["config", "clear"])
        .env("HOME", tmp.path()) // simulate different $HOME
        .assert()
        .success()
        .stdout(contains("Clearing"));

    // Confirm the file was deleted
    assert!(!config_path.exists());
}
