use assert_cmd::Command;
use predicates::prelude::*;

fn blogdesk(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("blogdesk").unwrap();
    cmd.env("BLOGDESK_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("BLOGDESK_TOKEN")
        .env_remove("BLOGDESK_ENDPOINT")
        .env_remove("BLOGDESK_CDN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let temp_dir = tempfile::tempdir().unwrap();
    blogdesk(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("preview"));
}

#[test]
fn config_set_then_get() {
    let temp_dir = tempfile::tempdir().unwrap();

    blogdesk(temp_dir.path())
        .args(["config", "endpoint", "https://blog.example/query"])
        .assert()
        .success()
        .stdout(predicate::str::contains("endpoint set to https://blog.example/query"));

    assert!(temp_dir.path().join("config.json").exists());

    blogdesk(temp_dir.path())
        .args(["config", "endpoint"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://blog.example/query"));
}

#[test]
fn config_show_all_lists_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    blogdesk(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("cdn-base-url = "))
        .stdout(predicate::str::contains("tags = Coding,System_Architecture,Book"))
        .stdout(predicate::str::contains("file-ext = .md"));
}

#[test]
fn config_unknown_key_reports_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    blogdesk(temp_dir.path())
        .args(["config", "colour", "blue"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown config key: colour"));
    assert!(!temp_dir.path().join("config.json").exists());
}

#[test]
fn delete_without_token_is_rejected() {
    let temp_dir = tempfile::tempdir().unwrap();
    blogdesk(temp_dir.path())
        .args(["delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not authenticated"));
}

#[test]
fn create_with_missing_attachment_fails_before_network() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("nope.png");
    blogdesk(temp_dir.path())
        .args(["create", "Title", "--token", "abc", "--attach"])
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn list_against_unreachable_endpoint_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    blogdesk(temp_dir.path())
        .env("BLOGDESK_ENDPOINT", "http://127.0.0.1:9/query")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn publish_and_unpublish_conflict() {
    let temp_dir = tempfile::tempdir().unwrap();
    blogdesk(temp_dir.path())
        .args(["edit", "1", "--publish", "--unpublish"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
