use assert_cmd::Command;
use predicates::prelude::*;

fn bookshelf() -> Command {
    let mut cmd = Command::cargo_bin("bookshelf").unwrap();
    cmd.env_remove("BOOKSHELF_ENV")
        .env("BOOKSHELF_CONFIG_DIR", std::env::temp_dir().join("bookshelf-cli-no-config"));
    cmd
}

#[test]
fn help_lists_subcommands() {
    bookshelf()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn config_prints_defaults() {
    bookshelf()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"environment\": \"local\""))
        .stdout(predicate::str::contains("\"port\": 9000"));
}

#[test]
fn config_honours_environment_overrides() {
    bookshelf()
        .arg("config")
        .env("BOOKSHELF_SERVER__PORT", "9123")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"port\": 9123"));
}

#[test]
fn unknown_environment_fails() {
    bookshelf()
        .arg("config")
        .env("BOOKSHELF_ENV", "qa")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported environment"));
}
