use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// A command running in an empty directory with no credential env leaking in.
fn ghd_uploader(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("ghd-uploader").expect("binary exists");
    cmd.current_dir(dir)
        .env_remove("GHD_USERNAME")
        .env_remove("GHD_PASSWORD");
    cmd
}

#[test]
fn upload_without_a_repository_fails_before_any_network_call() {
    let dir = tempdir().unwrap();
    ghd_uploader(dir.path())
        .args(["upload", "--token", "t"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No GitHub repository (owner and name) configured",
        ));
}

#[test]
fn upload_without_credentials_fails_before_any_network_call() {
    let dir = tempdir().unwrap();
    ghd_uploader(dir.path())
        .args(["upload", "--owner", "owner", "--repository", "repo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No authentication credentials configured",
        ));
}

#[test]
fn offline_dry_run_succeeds_without_touching_the_service() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("app.zip");
    fs::write(&file, b"payload").unwrap();

    // No --overwrite, so not even a listing call is attempted.
    ghd_uploader(dir.path())
        .args([
            "upload",
            "--owner",
            "owner",
            "--repository",
            "repo",
            "--token",
            "t",
            "--dry-run",
            "app.zip",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Dry run mode, downloads will not be deleted or uploaded",
        ));
}

#[test]
fn the_scm_url_fallback_reaches_the_dry_run_stage() {
    let dir = tempdir().unwrap();
    ghd_uploader(dir.path())
        .args([
            "upload",
            "--scm-url",
            "https://github.com/owner/repo.git",
            "--token",
            "t",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Adding 0 downloads to repository owner/repo"));
}

#[test]
fn publish_with_a_missing_config_file_fails() {
    let dir = tempdir().unwrap();
    ghd_uploader(dir.path())
        .args(["publish", "--config", "missing.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn publish_without_credentials_fails_before_any_network_call() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("publish.yml");
    fs::write(
        &config,
        "entries:\n  - owner: owner\n    repository: repo\n    source_file: app.zip\n",
    )
    .unwrap();

    ghd_uploader(dir.path())
        .args(["publish", "--config", "publish.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "No authentication credentials configured",
        ));
}
