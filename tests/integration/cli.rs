//! Tests for the `releasekit` binary

use super::common::{releasekit_command, OWNER, RELEASES_PATH, REPOSITORY};
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &Path, base_url: &str) -> PathBuf {
    let config_path = dir.join("releasekit.yaml");
    fs::write(
        &config_path,
        format!(
            "api_url: {base_url}\nupload_url: {base_url}\nowner: {OWNER}\nrepository: {REPOSITORY}\nconnect_timeout_ms: 200\n"
        ),
    )
    .unwrap();
    config_path
}

fn releasekit(config_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("releasekit").unwrap();
    cmd.arg("--config")
        .arg(config_path)
        .env_remove("GITHUB_TOKEN")
        .env_remove("RELEASEKIT_VERSION");
    cmd
}

async fn mount_latest(server: &MockServer, tag: &str) {
    Mock::given(method("GET"))
        .and(path(RELEASES_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(format!(r#"[{{"tag_name":"{tag}"}}]"#)),
        )
        .mount(server)
        .await;
}

#[test]
fn test_help_lists_commands() {
    let output = releasekit_command().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("latest"));
    assert!(stdout.contains("next-version"));
    assert!(stdout.contains("publish"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp = TempDir::new().unwrap();
    releasekit(&temp.path().join("missing.yaml"))
        .arg("latest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_next_version_uses_override() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), "http://127.0.0.1:1");

    releasekit(&config_path)
        .arg("next-version")
        .env("RELEASEKIT_VERSION", "2.5")
        .assert()
        .success()
        .stdout("2.5\n");
}

#[test]
fn test_next_version_rejects_invalid_override() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), "http://127.0.0.1:1");

    releasekit(&config_path)
        .arg("next-version")
        .env("RELEASEKIT_VERSION", "2.5.1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version: 2.5.1"));
}

#[test]
fn test_next_version_without_service_is_development() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), "http://127.0.0.1:1");

    releasekit(&config_path)
        .arg("next-version")
        .assert()
        .success()
        .stdout("development\n");
}

#[test]
fn test_latest_without_service_fails() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), "http://127.0.0.1:1");

    releasekit(&config_path)
        .arg("latest")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Release lookup failed"));
}

#[test]
fn test_publish_without_token_fails() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), "http://127.0.0.1:1");
    let jar = temp.path().join("app.jar");
    fs::write(&jar, b"jar").unwrap();

    releasekit(&config_path)
        .arg("publish")
        .arg("--artifact")
        .arg(&jar)
        .assert()
        .failure()
        .stderr(predicate::str::contains("GITHUB_TOKEN"));
}

#[test]
fn test_publish_missing_artifact_fails() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), "http://127.0.0.1:1");

    releasekit(&config_path)
        .arg("publish")
        .arg("--artifact")
        .arg(temp.path().join("missing.jar"))
        .env("GITHUB_TOKEN", "MY_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Artifact not found"));
}

#[test]
fn test_publish_refuses_development_version() {
    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), "http://127.0.0.1:1");
    let jar = temp.path().join("app.jar");
    fs::write(&jar, b"jar").unwrap();

    releasekit(&config_path)
        .arg("publish")
        .arg("--artifact")
        .arg(&jar)
        .env("GITHUB_TOKEN", "MY_TOKEN")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot release development version"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_latest_prints_version() {
    let server = MockServer::start().await;
    mount_latest(&server, "1.82").await;

    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), &server.uri());

    let assert = tokio::task::spawn_blocking(move || releasekit(&config_path).arg("latest").assert())
        .await
        .unwrap();
    assert.success().stdout("1.82\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_publish_creates_release_and_uploads() {
    let server = MockServer::start().await;
    mount_latest(&server, "1.82").await;
    Mock::given(method("POST"))
        .and(path(RELEASES_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":7}"#))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{}/7/assets", RELEASES_PATH)))
        .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config_path = write_config(temp.path(), &server.uri());
    let jar = temp.path().join("app.jar");
    fs::write(&jar, b"jar bytes").unwrap();

    let assert = tokio::task::spawn_blocking(move || {
        releasekit(&config_path)
            .arg("publish")
            .arg("--artifact")
            .arg(&jar)
            .env("GITHUB_TOKEN", "MY_TOKEN")
            .assert()
    })
    .await
    .unwrap();
    assert
        .success()
        .stdout(predicate::str::contains("Released 1.83 (release id 7)"));

    let requests = server.received_requests().await.unwrap();
    let upload = requests
        .iter()
        .find(|request| request.url.path().ends_with("/assets"))
        .unwrap();
    assert_eq!(
        upload.url.query_pairs().find(|(key, _)| key == "name").unwrap().1,
        "svg2ico-1.83.jar"
    );
    assert_eq!(upload.body, b"jar bytes");
}
