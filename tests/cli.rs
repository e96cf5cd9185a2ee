use assert_cmd::Command;
use chrono::{Duration, Utc};
use predicates::prelude::*;
use trends::config::{
    ConfigStore, KEY_JWT, KEY_REFRESH_TOKEN, KEY_TOKEN_EXPIRES_AT, KEY_URL_API,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn trends(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("trends").unwrap();
    cmd.env("TECLI_CONFIG", config).env("NO_COLOR", "1");
    cmd
}

/// A settings file pointing at `server` with a session valid for another hour.
fn logged_in_store(config: &std::path::Path, server: &MockServer) -> ConfigStore {
    let store = ConfigStore::new(config.to_path_buf());
    store.set(KEY_URL_API, &server.uri()).unwrap();
    store.set(KEY_JWT, "T1").unwrap();
    store.set(KEY_REFRESH_TOKEN, "R1").unwrap();
    store
        .set(
            KEY_TOKEN_EXPIRES_AT,
            &(Utc::now() + Duration::hours(1)).to_rfc3339(),
        )
        .unwrap();
    store
}

#[test]
fn help_lists_commands() {
    let dir = tempfile::tempdir().unwrap();
    trends(&dir.path().join("tecli.yml"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("publish"))
        .stdout(predicate::str::contains("logs"));
}

#[test]
fn config_set_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tecli.yml");

    trends(&config)
        .args(["config", "set", "url_api", "http://localhost:3000"])
        .assert()
        .success();

    trends(&config)
        .args(["config", "show", "url_api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Value: http://localhost:3000"));

    trends(&config)
        .args(["config", "unset", "url_api"])
        .assert()
        .success();

    trends(&config)
        .args(["config", "show", "url_api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Value: https://api.trends.earth"));
}

#[test]
fn unknown_config_action_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    trends(&dir.path().join("tecli.yml"))
        .args(["config", "drop", "url_api"])
        .assert()
        .failure();
}

#[test]
fn info_outside_project_fails() {
    let dir = tempfile::tempdir().unwrap();
    trends(&dir.path().join("tecli.yml"))
        .current_dir(dir.path())
        .arg("info")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Execute this command in a GEF project"));
}

#[test]
fn logout_without_session_warns() {
    let dir = tempfile::tempdir().unwrap();
    trends(&dir.path().join("tecli.yml"))
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already logged out"));
}

#[test]
fn create_scaffolds_project() {
    let dir = tempfile::tempdir().unwrap();
    trends(&dir.path().join("tecli.yml"))
        .current_dir(dir.path())
        .args(["create", "my-script"])
        .assert()
        .success();

    assert!(dir.path().join("my-script/configuration.json").is_file());
    assert!(dir.path().join("my-script/src/main.py").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_clears_the_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tecli.yml");
    let store = logged_in_store(&config, &server);

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    trends(&config)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully logged out."));

    assert_eq!(store.get(KEY_JWT).unwrap(), "");
    assert_eq!(store.get(KEY_REFRESH_TOKEN).unwrap(), "");
    assert_eq!(store.get(KEY_TOKEN_EXPIRES_AT).unwrap(), "");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_logout_keeps_the_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tecli.yml");
    let store = logged_in_store(&config, &server);

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    trends(&config)
        .arg("logout")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Error logging out."));

    assert_eq!(store.get(KEY_JWT).unwrap(), "T1");
    assert_eq!(store.get(KEY_REFRESH_TOKEN).unwrap(), "R1");
    assert_ne!(store.get(KEY_TOKEN_EXPIRES_AT).unwrap(), "");
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_all_ends_every_session() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tecli.yml");
    let store = logged_in_store(&config, &server);

    Mock::given(method("POST"))
        .and(path("/auth/logout-all"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    trends(&config)
        .args(["logout", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("logged out from all sessions"));

    assert_eq!(store.get(KEY_JWT).unwrap(), "");
}
