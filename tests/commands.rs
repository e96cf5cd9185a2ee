mod common;

use std::fs;
use std::path::Path;

use common::Harness;
use serde_json::json;
use trends::cli::info::project_info;
use trends::cli::logs::follow;
use trends::cli::publish::{publish, PublishOptions};
use trends::error::AppError;
use trends::models::project::ProjectConfiguration;
use trends::tail::{LogTailer, TailEnd};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn project(config: serde_json::Value) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("configuration.json"),
        serde_json::to_string(&config).unwrap(),
    )
    .unwrap();
    fs::write(dir.path().join("requirements.txt"), "numpy\n").unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src").join("main.py"), "").unwrap();
    dir
}

fn stored_id(dir: &Path) -> Option<String> {
    ProjectConfiguration::read(dir).unwrap().id
}

#[tokio::test]
async fn publish_new_script_records_id() {
    let harness = Harness::new().await.with_session("T1", Some("R1"));
    let dir = project(json!({"name": "ndvi"}));

    Mock::given(method("POST"))
        .and(path("/api/v1/script"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "new-id"}})))
        .expect(1)
        .mount(&harness.server)
        .await;

    let id = publish(&harness.gateway(), dir.path(), PublishOptions::default())
        .await
        .unwrap();

    assert_eq!(id, "new-id");
    assert_eq!(stored_id(dir.path()).as_deref(), Some("new-id"));
    assert!(!dir.path().join("ndvi.tar.gz").exists());

    let requests = harness.server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap();
    assert!(content_type
        .to_str()
        .unwrap()
        .starts_with("multipart/form-data"));
}

#[tokio::test]
async fn overwrite_and_make_public() {
    let harness = Harness::new().await.with_session("T1", Some("R1"));
    let dir = project(json!({"name": "ndvi", "id": "abc"}));

    Mock::given(method("PATCH"))
        .and(path("/api/v1/script/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "abc"}})))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/script/abc/publish"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&harness.server)
        .await;

    let options = PublishOptions {
        public: true,
        overwrite: true,
    };
    let id = publish(&harness.gateway(), dir.path(), options).await.unwrap();
    assert_eq!(id, "abc");
}

#[tokio::test]
async fn upload_is_rebuilt_for_the_retry() {
    let harness = Harness::new().await.with_session("T1", Some("R1"));
    let dir = project(json!({"name": "ndvi"}));

    Mock::given(method("POST"))
        .and(path("/api/v1/script"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/script"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "xyz"}})))
        .expect(1)
        .mount(&harness.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "T2"})))
        .expect(1)
        .mount(&harness.server)
        .await;

    let id = publish(&harness.gateway(), dir.path(), PublishOptions::default())
        .await
        .unwrap();
    assert_eq!(id, "xyz");
}

#[tokio::test]
async fn publish_without_session_reports_not_authenticated() {
    let harness = Harness::new().await;
    let dir = project(json!({"name": "ndvi"}));

    let err = publish(&harness.gateway(), dir.path(), PublishOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));
    assert!(stored_id(dir.path()).is_none());
}

#[tokio::test]
async fn publish_outside_project() {
    let harness = Harness::new().await.with_session("T1", Some("R1"));
    let dir = tempfile::tempdir().unwrap();

    let err = publish(&harness.gateway(), dir.path(), PublishOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAProject));
}

#[tokio::test]
async fn info_for_unpublished_project() {
    let harness = Harness::new().await;
    let dir = project(json!({"name": "ndvi"}));

    let rows = project_info(&harness.gateway(), dir.path()).await.unwrap();
    assert_eq!(rows[0].value, "ndvi");
    assert_eq!(rows[1].value, "NOT PUBLISHED");
}

#[tokio::test]
async fn info_for_published_project() {
    let harness = Harness::new().await.with_session("T1", Some("R1"));
    let dir = project(json!({"name": "ndvi", "id": "abc"}));

    Mock::given(method("GET"))
        .and(path("/api/v1/script/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {
            "id": "abc",
            "name": "ndvi-1",
            "slug": "ndvi",
            "status": "SUCCESS",
            "created_at": "2026-01-01T00:00:00"
        }})))
        .expect(1)
        .mount(&harness.server)
        .await;

    let rows = project_info(&harness.gateway(), dir.path()).await.unwrap();
    let status = rows.iter().find(|r| r.field == "Status").unwrap();
    assert_eq!(status.value, "SUCCESS");
    let run = rows.iter().find(|r| r.field == "Run script").unwrap();
    assert_eq!(
        run.value,
        format!("{}/api/v1/script/ndvi-1/run?params", harness.server.uri())
    );
}

#[tokio::test]
async fn info_server_error() {
    let harness = Harness::new().await.with_session("T1", Some("R1"));
    let dir = project(json!({"name": "ndvi", "id": "abc"}));

    Mock::given(method("GET"))
        .and(path("/api/v1/script/abc"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&harness.server)
        .await;

    let err = project_info(&harness.gateway(), dir.path())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn follow_finished_script() {
    let harness = Harness::new().await.with_session("T1", Some("R1"));
    let dir = project(json!({"name": "ndvi", "id": "abc"}));
    let recent = (chrono::Utc::now() - chrono::Duration::minutes(1))
        .to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    Mock::given(method("GET"))
        .and(path("/api/v1/script/abc"))
        .and(query_param("include", "logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {
            "id": "abc",
            "status": "SUCCESS",
            "logs": [{"register_date": recent, "text": "done"}]
        }})))
        .expect(1)
        .mount(&harness.server)
        .await;

    let gateway = harness.gateway();
    let tailer = LogTailer::new(&gateway);
    let mut out = Vec::new();
    let report = follow(&tailer, &gateway, dir.path(), &mut out)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.end, TailEnd::Finished);
    assert!(String::from_utf8(out).unwrap().contains("done"));
}

#[tokio::test]
async fn follow_unpublished_project() {
    let harness = Harness::new().await.with_session("T1", Some("R1"));
    let dir = project(json!({"name": "ndvi"}));
    let gateway = harness.gateway();
    let tailer = LogTailer::new(&gateway);

    let mut out = Vec::new();
    assert!(follow(&tailer, &gateway, dir.path(), &mut out)
        .await
        .unwrap()
        .is_none());
}
