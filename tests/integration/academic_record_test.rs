// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::http::StatusCode;
use axum_test::TestServer;
use ktu_record::config::settings::Settings;
use ktu_record::engines::traits::{PortalSession, SessionError, SessionFactory};
use ktu_record::presentation::routes;
use serde_json::{json, Value};
use std::sync::Arc;

use super::helpers::{CountingSessionFactory, FixturePortal, PortalBehaviour};

struct TestApp {
    server: TestServer,
    portal: FixturePortal,
    sessions: Arc<CountingSessionFactory>,
}

async fn create_test_app(semesters: usize) -> TestApp {
    let portal = FixturePortal::start(PortalBehaviour { semesters }).await;
    let settings = portal.settings();
    let sessions = Arc::new(CountingSessionFactory::new(&settings));

    let app = routes::build_app(Arc::new(settings), sessions.clone());
    let server = TestServer::new(app).unwrap();

    TestApp {
        server,
        portal,
        sessions,
    }
}

fn trace_entry<'a>(body: &'a Value, debug_key: &str, step: &str) -> Option<&'a Value> {
    body[debug_key]["entries"]
        .as_array()?
        .iter()
        .find(|e| e["step"] == step)
}

#[tokio::test]
async fn test_missing_credentials_are_rejected_without_traffic() {
    let app = create_test_app(2).await;

    let bodies = [
        json!({ "username": "TVE20CS042" }),
        json!({ "password": "pw" }),
        json!({ "username": "", "password": "pw" }),
        json!({}),
    ];
    for body in bodies {
        let response = app.server.post("/get-ktu-data").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Username and password are required");
    }

    let response = app.server.post("/get-ktu-data").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    assert_eq!(app.sessions.created(), 0);
    assert_eq!(app.portal.hits(), 0);
}

#[tokio::test]
async fn test_invalid_credentials_return_401() {
    let app = create_test_app(2).await;

    let response = app
        .server
        .post("/get-ktu-data")
        .json(&json!({ "username": "TVE20CS042", "password": "wrong" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid username or password");
    assert!(trace_entry(&body, "debug", "login_submit").is_some());
}

#[tokio::test]
async fn test_bounce_after_submit_is_login_failure() {
    let app = create_test_app(2).await;

    let response = app
        .server
        .post("/get-ktu-data")
        .json(&json!({ "username": "rejected", "password": "pw" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Login failed - still on login page");
}

#[tokio::test]
async fn test_full_crawl_returns_every_semester() {
    let app = create_test_app(2).await;

    let response = app
        .server
        .post("/get-ktu-data")
        .json(&json!({ "username": "anjali.menon", "password": "s3cret" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();

    assert_eq!(body["student_details"]["name"], "Anjali Menon");
    assert_eq!(body["student_details"]["register_number"], "TVE20CS042");
    assert_eq!(
        body["student_details"]["branch"],
        "Computer Science and Engineering"
    );
    assert_eq!(body["student_details"]["batch"], "2020-2024");
    assert_eq!(body["cgpa"], "8.12");

    let semesters = body["semester_results"].as_object().unwrap();
    assert_eq!(semesters.len(), 2);
    let labels: Vec<&String> = semesters.keys().collect();
    assert_eq!(labels, vec!["Semester 1", "Semester 2"]);
    assert_eq!(semesters["Semester 1"]["sgpa"], "8.1");
    assert_eq!(semesters["Semester 2"]["courses"].as_array().unwrap().len(), 1);
    assert_eq!(semesters["Semester 2"]["courses"][0]["code"], "CS201");

    // No credential material ever reaches the trace
    let trace = body["debug_info"].to_string();
    assert!(!trace.contains("s3cret"));
    assert!(!trace.contains("anjali.menon"));
    assert_eq!(app.sessions.created(), 1);
}

#[tokio::test]
async fn test_no_semester_links_yields_empty_mapping() {
    let app = create_test_app(0).await;

    let response = app
        .server
        .post("/get-ktu-data")
        .json(&json!({ "username": "TVE20CS042", "password": "s3cret" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert!(body["semester_results"].as_object().unwrap().is_empty());

    let entry = trace_entry(&body, "debug_info", "semester_links").unwrap();
    assert!(entry["notes"]
        .as_str()
        .unwrap()
        .contains("discovered 0 semester links"));
}

#[tokio::test]
async fn test_session_bounce_mid_crawl_returns_401() {
    let app = create_test_app(2).await;

    let response = app
        .server
        .post("/get-ktu-data")
        .json(&json!({ "username": "expired", "password": "pw" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["error"], "Session expired - redirected to login page");
    let entry = trace_entry(&body, "debug", "profile").unwrap();
    assert_eq!(entry["outcome"], "failed");
}

#[tokio::test]
async fn test_concurrent_crawls_do_not_share_sessions() {
    let app = create_test_app(1).await;

    let good = async {
        app.server
            .post("/get-ktu-data")
            .json(&json!({ "username": "TVE20CS042", "password": "s3cret" }))
            .await
    };
    let expired = async {
        app.server
            .post("/get-ktu-data")
            .json(&json!({ "username": "expired", "password": "pw" }))
            .await
    };

    let (good, expired) = tokio::join!(good, expired);

    good.assert_status(StatusCode::OK);
    expired.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(app.sessions.created(), 2);
}

struct PanickingSessionFactory;

impl SessionFactory for PanickingSessionFactory {
    fn create(&self) -> Result<Box<dyn PortalSession>, SessionError> {
        panic!("session pool poisoned");
    }
}

#[tokio::test]
async fn test_unclassified_panic_becomes_json_500() {
    let app = routes::build_app(
        Arc::new(Settings::new().unwrap()),
        Arc::new(PanickingSessionFactory),
    );
    let server = TestServer::new(app).unwrap();

    let response = server
        .post("/get-ktu-data")
        .json(&json!({ "username": "anjali.menon", "password": "s3cret" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Internal error"));
    assert!(body.get("debug").is_none());

    // The server keeps serving after the panic
    server.get("/health").await.assert_status_ok();
}
