//! Integration tests for the BookCraft Server API

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use bookcraft_core::source::{InMemoryEntitlements, InMemoryProjectStore};
use bookcraft_core::{BookProject, ExportService};
use bookcraft_server::routes::create_router;
use bookcraft_server::state::AppState;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

fn user_header() -> HeaderName {
    HeaderName::from_static(bookcraft_server::handlers::OWNER_HEADER)
}

struct TestApp {
    server: TestServer,
    project_id: Uuid,
    ledger: Arc<InMemoryEntitlements>,
}

/// Create a test server holding one project owned by alice
async fn create_test_app() -> TestApp {
    let store = Arc::new(InMemoryProjectStore::new());
    let ledger = Arc::new(InMemoryEntitlements::new());

    let project = BookProject::new("The Arden Saga", 50, 5)
        .with_owner("alice")
        .with_outline("<h2>Chapter 1: Dawn</h2>\n<h2>Chapter 2: Dusk</h2>")
        .with_chapter(1, "# Chapter 1: Dawn\n\nThe sun rose over **Arden**.");
    let project_id = project.id;
    store.insert(project).await;

    let state = AppState::with_service(ExportService::new(store, ledger.clone()));
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");
    TestApp {
        server,
        project_id,
        ledger,
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_export_html() {
    let app = create_test_app().await;

    let response = app
        .server
        .get(&format!("/api/v1/projects/{}/export/html", app.project_id))
        .add_header(user_header(), HeaderValue::from_static("alice"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/html; charset=utf-8");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"The_Arden_Saga.html\""
    );
    let body = response.text();
    assert!(body.contains("Dusk"));
    assert!(body.contains("<strong>Arden</strong>"));
}

#[tokio::test]
async fn test_export_pdf() {
    let app = create_test_app().await;

    let response = app
        .server
        .get(&format!("/api/v1/projects/{}/export/pdf", app.project_id))
        .add_header(user_header(), HeaderValue::from_static("alice"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");
    assert!(response.as_bytes().starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_export_docx() {
    let app = create_test_app().await;
    app.ledger.record_purchase("alice").await;

    let response = app
        .server
        .get(&format!("/api/v1/projects/{}/export/docx", app.project_id))
        .add_header(user_header(), HeaderValue::from_static("alice"))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"The_Arden_Saga.docx\""
    );
    // zip local file header
    assert!(response.as_bytes().starts_with(b"PK"));
}

#[tokio::test]
async fn test_export_without_user_is_unauthorized() {
    let app = create_test_app().await;

    let response = app
        .server
        .get(&format!("/api/v1/projects/{}/export/pdf", app.project_id))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn test_export_invalid_uuid() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/api/v1/projects/not-a-uuid/export/html")
        .add_header(user_header(), HeaderValue::from_static("alice"))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_export_unknown_project() {
    let app = create_test_app().await;

    let response = app
        .server
        .get(&format!("/api/v1/projects/{}/export/docx", Uuid::new_v4()))
        .add_header(user_header(), HeaderValue::from_static("alice"))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_export_foreign_project_is_not_found() {
    let app = create_test_app().await;

    let response = app
        .server
        .get(&format!("/api/v1/projects/{}/export/html", app.project_id))
        .add_header(user_header(), HeaderValue::from_static("mallory"))
        .await;

    response.assert_status_not_found();
}
