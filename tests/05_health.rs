mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn root_returns_static_status() -> Result<()> {
    let server = common::TestServer::new();

    let (status, body) = server.get("/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "service": "prize-history-server" }));
    assert_eq!(server.store.call_count(), 0, "root must not touch the store");

    Ok(())
}

#[tokio::test]
async fn health_reports_store_state() -> Result<()> {
    let server = common::TestServer::new();

    let (status, body) = server.get("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");

    server.store.set_unavailable(Some("connection refused".into())).await;
    let (status, body) = server.get("/health").await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database_error"], "connection refused");

    Ok(())
}

#[tokio::test]
async fn unknown_route_is_404() -> Result<()> {
    let server = common::TestServer::new();
    let (status, _) = server.get("/api/unknown").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}
