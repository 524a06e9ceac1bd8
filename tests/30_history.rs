mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use prize_history_server::config::HistoryConfig;

use common::{str_field, TestServer};

fn log(match_id: &str, day: u32, winners: &[&str]) -> Value {
    let winners: Vec<Value> = winners
        .iter()
        .enumerate()
        .map(|(i, uid)| {
            json!({
                "uid": uid,
                "amount": 550,
                "breakdown": "Rank 1 (500) + 5 Kills (50)",
                "position": i + 1
            })
        })
        .collect();
    json!({
        "match_id": match_id,
        "rule_id": "8a6e0804-2bd0-4672-b79d-d97027f9071a",
        "title": format!("Match {}", match_id),
        "completed_at": format!("2026-10-{:02}T18:00:00Z", day),
        "winners": winners
    })
}

fn match_ids(body: &Value) -> Vec<&str> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|h| str_field(h, "match_id"))
        .collect()
}

#[tokio::test]
async fn create_history_log() -> Result<()> {
    let server = TestServer::new();

    let (status, body) = server.post("/api/history", log("m1", 1, &["u1", "u2"])).await?;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
    assert_eq!(body["match_id"], "m1");
    assert_eq!(body["winners"].as_array().unwrap().len(), 2);
    assert_eq!(body["winners"][0]["amount"], 550);
    assert!(!str_field(&body, "id").is_empty());

    Ok(())
}

#[tokio::test]
async fn empty_winners_array_is_accepted() -> Result<()> {
    let server = TestServer::new();

    let (status, body) = server
        .post("/api/history", json!({ "match_id": "m1", "winners": [] }))
        .await?;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
    assert_eq!(body["winners"], json!([]));
    assert!(!str_field(&body, "completed_at").is_empty());

    Ok(())
}

#[tokio::test]
async fn create_requires_match_id_and_winners() -> Result<()> {
    let server = TestServer::new();

    let cases = [
        json!({ "winners": [] }),
        json!({ "match_id": "", "winners": [] }),
        json!({ "match_id": "m1" }),
        json!({ "match_id": "m1", "winners": null }),
    ];
    for body in cases {
        let (status, res) = server.post("/api/history", body.clone()).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {} -> {}", body, res);
        assert_eq!(res["error"], "Invalid history log");
    }

    assert_eq!(server.store.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn list_orders_by_completed_at_and_honours_limit() -> Result<()> {
    let server = TestServer::new();

    for day in [3, 7, 1, 5, 2, 6, 4] {
        let (status, _) = server
            .post("/api/history", log(&format!("m{}", day), day, &["u1"]))
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = server.get("/api/history?limit=5").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(match_ids(&body), vec!["m7", "m6", "m5", "m4", "m3"]);

    let (status, body) = server.get("/api/history").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 7);

    Ok(())
}

#[tokio::test]
async fn default_limit_is_twenty() -> Result<()> {
    let server = TestServer::new();

    for i in 1..=25u32 {
        let day = (i % 28) + 1;
        let (status, _) = server
            .post("/api/history", log(&format!("m{}", i), day, &["u1"]))
            .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = server.get("/api/history").await?;
    assert_eq!(body.as_array().unwrap().len(), 20);

    let (_, body) = server.get("/api/history/user/u1").await?;
    assert_eq!(body.as_array().unwrap().len(), 20);

    Ok(())
}

#[tokio::test]
async fn invalid_limit_is_rejected() -> Result<()> {
    let server = TestServer::new();

    let (status, body) = server.get("/api/history?limit=lots").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");

    let (status, _) = server.get("/api/history/user/u1?limit=-3").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(server.store.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn malformed_query_string_gets_json_error() -> Result<()> {
    let server = TestServer::new();

    for uri in ["/api/history?limit=1&limit=2", "/api/history/user/u1?limit=1&limit=2"] {
        let (status, body) = server.get(uri).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{} -> {}", uri, body);
        assert_eq!(body["code"], "BAD_REQUEST");
        assert!(body["error"].is_string());
    }

    assert_eq!(server.store.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn configured_limits_apply_over_http() -> Result<()> {
    let server = TestServer::with_history(HistoryConfig {
        default_limit: 2,
        max_limit: Some(3),
    });

    for day in 1..=6 {
        server
            .post("/api/history", log(&format!("m{}", day), day, &["u1"]))
            .await?;
    }

    let (_, body) = server.get("/api/history").await?;
    assert_eq!(match_ids(&body), vec!["m6", "m5"]);

    let (_, body) = server.get("/api/history?limit=50").await?;
    assert_eq!(match_ids(&body), vec!["m6", "m5", "m4"]);

    let (_, body) = server.get("/api/history/user/u1?limit=50").await?;
    assert_eq!(body.as_array().unwrap().len(), 3);

    Ok(())
}

#[tokio::test]
async fn by_user_returns_only_logs_with_matching_winner() -> Result<()> {
    let server = TestServer::new();

    server.post("/api/history", log("m1", 1, &["alice", "bob"])).await?;
    server.post("/api/history", log("m2", 2, &["carol"])).await?;
    server.post("/api/history", log("m3", 3, &["bob"])).await?;
    // "alice" only appears outside the winners array here
    let mut decoy = log("alice", 4, &["dave"]);
    decoy["title"] = json!("alice");
    server.post("/api/history", decoy).await?;

    let (status, body) = server.get("/api/history/user/bob").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(match_ids(&body), vec!["m3", "m1"]);

    let (_, body) = server.get("/api/history/user/alice").await?;
    assert_eq!(match_ids(&body), vec!["m1"]);

    let (_, body) = server.get("/api/history/user/bob?limit=1").await?;
    assert_eq!(match_ids(&body), vec!["m3"]);

    let (_, body) = server.get("/api/history/user/nobody").await?;
    assert_eq!(body, json!([]));

    Ok(())
}
