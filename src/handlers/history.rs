use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::config::HistoryConfig;
use crate::database::models::{MatchHistoryLog, NewMatchHistoryLog};
use crate::database::{Record, StoreHandle};
use crate::middleware::{ApiResponse, ApiResult};

use super::utils::resolve_limit;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Maximum rows to return; kept as text so bad input gets a 400 from us
    pub limit: Option<String>,
}

/// GET /api/history - Recent match history for the main app
pub async fn list(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    Extension(history): Extension<HistoryConfig>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Vec<MatchHistoryLog>> {
    let Query(query) = query?;
    let limit = resolve_limit(query.limit.as_deref(), &history)?;
    let logs = store.list_history(limit).await?;
    Ok(ApiResponse::success(logs))
}

/// GET /api/history/user/:uid - Logs in which `uid` is among the winners
pub async fn list_for_user(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    Extension(history): Extension<HistoryConfig>,
    Path(uid): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> ApiResult<Vec<MatchHistoryLog>> {
    let Query(query) = query?;
    let limit = resolve_limit(query.limit.as_deref(), &history)?;
    let logs = store.list_history_for_user(&uid, limit).await?;
    tracing::debug!("Found {} history log(s) for {}", logs.len(), uid);
    Ok(ApiResponse::success(logs))
}

/// POST /api/history - Log a completed match (called by the Admin App after distribution)
pub async fn create(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<MatchHistoryLog> {
    let Json(payload) = payload?;
    let record = Record::from_json(payload)?.strip_system_fields();
    // An empty winners array is truthy and accepted
    record.require(&["match_id", "winners"], "Invalid history log")?;
    let log: NewMatchHistoryLog = record.into_model()?;

    let created = store.insert_history(log).await?;
    tracing::info!(
        "Logged match {} with {} winner(s)",
        created.match_id,
        created.winners.len()
    );
    Ok(ApiResponse::created(created))
}
