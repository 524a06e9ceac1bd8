use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::{NewPrizeRule, PrizeRule};
use crate::database::{Record, StoreHandle};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

use super::utils::parse_record_id;

const REQUIRED_FIELDS: &[&str] = &["name", "type", "config"];

/// Body shaping shared by create and update
fn parse_rule(payload: Value) -> Result<NewPrizeRule, ApiError> {
    let record = Record::from_json(payload)?.strip_system_fields();
    record.require(REQUIRED_FIELDS, "Missing defined fields")?;
    let rule: NewPrizeRule = record.into_model()?;
    rule.rule.validate()?;
    Ok(rule)
}

/// GET /api/rules - All configured rules, newest first
pub async fn list(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
) -> ApiResult<Vec<PrizeRule>> {
    let rules = store.list_rules().await?;
    Ok(ApiResponse::success(rules))
}

/// POST /api/rules - Create a new rule
pub async fn create(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PrizeRule> {
    let Json(payload) = payload?;
    let rule = parse_rule(payload)?;

    let created = store.insert_rule(rule).await?;
    tracing::info!("Created {} rule {} ({})", created.rule.kind(), created.id, created.name);
    Ok(ApiResponse::created(created))
}

/// PUT /api/rules/:id - Replace name, type and config of a rule
pub async fn update(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<PrizeRule> {
    let id = parse_record_id(&id)?;
    let Json(payload) = payload?;
    let rule = parse_rule(payload)?;

    let updated = store.update_rule(id, rule).await?;
    tracing::info!("Updated rule {}", updated.id);
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/rules/:id - Succeeds whether or not the rule existed
pub async fn delete(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_record_id(&id)?;
    store.delete_rule(id).await?;
    tracing::info!("Deleted rule {}", id);
    Ok(ApiResponse::success(json!({
        "success": true,
        "message": "Rule deleted successfully"
    })))
}
