use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::{MatchTemplate, NewMatchTemplate};
use crate::database::{Record, StoreHandle};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

use super::utils::parse_record_id;

const REQUIRED_FIELDS: &[&str] = &["name", "title", "match_type"];

fn parse_template(payload: Value) -> Result<NewMatchTemplate, ApiError> {
    let record = Record::from_json(payload)?.strip_system_fields();
    record.require(REQUIRED_FIELDS, "Missing required template fields")?;
    Ok(record.into_model()?)
}

/// GET /api/templates
pub async fn list(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
) -> ApiResult<Vec<MatchTemplate>> {
    let templates = store.list_templates().await?;
    Ok(ApiResponse::success(templates))
}

/// POST /api/templates
pub async fn create(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<MatchTemplate> {
    let Json(payload) = payload?;
    let template = parse_template(payload)?;

    let created = store.insert_template(template).await?;
    tracing::info!("Created template {} ({})", created.id, created.fields.name);
    Ok(ApiResponse::created(created))
}

/// PUT /api/templates/:id - Full replacement, validated like create
pub async fn update(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<MatchTemplate> {
    let id = parse_record_id(&id)?;
    let Json(payload) = payload?;
    let template = parse_template(payload)?;

    let updated = store.update_template(id, template).await?;
    tracing::info!("Updated template {}", updated.id);
    Ok(ApiResponse::success(updated))
}

/// DELETE /api/templates/:id
pub async fn delete(
    Extension(StoreHandle(store)): Extension<StoreHandle>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_record_id(&id)?;
    store.delete_template(id).await?;
    tracing::info!("Deleted template {}", id);
    Ok(ApiResponse::success(json!({
        "success": true,
        "message": "Template deleted successfully"
    })))
}
