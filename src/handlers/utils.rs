use uuid::Uuid;

use crate::config::HistoryConfig;
use crate::error::ApiError;

/// Parse the `:id` path segment
pub fn parse_record_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid id '{}'", raw)))
}

/// Resolve the `limit` query parameter: default when absent or blank,
/// 400 when not a non-negative integer, capped at `max_limit`
pub fn resolve_limit(raw: Option<&str>, config: &HistoryConfig) -> Result<i64, ApiError> {
    let limit = match raw.map(str::trim) {
        None | Some("") => config.default_limit,
        Some(value) => match value.parse::<i64>() {
            Ok(n) if n >= 0 => n,
            _ => return Err(ApiError::bad_request(format!("Invalid limit '{}'", value))),
        },
    };

    Ok(match config.max_limit {
        Some(max) => limit.min(max),
        None => limit,
    })
}
