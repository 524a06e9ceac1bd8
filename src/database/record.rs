use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Fields assigned by the store, never accepted from API input
const SYSTEM_FIELDS: &[&str] = &["id", "created_at"];

/// Errors that can occur while shaping a request body into a model
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid JSON format: {0}")]
    InvalidJson(String),
    #[error("{message}: {}", .fields.join(", "))]
    MissingRequiredFields {
        message: String,
        fields: Vec<String>,
    },
    #[error("Invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
    #[error("{0}")]
    InvalidShape(String),
}

/// A write body as received from the API, before it becomes a typed model
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create record from API input JSON; only objects are accepted
    pub fn from_json(json: Value) -> Result<Self, RecordError> {
        match json {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(RecordError::InvalidJson("Expected JSON object".to_string())),
        }
    }

    /// Drop client-supplied system fields so the path id governs the target row
    pub fn strip_system_fields(mut self) -> Self {
        for field in SYSTEM_FIELDS {
            if self.fields.remove(*field).is_some() {
                tracing::debug!("Ignoring client-supplied system field '{}'", field);
            }
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Every listed field must be present and truthy
    pub fn require(&self, fields: &[&str], message: &str) -> Result<(), RecordError> {
        let missing: Vec<String> = fields
            .iter()
            .filter(|field| !self.get(field).map(is_truthy).unwrap_or(false))
            .map(|field| field.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RecordError::MissingRequiredFields {
                message: message.to_string(),
                fields: missing,
            })
        }
    }

    /// Deserialize the remaining fields into a typed write model
    pub fn into_model<T: DeserializeOwned>(self) -> Result<T, RecordError> {
        serde_json::from_value(Value::Object(self.fields))
            .map_err(|e| RecordError::InvalidShape(e.to_string()))
    }
}

/// Loose truthiness as used by the API clients: null, false, 0, NaN and ""
/// are falsy; arrays and objects are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
