use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Solo,
    Duo,
    Squad,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Solo => "Solo",
            MatchType::Duo => "Duo",
            MatchType::Squad => "Squad",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchTemplate {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: NewMatchTemplate,
    pub created_at: DateTime<Utc>,
}

/// Writable template columns; create and update both replace all of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMatchTemplate {
    pub name: String,
    pub title: String,
    pub match_type: MatchType,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub map: Option<String>,
    #[serde(default)]
    pub entry_fee: Option<Number>,
    #[serde(default)]
    pub prize_pool: Option<Number>,
    #[serde(default)]
    pub per_kill: Option<Number>,
    #[serde(default)]
    pub total_slots: Option<i64>,
    #[serde(default)]
    pub prize_details: Option<String>,
}
