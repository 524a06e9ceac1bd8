use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use uuid::Uuid;

/// One paid-out player inside a history log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    pub uid: String,
    pub amount: Number,
    /// Human readable, e.g. "Rank 1 (500) + 5 Kills (50)"
    pub breakdown: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

/// Per-player match outcome as produced by result ingestion.
/// Consumed by the Admin App; this service never persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantResult {
    pub uid: String,
    pub username: String,
    /// None for solo matches
    #[serde(rename = "teamId", default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub kills: u32,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchHistoryLog {
    pub id: Uuid,
    pub match_id: String,
    pub rule_id: Option<String>,
    pub title: Option<String>,
    pub completed_at: DateTime<Utc>,
    pub winners: Vec<Winner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMatchHistoryLog {
    pub match_id: String,
    #[serde(default)]
    pub rule_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// Defaults to the store's clock when omitted
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub winners: Vec<Winner>,
}

impl MatchHistoryLog {
    pub fn has_winner(&self, uid: &str) -> bool {
        self.winners.iter().any(|w| w.uid == uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn participant_uses_camel_case_team_id() {
        let p: ParticipantResult = serde_json::from_value(json!({
            "uid": "u1", "username": "ace", "teamId": "t9", "kills": 4, "rank": 2
        }))
        .unwrap();
        assert_eq!(p.team_id.as_deref(), Some("t9"));
        assert_eq!(serde_json::to_value(&p).unwrap()["teamId"], "t9");
    }

    #[test]
    fn winner_position_is_optional() {
        let w: Winner = serde_json::from_value(json!({
            "uid": "u1", "amount": 550, "breakdown": "Rank 1 (500) + 5 Kills (50)"
        }))
        .unwrap();
        assert_eq!(w.position, None);
        assert!(serde_json::to_value(&w).unwrap().get("position").is_none());
    }
}
