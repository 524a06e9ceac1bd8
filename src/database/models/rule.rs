use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::database::record::RecordError;

/// Prize rule as stored, `type` and `config` flattened alongside the row fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeRule {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub rule: RuleConfig,
    pub created_at: DateTime<Utc>,
}

/// Write model for create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrizeRule {
    pub name: String,
    #[serde(flatten)]
    pub rule: RuleConfig,
}

/// One `config` shape per `type` tag. Config keys outside the shape are
/// rejected rather than dropped, so a stored `config` is always the submitted one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum RuleConfig {
    EqualShare(EqualShareConfig),
    RankKill(RankKillConfig),
    FixedList(FixedListConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EqualShareConfig {
    pub total_prize: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RankKillConfig {
    pub per_kill: Number,
    /// Keyed by rank as a string ("1" is first place)
    pub rank_rewards: BTreeMap<String, Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedListConfig {
    /// Index 0 is rank 1
    pub prizes: Vec<Number>,
}

impl RuleConfig {
    /// Value stored in the `type` column
    pub fn kind(&self) -> &'static str {
        match self {
            RuleConfig::EqualShare(_) => "equal_share",
            RuleConfig::RankKill(_) => "rank_kill",
            RuleConfig::FixedList(_) => "fixed_list",
        }
    }

    /// Value stored in the `config` column
    pub fn config_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            RuleConfig::EqualShare(config) => serde_json::to_value(config),
            RuleConfig::RankKill(config) => serde_json::to_value(config),
            RuleConfig::FixedList(config) => serde_json::to_value(config),
        }
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        match self {
            RuleConfig::EqualShare(config) => {
                non_negative("config.total_prize", &config.total_prize)
            }
            RuleConfig::RankKill(config) => {
                non_negative("config.per_kill", &config.per_kill)?;
                for (rank, reward) in &config.rank_rewards {
                    match rank.parse::<u32>() {
                        Ok(r) if r >= 1 => {}
                        _ => {
                            return Err(RecordError::InvalidField {
                                field: format!("config.rank_rewards.{}", rank),
                                reason: "rank must be a positive integer".to_string(),
                            })
                        }
                    }
                    non_negative(&format!("config.rank_rewards.{}", rank), reward)?;
                }
                Ok(())
            }
            RuleConfig::FixedList(config) => {
                for (index, prize) in config.prizes.iter().enumerate() {
                    non_negative(&format!("config.prizes.{}", index), prize)?;
                }
                Ok(())
            }
        }
    }
}

fn non_negative(field: &str, amount: &Number) -> Result<(), RecordError> {
    match amount.as_f64() {
        Some(v) if v >= 0.0 => Ok(()),
        _ => Err(RecordError::InvalidField {
            field: field.to_string(),
            reason: "amount must be a non-negative number".to_string(),
        }),
    }
}
