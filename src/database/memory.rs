use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    MatchHistoryLog, MatchTemplate, NewMatchHistoryLog, NewMatchTemplate, NewPrizeRule, PrizeRule,
};
use super::store::PrizeStore;

/// In-process `PrizeStore` with the same ordering, limit and containment
/// semantics as `PgStore`. Used for local development and the test-suite.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    /// Insertion counter; breaks timestamp ties so newer rows sort first
    seq: AtomicU64,
    calls: AtomicUsize,
    unavailable: RwLock<Option<String>>,
}

#[derive(Default)]
struct Tables {
    rules: Vec<(u64, PrizeRule)>,
    templates: Vec<(u64, MatchTemplate)>,
    history: Vec<(u64, MatchHistoryLog)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations issued so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent operation fail with `message`, or recover with `None`
    pub async fn set_unavailable(&self, message: Option<String>) {
        *self.unavailable.write().await = message;
    }

    async fn begin(&self) -> Result<(), DatabaseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.unavailable.read().await.as_ref() {
            Some(message) => Err(DatabaseError::QueryError(message.clone())),
            None => Ok(()),
        }
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }
}

/// Newest first; equal timestamps fall back to insertion order, newest first
fn newest_first<T: Clone>(
    rows: &[(u64, T)],
    key: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut sorted: Vec<&(u64, T)> = rows.iter().collect();
    sorted.sort_by(|(seq_a, a), (seq_b, b)| key(b).cmp(&key(a)).then(seq_b.cmp(seq_a)));
    sorted.into_iter().map(|(_, row)| row.clone()).collect()
}

fn take(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl PrizeStore for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        self.begin().await
    }

    async fn list_rules(&self) -> Result<Vec<PrizeRule>, DatabaseError> {
        self.begin().await?;
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.rules, |r| r.created_at))
    }

    async fn insert_rule(&self, rule: NewPrizeRule) -> Result<PrizeRule, DatabaseError> {
        self.begin().await?;
        let row = PrizeRule {
            id: Uuid::new_v4(),
            name: rule.name,
            rule: rule.rule,
            created_at: Utc::now(),
        };
        let seq = self.next_seq();
        self.tables.write().await.rules.push((seq, row.clone()));
        Ok(row)
    }

    async fn update_rule(&self, id: Uuid, rule: NewPrizeRule) -> Result<PrizeRule, DatabaseError> {
        self.begin().await?;
        let mut tables = self.tables.write().await;
        let (_, row) = tables
            .rules
            .iter_mut()
            .find(|(_, r)| r.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Rule {} not found", id)))?;
        row.name = rule.name;
        row.rule = rule.rule;
        Ok(row.clone())
    }

    async fn delete_rule(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.begin().await?;
        self.tables.write().await.rules.retain(|(_, r)| r.id != id);
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<MatchTemplate>, DatabaseError> {
        self.begin().await?;
        let tables = self.tables.read().await;
        Ok(newest_first(&tables.templates, |t| t.created_at))
    }

    async fn insert_template(
        &self,
        template: NewMatchTemplate,
    ) -> Result<MatchTemplate, DatabaseError> {
        self.begin().await?;
        let row = MatchTemplate {
            id: Uuid::new_v4(),
            fields: template,
            created_at: Utc::now(),
        };
        let seq = self.next_seq();
        self.tables.write().await.templates.push((seq, row.clone()));
        Ok(row)
    }

    async fn update_template(
        &self,
        id: Uuid,
        template: NewMatchTemplate,
    ) -> Result<MatchTemplate, DatabaseError> {
        self.begin().await?;
        let mut tables = self.tables.write().await;
        let (_, row) = tables
            .templates
            .iter_mut()
            .find(|(_, t)| t.id == id)
            .ok_or_else(|| DatabaseError::NotFound(format!("Template {} not found", id)))?;
        row.fields = template;
        Ok(row.clone())
    }

    async fn delete_template(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.begin().await?;
        self.tables.write().await.templates.retain(|(_, t)| t.id != id);
        Ok(())
    }

    async fn list_history(&self, limit: i64) -> Result<Vec<MatchHistoryLog>, DatabaseError> {
        self.begin().await?;
        let tables = self.tables.read().await;
        let mut logs = newest_first(&tables.history, |h| h.completed_at);
        logs.truncate(take(limit));
        Ok(logs)
    }

    async fn list_history_for_user(
        &self,
        uid: &str,
        limit: i64,
    ) -> Result<Vec<MatchHistoryLog>, DatabaseError> {
        self.begin().await?;
        let tables = self.tables.read().await;
        let mut logs = newest_first(&tables.history, |h| h.completed_at);
        logs.retain(|log| log.has_winner(uid));
        logs.truncate(take(limit));
        Ok(logs)
    }

    async fn insert_history(
        &self,
        log: NewMatchHistoryLog,
    ) -> Result<MatchHistoryLog, DatabaseError> {
        self.begin().await?;
        let row = MatchHistoryLog {
            id: Uuid::new_v4(),
            match_id: log.match_id,
            rule_id: log.rule_id,
            title: log.title,
            completed_at: log.completed_at.unwrap_or_else(Utc::now),
            winners: log.winners,
        };
        let seq = self.next_seq();
        self.tables.write().await.history.push((seq, row.clone()));
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{RankKillConfig, RuleConfig, Winner};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn rule(name: &str) -> NewPrizeRule {
        NewPrizeRule {
            name: name.to_string(),
            rule: RuleConfig::RankKill(RankKillConfig {
                per_kill: 10.into(),
                rank_rewards: BTreeMap::new(),
            }),
        }
    }

    fn log(match_id: &str, day: u32, uids: &[&str]) -> NewMatchHistoryLog {
        NewMatchHistoryLog {
            match_id: match_id.to_string(),
            rule_id: None,
            title: None,
            completed_at: Some(Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap()),
            winners: uids
                .iter()
                .map(|uid| Winner {
                    uid: uid.to_string(),
                    amount: 100.into(),
                    breakdown: "Rank 1 (100)".to_string(),
                    position: None,
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn rules_list_newest_first() {
        let store = MemoryStore::new();
        store.insert_rule(rule("first")).await.unwrap();
        store.insert_rule(rule("second")).await.unwrap();

        let names: Vec<String> = store
            .list_rules()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn history_orders_by_completed_at_not_insertion() {
        let store = MemoryStore::new();
        store.insert_history(log("late", 10, &["a"])).await.unwrap();
        store.insert_history(log("early", 2, &["a"])).await.unwrap();
        store.insert_history(log("middle", 5, &["b"])).await.unwrap();

        let ids: Vec<String> = store
            .list_history(10)
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.match_id)
            .collect();
        assert_eq!(ids, vec!["late", "middle", "early"]);

        let for_a = store.list_history_for_user("a", 1).await.unwrap();
        assert_eq!(for_a.len(), 1);
        assert_eq!(for_a[0].match_id, "late");
    }

    #[tokio::test]
    async fn update_missing_row_is_not_found() {
        let store = MemoryStore::new();
        let res = store.update_rule(Uuid::new_v4(), rule("x")).await;
        assert!(matches!(res, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(Some("connection refused".into())).await;
        match store.list_rules().await {
            Err(DatabaseError::QueryError(msg)) => assert_eq!(msg, "connection refused"),
            other => panic!("expected query error, got {:?}", other.map(|v| v.len())),
        }
        assert_eq!(store.call_count(), 1);
    }
}
