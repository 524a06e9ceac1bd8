use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{
    MatchHistoryLog, MatchTemplate, NewMatchHistoryLog, NewMatchTemplate, NewPrizeRule, PrizeRule,
};

/// Every handler issues exactly one of these calls per request.
///
/// Lists are ordered newest first (`created_at`, or `completed_at` for
/// history). Updates return `DatabaseError::NotFound` when no row has the
/// id; deletes succeed whether or not a row existed.
#[async_trait]
pub trait PrizeStore: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;

    async fn list_rules(&self) -> Result<Vec<PrizeRule>, DatabaseError>;
    async fn insert_rule(&self, rule: NewPrizeRule) -> Result<PrizeRule, DatabaseError>;
    async fn update_rule(&self, id: Uuid, rule: NewPrizeRule) -> Result<PrizeRule, DatabaseError>;
    async fn delete_rule(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn list_templates(&self) -> Result<Vec<MatchTemplate>, DatabaseError>;
    async fn insert_template(
        &self,
        template: NewMatchTemplate,
    ) -> Result<MatchTemplate, DatabaseError>;
    async fn update_template(
        &self,
        id: Uuid,
        template: NewMatchTemplate,
    ) -> Result<MatchTemplate, DatabaseError>;
    async fn delete_template(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn list_history(&self, limit: i64) -> Result<Vec<MatchHistoryLog>, DatabaseError>;
    /// Logs whose `winners` contain an entry with this `uid`
    async fn list_history_for_user(
        &self,
        uid: &str,
        limit: i64,
    ) -> Result<Vec<MatchHistoryLog>, DatabaseError>;
    async fn insert_history(
        &self,
        log: NewMatchHistoryLog,
    ) -> Result<MatchHistoryLog, DatabaseError>;
}

/// Process-wide store handle injected into handlers as an axum extension
#[derive(Clone)]
pub struct StoreHandle(pub Arc<dyn PrizeStore>);

impl StoreHandle {
    pub fn new(store: impl PrizeStore + 'static) -> Self {
        Self(Arc::new(store))
    }
}
