use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Number, Value};
use sqlx::{postgres::PgRow, types::Json, PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{
    MatchHistoryLog, MatchTemplate, NewMatchHistoryLog, NewMatchTemplate, NewPrizeRule, PrizeRule,
};
use super::store::PrizeStore;

/// `PrizeStore` backed by PostgreSQL. Rows are read back through
/// `row_to_json` and decoded into the typed models, so only the model's
/// columns reach the client and a row that does not fit the model is an error.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn decode<T: DeserializeOwned>(row: PgRow) -> Result<T, DatabaseError> {
    let value: Value = row.try_get("row")?;
    Ok(serde_json::from_value(value)?)
}

fn decode_all<T: DeserializeOwned>(rows: Vec<PgRow>) -> Result<Vec<T>, DatabaseError> {
    rows.into_iter().map(decode).collect()
}

fn amount(n: &Option<Number>) -> Option<f64> {
    n.as_ref().and_then(Number::as_f64)
}

#[async_trait]
impl PrizeStore for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }

    async fn list_rules(&self) -> Result<Vec<PrizeRule>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT row_to_json(t) AS row FROM prize_rules t ORDER BY t.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        decode_all(rows)
    }

    async fn insert_rule(&self, rule: NewPrizeRule) -> Result<PrizeRule, DatabaseError> {
        let row = sqlx::query(
            r#"WITH inserted AS (
                INSERT INTO prize_rules (name, "type", config) VALUES ($1, $2, $3) RETURNING *
            )
            SELECT row_to_json(inserted) AS row FROM inserted"#,
        )
        .bind(&rule.name)
        .bind(rule.rule.kind())
        .bind(Json(rule.rule.config_value()?))
        .fetch_one(&self.pool)
        .await?;
        decode(row)
    }

    async fn update_rule(&self, id: Uuid, rule: NewPrizeRule) -> Result<PrizeRule, DatabaseError> {
        let row = sqlx::query(
            r#"WITH updated AS (
                UPDATE prize_rules SET name = $2, "type" = $3, config = $4 WHERE id = $1 RETURNING *
            )
            SELECT row_to_json(updated) AS row FROM updated"#,
        )
        .bind(id)
        .bind(&rule.name)
        .bind(rule.rule.kind())
        .bind(Json(rule.rule.config_value()?))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => decode(row),
            None => Err(DatabaseError::NotFound(format!("Rule {} not found", id))),
        }
    }

    async fn delete_rule(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM prize_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!("Deleted {} prize_rules row(s) for {}", result.rows_affected(), id);
        Ok(())
    }

    async fn list_templates(&self) -> Result<Vec<MatchTemplate>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT row_to_json(t) AS row FROM match_templates t ORDER BY t.created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        decode_all(rows)
    }

    async fn insert_template(
        &self,
        template: NewMatchTemplate,
    ) -> Result<MatchTemplate, DatabaseError> {
        let row = sqlx::query(
            r#"WITH inserted AS (
                INSERT INTO match_templates
                    (name, title, match_type, category, map, entry_fee, prize_pool, per_kill, total_slots, prize_details)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING *
            )
            SELECT row_to_json(inserted) AS row FROM inserted"#,
        )
        .bind(&template.name)
        .bind(&template.title)
        .bind(template.match_type.as_str())
        .bind(&template.category)
        .bind(&template.map)
        .bind(amount(&template.entry_fee))
        .bind(amount(&template.prize_pool))
        .bind(amount(&template.per_kill))
        .bind(template.total_slots)
        .bind(&template.prize_details)
        .fetch_one(&self.pool)
        .await?;
        decode(row)
    }

    async fn update_template(
        &self,
        id: Uuid,
        template: NewMatchTemplate,
    ) -> Result<MatchTemplate, DatabaseError> {
        let row = sqlx::query(
            r#"WITH updated AS (
                UPDATE match_templates SET
                    name = $2, title = $3, match_type = $4, category = $5, map = $6,
                    entry_fee = $7, prize_pool = $8, per_kill = $9, total_slots = $10, prize_details = $11
                WHERE id = $1
                RETURNING *
            )
            SELECT row_to_json(updated) AS row FROM updated"#,
        )
        .bind(id)
        .bind(&template.name)
        .bind(&template.title)
        .bind(template.match_type.as_str())
        .bind(&template.category)
        .bind(&template.map)
        .bind(amount(&template.entry_fee))
        .bind(amount(&template.prize_pool))
        .bind(amount(&template.per_kill))
        .bind(template.total_slots)
        .bind(&template.prize_details)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => decode(row),
            None => Err(DatabaseError::NotFound(format!("Template {} not found", id))),
        }
    }

    async fn delete_template(&self, id: Uuid) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM match_templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        debug!("Deleted {} match_templates row(s) for {}", result.rows_affected(), id);
        Ok(())
    }

    async fn list_history(&self, limit: i64) -> Result<Vec<MatchHistoryLog>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT row_to_json(t) AS row FROM match_history t ORDER BY t.completed_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        decode_all(rows)
    }

    async fn list_history_for_user(
        &self,
        uid: &str,
        limit: i64,
    ) -> Result<Vec<MatchHistoryLog>, DatabaseError> {
        let rows = sqlx::query(
            r#"SELECT row_to_json(t) AS row FROM match_history t
            WHERE t.winners @> $1
            ORDER BY t.completed_at DESC
            LIMIT $2"#,
        )
        .bind(Json(json!([{ "uid": uid }])))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        decode_all(rows)
    }

    async fn insert_history(
        &self,
        log: NewMatchHistoryLog,
    ) -> Result<MatchHistoryLog, DatabaseError> {
        let row = sqlx::query(
            r#"WITH inserted AS (
                INSERT INTO match_history (match_id, rule_id, title, completed_at, winners)
                VALUES ($1, $2, $3, COALESCE($4, now()), $5)
                RETURNING *
            )
            SELECT row_to_json(inserted) AS row FROM inserted"#,
        )
        .bind(&log.match_id)
        .bind(&log.rule_id)
        .bind(&log.title)
        .bind(log.completed_at)
        .bind(Json(&log.winners))
        .fetch_one(&self.pool)
        .await?;
        decode(row)
    }
}
