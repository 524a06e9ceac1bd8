//! PostgreSQL schema for the three collections.
//!
//! `config` and `winners` are `jsonb`; the GIN index on `winners` backs the
//! by-user containment lookup (`winners @> '[{"uid": ...}]'`).

use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;

pub const SCHEMA_SQL: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS prize_rules (
    id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name        TEXT NOT NULL,
    "type"      TEXT NOT NULL CHECK ("type" IN ('equal_share', 'rank_kill', 'fixed_list')),
    config      JSONB NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)"#,
    r#"
CREATE TABLE IF NOT EXISTS match_templates (
    id            UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name          TEXT NOT NULL,
    title         TEXT NOT NULL,
    match_type    TEXT NOT NULL CHECK (match_type IN ('Solo', 'Duo', 'Squad')),
    category      TEXT,
    map           TEXT,
    entry_fee     DOUBLE PRECISION,
    prize_pool    DOUBLE PRECISION,
    per_kill      DOUBLE PRECISION,
    total_slots   BIGINT,
    prize_details TEXT,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now()
)"#,
    r#"
CREATE TABLE IF NOT EXISTS match_history (
    id            UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    match_id      TEXT NOT NULL,
    rule_id       TEXT,
    title         TEXT,
    completed_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
    winners       JSONB NOT NULL DEFAULT '[]'::jsonb
)"#,
    "CREATE INDEX IF NOT EXISTS idx_prize_rules_created_at ON prize_rules (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_match_templates_created_at ON match_templates (created_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_match_history_completed_at ON match_history (completed_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_match_history_winners ON match_history USING GIN (winners jsonb_path_ops)",
];

/// Create tables and indexes that do not exist yet
pub async fn apply(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA_SQL {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Applied {} schema statements", SCHEMA_SQL.len());
    Ok(())
}
