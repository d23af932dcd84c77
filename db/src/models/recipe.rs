use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::types::JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub summary: String,
    pub ingredients: JsonValue,
    pub steps: JsonValue,
    pub created_at: NaiveDateTime,
}
