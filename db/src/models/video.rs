use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::types::JsonValue;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Video {
    pub id: Uuid,
    pub author_id: Uuid,
    pub recipe_id: Option<Uuid>,
    pub title: String,
    pub storyboard: JsonValue,
    pub created_at: NaiveDateTime,
}
