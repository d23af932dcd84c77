use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct UsageEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subscription_id: Uuid,
    pub feature: String,
    pub created_at: NaiveDateTime,
}
