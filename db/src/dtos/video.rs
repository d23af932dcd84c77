use sqlx::types::JsonValue;
use uuid::Uuid;

pub struct VideoCreateRequest {
    pub author_id: Uuid,
    pub recipe_id: Option<Uuid>,
    pub title: String,
    pub storyboard: JsonValue,
}
