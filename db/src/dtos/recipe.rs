use sqlx::types::JsonValue;
use uuid::Uuid;

pub struct RecipeCreateRequest {
    pub author_id: Uuid,
    pub title: String,
    pub summary: String,
    pub ingredients: JsonValue,
    pub steps: JsonValue,
}
