use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct GenerateRecipeRequest {
    pub ingredients: Vec<String>,
    pub cuisine: Option<String>,
    pub servings: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateVideoRequest {
    pub recipe_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
}
