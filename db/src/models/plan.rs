use chrono::NaiveDateTime;
use entitlements::{FeatureKey, Limit, PlanFeatures};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub currency: String,
    pub billing_interval: String,
    pub is_active: bool,
    pub recipe_generation_limit: i32,
    pub video_generation_limit: i32,
    pub community_post_limit: i32,
    pub community_comment_limit: i32,
    pub ai_suggestions: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Plan {
    /// Converts the raw limit columns into the closed feature surface.
    /// The `-1` sentinel becomes `Limit::Unlimited` here and nowhere else.
    pub fn features(&self) -> PlanFeatures {
        PlanFeatures::new(self.ai_suggestions)
            .with(
                FeatureKey::RecipeGeneration,
                Limit::from_raw(i64::from(self.recipe_generation_limit)),
            )
            .with(
                FeatureKey::VideoGeneration,
                Limit::from_raw(i64::from(self.video_generation_limit)),
            )
            .with(
                FeatureKey::CommunityPost,
                Limit::from_raw(i64::from(self.community_post_limit)),
            )
            .with(
                FeatureKey::CommunityComment,
                Limit::from_raw(i64::from(self.community_comment_limit)),
            )
    }
}
