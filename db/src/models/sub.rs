use chrono::NaiveDateTime;
use common::error::Res;
use entitlements::{Balance, FeatureKey, SubscriptionState, UsageLedger};
use serde::Serialize;
use uuid::Uuid;

use super::plan::Plan;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub status: String,
    pub billing_cycle_start: NaiveDateTime,
    pub next_billing_date: NaiveDateTime,
    pub recipe_generations_left: i32,
    pub video_generations_left: i32,
    pub community_posts_left: i32,
    pub community_comments_left: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Subscription {
    pub fn ledger(&self) -> UsageLedger {
        let mut ledger = UsageLedger::new();
        ledger.set(
            FeatureKey::RecipeGeneration,
            Balance::from_raw(i64::from(self.recipe_generations_left)),
        );
        ledger.set(
            FeatureKey::VideoGeneration,
            Balance::from_raw(i64::from(self.video_generations_left)),
        );
        ledger.set(
            FeatureKey::CommunityPost,
            Balance::from_raw(i64::from(self.community_posts_left)),
        );
        ledger.set(
            FeatureKey::CommunityComment,
            Balance::from_raw(i64::from(self.community_comments_left)),
        );
        ledger
    }

    /// Builds the evaluator's snapshot from this row and its plan.
    pub fn state(&self, plan: &Plan) -> Res<SubscriptionState> {
        Ok(SubscriptionState {
            subscription_id: self.id,
            user_id: self.user_id,
            status: self.status.parse()?,
            features: plan.features(),
            ledger: self.ledger(),
            billing_cycle_start: self.billing_cycle_start,
            next_billing_date: self.next_billing_date,
        })
    }
}
