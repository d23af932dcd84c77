use chrono::NaiveDateTime;
use db::models::{plan::Plan, sub::Subscription, usage_event::UsageEvent};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct SubscriptionPlansResponse {
    pub plans: Vec<Plan>,
}

#[derive(Debug, Deserialize)]
pub struct UpgradeRequest {
    pub plan_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    /// Optional feature key to narrow the event list; unknown keys are
    /// rejected rather than ignored.
    pub feature: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub subscription: Subscription,
    pub plan: Plan,
}

#[derive(Debug, Serialize)]
pub struct UsageItem {
    pub feature: String,
    /// Plan limit in raw form: `-1` means unlimited.
    pub limit: i64,
    /// Remaining balance in raw form: `-1` means unlimited.
    pub remaining: i64,
}

#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub items: Vec<UsageItem>,
    pub events_this_cycle: i64,
    pub recent_events: Vec<UsageEvent>,
    pub billing_cycle_start: NaiveDateTime,
    pub next_billing_date: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct PlanLimitsRequest {
    pub recipe_generation_limit: i32,
    pub video_generation_limit: i32,
    pub community_post_limit: i32,
    pub community_comment_limit: i32,
    pub ai_suggestions: bool,
    pub is_active: bool,
}
