use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDateTime;
use common::error::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feature::FeatureKey;
use crate::ledger::UsageLedger;
use crate::limit::Limit;

/// The feature surface of a plan: per-feature quota limits plus the
/// boolean AI-suggestions flag. A feature without an entry is not part
/// of the plan and is always denied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFeatures {
    limits: HashMap<FeatureKey, Limit>,
    pub ai_suggestions: bool,
}

impl PlanFeatures {
    pub fn new(ai_suggestions: bool) -> Self {
        PlanFeatures {
            limits: HashMap::new(),
            ai_suggestions,
        }
    }

    pub fn with(mut self, key: FeatureKey, limit: Limit) -> Self {
        self.limits.insert(key, limit);
        self
    }

    pub fn limit(&self, key: FeatureKey) -> Option<Limit> {
        self.limits.get(&key).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            other => Err(AppError::Internal(format!(
                "unknown subscription status: {}",
                other
            ))),
        }
    }
}

/// Snapshot of one subscription handed to the evaluator: the plan's
/// feature surface, the current ledger and the cycle boundaries.
///
/// The snapshot is advisory; the authoritative check for capped
/// features is the store's conditional decrement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionState {
    pub subscription_id: Uuid,
    pub user_id: Uuid,
    pub status: SubscriptionStatus,
    pub features: PlanFeatures,
    pub ledger: UsageLedger,
    pub billing_cycle_start: NaiveDateTime,
    pub next_billing_date: NaiveDateTime,
}
