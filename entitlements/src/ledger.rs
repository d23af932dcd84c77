use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::feature::FeatureKey;
use crate::limit::Limit;
use crate::state::PlanFeatures;

/// Remaining allowance for a single feature within the current billing
/// cycle. Uses the same `-1` raw encoding as [`Limit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Balance {
    Remaining(u32),
    Unlimited,
}

impl Balance {
    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            Balance::Unlimited
        } else {
            Balance::Remaining(raw as u32)
        }
    }

    pub fn raw(&self) -> i64 {
        match self {
            Balance::Remaining(n) => i64::from(*n),
            Balance::Unlimited => Limit::UNLIMITED_RAW,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Balance::Remaining(0))
    }
}

impl From<i64> for Balance {
    fn from(raw: i64) -> Self {
        Balance::from_raw(raw)
    }
}

impl From<Balance> for i64 {
    fn from(balance: Balance) -> Self {
        balance.raw()
    }
}

/// Per-feature remaining-use counters for one subscription.
///
/// Capped entries start at the plan limit, count down to exactly zero
/// and never go negative. Unlimited entries are never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLedger {
    entries: HashMap<FeatureKey, Balance>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh allowance for the start of a billing cycle: every feature
    /// the plan includes is reset to its limit.
    pub fn from_plan(features: &PlanFeatures) -> Self {
        let mut ledger = UsageLedger::new();
        for key in FeatureKey::ALL {
            if let Some(limit) = features.limit(key) {
                let balance = match limit {
                    Limit::Capped(n) => Balance::Remaining(n),
                    Limit::Unlimited => Balance::Unlimited,
                };
                ledger.entries.insert(key, balance);
            }
        }
        ledger
    }

    pub fn balance(&self, key: FeatureKey) -> Option<Balance> {
        self.entries.get(&key).copied()
    }

    pub fn set(&mut self, key: FeatureKey, balance: Balance) {
        self.entries.insert(key, balance);
    }

    pub fn entries(&self) -> impl Iterator<Item = (FeatureKey, Balance)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ledger_mirrors_plan_limits() {
        let features = PlanFeatures::new(false)
            .with(FeatureKey::RecipeGeneration, Limit::Capped(5))
            .with(FeatureKey::CommunityPost, Limit::Unlimited);

        let ledger = UsageLedger::from_plan(&features);
        assert_eq!(
            ledger.balance(FeatureKey::RecipeGeneration),
            Some(Balance::Remaining(5))
        );
        assert_eq!(
            ledger.balance(FeatureKey::CommunityPost),
            Some(Balance::Unlimited)
        );
        // features the plan does not include have no ledger entry
        assert_eq!(ledger.balance(FeatureKey::VideoGeneration), None);
    }

    #[test]
    fn raw_encoding_keeps_sentinel_distinct_from_zero() {
        assert_eq!(Balance::Unlimited.raw(), -1);
        assert_eq!(Balance::Remaining(0).raw(), 0);
        assert!(Balance::Remaining(0).is_exhausted());
        assert!(!Balance::Unlimited.is_exhausted());
    }
}
