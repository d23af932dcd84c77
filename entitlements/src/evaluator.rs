use chrono::{Months, NaiveDateTime};
use common::error::{AppError, Res};

use crate::feature::FeatureKey;
use crate::ledger::{Balance, UsageLedger};
use crate::limit::Limit;
use crate::state::{SubscriptionState, SubscriptionStatus};
use crate::store::{DecrementOutcome, LedgerStore};

/// The entitlement evaluator. Decides whether a quota-gated action is
/// permitted under a subscription's plan and usage state, and applies
/// consumption through the store's conditional decrement.
pub struct Entitlements<S> {
    store: S,
}

impl<S: LedgerStore> Entitlements<S> {
    pub fn new(store: S) -> Self {
        Entitlements { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Pure pre-check over the snapshot. Denies on a non-active
    /// subscription, a feature the plan does not include, or an
    /// exhausted capped balance. Unlimited features always pass.
    pub fn can_consume(&self, state: &SubscriptionState, feature: FeatureKey) -> bool {
        self.check(state, feature).is_ok()
    }

    /// Like [`Self::can_consume`] but reports why a consumption would
    /// be denied: `Forbidden` when the plan or status rules it out,
    /// `QuotaExceeded` when the cycle allowance is spent.
    pub fn check(&self, state: &SubscriptionState, feature: FeatureKey) -> Res<()> {
        if state.status != SubscriptionStatus::Active {
            return Err(AppError::Forbidden(format!(
                "subscription is {}, not active",
                state.status.as_str()
            )));
        }
        match state.features.limit(feature) {
            None => Err(AppError::Forbidden(format!(
                "plan does not include {}",
                feature
            ))),
            Some(Limit::Unlimited) => Ok(()),
            Some(Limit::Capped(_)) => match state.ledger.balance(feature) {
                Some(balance) if !balance.is_exhausted() => Ok(()),
                _ => Err(AppError::QuotaExceeded(format!(
                    "{} allowance used up for this billing cycle",
                    feature
                ))),
            },
        }
    }

    /// Consumes one use of `feature` and returns the resulting ledger.
    ///
    /// This is the only ledger mutator. Capped features are spent via a
    /// single conditional decrement in the store, so two concurrent
    /// calls against a balance of one can never both succeed. Unlimited
    /// features are permitted without touching the store.
    pub async fn consume(
        &self,
        state: &SubscriptionState,
        feature: FeatureKey,
    ) -> Res<UsageLedger> {
        if state.status != SubscriptionStatus::Active {
            return Err(AppError::Forbidden(format!(
                "subscription is {}, not active",
                state.status.as_str()
            )));
        }

        match state.features.limit(feature) {
            None => Err(AppError::Forbidden(format!(
                "plan does not include {}",
                feature
            ))),
            // never mutated, always permitted
            Some(Limit::Unlimited) => Ok(state.ledger.clone()),
            Some(Limit::Capped(_)) => {
                let outcome = self
                    .store
                    .decrement_if_positive(state.subscription_id, feature)
                    .await?;
                match outcome {
                    DecrementOutcome::Decremented { remaining } => {
                        let mut ledger = state.ledger.clone();
                        ledger.set(feature, Balance::Remaining(remaining));
                        Ok(ledger)
                    }
                    DecrementOutcome::Exhausted => Err(AppError::QuotaExceeded(format!(
                        "{} allowance used up for this billing cycle",
                        feature
                    ))),
                    DecrementOutcome::Missing => Err(AppError::NotFound(
                        "subscription no longer exists".to_string(),
                    )),
                }
            }
        }
    }

    /// Resets the ledger to the plan limits when the billing cycle has
    /// rolled over, advancing `next_billing_date` in whole months until
    /// it lies in the future.
    ///
    /// Returns `None` when no boundary was crossed. Idempotent for a
    /// fixed `now`: the store applies the reset only when the persisted
    /// `next_billing_date` still matches the snapshot, so a concurrent
    /// rollover for the same boundary writes at most once. Losing that
    /// race is not an error; both writers compute the same cycle.
    pub async fn rollover_if_due(
        &self,
        state: &SubscriptionState,
        now: NaiveDateTime,
    ) -> Res<Option<SubscriptionState>> {
        if now < state.next_billing_date {
            return Ok(None);
        }

        let mut next = state.next_billing_date;
        while next <= now {
            next = next
                .checked_add_months(Months::new(1))
                .ok_or_else(|| AppError::Internal("billing date overflow".to_string()))?;
        }
        let cycle_start = next
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| AppError::Internal("billing date underflow".to_string()))?;

        let fresh = UsageLedger::from_plan(&state.features);
        let applied = self
            .store
            .apply_rollover(
                state.subscription_id,
                &fresh,
                cycle_start,
                next,
                state.next_billing_date,
            )
            .await?;
        if !applied {
            log::debug!(
                "rollover for subscription {} already applied by a concurrent request",
                state.subscription_id
            );
        }

        let mut rolled = state.clone();
        rolled.ledger = fresh;
        rolled.billing_cycle_start = cycle_start;
        rolled.next_billing_date = next;
        Ok(Some(rolled))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::*;
    use crate::memory::MemoryLedgerStore;
    use crate::state::PlanFeatures;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn state_with(features: PlanFeatures, status: SubscriptionStatus) -> SubscriptionState {
        let ledger = UsageLedger::from_plan(&features);
        SubscriptionState {
            subscription_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status,
            features,
            ledger,
            billing_cycle_start: date(2025, 3, 1),
            next_billing_date: date(2025, 4, 1),
        }
    }

    fn evaluator() -> Entitlements<MemoryLedgerStore> {
        Entitlements::new(MemoryLedgerStore::new())
    }

    #[test]
    fn denies_features_outside_the_plan() {
        let features = PlanFeatures::new(false).with(FeatureKey::RecipeGeneration, Limit::Capped(5));
        let state = state_with(features, SubscriptionStatus::Active);
        let ents = evaluator();

        assert!(ents.can_consume(&state, FeatureKey::RecipeGeneration));
        assert!(!ents.can_consume(&state, FeatureKey::VideoGeneration));
    }

    #[test]
    fn denies_non_active_subscriptions() {
        let features = PlanFeatures::new(false).with(FeatureKey::RecipeGeneration, Limit::Unlimited);
        for status in [SubscriptionStatus::PastDue, SubscriptionStatus::Canceled] {
            let state = state_with(features.clone(), status);
            assert!(!evaluator().can_consume(&state, FeatureKey::RecipeGeneration));
        }
    }

    #[test]
    fn exhausted_balance_denies_but_unlimited_passes() {
        let features = PlanFeatures::new(false)
            .with(FeatureKey::RecipeGeneration, Limit::Capped(3))
            .with(FeatureKey::CommunityPost, Limit::Unlimited);
        let mut state = state_with(features, SubscriptionStatus::Active);
        state
            .ledger
            .set(FeatureKey::RecipeGeneration, Balance::Remaining(0));

        let ents = evaluator();
        assert!(!ents.can_consume(&state, FeatureKey::RecipeGeneration));
        assert!(ents.can_consume(&state, FeatureKey::CommunityPost));
    }

    #[tokio::test]
    async fn rollover_is_noop_before_the_boundary() {
        let features = PlanFeatures::new(false).with(FeatureKey::RecipeGeneration, Limit::Capped(5));
        let state = state_with(features, SubscriptionStatus::Active);
        let ents = evaluator();
        ents.store().insert(&state);

        let rolled = ents
            .rollover_if_due(&state, date(2025, 3, 20))
            .await
            .unwrap();
        assert!(rolled.is_none());
    }

    #[tokio::test]
    async fn rollover_skips_whole_missed_cycles() {
        let features = PlanFeatures::new(false).with(FeatureKey::RecipeGeneration, Limit::Capped(5));
        let state = state_with(features, SubscriptionStatus::Active);
        let ents = evaluator();
        ents.store().insert(&state);

        // three cycle boundaries elapsed since next_billing_date
        let rolled = ents
            .rollover_if_due(&state, date(2025, 6, 10))
            .await
            .unwrap()
            .expect("rollover due");
        assert_eq!(rolled.next_billing_date, date(2025, 7, 1));
        assert_eq!(rolled.billing_cycle_start, date(2025, 6, 1));
    }

    #[tokio::test]
    async fn rollover_exactly_on_the_boundary_advances_one_month() {
        let features = PlanFeatures::new(false).with(FeatureKey::RecipeGeneration, Limit::Capped(5));
        let state = state_with(features, SubscriptionStatus::Active);
        let ents = evaluator();
        ents.store().insert(&state);

        let rolled = ents
            .rollover_if_due(&state, date(2025, 4, 1))
            .await
            .unwrap()
            .expect("rollover due");
        assert_eq!(rolled.next_billing_date, date(2025, 5, 1));
    }
}
