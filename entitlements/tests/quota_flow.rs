//! End-to-end quota behavior against the in-memory ledger store:
//! capped exhaustion, the unlimited sentinel, cycle rollover and
//! concurrent consumption.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use common::error::AppError;
use entitlements::{
    Balance, Entitlements, FeatureKey, Limit, MemoryLedgerStore, PlanFeatures, SubscriptionState,
    SubscriptionStatus, UsageLedger,
};
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn free_plan() -> PlanFeatures {
    PlanFeatures::new(false)
        .with(FeatureKey::RecipeGeneration, Limit::Capped(5))
        .with(FeatureKey::VideoGeneration, Limit::Capped(1))
        .with(FeatureKey::CommunityPost, Limit::Capped(10))
        .with(FeatureKey::CommunityComment, Limit::Capped(20))
}

fn premium_plan() -> PlanFeatures {
    PlanFeatures::new(true)
        .with(FeatureKey::RecipeGeneration, Limit::Unlimited)
        .with(FeatureKey::VideoGeneration, Limit::Unlimited)
        .with(FeatureKey::CommunityPost, Limit::Unlimited)
        .with(FeatureKey::CommunityComment, Limit::Unlimited)
}

fn subscription(features: PlanFeatures) -> SubscriptionState {
    let ledger = UsageLedger::from_plan(&features);
    SubscriptionState {
        subscription_id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        status: SubscriptionStatus::Active,
        features,
        ledger,
        billing_cycle_start: date(2025, 3, 1),
        next_billing_date: date(2025, 4, 1),
    }
}

fn engine_with(state: &SubscriptionState) -> Entitlements<MemoryLedgerStore> {
    let store = MemoryLedgerStore::new();
    store.insert(state);
    Entitlements::new(store)
}

#[tokio::test]
async fn capped_feature_permits_exactly_the_limit() {
    let mut state = subscription(free_plan());
    let ents = engine_with(&state);

    for used in 1..=5u32 {
        let ledger = ents
            .consume(&state, FeatureKey::RecipeGeneration)
            .await
            .unwrap();
        assert_eq!(
            ledger.balance(FeatureKey::RecipeGeneration),
            Some(Balance::Remaining(5 - used))
        );
        state.ledger = ledger;
    }

    // the sixth call must fail and the balance must stay at zero
    let err = ents
        .consume(&state, FeatureKey::RecipeGeneration)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::QuotaExceeded(_)));
    assert_eq!(
        ents.store()
            .balance(state.subscription_id, FeatureKey::RecipeGeneration),
        Some(Balance::Remaining(0))
    );
}

#[tokio::test]
async fn unlimited_feature_never_mutates_the_ledger() {
    let state = subscription(premium_plan());
    let ents = engine_with(&state);

    for _ in 0..1000 {
        let ledger = ents
            .consume(&state, FeatureKey::CommunityPost)
            .await
            .unwrap();
        assert_eq!(
            ledger.balance(FeatureKey::CommunityPost),
            Some(Balance::Unlimited)
        );
    }

    let stored = ents
        .store()
        .balance(state.subscription_id, FeatureKey::CommunityPost)
        .unwrap();
    assert_eq!(stored, Balance::Unlimited);
    assert_eq!(stored.raw(), -1);
}

#[tokio::test]
async fn rollover_restores_the_full_allowance() {
    let mut state = subscription(free_plan());
    let ents = engine_with(&state);

    for _ in 0..5 {
        state.ledger = ents
            .consume(&state, FeatureKey::RecipeGeneration)
            .await
            .unwrap();
    }
    assert!(!ents.can_consume(&state, FeatureKey::RecipeGeneration));

    let rolled = ents
        .rollover_if_due(&state, date(2025, 4, 2))
        .await
        .unwrap()
        .expect("cycle boundary crossed");
    assert_eq!(
        rolled.ledger.balance(FeatureKey::RecipeGeneration),
        Some(Balance::Remaining(5))
    );
    assert_eq!(rolled.next_billing_date, date(2025, 5, 1));
    assert!(ents.can_consume(&rolled, FeatureKey::RecipeGeneration));
}

#[tokio::test]
async fn rollover_is_idempotent_for_a_fixed_now() {
    let state = subscription(free_plan());
    let ents = engine_with(&state);
    let now = date(2025, 4, 2);

    let first = ents
        .rollover_if_due(&state, now)
        .await
        .unwrap()
        .expect("rollover due");
    let after_first = ents.store().next_billing_date(state.subscription_id);

    // second call from the stale snapshot computes the same cycle but
    // the guarded write must not apply twice
    let second = ents
        .rollover_if_due(&state, now)
        .await
        .unwrap()
        .expect("still past the stale snapshot's boundary");
    assert_eq!(first.next_billing_date, second.next_billing_date);
    assert_eq!(
        ents.store().next_billing_date(state.subscription_id),
        after_first
    );

    // and from the rolled snapshot the rollover is no longer due
    assert!(ents.rollover_if_due(&first, now).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_consumers_cannot_double_spend_the_last_use() {
    let mut state = subscription(free_plan());
    state
        .ledger
        .set(FeatureKey::VideoGeneration, Balance::Remaining(1));
    let ents = Arc::new(engine_with(&state));

    let mut handles = Vec::new();
    for _ in 0..2 {
        let ents = Arc::clone(&ents);
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            ents.consume(&state, FeatureKey::VideoGeneration).await
        }));
    }

    let mut successes = 0;
    let mut quota_errors = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::QuotaExceeded(_)) => quota_errors += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(quota_errors, 1);
    assert_eq!(
        ents.store()
            .balance(state.subscription_id, FeatureKey::VideoGeneration),
        Some(Balance::Remaining(0))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn many_concurrent_consumers_respect_the_cap() {
    let mut state = subscription(free_plan());
    state
        .ledger
        .set(FeatureKey::CommunityComment, Balance::Remaining(7));
    let ents = Arc::new(engine_with(&state));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let ents = Arc::clone(&ents);
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            ents.consume(&state, FeatureKey::CommunityComment).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 7);
    assert_eq!(
        ents.store()
            .balance(state.subscription_id, FeatureKey::CommunityComment),
        Some(Balance::Remaining(0))
    );
}

#[tokio::test]
async fn consuming_a_missing_subscription_is_not_found() {
    let state = subscription(free_plan());
    // store never saw this subscription
    let ents = Entitlements::new(MemoryLedgerStore::new());

    let err = ents
        .consume(&state, FeatureKey::RecipeGeneration)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn feature_keys_reject_unknown_strings() {
    assert!(matches!(
        FeatureKey::from_str("meal_plan_export"),
        Err(AppError::UnknownFeature(_))
    ));
}
