use chrono::NaiveDateTime;
use common::error::Res;
use uuid::Uuid;

use crate::feature::FeatureKey;
use crate::ledger::UsageLedger;

/// Result of the conditional decrement on one ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// The guard matched; `remaining` is the post-decrement balance.
    Decremented { remaining: u32 },
    /// The balance was already at zero.
    Exhausted,
    /// The subscription (or its ledger entry) no longer exists.
    Missing,
}

/// Persistence collaborator for the evaluator.
///
/// Both operations are single atomically-applied read-modify-writes:
/// there is no separate read-then-write window in which a concurrent
/// request could double-spend a balance or re-apply a rollover.
pub trait LedgerStore {
    /// Decrements the feature's balance by one iff it is still positive.
    /// A balance never goes below zero.
    fn decrement_if_positive(
        &self,
        subscription_id: Uuid,
        feature: FeatureKey,
    ) -> impl Future<Output = Res<DecrementOutcome>> + Send;

    /// Writes the cycle reset, guarded on `expected_next_billing_date`
    /// so concurrent rollovers for the same boundary apply at most once.
    /// Returns `false` when the guard did not match.
    fn apply_rollover(
        &self,
        subscription_id: Uuid,
        ledger: &UsageLedger,
        cycle_start: NaiveDateTime,
        next_billing_date: NaiveDateTime,
        expected_next_billing_date: NaiveDateTime,
    ) -> impl Future<Output = Res<bool>> + Send;
}
