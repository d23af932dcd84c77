use std::collections::HashMap;

use chrono::NaiveDateTime;
use common::error::{AppError, Res};
use dashmap::DashMap;
use uuid::Uuid;

use crate::feature::FeatureKey;
use crate::ledger::{Balance, UsageLedger};
use crate::state::SubscriptionState;
use crate::store::{DecrementOutcome, LedgerStore};

struct LedgerRecord {
    balances: HashMap<FeatureKey, Balance>,
    cycle_start: NaiveDateTime,
    next_billing_date: NaiveDateTime,
}

/// Ledger store backed by a sharded in-process map.
///
/// Each operation runs under the entry's shard lock, which makes the
/// decrement and the rollover the same single read-modify-write the
/// Postgres store performs with conditional UPDATEs. Backs the test
/// suites and embedded runs without a database.
#[derive(Default)]
pub struct MemoryLedgerStore {
    records: DashMap<Uuid, LedgerRecord>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscription snapshot so its ledger can be spent.
    pub fn insert(&self, state: &SubscriptionState) {
        self.records.insert(
            state.subscription_id,
            LedgerRecord {
                balances: state.ledger.entries().collect(),
                cycle_start: state.billing_cycle_start,
                next_billing_date: state.next_billing_date,
            },
        );
    }

    pub fn balance(&self, subscription_id: Uuid, feature: FeatureKey) -> Option<Balance> {
        self.records
            .get(&subscription_id)
            .and_then(|rec| rec.balances.get(&feature).copied())
    }

    pub fn next_billing_date(&self, subscription_id: Uuid) -> Option<NaiveDateTime> {
        self.records
            .get(&subscription_id)
            .map(|rec| rec.next_billing_date)
    }
}

impl LedgerStore for MemoryLedgerStore {
    async fn decrement_if_positive(
        &self,
        subscription_id: Uuid,
        feature: FeatureKey,
    ) -> Res<DecrementOutcome> {
        let mut record = match self.records.get_mut(&subscription_id) {
            Some(record) => record,
            None => return Ok(DecrementOutcome::Missing),
        };
        match record.balances.get_mut(&feature) {
            None => Ok(DecrementOutcome::Missing),
            Some(Balance::Unlimited) => Err(AppError::Internal(format!(
                "conditional decrement requested for unlimited balance {}",
                feature
            ))),
            Some(Balance::Remaining(0)) => Ok(DecrementOutcome::Exhausted),
            Some(Balance::Remaining(n)) => {
                *n -= 1;
                Ok(DecrementOutcome::Decremented { remaining: *n })
            }
        }
    }

    async fn apply_rollover(
        &self,
        subscription_id: Uuid,
        ledger: &UsageLedger,
        cycle_start: NaiveDateTime,
        next_billing_date: NaiveDateTime,
        expected_next_billing_date: NaiveDateTime,
    ) -> Res<bool> {
        let mut record = match self.records.get_mut(&subscription_id) {
            Some(record) => record,
            None => return Ok(false),
        };
        if record.next_billing_date != expected_next_billing_date {
            return Ok(false);
        }
        record.balances = ledger.entries().collect();
        record.cycle_start = cycle_start;
        record.next_billing_date = next_billing_date;
        Ok(true)
    }
}
