pub mod evaluator;
pub mod feature;
pub mod ledger;
pub mod limit;
pub mod memory;
pub mod state;
pub mod store;

pub use evaluator::Entitlements;
pub use feature::FeatureKey;
pub use ledger::{Balance, UsageLedger};
pub use limit::Limit;
pub use memory::MemoryLedgerStore;
pub use state::{PlanFeatures, SubscriptionState, SubscriptionStatus};
pub use store::{DecrementOutcome, LedgerStore};
