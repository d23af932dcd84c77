use serde::{Deserialize, Serialize};

/// Per-feature plan limit.
///
/// Rows and wire payloads encode "no cap" as `-1`. The sentinel is
/// converted to `Unlimited` exactly once, at the boundary, so counter
/// arithmetic never sees a negative number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Limit {
    Capped(u32),
    Unlimited,
}

impl Limit {
    pub const UNLIMITED_RAW: i64 = -1;

    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            Limit::Unlimited
        } else {
            Limit::Capped(raw as u32)
        }
    }

    pub fn raw(&self) -> i64 {
        match self {
            Limit::Capped(n) => i64::from(*n),
            Limit::Unlimited => Self::UNLIMITED_RAW,
        }
    }

    pub fn is_unlimited(&self) -> bool {
        matches!(self, Limit::Unlimited)
    }
}

impl From<i64> for Limit {
    fn from(raw: i64) -> Self {
        Limit::from_raw(raw)
    }
}

impl From<Limit> for i64 {
    fn from(limit: Limit) -> Self {
        limit.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_raw_means_unlimited() {
        assert_eq!(Limit::from_raw(-1), Limit::Unlimited);
        assert_eq!(Limit::from_raw(-7), Limit::Unlimited);
        assert_eq!(Limit::Unlimited.raw(), -1);
    }

    #[test]
    fn zero_is_a_cap_not_a_sentinel() {
        assert_eq!(Limit::from_raw(0), Limit::Capped(0));
        assert!(!Limit::from_raw(0).is_unlimited());
    }

    #[test]
    fn caps_round_trip() {
        assert_eq!(Limit::from_raw(5).raw(), 5);
        assert_eq!(Limit::from_raw(5), Limit::Capped(5));
    }
}
