use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::address::Address;

/// Ledger time in whole seconds since the UNIX epoch.
///
/// The hosting ledger supplies one well-defined `now` per operation; every
/// time-based rule (mint windows, renewal expiry) is a plain comparison
/// against it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The zero timestamp. In mint windows it means "unbounded".
    pub const ZERO: Self = Self(0);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// Wall-clock time, for callers that host the registry in a process.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self(secs)
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// `self + secs`, clamped at `u64::MAX`.
    pub const fn saturating_add(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}s)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// The caller identity and current time of a single operation.
///
/// Every mutating or caller-sensitive operation receives one of these
/// explicitly instead of reading ambient globals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(caller: Address, now: Timestamp) -> Self {
        Self { caller, now }
    }

    /// The same moment, seen from a different caller.
    pub fn as_caller(&self, caller: Address) -> Self {
        Self {
            caller,
            now: self.now,
        }
    }

    /// The same caller, `secs` seconds later.
    pub fn advanced(&self, secs: u64) -> Self {
        Self {
            caller: self.caller,
            now: self.now.saturating_add(secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturating_add_clamps() {
        let t = Timestamp(u64::MAX - 1);
        assert_eq!(t.saturating_add(10), Timestamp(u64::MAX));
    }

    #[test]
    fn now_is_after_2020() {
        assert!(Timestamp::now().as_secs() > 1_577_836_800);
    }

    #[test]
    fn context_helpers() {
        let a = Address::from_raw([1; 32]);
        let b = Address::from_raw([2; 32]);
        let ctx = CallContext::new(a, Timestamp(100));
        let other = ctx.as_caller(b);
        assert_eq!(other.caller, b);
        assert_eq!(other.now, Timestamp(100));
        assert_eq!(ctx.advanced(5).now, Timestamp(105));
    }

    #[test]
    fn display_format() {
        assert_eq!(Timestamp(42).to_string(), "42s");
    }
}
