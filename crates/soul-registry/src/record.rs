use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use soul_types::{Address, IdentityId, Timestamp};

/// One live soul.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub id: IdentityId,
    pub owner: Address,
    pub created_at: Timestamp,
}

/// A pending social-recovery vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalRequest {
    pub requested_by: Address,
    pub expiry: Timestamp,
    /// Voters that currently approve. Starts with the requester.
    pub approvals: BTreeSet<Address>,
}

impl RenewalRequest {
    pub fn new(requested_by: Address, expiry: Timestamp) -> Self {
        Self {
            requested_by,
            expiry,
            approvals: BTreeSet::from([requested_by]),
        }
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expiry
    }
}

/// Where an identity stands in the recovery state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenewalStatus {
    NoRequest,
    Pending,
    Approved,
    Expired,
}

/// Minimum approvals for a renewal, counting the owner as one implicit
/// voter alongside `guardian_count` guardians: `floor((1 + g) / 2) + 1`.
///
/// Returns `None` when there are no guardians; recovery is impossible then.
pub fn approval_quorum(guardian_count: usize) -> Option<u64> {
    if guardian_count == 0 {
        return None;
    }
    let voters = 1 + guardian_count as u64;
    Some(voters / 2 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn quorum_table() {
        assert_eq!(approval_quorum(0), None);
        assert_eq!(approval_quorum(1), Some(2));
        assert_eq!(approval_quorum(2), Some(2));
        assert_eq!(approval_quorum(3), Some(3));
        assert_eq!(approval_quorum(4), Some(3));
    }

    #[test]
    fn request_is_self_approved() {
        let requester = Address::from_raw([1; 32]);
        let request = RenewalRequest::new(requester, Timestamp(10));
        assert!(request.approvals.contains(&requester));
        assert_eq!(request.approvals.len(), 1);
    }

    #[test]
    fn expiry_is_strict() {
        let request = RenewalRequest::new(Address::from_raw([1; 32]), Timestamp(10));
        assert!(!request.is_expired(Timestamp(10)));
        assert!(request.is_expired(Timestamp(11)));
    }

    proptest! {
        #[test]
        fn quorum_is_strict_majority_of_voters(g in 1usize..500) {
            let q = approval_quorum(g).unwrap();
            let voters = 1 + g as u64;
            prop_assert!(2 * q > voters);
            prop_assert!(2 * (q - 1) <= voters);
        }
    }
}
