use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::AccessError;
use crate::temporal::CallContext;

/// Operator plus admin set guarding the privileged operations of one
/// component.
///
/// The operator is fixed at construction and is always an admin. Only the
/// operator may grant or revoke admin rights.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    operator: Address,
    admins: BTreeSet<Address>,
}

impl AccessControl {
    pub fn new(operator: Address) -> Self {
        Self {
            operator,
            admins: BTreeSet::new(),
        }
    }

    pub fn operator(&self) -> Address {
        self.operator
    }

    pub fn is_admin(&self, who: &Address) -> bool {
        *who == self.operator || self.admins.contains(who)
    }

    /// Fails unless the caller is the operator.
    pub fn ensure_operator(&self, ctx: &CallContext) -> Result<(), AccessError> {
        if ctx.caller == self.operator {
            Ok(())
        } else {
            Err(AccessError::NotOperator { caller: ctx.caller })
        }
    }

    /// Fails unless the caller is the operator or a granted admin.
    pub fn ensure_admin(&self, ctx: &CallContext) -> Result<(), AccessError> {
        if self.is_admin(&ctx.caller) {
            Ok(())
        } else {
            Err(AccessError::NotAdmin { caller: ctx.caller })
        }
    }

    /// Grant or revoke admin rights. Operator only.
    pub fn set_admin(
        &mut self,
        ctx: &CallContext,
        who: Address,
        is_admin: bool,
    ) -> Result<(), AccessError> {
        self.ensure_operator(ctx)?;
        if is_admin {
            self.admins.insert(who);
        } else {
            self.admins.remove(&who);
        }
        Ok(())
    }

    pub fn admins(&self) -> impl Iterator<Item = &Address> {
        self.admins.iter()
    }
}
