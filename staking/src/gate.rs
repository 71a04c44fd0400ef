//! Administrator-only access control.

use crate::error::StakingError;
use farm_types::AccountId;

/// Decides whether a caller holds administrator rights.
pub trait AdminAuthority: Send + Sync {
    fn is_administrator(&self, caller: &AccountId) -> bool;
}

/// Exactly one administrator, fixed at construction.
#[derive(Clone, Debug)]
pub struct SingleAdministrator {
    administrator: AccountId,
}

impl SingleAdministrator {
    pub fn new(administrator: AccountId) -> Self {
        Self { administrator }
    }

    pub fn administrator(&self) -> &AccountId {
        &self.administrator
    }
}

impl AdminAuthority for SingleAdministrator {
    fn is_administrator(&self, caller: &AccountId) -> bool {
        *caller == self.administrator
    }
}

/// Guards asset approval and reward distribution.
///
/// Checked at the start of every gated call, before any state is read.
pub struct OwnershipGate {
    authority: Box<dyn AdminAuthority>,
}

impl OwnershipGate {
    pub fn new(authority: Box<dyn AdminAuthority>) -> Self {
        Self { authority }
    }

    pub fn single(administrator: AccountId) -> Self {
        Self::new(Box::new(SingleAdministrator::new(administrator)))
    }

    pub fn ensure(&self, caller: &AccountId) -> Result<(), StakingError> {
        if self.authority.is_administrator(caller) {
            Ok(())
        } else {
            Err(StakingError::Unauthorized {
                caller: caller.clone(),
            })
        }
    }
}
