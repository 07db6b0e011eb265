use soroban_sdk::{symbol_short, Address, Env, Symbol};

pub struct AccessControl;

/// Two-step ownership handover.
///
/// A single irreversible owner write can strand the contract on an
/// unreachable identity, so handover is propose-then-accept: the current
/// owner nominates a successor, and nothing changes until the successor
/// accepts under its own authorization.
impl AccessControl {
    pub const OWNER_KEY: Symbol = symbol_short!("OWNER");
    pub const PENDING_KEY: Symbol = symbol_short!("PD_OWNER");

    pub fn has_owner(e: &Env) -> bool {
        e.storage().instance().has(&Self::OWNER_KEY)
    }

    pub fn set_owner(e: &Env, owner: &Address) {
        e.storage().instance().set(&Self::OWNER_KEY, owner);
    }

    pub fn owner(e: &Env) -> Option<Address> {
        e.storage().instance().get::<_, Address>(&Self::OWNER_KEY)
    }

    /// True if `caller` is the stored owner. Does not check authorization;
    /// callers must `require_auth` first.
    pub fn is_owner(e: &Env, caller: &Address) -> bool {
        match Self::owner(e) {
            Some(owner) => *caller == owner,
            None => false,
        }
    }

    pub fn propose_owner(e: &Env, new_owner: &Address) {
        e.storage().instance().set(&Self::PENDING_KEY, new_owner);
        e.events().publish(
            (symbol_short!("OwnProp"), new_owner.clone()),
            e.ledger().timestamp(),
        );
    }

    pub fn pending_owner(e: &Env) -> Option<Address> {
        e.storage().instance().get::<_, Address>(&Self::PENDING_KEY)
    }

    /// Completes the handover if `caller` is the pending owner.
    /// Returns false when there is no pending owner or the caller is not it.
    pub fn accept_owner(e: &Env, caller: &Address) -> bool {
        match Self::pending_owner(e) {
            Some(pending) if pending == *caller => {
                e.storage().instance().set(&Self::OWNER_KEY, caller);
                e.storage().instance().remove(&Self::PENDING_KEY);
                e.events().publish(
                    (symbol_short!("OwnAccpt"), caller.clone()),
                    e.ledger().timestamp(),
                );
                true
            }
            _ => false,
        }
    }
}
