use soroban_sdk::{symbol_short, Env, Symbol};

pub struct Pausable;

/// Emergency stop switch shared by the contracts in this workspace.
///
/// The caller is responsible for access control; these helpers only manage
/// the stored flag. `require_not_paused` panics so the whole invocation rolls
/// back, matching the all-or-nothing failure model of the contracts.
impl Pausable {
    pub const PAUSED_KEY: Symbol = symbol_short!("PAUSED");

    pub fn is_paused(e: &Env) -> bool {
        e.storage()
            .instance()
            .get::<_, bool>(&Self::PAUSED_KEY)
            .unwrap_or(false)
    }

    pub fn pause(e: &Env) {
        e.storage().instance().set(&Self::PAUSED_KEY, &true);
        e.events()
            .publish((symbol_short!("Paused"),), e.ledger().timestamp());
    }

    pub fn unpause(e: &Env) {
        e.storage().instance().set(&Self::PAUSED_KEY, &false);
        e.events()
            .publish((symbol_short!("Unpaused"),), e.ledger().timestamp());
    }

    pub fn require_not_paused(e: &Env) {
        if Self::is_paused(e) {
            panic!("Contract is paused");
        }
    }
}
