#![no_std]

//! Pooled-capital vault: a share-price accounting engine.
//!
//! Deposited capital is represented as proportional shares whose price floats
//! with the vault's custody balance. Revenue deposits raise the price without
//! minting; the authorized disburser (the commitment registry) can pay value
//! out without burning. Custody is an internal ledger moved only through the
//! entry points below, so raw token donations to the contract address never
//! touch share math.

use shared_utils::{emit_error_event, AccessControl, Pausable, SafeMath, Validation};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env, String,
};

/// Shares permanently burned to an unowned allocation at genesis. With these
/// in circulation an attacker cannot redeem the pool down to dust and re-seed
/// the share price ahead of a victim's deposit.
pub const DEAD_SHARES: i128 = 1_000;

/// Single-call withdrawal-concentration cap in basis points. Advisory
/// anti-bank-run friction only: sequential calls can still drain the pool
/// across transactions (accepted design debt).
pub const MAX_SINGLE_WITHDRAWAL_BP: u32 = 9_000;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum VaultError {
    ZeroOrInvalidAmount = 1,
    ZeroSharesMinted = 2,
    ZeroValueRedeemed = 3,
    InsufficientShares = 4,
    InsufficientCustody = 5,
    ExcessiveWithdrawal = 6,
    Unauthorized = 7,
    ZeroAddress = 8,
    ArithmeticOverflow = 9,
    AlreadyInitialized = 10,
    NotInitialized = 11,
    ReentrancyDetected = 12,
    TransferFailed = 13,
}

impl VaultError {
    /// Human-readable message for debugging and error events.
    pub fn message(&self) -> &'static str {
        match self {
            VaultError::ZeroOrInvalidAmount => "Invalid amount: must meet the minimum",
            VaultError::ZeroSharesMinted => "Contribution would mint zero shares",
            VaultError::ZeroValueRedeemed => "Redemption would pay zero value",
            VaultError::InsufficientShares => "Insufficient shares",
            VaultError::InsufficientCustody => "Insufficient custody balance",
            VaultError::ExcessiveWithdrawal => "Redemption exceeds single-call withdrawal cap",
            VaultError::Unauthorized => "Unauthorized: caller not allowed",
            VaultError::ZeroAddress => "Zero address is not allowed",
            VaultError::ArithmeticOverflow => "Arithmetic overflow",
            VaultError::AlreadyInitialized => "Contract already initialized",
            VaultError::NotInitialized => "Contract not initialized",
            VaultError::ReentrancyDetected => "Reentrancy detected",
            VaultError::TransferFailed => "Token transfer failed",
        }
    }
}

/// Emit error event and panic with standardized message (for indexers and UX).
fn fail(e: &Env, err: VaultError, context: &str) -> ! {
    emit_error_event(e, err as u32, context);
    panic!("{}", err.message());
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Token,
    Disburser,
    TotalShares,
    DeadShares,
    Custody,
    MinContribution,
    ReentrancyGuard,
    Shares(Address), // account -> share balance
}

// ─── Storage helpers ──────────────────────────────────────────────────────────

fn read_shares(e: &Env, account: &Address) -> i128 {
    e.storage()
        .persistent()
        .get::<_, i128>(&DataKey::Shares(account.clone()))
        .unwrap_or(0)
}

fn write_shares(e: &Env, account: &Address, shares: i128) {
    e.storage()
        .persistent()
        .set(&DataKey::Shares(account.clone()), &shares);
}

fn read_total_shares(e: &Env) -> i128 {
    e.storage()
        .instance()
        .get::<_, i128>(&DataKey::TotalShares)
        .unwrap_or(0)
}

fn read_custody(e: &Env) -> i128 {
    e.storage()
        .instance()
        .get::<_, i128>(&DataKey::Custody)
        .unwrap_or(0)
}

fn read_token(e: &Env) -> Address {
    e.storage()
        .instance()
        .get::<_, Address>(&DataKey::Token)
        .unwrap_or_else(|| fail(e, VaultError::NotInitialized, "read_token"))
}

fn require_no_reentrancy(e: &Env) {
    let guard: bool = e
        .storage()
        .instance()
        .get::<_, bool>(&DataKey::ReentrancyGuard)
        .unwrap_or(false);
    if guard {
        fail(e, VaultError::ReentrancyDetected, "require_no_reentrancy");
    }
}

fn set_reentrancy_guard(e: &Env, value: bool) {
    e.storage().instance().set(&DataKey::ReentrancyGuard, &value);
}

/// Require that the caller is the admin stored in this contract.
fn require_admin(e: &Env, caller: &Address) {
    caller.require_auth();
    if !AccessControl::has_owner(e) {
        fail(e, VaultError::NotInitialized, "require_admin");
    }
    if !AccessControl::is_owner(e, caller) {
        fail(e, VaultError::Unauthorized, "require_admin");
    }
}

fn is_zero_address(e: &Env, address: &Address) -> bool {
    let zero_str = String::from_str(e, "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF");
    let zero_addr = Address::from_string(&zero_str);
    address == &zero_addr
}

/// Transfer tokens held by this contract to a recipient.
fn transfer_out(e: &Env, to: &Address, value: i128) {
    let token_client = token::Client::new(e, &read_token(e));
    token_client.transfer(&e.current_contract_address(), to, &value);
}

/// Pull tokens from a contributor into this contract's custody.
fn transfer_in(e: &Env, from: &Address, value: i128) {
    let token_client = token::Client::new(e, &read_token(e));
    token_client.transfer(from, &e.current_contract_address(), &value);
}

#[contract]
pub struct PooledVaultContract;

#[contractimpl]
impl PooledVaultContract {
    /// Initialize the vault with its admin, custody token and dust guard.
    pub fn initialize(e: Env, admin: Address, token: Address, min_contribution: i128) {
        if AccessControl::has_owner(&e) {
            fail(&e, VaultError::AlreadyInitialized, "initialize");
        }
        if !Validation::is_positive(min_contribution) {
            fail(&e, VaultError::ZeroOrInvalidAmount, "initialize");
        }
        AccessControl::set_owner(&e, &admin);
        e.storage().instance().set(&DataKey::Token, &token);
        e.storage().instance().set(&DataKey::TotalShares, &0i128);
        e.storage().instance().set(&DataKey::DeadShares, &0i128);
        e.storage().instance().set(&DataKey::Custody, &0i128);
        e.storage()
            .instance()
            .set(&DataKey::MinContribution, &min_contribution);
        e.storage().instance().set(&Pausable::PAUSED_KEY, &false);
    }

    /// Deposit `value` tokens and mint proportional shares to `from`.
    ///
    /// Genesis (no shares outstanding) mints 1:1 and permanently retires
    /// `DEAD_SHARES` to an unowned slot. Afterwards the mint is
    /// `floor(value * total_shares / custody)`, never rounded up.
    ///
    /// Follows checks-effects-interactions: all share and custody accounting
    /// is committed before the inbound token transfer.
    pub fn contribute(e: Env, from: Address, value: i128) -> i128 {
        require_no_reentrancy(&e);
        set_reentrancy_guard(&e, true);
        Pausable::require_not_paused(&e);

        from.require_auth();

        let min_contribution = e
            .storage()
            .instance()
            .get::<_, i128>(&DataKey::MinContribution)
            .unwrap_or_else(|| {
                set_reentrancy_guard(&e, false);
                fail(&e, VaultError::NotInitialized, "contribute")
            });
        if !Validation::is_at_least(value, min_contribution) {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::ZeroOrInvalidAmount, "contribute");
        }

        let total_shares = read_total_shares(&e);
        let custody = read_custody(&e);

        let minted = if total_shares == 0 {
            // Genesis: fixed 1:1 rate, DEAD_SHARES withheld from the minter.
            if value <= DEAD_SHARES {
                set_reentrancy_guard(&e, false);
                fail(&e, VaultError::ZeroSharesMinted, "contribute");
            }
            let credited = value - DEAD_SHARES;
            e.storage().instance().set(&DataKey::TotalShares, &value);
            e.storage()
                .instance()
                .set(&DataKey::DeadShares, &DEAD_SHARES);
            write_shares(&e, &from, credited);
            credited
        } else {
            let minted = SafeMath::checked_mul_div_floor(value, total_shares, custody)
                .unwrap_or_else(|| {
                    set_reentrancy_guard(&e, false);
                    fail(&e, VaultError::ArithmeticOverflow, "contribute")
                });
            if minted == 0 {
                set_reentrancy_guard(&e, false);
                fail(&e, VaultError::ZeroSharesMinted, "contribute");
            }
            let new_total = SafeMath::checked_add(total_shares, minted).unwrap_or_else(|| {
                set_reentrancy_guard(&e, false);
                fail(&e, VaultError::ArithmeticOverflow, "contribute")
            });
            e.storage().instance().set(&DataKey::TotalShares, &new_total);
            let held = read_shares(&e, &from);
            write_shares(&e, &from, held + minted);
            minted
        };

        let new_custody = SafeMath::checked_add(custody, value).unwrap_or_else(|| {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::ArithmeticOverflow, "contribute")
        });
        e.storage().instance().set(&DataKey::Custody, &new_custody);

        transfer_in(&e, &from, value);

        set_reentrancy_guard(&e, false);

        e.events().publish(
            (symbol_short!("Contrib"), from),
            (value, minted, e.ledger().timestamp()),
        );
        minted
    }

    /// Burn `shares` from `from` and pay out the proportional value.
    ///
    /// Unless the caller holds every circulating share, a single call may not
    /// remove more than `MAX_SINGLE_WITHDRAWAL_BP` of custody.
    pub fn redeem(e: Env, from: Address, shares: i128) -> i128 {
        require_no_reentrancy(&e);
        set_reentrancy_guard(&e, true);
        Pausable::require_not_paused(&e);

        from.require_auth();

        if !Validation::is_positive(shares) {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::ZeroOrInvalidAmount, "redeem");
        }

        let held = read_shares(&e, &from);
        if shares > held {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::InsufficientShares, "redeem");
        }

        let total_shares = read_total_shares(&e);
        let custody = read_custody(&e);

        let value = SafeMath::checked_mul_div_floor(shares, custody, total_shares)
            .unwrap_or_else(|| {
                set_reentrancy_guard(&e, false);
                fail(&e, VaultError::ArithmeticOverflow, "redeem")
            });
        if value == 0 {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::ZeroValueRedeemed, "redeem");
        }

        // Callers owning the entire circulating supply may always exit fully.
        let dead_shares = e
            .storage()
            .instance()
            .get::<_, i128>(&DataKey::DeadShares)
            .unwrap_or(0);
        let owns_whole_pool = held == total_shares - dead_shares;
        if !owns_whole_pool {
            let cap = SafeMath::bp_share(custody, MAX_SINGLE_WITHDRAWAL_BP).unwrap_or_else(|| {
                set_reentrancy_guard(&e, false);
                fail(&e, VaultError::ArithmeticOverflow, "redeem")
            });
            if value > cap {
                set_reentrancy_guard(&e, false);
                fail(&e, VaultError::ExcessiveWithdrawal, "redeem");
            }
        }

        // Cannot happen while the solvency invariant holds; checked anyway.
        if value > custody {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::InsufficientCustody, "redeem");
        }

        write_shares(&e, &from, held - shares);
        e.storage()
            .instance()
            .set(&DataKey::TotalShares, &(total_shares - shares));
        e.storage()
            .instance()
            .set(&DataKey::Custody, &(custody - value));

        transfer_out(&e, &from, value);

        set_reentrancy_guard(&e, false);

        e.events().publish(
            (symbol_short!("Redeem"), from),
            (shares, value, e.ledger().timestamp()),
        );
        value
    }

    /// Credit `value` tokens to custody without minting shares.
    ///
    /// Callable by anyone; this is exactly how the share price appreciates.
    pub fn record_revenue(e: Env, from: Address, value: i128) {
        require_no_reentrancy(&e);
        set_reentrancy_guard(&e, true);
        Pausable::require_not_paused(&e);

        from.require_auth();

        if !Validation::is_positive(value) {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::ZeroOrInvalidAmount, "record_revenue");
        }

        let custody = read_custody(&e);
        let new_custody = SafeMath::checked_add(custody, value).unwrap_or_else(|| {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::ArithmeticOverflow, "record_revenue")
        });
        e.storage().instance().set(&DataKey::Custody, &new_custody);

        transfer_in(&e, &from, value);

        set_reentrancy_guard(&e, false);

        e.events().publish(
            (symbol_short!("Revenue"), from),
            (value, e.ledger().timestamp()),
        );
    }

    /// Pay `value` from custody to `to` without touching share supply.
    ///
    /// Restricted to the configured disburser. This is how a winning
    /// committer is paid from pooled capital; the pool absorbs the liability.
    pub fn disburse(e: Env, caller: Address, to: Address, value: i128) {
        require_no_reentrancy(&e);
        set_reentrancy_guard(&e, true);
        Pausable::require_not_paused(&e);

        caller.require_auth();
        let disburser = e
            .storage()
            .instance()
            .get::<_, Address>(&DataKey::Disburser)
            .unwrap_or_else(|| {
                set_reentrancy_guard(&e, false);
                fail(&e, VaultError::NotInitialized, "disburse")
            });
        if caller != disburser {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::Unauthorized, "disburse");
        }

        if !Validation::is_positive(value) {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::ZeroOrInvalidAmount, "disburse");
        }

        let custody = read_custody(&e);
        if value > custody {
            set_reentrancy_guard(&e, false);
            fail(&e, VaultError::InsufficientCustody, "disburse");
        }

        e.storage()
            .instance()
            .set(&DataKey::Custody, &(custody - value));

        transfer_out(&e, &to, value);

        set_reentrancy_guard(&e, false);

        e.events().publish(
            (symbol_short!("Disburse"), to),
            (value, e.ledger().timestamp()),
        );
    }

    /// Set the identity allowed to call `disburse`. Admin only.
    ///
    /// The zero address is rejected: a null disburser would leave `disburse`
    /// permanently unusable.
    pub fn set_disburser(e: Env, caller: Address, disburser: Address) {
        require_admin(&e, &caller);
        if is_zero_address(&e, &disburser) {
            fail(&e, VaultError::ZeroAddress, "set_disburser");
        }
        e.storage().instance().set(&DataKey::Disburser, &disburser);
        e.events().publish(
            (symbol_short!("DisbSet"), disburser),
            e.ledger().timestamp(),
        );
    }

    /// Nominate a new admin. The handover completes only when the nominee
    /// calls `accept_admin`.
    pub fn propose_admin(e: Env, caller: Address, new_admin: Address) {
        require_admin(&e, &caller);
        if is_zero_address(&e, &new_admin) {
            fail(&e, VaultError::ZeroAddress, "propose_admin");
        }
        AccessControl::propose_owner(&e, &new_admin);
    }

    pub fn accept_admin(e: Env, caller: Address) {
        caller.require_auth();
        if !AccessControl::accept_owner(&e, &caller) {
            fail(&e, VaultError::Unauthorized, "accept_admin");
        }
    }

    /// Pause the contract. Caller must be admin.
    pub fn pause(e: Env, caller: Address) {
        require_admin(&e, &caller);
        Pausable::pause(&e);
    }

    /// Unpause the contract. Caller must be admin.
    pub fn unpause(e: Env, caller: Address) {
        require_admin(&e, &caller);
        Pausable::unpause(&e);
    }

    /// Returns `true` if the contract is currently paused.
    pub fn is_paused(e: Env) -> bool {
        Pausable::is_paused(&e)
    }

    // ─── Queries ─────────────────────────────────────────────────────────────

    /// Total value currently held in custody.
    pub fn value_held(e: Env) -> i128 {
        read_custody(&e)
    }

    pub fn shares_of(e: Env, account: Address) -> i128 {
        read_shares(&e, &account)
    }

    pub fn total_shares(e: Env) -> i128 {
        read_total_shares(&e)
    }

    pub fn dead_shares(e: Env) -> i128 {
        e.storage()
            .instance()
            .get::<_, i128>(&DataKey::DeadShares)
            .unwrap_or(0)
    }

    /// Value a holding of `shares` is currently worth (floor).
    pub fn shares_to_value(e: Env, shares: i128) -> i128 {
        let total = read_total_shares(&e);
        if total == 0 {
            return shares;
        }
        SafeMath::checked_mul_div_floor(shares, read_custody(&e), total)
            .unwrap_or_else(|| fail(&e, VaultError::ArithmeticOverflow, "shares_to_value"))
    }

    /// Shares a contribution of `value` would currently mint (floor).
    pub fn value_to_shares(e: Env, value: i128) -> i128 {
        let total = read_total_shares(&e);
        if total == 0 {
            return value;
        }
        SafeMath::checked_mul_div_floor(value, total, read_custody(&e))
            .unwrap_or_else(|| fail(&e, VaultError::ArithmeticOverflow, "value_to_shares"))
    }

    pub fn get_admin(e: Env) -> Address {
        AccessControl::owner(&e)
            .unwrap_or_else(|| fail(&e, VaultError::NotInitialized, "get_admin"))
    }

    pub fn get_disburser(e: Env) -> Option<Address> {
        e.storage().instance().get::<_, Address>(&DataKey::Disburser)
    }

    pub fn get_token(e: Env) -> Address {
        read_token(&e)
    }

    pub fn get_min_contribution(e: Env) -> i128 {
        e.storage()
            .instance()
            .get::<_, i128>(&DataKey::MinContribution)
            .unwrap_or_else(|| fail(&e, VaultError::NotInitialized, "get_min_contribution"))
    }
}

#[cfg(test)]
mod tests;
