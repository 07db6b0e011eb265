#![no_std]

//! Staked-commitment registry.
//!
//! Owns the lifecycle of staked commitments (open -> verify -> claim /
//! abandon / expire), computes payouts from the configured bonus-rate table,
//! and instructs the pooled vault to disburse winnings. The dependency is
//! one-directional: this contract calls the vault by address, and the vault
//! knows the registry only as its authorized disburser.
//!
//! Stakes follow the move-at-open model: the full stake is forwarded into
//! vault custody when a commitment is opened, so a forfeiture retains it with
//! no further transfer and a claim pays `stake + bonus - fee` back out of the
//! same custody. No stake can be stranded in this contract.

use shared_utils::{emit_error_event, AccessControl, Pausable, SafeMath, TimeUtils, Validation};
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Env, IntoVal,
    String, Symbol, Val, Vec,
};

/// Hard upper bound for `update_rate`, 10_000 bp = 100%. Caps how fast a
/// compromised admin key could drain the pool through collusive claims.
pub const MAX_BONUS_RATE_BP: u32 = 10_000;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum RegistryError {
    DuplicateCommitment = 1,
    StakeOutOfRange = 2,
    UnsanctionedDuration = 3,
    NotActive = 4,
    TooSoon = 5,
    NotYetDue = 6,
    StreakIncomplete = 7,
    NotOwner = 8,
    RateOutOfBounds = 9,
    Unauthorized = 10,
    CommitmentNotFound = 11,
    InsufficientCustody = 12,
    ArithmeticOverflow = 13,
    AlreadyInitialized = 14,
    NotInitialized = 15,
    ReentrancyDetected = 16,
    InvalidConfig = 17,
    ZeroAddress = 18,
}

impl RegistryError {
    /// Human-readable message for debugging and error events.
    pub fn message(&self) -> &'static str {
        match self {
            RegistryError::DuplicateCommitment => "Committer already has an active commitment",
            RegistryError::StakeOutOfRange => "Stake outside the allowed range",
            RegistryError::UnsanctionedDuration => "Duration is not sanctioned",
            RegistryError::NotActive => "Commitment is not active",
            RegistryError::TooSoon => "Verification period has not elapsed",
            RegistryError::NotYetDue => "Commitment duration has not elapsed",
            RegistryError::StreakIncomplete => "Verified periods do not cover the duration",
            RegistryError::NotOwner => "Caller does not own this commitment",
            RegistryError::RateOutOfBounds => "Bonus rate exceeds the maximum",
            RegistryError::Unauthorized => "Unauthorized: caller not allowed",
            RegistryError::CommitmentNotFound => "Commitment not found",
            RegistryError::InsufficientCustody => "Pool custody cannot cover worst-case payouts",
            RegistryError::ArithmeticOverflow => "Arithmetic overflow",
            RegistryError::AlreadyInitialized => "Contract already initialized",
            RegistryError::NotInitialized => "Contract not initialized",
            RegistryError::ReentrancyDetected => "Reentrancy detected",
            RegistryError::InvalidConfig => "Invalid configuration value",
            RegistryError::ZeroAddress => "Zero address is not allowed",
        }
    }
}

/// Emit error event and panic with standardized message (for indexers and UX).
fn fail(e: &Env, err: RegistryError, context: &str) -> ! {
    emit_error_event(e, err as u32, context);
    panic!("{}", err.message());
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CommitmentState {
    Active,
    Claimed,
    Forfeited,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Commitment {
    pub id: u64,
    pub committer: Address,
    pub stake: i128,
    pub duration_days: u32,
    /// Bonus rate snapshotted at open; later `update_rate` calls never change
    /// an in-flight commitment's payout.
    pub bonus_rate_bp: u32,
    pub opened_at: u64,
    pub last_verified_at: u64,
    pub periods_verified: u32,
    pub state: CommitmentState,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Vault,
    Attestor,
    NextId,
    Commitment(u64),     // id -> Commitment
    ActiveOf(Address),   // committer -> active commitment id (absent = none)
    BonusRate(u32),      // duration_days -> bonus bp (absent or 0 = unsanctioned)
    Durations,           // Vec<u32> of sanctioned durations
    ApprovedTargets,     // Vec<Address> whose interaction counts as compliance
    TotalLiability,      // sum of worst-case payouts of all active commitments
    MinStake,
    MaxStake,
    PlatformFeeBp,
    GracePeriod,
    ReentrancyGuard,
}

// ─── Storage helpers ──────────────────────────────────────────────────────────

fn read_commitment(e: &Env, id: u64) -> Option<Commitment> {
    e.storage()
        .persistent()
        .get::<_, Commitment>(&DataKey::Commitment(id))
}

fn set_commitment(e: &Env, commitment: &Commitment) {
    e.storage()
        .persistent()
        .set(&DataKey::Commitment(commitment.id), commitment);
}

fn read_active_of(e: &Env, committer: &Address) -> u64 {
    e.storage()
        .persistent()
        .get::<_, u64>(&DataKey::ActiveOf(committer.clone()))
        .unwrap_or(0)
}

fn clear_active_of(e: &Env, committer: &Address) {
    e.storage()
        .persistent()
        .remove(&DataKey::ActiveOf(committer.clone()));
}

fn read_liability(e: &Env) -> i128 {
    e.storage()
        .instance()
        .get::<_, i128>(&DataKey::TotalLiability)
        .unwrap_or(0)
}

fn read_vault(e: &Env) -> Address {
    e.storage()
        .instance()
        .get::<_, Address>(&DataKey::Vault)
        .unwrap_or_else(|| fail(e, RegistryError::NotInitialized, "read_vault"))
}

fn read_config_i128(e: &Env, key: &DataKey, context: &str) -> i128 {
    e.storage()
        .instance()
        .get::<_, i128>(key)
        .unwrap_or_else(|| fail(e, RegistryError::NotInitialized, context))
}

fn require_no_reentrancy(e: &Env) {
    let guard: bool = e
        .storage()
        .instance()
        .get::<_, bool>(&DataKey::ReentrancyGuard)
        .unwrap_or(false);
    if guard {
        fail(e, RegistryError::ReentrancyDetected, "require_no_reentrancy");
    }
}

fn set_reentrancy_guard(e: &Env, value: bool) {
    e.storage().instance().set(&DataKey::ReentrancyGuard, &value);
}

/// Require that the caller is the admin stored in this contract.
fn require_admin(e: &Env, caller: &Address) {
    caller.require_auth();
    if !AccessControl::has_owner(e) {
        fail(e, RegistryError::NotInitialized, "require_admin");
    }
    if !AccessControl::is_owner(e, caller) {
        fail(e, RegistryError::Unauthorized, "require_admin");
    }
}

fn is_zero_address(e: &Env, address: &Address) -> bool {
    let zero_str = String::from_str(e, "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF");
    let zero_addr = Address::from_string(&zero_str);
    address == &zero_addr
}

// ─── Vault calls ──────────────────────────────────────────────────────────────

fn vault_value_held(e: &Env, vault: &Address) -> i128 {
    e.invoke_contract::<i128>(vault, &Symbol::new(e, "value_held"), Vec::<Val>::new(e))
}

/// Forward a committer's stake into vault custody (no shares minted).
fn vault_record_revenue(e: &Env, vault: &Address, from: &Address, value: i128) {
    let mut args = Vec::<Val>::new(e);
    args.push_back(from.clone().into_val(e));
    args.push_back(value.into_val(e));
    e.invoke_contract::<()>(vault, &Symbol::new(e, "record_revenue"), args);
}

/// Pay a winner out of vault custody. This contract is the vault's
/// authorized disburser; the vault auto-authorizes its direct invoker.
fn vault_disburse(e: &Env, vault: &Address, to: &Address, value: i128) {
    let mut args = Vec::<Val>::new(e);
    args.push_back(e.current_contract_address().into_val(e));
    args.push_back(to.clone().into_val(e));
    args.push_back(value.into_val(e));
    e.invoke_contract::<()>(vault, &Symbol::new(e, "disburse"), args);
}

// ─── Payout math ──────────────────────────────────────────────────────────────

/// (bonus, fee, payout) for a winning commitment, all floored.
/// Fee is computed on the bonus only, not the full payout.
fn compute_payout(stake: i128, bonus_rate_bp: u32, fee_bp: u32) -> Option<(i128, i128, i128)> {
    let bonus = SafeMath::bp_share(stake, bonus_rate_bp)?;
    let fee = SafeMath::bp_share(bonus, fee_bp)?;
    let payout = SafeMath::checked_add(stake, bonus)?.checked_sub(fee)?;
    Some((bonus, fee, payout))
}

#[contract]
pub struct CommitmentRegistryContract;

#[contractimpl]
impl CommitmentRegistryContract {
    /// Initialize the registry with its admin, vault and stake policy.
    pub fn initialize(
        e: Env,
        admin: Address,
        vault: Address,
        min_stake: i128,
        max_stake: i128,
        platform_fee_bp: u32,
        grace_period: u64,
    ) {
        if AccessControl::has_owner(&e) {
            fail(&e, RegistryError::AlreadyInitialized, "initialize");
        }
        if !Validation::is_positive(min_stake) || max_stake < min_stake {
            fail(&e, RegistryError::InvalidConfig, "initialize");
        }
        if !Validation::valid_bp(platform_fee_bp, MAX_BONUS_RATE_BP) {
            fail(&e, RegistryError::InvalidConfig, "initialize");
        }
        if grace_period == 0 {
            fail(&e, RegistryError::InvalidConfig, "initialize");
        }
        AccessControl::set_owner(&e, &admin);
        e.storage().instance().set(&DataKey::Vault, &vault);
        e.storage().instance().set(&DataKey::NextId, &1u64);
        e.storage().instance().set(&DataKey::TotalLiability, &0i128);
        e.storage().instance().set(&DataKey::MinStake, &min_stake);
        e.storage().instance().set(&DataKey::MaxStake, &max_stake);
        e.storage()
            .instance()
            .set(&DataKey::PlatformFeeBp, &platform_fee_bp);
        e.storage().instance().set(&DataKey::GracePeriod, &grace_period);
        e.storage().instance().set(&Pausable::PAUSED_KEY, &false);
    }

    /// Set the attestor capability. Admin only.
    ///
    /// The authorization policy behind the address (single key, multisig
    /// contract, threshold scheme) is swappable without touching registry
    /// logic; this contract only checks identity equality.
    pub fn set_attestor(e: Env, caller: Address, attestor: Address) {
        require_admin(&e, &caller);
        if is_zero_address(&e, &attestor) {
            fail(&e, RegistryError::ZeroAddress, "set_attestor");
        }
        e.storage().instance().set(&DataKey::Attestor, &attestor);
        e.events().publish(
            (symbol_short!("AttestSet"), attestor),
            e.ledger().timestamp(),
        );
    }

    /// Open a commitment: stake `stake` on complying for `duration_days`.
    ///
    /// The stake is forwarded into vault custody immediately (move-at-open),
    /// so every later outcome is pure accounting plus at most one payout.
    ///
    /// # Reentrancy Protection
    /// Checks-effects-interactions: the commitment record, active slot and
    /// liability counter are committed before the stake transfer.
    pub fn open(e: Env, committer: Address, duration_days: u32, stake: i128) -> u64 {
        require_no_reentrancy(&e);
        set_reentrancy_guard(&e, true);
        Pausable::require_not_paused(&e);

        committer.require_auth();
        let vault = read_vault(&e);

        if read_active_of(&e, &committer) != 0 {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::DuplicateCommitment, "open");
        }

        let min_stake = read_config_i128(&e, &DataKey::MinStake, "open");
        let max_stake = read_config_i128(&e, &DataKey::MaxStake, "open");
        if !Validation::within_range(stake, min_stake, max_stake) {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::StakeOutOfRange, "open");
        }

        let bonus_rate_bp = Self::get_rate(e.clone(), duration_days);
        if bonus_rate_bp == 0 {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::UnsanctionedDuration, "open");
        }

        // Reject durations whose claim deadline could not be represented.
        if TimeUtils::checked_deadline(&e, duration_days).is_none() {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::ArithmeticOverflow, "open");
        }

        let fee_bp: u32 = e
            .storage()
            .instance()
            .get::<_, u32>(&DataKey::PlatformFeeBp)
            .unwrap_or(0);
        let (_bonus, _fee, payout) = compute_payout(stake, bonus_rate_bp, fee_bp)
            .unwrap_or_else(|| {
                set_reentrancy_guard(&e, false);
                fail(&e, RegistryError::ArithmeticOverflow, "open")
            });

        // Solvency hardening: custody after this stake lands must cover the
        // worst-case payout of every active commitment including this one.
        let liability = read_liability(&e);
        let new_liability = SafeMath::checked_add(liability, payout).unwrap_or_else(|| {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::ArithmeticOverflow, "open")
        });
        let custody_after = SafeMath::checked_add(vault_value_held(&e, &vault), stake)
            .unwrap_or_else(|| {
                set_reentrancy_guard(&e, false);
                fail(&e, RegistryError::ArithmeticOverflow, "open")
            });
        if custody_after < new_liability {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::InsufficientCustody, "open");
        }

        // EFFECTS: commit the record before the stake transfer.
        let id: u64 = e
            .storage()
            .instance()
            .get::<_, u64>(&DataKey::NextId)
            .unwrap_or(1);
        let now = TimeUtils::now(&e);
        let commitment = Commitment {
            id,
            committer: committer.clone(),
            stake,
            duration_days,
            bonus_rate_bp,
            opened_at: now,
            last_verified_at: now,
            periods_verified: 0,
            state: CommitmentState::Active,
        };
        set_commitment(&e, &commitment);
        e.storage()
            .persistent()
            .set(&DataKey::ActiveOf(committer.clone()), &id);
        e.storage().instance().set(&DataKey::NextId, &(id + 1));
        e.storage()
            .instance()
            .set(&DataKey::TotalLiability, &new_liability);

        // INTERACTIONS: move the stake into the custody that backs payouts.
        vault_record_revenue(&e, &vault, &committer, stake);

        set_reentrancy_guard(&e, false);

        e.events().publish(
            (symbol_short!("Opened"), id, committer),
            (stake, duration_days, bonus_rate_bp, now),
        );
        id
    }

    /// Record one verified compliance period. Attestor capability only.
    ///
    /// Credits are counted, not merely timestamped: `claim` requires the
    /// count to cover the duration, so a missed period in the middle of a
    /// commitment can never be papered over by recent activity.
    pub fn mark_verified(e: Env, caller: Address, id: u64) {
        caller.require_auth();
        let attestor = e
            .storage()
            .instance()
            .get::<_, Address>(&DataKey::Attestor)
            .unwrap_or_else(|| fail(&e, RegistryError::NotInitialized, "mark_verified"));
        if caller != attestor {
            fail(&e, RegistryError::Unauthorized, "mark_verified");
        }

        let mut commitment = read_commitment(&e, id)
            .unwrap_or_else(|| fail(&e, RegistryError::CommitmentNotFound, "mark_verified"));
        if commitment.state != CommitmentState::Active {
            fail(&e, RegistryError::NotActive, "mark_verified");
        }

        let grace_period: u64 = e
            .storage()
            .instance()
            .get::<_, u64>(&DataKey::GracePeriod)
            .unwrap_or_else(|| fail(&e, RegistryError::NotInitialized, "mark_verified"));
        let now = TimeUtils::now(&e);
        // At most one credit per grace period.
        if now < commitment.last_verified_at + grace_period {
            fail(&e, RegistryError::TooSoon, "mark_verified");
        }

        commitment.periods_verified += 1;
        commitment.last_verified_at = now;
        set_commitment(&e, &commitment);

        e.events().publish(
            (symbol_short!("Verified"), id),
            (commitment.periods_verified, now),
        );
    }

    /// Claim a matured commitment: pays `stake + bonus - fee` from the vault.
    ///
    /// # Reentrancy Protection
    /// The terminal state, cleared active slot and liability decrement are
    /// committed before the disbursement call.
    pub fn claim(e: Env, caller: Address, id: u64) {
        require_no_reentrancy(&e);
        set_reentrancy_guard(&e, true);

        caller.require_auth();
        let mut commitment = read_commitment(&e, id).unwrap_or_else(|| {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::CommitmentNotFound, "claim")
        });
        if commitment.committer != caller {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::NotOwner, "claim");
        }
        if commitment.state != CommitmentState::Active {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::NotActive, "claim");
        }

        let now = TimeUtils::now(&e);
        let due_at = TimeUtils::days_to_seconds(commitment.duration_days)
            .and_then(|s| commitment.opened_at.checked_add(s))
            .unwrap_or_else(|| {
                set_reentrancy_guard(&e, false);
                fail(&e, RegistryError::ArithmeticOverflow, "claim")
            });
        if now < due_at {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::NotYetDue, "claim");
        }
        // The streak is a count of verified periods, not recency.
        if commitment.periods_verified < commitment.duration_days {
            set_reentrancy_guard(&e, false);
            fail(&e, RegistryError::StreakIncomplete, "claim");
        }

        let fee_bp: u32 = e
            .storage()
            .instance()
            .get::<_, u32>(&DataKey::PlatformFeeBp)
            .unwrap_or(0);
        let (_bonus, fee, payout) =
            compute_payout(commitment.stake, commitment.bonus_rate_bp, fee_bp).unwrap_or_else(
                || {
                    set_reentrancy_guard(&e, false);
                    fail(&e, RegistryError::ArithmeticOverflow, "claim")
                },
            );

        // EFFECTS
        commitment.state = CommitmentState::Claimed;
        set_commitment(&e, &commitment);
        clear_active_of(&e, &caller);
        let liability = read_liability(&e);
        e.storage()
            .instance()
            .set(&DataKey::TotalLiability, &(liability - payout));

        // INTERACTIONS: the stake has been in custody since open, so the fee
        // is retained implicitly and only the payout moves.
        let vault = read_vault(&e);
        vault_disburse(&e, &vault, &caller, payout);

        set_reentrancy_guard(&e, false);

        let ts = e.ledger().timestamp();
        e.events()
            .publish((symbol_short!("Claimed"), id, caller), (payout, ts));
        e.events().publish((symbol_short!("FeeAccr"), id), (fee, ts));
    }

    /// Voluntarily forfeit an active commitment. The stake, already in vault
    /// custody since open, is simply retained by the pool.
    pub fn abandon(e: Env, caller: Address, id: u64) {
        caller.require_auth();
        let commitment = read_commitment(&e, id)
            .unwrap_or_else(|| fail(&e, RegistryError::CommitmentNotFound, "abandon"));
        if commitment.committer != caller {
            fail(&e, RegistryError::NotOwner, "abandon");
        }

        let stake = Self::forfeit(&e, commitment, "abandon");

        e.events().publish(
            (symbol_short!("Abandoned"), id, caller),
            (stake, e.ledger().timestamp()),
        );
    }

    /// Administrative forfeiture of an active commitment. Same ledger effect
    /// as `abandon`, but the outcome is tagged distinctly for downstream
    /// consumers.
    pub fn expire(e: Env, caller: Address, id: u64) {
        require_admin(&e, &caller);
        let commitment = read_commitment(&e, id)
            .unwrap_or_else(|| fail(&e, RegistryError::CommitmentNotFound, "expire"));
        let committer = commitment.committer.clone();

        let stake = Self::forfeit(&e, commitment, "expire");

        e.events().publish(
            (symbol_short!("Expired"), id, committer),
            (stake, e.ledger().timestamp()),
        );
    }

    /// Shared terminal transition to Forfeited. Returns the retained stake.
    fn forfeit(e: &Env, mut commitment: Commitment, context: &str) -> i128 {
        if commitment.state != CommitmentState::Active {
            fail(e, RegistryError::NotActive, context);
        }

        let fee_bp: u32 = e
            .storage()
            .instance()
            .get::<_, u32>(&DataKey::PlatformFeeBp)
            .unwrap_or(0);
        let (_bonus, _fee, payout) =
            compute_payout(commitment.stake, commitment.bonus_rate_bp, fee_bp)
                .unwrap_or_else(|| fail(e, RegistryError::ArithmeticOverflow, context));

        commitment.state = CommitmentState::Forfeited;
        let stake = commitment.stake;
        let committer = commitment.committer.clone();
        set_commitment(e, &commitment);
        clear_active_of(e, &committer);
        let liability = read_liability(e);
        e.storage()
            .instance()
            .set(&DataKey::TotalLiability, &(liability - payout));
        stake
    }

    /// Set or update the bonus rate for a duration. Admin only, hard-capped
    /// at `MAX_BONUS_RATE_BP`. Rate 0 delists the duration.
    pub fn update_rate(e: Env, caller: Address, duration_days: u32, bonus_rate_bp: u32) {
        require_admin(&e, &caller);
        if duration_days == 0 {
            fail(&e, RegistryError::UnsanctionedDuration, "update_rate");
        }
        if !Validation::valid_bp(bonus_rate_bp, MAX_BONUS_RATE_BP) {
            fail(&e, RegistryError::RateOutOfBounds, "update_rate");
        }

        e.storage()
            .instance()
            .set(&DataKey::BonusRate(duration_days), &bonus_rate_bp);

        let mut durations: Vec<u32> = e
            .storage()
            .instance()
            .get::<_, Vec<u32>>(&DataKey::Durations)
            .unwrap_or(Vec::new(&e));
        let position = durations.iter().position(|d| d == duration_days);
        if bonus_rate_bp > 0 {
            if position.is_none() {
                durations.push_back(duration_days);
                e.storage().instance().set(&DataKey::Durations, &durations);
            }
        } else if let Some(idx) = position {
            durations.remove(idx as u32);
            e.storage().instance().set(&DataKey::Durations, &durations);
        }

        e.events().publish(
            (symbol_short!("RateUpd"), duration_days),
            (bonus_rate_bp, e.ledger().timestamp()),
        );
    }

    // ─── Approved target whitelist ───────────────────────────────────────────

    /// Add an externally-recognized identity whose interaction counts toward
    /// commitment compliance. Admin only.
    pub fn add_approved_target(e: Env, caller: Address, target: Address) {
        require_admin(&e, &caller);
        let mut targets: Vec<Address> = e
            .storage()
            .instance()
            .get::<_, Vec<Address>>(&DataKey::ApprovedTargets)
            .unwrap_or(Vec::new(&e));
        if !targets.contains(&target) {
            targets.push_back(target.clone());
            e.storage()
                .instance()
                .set(&DataKey::ApprovedTargets, &targets);
            e.events().publish(
                (symbol_short!("TargetAdd"), target),
                e.ledger().timestamp(),
            );
        }
    }

    pub fn remove_approved_target(e: Env, caller: Address, target: Address) {
        require_admin(&e, &caller);
        let mut targets: Vec<Address> = e
            .storage()
            .instance()
            .get::<_, Vec<Address>>(&DataKey::ApprovedTargets)
            .unwrap_or(Vec::new(&e));
        if let Some(idx) = targets.iter().position(|a| a == target) {
            targets.remove(idx as u32);
            e.storage()
                .instance()
                .set(&DataKey::ApprovedTargets, &targets);
            e.events().publish(
                (symbol_short!("TargetRem"), target),
                e.ledger().timestamp(),
            );
        }
    }

    pub fn is_approved_target(e: Env, target: Address) -> bool {
        let targets: Vec<Address> = e
            .storage()
            .instance()
            .get::<_, Vec<Address>>(&DataKey::ApprovedTargets)
            .unwrap_or(Vec::new(&e));
        targets.contains(&target)
    }

    pub fn get_approved_targets(e: Env) -> Vec<Address> {
        e.storage()
            .instance()
            .get::<_, Vec<Address>>(&DataKey::ApprovedTargets)
            .unwrap_or(Vec::new(&e))
    }

    // ─── Admin plumbing ──────────────────────────────────────────────────────

    /// Nominate a new admin. The handover completes only when the nominee
    /// calls `accept_admin`.
    pub fn propose_admin(e: Env, caller: Address, new_admin: Address) {
        require_admin(&e, &caller);
        if is_zero_address(&e, &new_admin) {
            fail(&e, RegistryError::ZeroAddress, "propose_admin");
        }
        AccessControl::propose_owner(&e, &new_admin);
    }

    pub fn accept_admin(e: Env, caller: Address) {
        caller.require_auth();
        if !AccessControl::accept_owner(&e, &caller) {
            fail(&e, RegistryError::Unauthorized, "accept_admin");
        }
    }

    /// Pause new commitments. Caller must be admin. In-flight commitments
    /// stay fully operable (verify, claim, abandon, expire) so a pause can
    /// never strand a committer in limbo.
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

    pub fn get_commitment(e: Env, id: u64) -> Commitment {
        read_commitment(&e, id)
            .unwrap_or_else(|| fail(&e, RegistryError::CommitmentNotFound, "get_commitment"))
    }

    /// Active commitment id for a committer, 0 if none.
    pub fn active_commitment_of(e: Env, committer: Address) -> u64 {
        read_active_of(&e, &committer)
    }

    /// Bonus rate in bp for a duration, 0 if the duration is unsanctioned.
    pub fn get_rate(e: Env, duration_days: u32) -> u32 {
        e.storage()
            .instance()
            .get::<_, u32>(&DataKey::BonusRate(duration_days))
            .unwrap_or(0)
    }

    pub fn get_durations(e: Env) -> Vec<u32> {
        e.storage()
            .instance()
            .get::<_, Vec<u32>>(&DataKey::Durations)
            .unwrap_or(Vec::new(&e))
    }

    pub fn get_total_commitments(e: Env) -> u64 {
        let next: u64 = e
            .storage()
            .instance()
            .get::<_, u64>(&DataKey::NextId)
            .unwrap_or(1);
        next - 1
    }

    /// Sum of worst-case payouts of all currently active commitments.
    pub fn get_total_liability(e: Env) -> i128 {
        read_liability(&e)
    }

    pub fn get_attestor(e: Env) -> Option<Address> {
        e.storage().instance().get::<_, Address>(&DataKey::Attestor)
    }

    pub fn get_vault(e: Env) -> Address {
        read_vault(&e)
    }

    pub fn get_admin(e: Env) -> Address {
        AccessControl::owner(&e)
            .unwrap_or_else(|| fail(&e, RegistryError::NotInitialized, "get_admin"))
    }

    pub fn get_min_stake(e: Env) -> i128 {
        read_config_i128(&e, &DataKey::MinStake, "get_min_stake")
    }

    pub fn get_max_stake(e: Env) -> i128 {
        read_config_i128(&e, &DataKey::MaxStake, "get_max_stake")
    }

    pub fn get_platform_fee_bp(e: Env) -> u32 {
        e.storage()
            .instance()
            .get::<_, u32>(&DataKey::PlatformFeeBp)
            .unwrap_or_else(|| fail(&e, RegistryError::NotInitialized, "get_platform_fee_bp"))
    }

    pub fn get_grace_period(e: Env) -> u64 {
        e.storage()
            .instance()
            .get::<_, u64>(&DataKey::GracePeriod)
            .unwrap_or_else(|| fail(&e, RegistryError::NotInitialized, "get_grace_period"))
    }
}
