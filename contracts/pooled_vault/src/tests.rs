#![cfg(test)]

use super::*;
use soroban_sdk::{
    testutils::Address as _,
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

const MIN_CONTRIBUTION: i128 = 100;

struct VaultFixture {
    env: Env,
    admin: Address,
    alice: Address,
    bob: Address,
    vault_id: Address,
    vault: PooledVaultContractClient<'static>,
    token: TokenClient<'static>,
    token_admin_client: StellarAssetClient<'static>,
}

impl VaultFixture {
    fn setup() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let admin = Address::generate(&env);
        let alice = Address::generate(&env);
        let bob = Address::generate(&env);

        let token_admin = Address::generate(&env);
        let token_id = env.register_stellar_asset_contract(token_admin);
        let token = TokenClient::new(&env, &token_id);
        let token_admin_client = StellarAssetClient::new(&env, &token_id);

        let vault_id = env.register_contract(None, PooledVaultContract);
        let vault = PooledVaultContractClient::new(&env, &vault_id);
        vault.initialize(&admin, &token_id, &MIN_CONTRIBUTION);

        // Fund the depositors.
        token_admin_client.mint(&alice, &100_000_000);
        token_admin_client.mint(&bob, &100_000_000);

        VaultFixture {
            env,
            admin,
            alice,
            bob,
            vault_id,
            vault,
            token,
            token_admin_client,
        }
    }

    /// custody always covers the value of all outstanding shares, and the
    /// books balance to the last stroop.
    fn assert_solvent(&self) {
        let total = self.vault.total_shares();
        assert!(self.vault.value_held() >= self.vault.shares_to_value(&total));
    }
}

#[test]
fn test_initialize() {
    let f = VaultFixture::setup();
    assert_eq!(f.vault.get_admin(), f.admin);
    assert_eq!(f.vault.get_min_contribution(), MIN_CONTRIBUTION);
    assert_eq!(f.vault.total_shares(), 0);
    assert_eq!(f.vault.value_held(), 0);
    assert_eq!(f.vault.get_disburser(), None);
}

#[test]
#[should_panic(expected = "Contract already initialized")]
fn test_initialize_twice() {
    let f = VaultFixture::setup();
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::initialize(
            f.env.clone(),
            f.admin.clone(),
            f.token.address.clone(),
            MIN_CONTRIBUTION,
        );
    });
}

#[test]
fn test_genesis_contribution_mints_one_to_one_minus_dead_shares() {
    let f = VaultFixture::setup();

    let minted = f.vault.contribute(&f.alice, &1_000_000);

    assert_eq!(minted, 1_000_000 - DEAD_SHARES);
    assert_eq!(f.vault.shares_of(&f.alice), 1_000_000 - DEAD_SHARES);
    assert_eq!(f.vault.total_shares(), 1_000_000);
    assert_eq!(f.vault.dead_shares(), DEAD_SHARES);
    assert_eq!(f.vault.value_held(), 1_000_000);
    assert_eq!(f.token.balance(&f.vault_id), 1_000_000);
    f.assert_solvent();
}

#[test]
fn test_two_equal_depositors_hold_equal_shares() {
    let f = VaultFixture::setup();

    f.vault.contribute(&f.alice, &1_000_000);
    let bob_minted = f.vault.contribute(&f.bob, &1_000_000);

    // Price is still 1:1, so Bob's mint is exact.
    assert_eq!(bob_minted, 1_000_000);
    assert_eq!(f.vault.total_shares(), 2_000_000);
    assert_eq!(f.vault.value_held(), 2_000_000);
    assert_eq!(f.vault.shares_to_value(&1_000_000), 1_000_000);
    f.assert_solvent();
}

#[test]
fn test_revenue_appreciates_share_price_and_dilutes_later_deposit() {
    let f = VaultFixture::setup();

    f.vault.contribute(&f.alice, &1_000_000);
    f.vault.record_revenue(&f.bob, &500_000);

    assert_eq!(f.vault.value_held(), 1_500_000);
    // No shares minted for revenue.
    assert_eq!(f.vault.total_shares(), 1_000_000);

    // floor(1_000_000 * 1_000_000 / 1_500_000) = 666_666
    let bob_minted = f.vault.contribute(&f.bob, &1_000_000);
    assert_eq!(bob_minted, 666_666);
    f.assert_solvent();
}

#[test]
#[should_panic(expected = "Invalid amount: must meet the minimum")]
fn test_contribute_below_minimum() {
    let f = VaultFixture::setup();
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::contribute(f.env.clone(), f.alice.clone(), MIN_CONTRIBUTION - 1);
    });
}

#[test]
#[should_panic(expected = "Contribution would mint zero shares")]
fn test_genesis_below_dead_share_floor() {
    let f = VaultFixture::setup();
    f.env.as_contract(&f.vault_id, || {
        // Above the dust guard but not above the dead-share allocation.
        PooledVaultContract::contribute(f.env.clone(), f.alice.clone(), DEAD_SHARES);
    });
}

#[test]
#[should_panic(expected = "Contribution would mint zero shares")]
fn test_donation_cannot_silently_zero_a_small_deposit() {
    let f = VaultFixture::setup();
    // Tiny genesis followed by a huge donation pushes the share price so high
    // that a minimum-size deposit would floor to zero shares. The deposit must
    // be rejected, never absorbed for nothing.
    f.vault.contribute(&f.alice, &2_000);
    f.vault.record_revenue(&f.alice, &50_000_000);

    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::contribute(f.env.clone(), f.bob.clone(), MIN_CONTRIBUTION);
    });
}

#[test]
fn test_reasonable_deposit_survives_donation_attack() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);
    // Attacker donates to inflate the price ahead of Bob's deposit.
    f.vault.record_revenue(&f.alice, &10_000_000);

    let minted = f.vault.contribute(&f.bob, &1_000_000);
    assert!(minted > 0);
    // Bob's stake is worth his deposit minus only rounding loss.
    let value = f.vault.shares_to_value(&minted);
    assert!(value <= 1_000_000);
    assert!(value >= 999_000);
    f.assert_solvent();
}

#[test]
fn test_sole_holder_may_exit_fully() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);

    let balance_before = f.token.balance(&f.alice);
    let paid = f.vault.redeem(&f.alice, &(1_000_000 - DEAD_SHARES));

    // 100% of circulating shares, exempt from the withdrawal cap.
    assert_eq!(paid, 1_000_000 - DEAD_SHARES);
    assert_eq!(f.token.balance(&f.alice), balance_before + paid);
    assert_eq!(f.vault.shares_of(&f.alice), 0);
    // The dead allocation keeps its sliver of custody.
    assert_eq!(f.vault.total_shares(), DEAD_SHARES);
    assert_eq!(f.vault.value_held(), DEAD_SHARES);
    f.assert_solvent();
}

#[test]
fn test_contribute_then_redeem_never_profits() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);
    f.vault.record_revenue(&f.alice, &333_333);

    let deposit = 123_457;
    let minted = f.vault.contribute(&f.bob, &deposit);
    let returned = f.vault.redeem(&f.bob, &minted);

    assert!(returned <= deposit, "redeem must not return more than deposited");
    // Rounding loss only: two floors, each off by less than one share price.
    assert!(returned >= deposit - 4);
    f.assert_solvent();
}

#[test]
#[should_panic(expected = "Redemption exceeds single-call withdrawal cap")]
fn test_withdrawal_concentration_guard() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);
    f.vault.contribute(&f.bob, &9_500_000);

    // Bob holds 9_500_000 of 10_500_000 custody; redeeming it all would take
    // more than 90% of custody in a single call.
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::redeem(f.env.clone(), f.bob.clone(), 9_500_000);
    });
}

#[test]
fn test_withdrawal_under_cap_is_allowed() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);
    f.vault.contribute(&f.bob, &9_000_000);

    // Exactly 90% of custody is permitted.
    let paid = f.vault.redeem(&f.bob, &9_000_000);
    assert_eq!(paid, 9_000_000);
    f.assert_solvent();
}

#[test]
#[should_panic(expected = "Insufficient shares")]
fn test_redeem_more_than_held() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::redeem(f.env.clone(), f.alice.clone(), 1_000_000);
    });
}

#[test]
#[should_panic(expected = "Invalid amount: must meet the minimum")]
fn test_redeem_zero_shares() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::redeem(f.env.clone(), f.alice.clone(), 0);
    });
}

#[test]
#[should_panic(expected = "Invalid amount: must meet the minimum")]
fn test_record_revenue_rejects_zero() {
    let f = VaultFixture::setup();
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::record_revenue(f.env.clone(), f.alice.clone(), 0);
    });
}

#[test]
fn test_disburse_pays_without_burning_shares() {
    let f = VaultFixture::setup();
    let registry = Address::generate(&f.env);
    let winner = Address::generate(&f.env);

    f.vault.contribute(&f.alice, &1_000_000);
    f.vault.set_disburser(&f.admin, &registry);
    assert_eq!(f.vault.get_disburser(), Some(registry.clone()));

    f.vault.disburse(&registry, &winner, &250_000);

    assert_eq!(f.vault.value_held(), 750_000);
    assert_eq!(f.token.balance(&winner), 250_000);
    // Share supply untouched; the pool absorbed the liability.
    assert_eq!(f.vault.total_shares(), 1_000_000);
    f.assert_solvent();
}

#[test]
#[should_panic(expected = "Unauthorized: caller not allowed")]
fn test_disburse_rejects_non_disburser() {
    let f = VaultFixture::setup();
    let registry = Address::generate(&f.env);
    f.vault.contribute(&f.alice, &1_000_000);
    f.vault.set_disburser(&f.admin, &registry);

    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::disburse(f.env.clone(), f.bob.clone(), f.bob.clone(), 1_000);
    });
}

#[test]
#[should_panic(expected = "Contract not initialized")]
fn test_disburse_before_disburser_is_set() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::disburse(f.env.clone(), f.bob.clone(), f.bob.clone(), 1_000);
    });
}

#[test]
#[should_panic(expected = "Insufficient custody balance")]
fn test_disburse_cannot_overdraw() {
    let f = VaultFixture::setup();
    let registry = Address::generate(&f.env);
    f.vault.contribute(&f.alice, &1_000_000);
    f.vault.set_disburser(&f.admin, &registry);

    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::disburse(f.env.clone(), registry.clone(), f.bob.clone(), 1_000_001);
    });
}

#[test]
#[should_panic(expected = "Unauthorized: caller not allowed")]
fn test_set_disburser_requires_admin() {
    let f = VaultFixture::setup();
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::set_disburser(f.env.clone(), f.alice.clone(), f.bob.clone());
    });
}

#[test]
#[should_panic(expected = "Zero address is not allowed")]
fn test_set_disburser_rejects_zero_address() {
    let f = VaultFixture::setup();
    let zero = Address::from_string(&String::from_str(
        &f.env,
        "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF",
    ));
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::set_disburser(f.env.clone(), f.admin.clone(), zero.clone());
    });
}

#[test]
#[should_panic(expected = "Contract is paused")]
fn test_pause_blocks_contributions() {
    let f = VaultFixture::setup();
    f.vault.pause(&f.admin);
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::contribute(f.env.clone(), f.alice.clone(), 1_000_000);
    });
}

#[test]
fn test_unpause_restores_operation() {
    let f = VaultFixture::setup();
    f.vault.pause(&f.admin);
    assert!(f.vault.is_paused());
    f.vault.unpause(&f.admin);
    assert!(!f.vault.is_paused());
    assert_eq!(f.vault.contribute(&f.alice, &1_000_000), 1_000_000 - DEAD_SHARES);
}

#[test]
fn test_two_step_admin_handover() {
    let f = VaultFixture::setup();
    let successor = Address::generate(&f.env);

    f.vault.propose_admin(&f.admin, &successor);
    // Nothing changes until the successor accepts.
    assert_eq!(f.vault.get_admin(), f.admin);

    f.vault.accept_admin(&successor);
    assert_eq!(f.vault.get_admin(), successor);

    // The new admin can manage the disburser.
    let registry = Address::generate(&f.env);
    f.vault.set_disburser(&successor, &registry);
}

#[test]
#[should_panic(expected = "Unauthorized: caller not allowed")]
fn test_accept_admin_requires_nomination() {
    let f = VaultFixture::setup();
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::accept_admin(f.env.clone(), f.bob.clone());
    });
}

#[test]
#[should_panic(expected = "Unauthorized: caller not allowed")]
fn test_old_admin_loses_control_after_handover() {
    let f = VaultFixture::setup();
    let successor = Address::generate(&f.env);
    f.vault.propose_admin(&f.admin, &successor);
    f.vault.accept_admin(&successor);

    let registry = Address::generate(&f.env);
    f.env.as_contract(&f.vault_id, || {
        PooledVaultContract::set_disburser(f.env.clone(), f.admin.clone(), registry.clone());
    });
}

#[test]
fn test_conversion_round_trip_floors() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);
    f.vault.record_revenue(&f.bob, &777_777);

    for v in [1i128, 99, 12_345, 999_999] {
        let shares = f.vault.value_to_shares(&v);
        let back = f.vault.shares_to_value(&shares);
        assert!(back <= v, "round trip must never exceed the input");
    }
}

#[test]
fn test_share_books_balance() {
    let f = VaultFixture::setup();
    f.vault.contribute(&f.alice, &1_000_000);
    f.vault.contribute(&f.bob, &3_000_000);
    f.vault.record_revenue(&f.alice, &123_456);
    f.vault.redeem(&f.bob, &1_000_000);

    let credited = f.vault.shares_of(&f.alice) + f.vault.shares_of(&f.bob);
    assert_eq!(credited + f.vault.dead_shares(), f.vault.total_shares());
    f.assert_solvent();
}
