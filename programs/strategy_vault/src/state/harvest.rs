/**
 * Harvest Engine
 *
 * WINDOWS:
 * - Once `harvest_delay` has passed since the last harvest, the next
 *   harvest opens a new window.
 * - Until `harvest_window` seconds after the window opened, more harvests
 *   may run (e.g. over different strategy subsets).
 * - After that, harvests are rejected until the delay passes again.
 *
 * Registry and harvest state are staged and only written once every
 * strategy in the list has been read successfully.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    state::{
        strategy::{read_record, write_record},
        StrategyData,
        Vault,
    },
    VaultError,
};

/// Source of strategies' current underlying balances
pub trait StrategyBalances {
    /// Underlying held by `strategy`, the `position`-th entry of the harvest list
    fn underlying_balance(&self, position: usize, strategy: &Pubkey) -> Result<u64>;
}

/// Harvest admission state, derived from the clock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HarvestPhase {
    /// Delay passed: the next harvest opens a new window
    Idle,
    /// Inside the current window: harvests allowed
    WindowOpen,
    /// Window over, delay not yet passed: harvests rejected
    WindowClosed,
}

/// What a harvest did, for events and logs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HarvestReport {
    pub opened_window: bool,
    pub total_profit_accrued: u64,
    pub fees_accrued: u64,
    pub max_locked_profit: u64,
    pub total_strategy_holdings: u64,
    /// Scheduled delay that took effect with this harvest
    pub applied_harvest_delay: Option<i64>,
}

impl Vault {
    /// Current harvest admission state
    pub fn harvest_phase(&self, current_time: i64) -> Result<HarvestPhase> {
        if self.harvest_delay_passed(current_time)? {
            return Ok(HarvestPhase::Idle);
        }

        let window_end = self.last_harvest_window_start
            .checked_add(self.harvest_window)
            .ok_or(VaultError::MathOverflow)?;

        if current_time <= window_end {
            Ok(HarvestPhase::WindowOpen)
        } else {
            Ok(HarvestPhase::WindowClosed)
        }
    }

    /// Realize profit and loss for `strategies` at `current_time`.
    ///
    /// Gains count as profit, losses only lower total strategy holdings.
    /// Post-fee profit is locked on top of what is still locked, and decay
    /// restarts from now.
    pub fn harvest<B: StrategyBalances>(
        &mut self,
        current_time: i64,
        strategies: &[Pubkey],
        balances: &B,
    ) -> Result<HarvestReport> {
        let opened_window = match self.harvest_phase(current_time)? {
            HarvestPhase::Idle => true,
            HarvestPhase::WindowOpen => false,
            HarvestPhase::WindowClosed => return Err(error!(VaultError::HarvestWindowClosed)),
        };

        let mut staged_strategies = self.strategies.clone();
        let mut total_profit_accrued: u64 = 0;
        let mut new_total_strategy_holdings = self.total_strategy_holdings;

        for (position, strategy) in strategies.iter().enumerate() {
            let data = read_record(&staged_strategies, strategy);
            require!(data.trusted, VaultError::UntrustedStrategy);

            let balance_last_harvest = data.balance;
            let balance_this_harvest = balances
                .underlying_balance(position, strategy)
                .map_err(|err| {
                    msg!("Balance query failed for strategy {}: {}", strategy, err);
                    error!(VaultError::StrategyQueryFailed)
                })?;

            write_record(
                &mut staged_strategies,
                StrategyData {
                    balance: balance_this_harvest,
                    ..data
                },
            )?;

            // Add before subtracting so a loss can't underflow mid-way
            new_total_strategy_holdings = new_total_strategy_holdings
                .checked_add(balance_this_harvest)
                .ok_or(VaultError::MathOverflow)?
                .checked_sub(balance_last_harvest)
                .ok_or(VaultError::MathUnderflow)?;

            if balance_this_harvest > balance_last_harvest {
                total_profit_accrued = total_profit_accrued
                    .checked_add(balance_this_harvest - balance_last_harvest)
                    .ok_or(VaultError::MathOverflow)?;
            }
        }

        let fees_accrued = self.fee_on(total_profit_accrued)?;

        let max_locked_profit = self
            .locked_profit(current_time)?
            .checked_add(total_profit_accrued)
            .ok_or(VaultError::MathOverflow)?
            .checked_sub(fees_accrued)
            .ok_or(VaultError::MathUnderflow)?;

        let total_fees_accrued = self.total_fees_accrued
            .checked_add(fees_accrued)
            .ok_or(VaultError::MathOverflow)?;

        // Commit
        self.strategies = staged_strategies;
        self.max_locked_profit = max_locked_profit;
        self.total_strategy_holdings = new_total_strategy_holdings;
        self.total_fees_accrued = total_fees_accrued;
        if opened_window {
            self.last_harvest_window_start = current_time;
        }
        self.last_harvest = current_time;

        let applied_harvest_delay = if self.next_harvest_delay != 0 {
            self.harvest_delay = self.next_harvest_delay;
            self.next_harvest_delay = 0;
            Some(self.harvest_delay)
        } else {
            None
        };

        Ok(HarvestReport {
            opened_window,
            total_profit_accrued,
            fees_accrued,
            max_locked_profit,
            total_strategy_holdings: new_total_strategy_holdings,
            applied_harvest_delay,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::state::vault::test_support::*;
    use crate::state::HarvestDelayChange;
    use crate::PERCENT_SCALE;

    /// In-memory balances keyed by strategy; missing keys fail the query
    #[derive(Default)]
    struct Balances(HashMap<Pubkey, u64>);

    impl Balances {
        fn with(entries: &[(Pubkey, u64)]) -> Self {
            Self(entries.iter().copied().collect())
        }
    }

    impl StrategyBalances for Balances {
        fn underlying_balance(&self, _position: usize, strategy: &Pubkey) -> Result<u64> {
            self.0
                .get(strategy)
                .copied()
                .ok_or_else(|| error!(VaultError::StrategyQueryFailed))
        }
    }

    /// Vault with delay 1000, window 100 and one trusted strategy
    fn configured_vault() -> Vault {
        let mut vault = empty_vault();
        vault.set_harvest_delay(1_000).unwrap();
        vault.set_harvest_window(100).unwrap();
        vault.trust_strategy(key(10)).unwrap();
        vault
    }

    fn seed_strategy(vault: &mut Vault, strategy: Pubkey, balance: u64) {
        vault.register_strategy(strategy, true, balance).unwrap();
    }

    #[test]
    fn window_scenario() {
        let mut vault = configured_vault();
        let none = Balances::default();

        assert_eq!(vault.harvest_phase(500).unwrap(), HarvestPhase::WindowClosed);
        assert_vault_error(vault.harvest(500, &[], &none), VaultError::HarvestWindowClosed);

        assert_eq!(vault.harvest_phase(1_000).unwrap(), HarvestPhase::Idle);
        let report = vault.harvest(1_000, &[], &none).unwrap();
        assert!(report.opened_window);
        assert_eq!(vault.last_harvest_window_start, 1_000);
        assert_eq!(vault.last_harvest, 1_000);

        assert_eq!(vault.harvest_phase(1_050).unwrap(), HarvestPhase::WindowOpen);
        let report = vault.harvest(1_050, &[], &none).unwrap();
        assert!(!report.opened_window);
        assert_eq!(vault.last_harvest_window_start, 1_000);
        assert_eq!(vault.last_harvest, 1_050);

        assert_eq!(vault.harvest_phase(1_150).unwrap(), HarvestPhase::WindowClosed);
        assert_vault_error(vault.harvest(1_150, &[], &none), VaultError::HarvestWindowClosed);
        assert_eq!(vault.last_harvest, 1_050);
    }

    #[test]
    fn window_end_is_inclusive() {
        let mut vault = configured_vault();
        let none = Balances::default();

        vault.harvest(1_000, &[], &none).unwrap();
        vault.harvest(1_100, &[], &none).unwrap();
        assert_vault_error(vault.harvest(1_101, &[], &none), VaultError::HarvestWindowClosed);
    }

    #[test]
    fn new_window_opens_after_delay_from_last_harvest() {
        let mut vault = configured_vault();
        let none = Balances::default();

        vault.harvest(1_000, &[], &none).unwrap();
        vault.harvest(1_080, &[], &none).unwrap();
        // delay runs from the last harvest, not the window start
        assert_vault_error(vault.harvest(2_000, &[], &none), VaultError::HarvestWindowClosed);
        let report = vault.harvest(2_080, &[], &none).unwrap();
        assert!(report.opened_window);
        assert_eq!(vault.last_harvest_window_start, 2_080);
    }

    #[test]
    fn profit_is_fee_taxed_and_locked() {
        let mut vault = configured_vault();
        vault.set_fee_percent(PERCENT_SCALE / 10).unwrap();
        seed_strategy(&mut vault, key(10), 1_000);

        let report = vault
            .harvest(1_000, &[key(10)], &Balances::with(&[(key(10), 1_200)]))
            .unwrap();

        assert_eq!(report.total_profit_accrued, 200);
        assert_eq!(report.fees_accrued, 20);
        assert_eq!(report.max_locked_profit, 180);
        assert_eq!(vault.max_locked_profit, 180);
        assert_eq!(vault.total_strategy_holdings, 1_200);
        assert_eq!(vault.total_fees_accrued, 20);
        assert_eq!(vault.get_strategy(&key(10)).balance, 1_200);

        // all of the new profit is locked right after the harvest
        assert_eq!(vault.locked_profit(1_000).unwrap(), 180);
        assert_eq!(vault.total_holdings(1_000, 0).unwrap(), 1_020);
        assert_eq!(vault.total_holdings(2_000, 0).unwrap(), 1_200);
    }

    #[test]
    fn new_profit_stacks_on_still_locked_profit() {
        let mut vault = configured_vault();
        vault.set_fee_percent(PERCENT_SCALE / 10).unwrap();
        seed_strategy(&mut vault, key(10), 1_000);

        vault
            .harvest(1_000, &[key(10)], &Balances::with(&[(key(10), 2_000)]))
            .unwrap();
        assert_eq!(vault.max_locked_profit, 900);

        // half a window in, 900 - 900 * 50 / 1000 = 855 still locked
        let report = vault
            .harvest(1_050, &[key(10)], &Balances::with(&[(key(10), 2_200)]))
            .unwrap();
        assert_eq!(report.max_locked_profit, 855 + 180);
        assert_eq!(vault.locked_profit(1_050).unwrap(), 1_035);
        assert_eq!(vault.locked_profit(2_050).unwrap(), 0);
    }

    #[test]
    fn losses_reduce_holdings_without_profit_or_fees() {
        let mut vault = configured_vault();
        vault.set_fee_percent(PERCENT_SCALE / 2).unwrap();
        seed_strategy(&mut vault, key(10), 1_000);
        seed_strategy(&mut vault, key(11), 1_000);

        let report = vault
            .harvest(
                1_000,
                &[key(10), key(11)],
                &Balances::with(&[(key(10), 700), (key(11), 1_100)]),
            )
            .unwrap();

        assert_eq!(report.total_profit_accrued, 100);
        assert_eq!(report.fees_accrued, 50);
        assert_eq!(vault.total_strategy_holdings, 1_800);
        assert_eq!(vault.get_strategy(&key(10)).balance, 700);
        assert_eq!(vault.get_strategy(&key(11)).balance, 1_100);
    }

    #[test]
    fn registered_baseline_is_not_booked_as_profit() {
        let mut vault = configured_vault();
        vault.set_fee_percent(PERCENT_SCALE / 10).unwrap();
        vault.register_strategy(key(10), true, 1_000_000).unwrap();

        let report = vault
            .harvest(1_000, &[key(10)], &Balances::with(&[(key(10), 1_050_000)]))
            .unwrap();

        assert_eq!(report.total_profit_accrued, 50_000);
        assert_eq!(report.fees_accrued, 5_000);
        assert_eq!(report.max_locked_profit, 45_000);
        assert_eq!(vault.total_strategy_holdings, 1_050_000);
    }

    #[test]
    fn trusting_without_baseline_books_whole_balance() {
        let mut vault = configured_vault();
        vault.set_fee_percent(PERCENT_SCALE / 10).unwrap();

        let report = vault
            .harvest(1_000, &[key(10)], &Balances::with(&[(key(10), 1_000_000)]))
            .unwrap();

        assert_eq!(report.total_profit_accrued, 1_000_000);
        assert_eq!(report.fees_accrued, 100_000);
    }

    #[test]
    fn empty_harvest_relocks_current_locked_profit() {
        let mut vault = configured_vault();
        let none = Balances::default();
        seed_strategy(&mut vault, key(10), 1_000);

        vault
            .harvest(1_000, &[key(10)], &Balances::with(&[(key(10), 2_000)]))
            .unwrap();
        assert_eq!(vault.max_locked_profit, 1_000);
        assert_eq!(vault.locked_profit(2_000).unwrap(), 0);

        let locked_before = vault.locked_profit(1_050).unwrap();
        assert_eq!(locked_before, 950);

        let report = vault.harvest(1_050, &[], &none).unwrap();
        assert_eq!(report.total_profit_accrued, 0);
        assert_eq!(report.fees_accrued, 0);

        // same amount locked right now, but it decays from 1050 again
        assert_eq!(vault.locked_profit(1_050).unwrap(), locked_before);
        assert_eq!(vault.max_locked_profit, 950);
        assert_eq!(vault.last_harvest, 1_050);
        assert_eq!(vault.locked_profit(1_999).unwrap(), 49);
        assert_eq!(vault.locked_profit(2_000).unwrap(), 48);
        assert_eq!(vault.locked_profit(2_050).unwrap(), 0);
    }

    #[test]
    fn empty_harvest_keeps_zero_locked_profit() {
        let mut vault = configured_vault();
        let none = Balances::default();

        vault.harvest(1_000, &[], &none).unwrap();
        let report = vault.harvest(1_050, &[], &none).unwrap();

        assert_eq!(report.total_profit_accrued, 0);
        assert_eq!(report.fees_accrued, 0);
        assert_eq!(vault.max_locked_profit, 0);
        assert_eq!(vault.last_harvest, 1_050);
    }

    #[test]
    fn untrusted_strategy_aborts_without_state_change() {
        let mut vault = configured_vault();
        seed_strategy(&mut vault, key(10), 1_000);
        vault.set_strategy(key(20), false, 50).unwrap();
        let before = vault.clone();

        let balances = Balances::with(&[(key(10), 5_000), (key(20), 60)]);

        assert_vault_error(
            vault.harvest(1_000, &[key(10), key(20)], &balances),
            VaultError::UntrustedStrategy,
        );
        // never registered at all
        assert_vault_error(
            vault.harvest(1_000, &[key(10), key(99)], &balances),
            VaultError::UntrustedStrategy,
        );

        assert_eq!(vault.strategies, before.strategies);
        assert_eq!(vault.total_strategy_holdings, before.total_strategy_holdings);
        assert_eq!(vault.max_locked_profit, before.max_locked_profit);
        assert_eq!(vault.last_harvest, before.last_harvest);
        assert_eq!(vault.last_harvest_window_start, before.last_harvest_window_start);
    }

    #[test]
    fn failed_balance_query_aborts_without_state_change() {
        let mut vault = configured_vault();
        seed_strategy(&mut vault, key(10), 1_000);
        seed_strategy(&mut vault, key(11), 1_000);
        vault.set_harvest_delay(400).unwrap();
        let before = vault.clone();

        // key(11) has no readable balance
        let balances = Balances::with(&[(key(10), 3_000)]);

        assert_vault_error(
            vault.harvest(1_000, &[key(10), key(11)], &balances),
            VaultError::StrategyQueryFailed,
        );

        assert_eq!(vault.strategies, before.strategies);
        assert_eq!(vault.get_strategy(&key(10)).balance, 1_000);
        assert_eq!(vault.total_strategy_holdings, 2_000);
        assert_eq!(vault.harvest_delay, 1_000);
        assert_eq!(vault.next_harvest_delay, 400);
        assert_eq!(vault.last_harvest, 0);
    }

    #[test]
    fn scheduled_delay_applies_on_next_harvest() {
        let mut vault = configured_vault();
        let none = Balances::default();

        assert_eq!(vault.set_harvest_delay(500).unwrap(), HarvestDelayChange::Scheduled);
        assert_eq!(vault.harvest_delay, 1_000);
        assert_eq!(vault.next_harvest_delay, 500);

        // rejected harvest leaves the pending delay alone
        assert_vault_error(vault.harvest(500, &[], &none), VaultError::HarvestWindowClosed);
        assert_eq!(vault.harvest_delay, 1_000);

        let report = vault.harvest(1_000, &[], &none).unwrap();
        assert_eq!(report.applied_harvest_delay, Some(500));
        assert_eq!(vault.harvest_delay, 500);
        assert_eq!(vault.next_harvest_delay, 0);

        let report = vault.harvest(1_050, &[], &none).unwrap();
        assert_eq!(report.applied_harvest_delay, None);

        // new delay governs the next cycle
        assert_eq!(vault.harvest_phase(1_549).unwrap(), HarvestPhase::WindowClosed);
        assert_eq!(vault.harvest_phase(1_550).unwrap(), HarvestPhase::Idle);
    }

    #[test]
    fn repeated_strategy_is_counted_once_per_change() {
        let mut vault = configured_vault();
        seed_strategy(&mut vault, key(10), 1_000);

        let report = vault
            .harvest(
                1_000,
                &[key(10), key(10)],
                &Balances::with(&[(key(10), 1_300)]),
            )
            .unwrap();

        assert_eq!(report.total_profit_accrued, 300);
        assert_eq!(vault.total_strategy_holdings, 1_300);
    }

    #[test]
    fn holdings_match_recorded_balances_after_full_pass() {
        let mut vault = configured_vault();
        let strategies = [key(10), key(11), key(12)];
        for (i, strategy) in strategies.iter().enumerate() {
            seed_strategy(&mut vault, *strategy, 1_000 * (i as u64 + 1));
        }

        vault
            .harvest(
                1_000,
                &strategies,
                &Balances::with(&[(key(10), 900), (key(11), 2_500), (key(12), 3_000)]),
            )
            .unwrap();

        let recorded: u64 = strategies
            .iter()
            .map(|s| vault.get_strategy(s).balance)
            .sum();
        assert_eq!(vault.total_strategy_holdings, recorded);
        assert_eq!(vault.total_strategy_holdings, 6_400);
    }

    #[test]
    fn total_holdings_tracks_unlocked_holdings_across_harvests() {
        let mut vault = configured_vault();
        vault.set_fee_percent(PERCENT_SCALE / 5).unwrap();
        seed_strategy(&mut vault, key(10), 10_000);

        let mut balance = 10_000;
        let mut now = 1_000;
        for step in 0..20u64 {
            // alternate gains and losses
            balance = if step % 3 == 2 { balance - 700 } else { balance + 1_000 };
            vault
                .harvest(now, &[key(10)], &Balances::with(&[(key(10), balance)]))
                .unwrap();
            for t in [now, now + 25, now + 100] {
                let locked = vault.locked_profit(t).unwrap();
                assert!(locked <= vault.total_strategy_holdings);
                assert_eq!(
                    vault.total_holdings(t, 5).unwrap(),
                    vault.total_strategy_holdings - locked + 5
                );
            }
            now += 1_000;
        }
    }

    #[test]
    fn total_holdings_errors_when_loss_exceeds_unlocked_holdings() {
        let mut vault = configured_vault();
        seed_strategy(&mut vault, key(10), 0);

        vault
            .harvest(1_000, &[key(10)], &Balances::with(&[(key(10), 1_000)]))
            .unwrap();
        vault
            .harvest(1_050, &[key(10)], &Balances::with(&[(key(10), 0)]))
            .unwrap();

        // losses leave locked profit alone, so holdings fall below it
        assert_eq!(vault.total_strategy_holdings, 0);
        assert_eq!(vault.locked_profit(1_050).unwrap(), 950);
        assert_vault_error(vault.total_holdings(1_050, 0), VaultError::MathUnderflow);
        assert_eq!(vault.total_holdings(2_050, 0).unwrap(), 0);
    }
}
