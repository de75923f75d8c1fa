/**
 * Strategy Registry
 *
 * Per-strategy trust flag and the underlying balance observed at the last
 * harvest that included the strategy. Unknown strategies read as untrusted
 * with a zero balance.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{state::Vault, VaultError, MAX_STRATEGIES};

/// Strategy record stored in the vault
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct StrategyData {
    /// Strategy address (owner of its underlying token account)
    pub strategy: Pubkey,
    /// Only trusted strategies may be harvested
    pub trusted: bool,
    /// Underlying held by the strategy at its last harvest
    pub balance: u64,
}

impl StrategyData {
    pub const LEN: usize = 32 + // strategy
        1 +  // trusted
        8;   // balance

    /// Record for a strategy the vault has never seen
    pub fn untracked(strategy: Pubkey) -> Self {
        Self {
            strategy,
            trusted: false,
            balance: 0,
        }
    }
}

/// Look up a strategy in a registry table
pub(crate) fn read_record(table: &[StrategyData], strategy: &Pubkey) -> StrategyData {
    table
        .iter()
        .find(|record| record.strategy == *strategy)
        .copied()
        .unwrap_or_else(|| StrategyData::untracked(*strategy))
}

/// Overwrite (or insert) a strategy in a registry table
pub(crate) fn write_record(table: &mut Vec<StrategyData>, record: StrategyData) -> Result<()> {
    if let Some(existing) = table.iter_mut().find(|r| r.strategy == record.strategy) {
        *existing = record;
        return Ok(());
    }

    // Writing the zero record for an unknown strategy changes nothing observable
    if record == StrategyData::untracked(record.strategy) {
        return Ok(());
    }

    require!(table.len() < MAX_STRATEGIES, VaultError::StrategyRegistryFull);
    table.push(record);
    Ok(())
}

impl Vault {
    pub fn get_strategy(&self, strategy: &Pubkey) -> StrategyData {
        read_record(&self.strategies, strategy)
    }

    pub fn set_strategy(&mut self, strategy: Pubkey, trusted: bool, balance: u64) -> Result<()> {
        write_record(
            &mut self.strategies,
            StrategyData {
                strategy,
                trusted,
                balance,
            },
        )
    }

    /// Record a strategy with a known balance, moving total strategy holdings
    /// by the change so the next harvest only books what accrues after this
    pub fn register_strategy(&mut self, strategy: Pubkey, trusted: bool, balance: u64) -> Result<()> {
        let previous = self.get_strategy(&strategy).balance;
        let total_strategy_holdings = self.total_strategy_holdings
            .checked_add(balance)
            .ok_or(VaultError::MathOverflow)?
            .checked_sub(previous)
            .ok_or(VaultError::MathUnderflow)?;

        self.set_strategy(strategy, trusted, balance)?;
        self.total_strategy_holdings = total_strategy_holdings;
        Ok(())
    }

    /// Mark a strategy trusted, keeping its recorded balance
    pub fn trust_strategy(&mut self, strategy: Pubkey) -> Result<()> {
        let balance = self.get_strategy(&strategy).balance;
        self.set_strategy(strategy, true, balance)
    }

    /// Mark a strategy untrusted, keeping its recorded balance
    pub fn distrust_strategy(&mut self, strategy: Pubkey) -> Result<()> {
        let balance = self.get_strategy(&strategy).balance;
        self.set_strategy(strategy, false, balance)
    }
}
