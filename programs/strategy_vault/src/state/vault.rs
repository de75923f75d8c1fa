/**
 * Vault State
 *
 * Configuration, harvest bookkeeping and locked profit decay.
 * Locked profit unlocks linearly over the harvest delay so share value
 * cannot be front-run around a harvest.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    state::StrategyData,
    VaultError,
    MAX_HARVEST_DELAY_SECONDS,
    MAX_STRATEGIES,
    MAX_WITHDRAWAL_QUEUE_SIZE,
    PERCENT_SCALE,
};

/// Outcome of a harvest delay update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HarvestDelayChange {
    /// Vault had no delay yet, new delay is live
    Applied,
    /// Stored in `next_harvest_delay` until the next harvest
    Scheduled,
}

/// Vault account
/// One per underlying mint, holds every piece of vault accounting state
#[account]
pub struct Vault {
    // ─────────────────────────────────────────────────────────────────────────
    // IDENTIFIERS
    // ─────────────────────────────────────────────────────────────────────────

    /// Admin who can configure and harvest
    pub authority: Pubkey,
    /// Mint of the asset the vault manages
    pub underlying_mint: Pubkey,
    /// Token account holding the vault's float (owned by the vault PDA)
    pub float_account: Pubkey,

    // ─────────────────────────────────────────────────────────────────────────
    // CONFIG
    // ─────────────────────────────────────────────────────────────────────────

    /// Fee on harvested profit (1e18 = 100%)
    pub fee_percent: u64,
    /// Seconds after a window opens during which more harvests are allowed
    pub harvest_window: i64,
    /// Minimum seconds between harvest windows, also the profit unlock period
    pub harvest_delay: i64,
    /// Harvest delay to apply at the next harvest (0 = none pending)
    pub next_harvest_delay: i64,
    /// Share of holdings to keep as float (1e18 = 100%)
    pub target_float_percent: u128,

    // ─────────────────────────────────────────────────────────────────────────
    // HARVEST STATE
    // ─────────────────────────────────────────────────────────────────────────

    /// Timestamp of the last harvest
    pub last_harvest: i64,
    /// Timestamp the current harvest window opened
    pub last_harvest_window_start: i64,
    /// Profit locked at the end of the last harvest
    pub max_locked_profit: u64,
    /// Underlying deployed in strategies, locked profit included
    pub total_strategy_holdings: u64,
    /// Fees taken on harvested profit (lifetime)
    pub total_fees_accrued: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // STRATEGIES
    // ─────────────────────────────────────────────────────────────────────────

    /// Per-strategy trust flag and balance at last harvest
    pub strategies: Vec<StrategyData>,
    /// Strategies in withdrawal priority order (tip drawn from first)
    pub withdrawal_queue: Vec<Pubkey>,

    /// Bump seed for PDA
    pub bump: u8,
    /// Reserved for future use
    pub reserved: [u8; 64],
}

impl Vault {
    pub const LEN: usize = 8 + // discriminator
        32 + // authority
        32 + // underlying_mint
        32 + // float_account
        8 +  // fee_percent
        8 +  // harvest_window
        8 +  // harvest_delay
        8 +  // next_harvest_delay
        16 + // target_float_percent
        8 +  // last_harvest
        8 +  // last_harvest_window_start
        8 +  // max_locked_profit
        8 +  // total_strategy_holdings
        8 +  // total_fees_accrued
        4 + StrategyData::LEN * MAX_STRATEGIES + // strategies
        4 + 32 * MAX_WITHDRAWAL_QUEUE_SIZE + // withdrawal_queue
        1 +  // bump
        64;  // reserved

    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Initialize a new vault with zeroed config and harvest state
    pub fn initialize(
        &mut self,
        authority: Pubkey,
        underlying_mint: Pubkey,
        float_account: Pubkey,
        bump: u8,
    ) {
        self.authority = authority;
        self.underlying_mint = underlying_mint;
        self.float_account = float_account;
        self.fee_percent = 0;
        self.harvest_window = 0;
        self.harvest_delay = 0;
        self.next_harvest_delay = 0;
        self.target_float_percent = 0;
        self.last_harvest = 0;
        self.last_harvest_window_start = 0;
        self.max_locked_profit = 0;
        self.total_strategy_holdings = 0;
        self.total_fees_accrued = 0;
        self.strategies = Vec::new();
        self.withdrawal_queue = Vec::new();
        self.bump = bump;
    }

    // =========================================================================
    // CONFIG SETTERS
    // =========================================================================

    pub fn set_fee_percent(&mut self, new_fee_percent: u64) -> Result<()> {
        require!(
            new_fee_percent > 0 && new_fee_percent <= PERCENT_SCALE,
            VaultError::InvalidFeePercent
        );

        self.fee_percent = new_fee_percent;
        Ok(())
    }

    /// The window may not outlast the live delay or a pending one
    pub fn set_harvest_window(&mut self, new_harvest_window: i64) -> Result<()> {
        require!(
            new_harvest_window >= 0 && new_harvest_window <= self.harvest_delay,
            VaultError::InvalidHarvestWindow
        );
        require!(
            self.next_harvest_delay == 0 || new_harvest_window <= self.next_harvest_delay,
            VaultError::InvalidHarvestWindow
        );

        self.harvest_window = new_harvest_window;
        Ok(())
    }

    /// A fresh vault takes the delay at once. Afterwards changes wait for the
    /// next harvest so decay timing can't be moved mid-cycle.
    pub fn set_harvest_delay(&mut self, new_harvest_delay: i64) -> Result<HarvestDelayChange> {
        require!(
            new_harvest_delay > 0 && new_harvest_delay <= MAX_HARVEST_DELAY_SECONDS,
            VaultError::InvalidHarvestDelay
        );
        require!(
            new_harvest_delay >= self.harvest_window,
            VaultError::InvalidHarvestDelay
        );

        if self.harvest_delay == 0 {
            self.harvest_delay = new_harvest_delay;
            Ok(HarvestDelayChange::Applied)
        } else {
            self.next_harvest_delay = new_harvest_delay;
            Ok(HarvestDelayChange::Scheduled)
        }
    }

    pub fn set_target_float_percent(&mut self, new_target_float_percent: u128) -> Result<()> {
        require!(
            new_target_float_percent < u128::MAX,
            VaultError::InvalidTargetFloatPercent
        );

        self.target_float_percent = new_target_float_percent;
        Ok(())
    }

    // =========================================================================
    // LOCKED PROFIT
    // =========================================================================

    /// Check if a full harvest delay has passed since the last harvest
    pub fn harvest_delay_passed(&self, current_time: i64) -> Result<bool> {
        let delay_end = self.last_harvest
            .checked_add(self.harvest_delay)
            .ok_or(VaultError::MathOverflow)?;
        Ok(delay_end <= current_time)
    }

    /// Profit from the last harvest that has not unlocked yet.
    /// Decays linearly from `max_locked_profit` to zero over `harvest_delay`.
    pub fn locked_profit(&self, current_time: i64) -> Result<u64> {
        if self.harvest_delay_passed(current_time)? {
            return Ok(0);
        }

        // delay not passed, so 0 <= elapsed < harvest_delay
        let elapsed = current_time.saturating_sub(self.last_harvest).max(0) as u128;

        let decayed = (self.max_locked_profit as u128)
            .checked_mul(elapsed)
            .ok_or(VaultError::MathOverflow)?
            .checked_div(self.harvest_delay as u128)
            .ok_or(VaultError::MathOverflow)?;
        let decayed = u64::try_from(decayed).map_err(|_| VaultError::MathOverflow)?;

        Ok(self.max_locked_profit
            .checked_sub(decayed)
            .ok_or(VaultError::MathUnderflow)?)
    }

    /// Strategy holdings net of locked profit, plus float
    pub fn total_holdings(&self, current_time: i64, total_float: u64) -> Result<u64> {
        let locked_profit = self.locked_profit(current_time)?;

        Ok(self.total_strategy_holdings
            .checked_sub(locked_profit)
            .ok_or(VaultError::MathUnderflow)?
            .checked_add(total_float)
            .ok_or(VaultError::MathOverflow)?)
    }

    /// Fee owed on `profit` at the current fee percent (rounds down)
    pub fn fee_on(&self, profit: u64) -> Result<u64> {
        let fee = (profit as u128)
            .checked_mul(self.fee_percent as u128)
            .ok_or(VaultError::MathOverflow)?
            / PERCENT_SCALE as u128;

        Ok(u64::try_from(fee).map_err(|_| VaultError::MathOverflow)?)
    }
}
