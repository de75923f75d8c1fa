/**
 * Strategy Vault
 *
 * Yield aggregating vault accounting: strategy registry, harvest windows,
 * linearly decaying locked profit and withdrawal queue ordering.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 *
 * License: BSL 1.1 (converts to MIT after Dec 2028)
 */

use anchor_lang::prelude::*;

pub mod state;
pub mod instructions;

pub use instructions::*;

declare_id!("EKU7pATyZvZwT6fqZUTKJk5GN15mkcBaHy31BeJ9RM3r");

// =============================================================================
// SEEDS
// =============================================================================

pub const VAULT_SEED: &[u8] = b"vault";

// =============================================================================
// CONSTANTS
// =============================================================================

/// Fixed-point scale for percentages (1e18 = 100%)
pub const PERCENT_SCALE: u64 = 1_000_000_000_000_000_000;

/// Longest allowed harvest delay: 365 days
pub const MAX_HARVEST_DELAY_SECONDS: i64 = 365 * 24 * 60 * 60;

/// Maximum number of strategy records a vault can track
pub const MAX_STRATEGIES: usize = 32;

/// Maximum withdrawal queue length.
/// Kept below 32 so `get_withdrawal_queue` fits in 1024 bytes of return data.
pub const MAX_WITHDRAWAL_QUEUE_SIZE: usize = 31;

// =============================================================================
// PROGRAM
// =============================================================================

#[program]
pub mod strategy_vault {
    use super::*;

    // =========================================================================
    // VAULT SETUP
    // =========================================================================

    /// Create the vault for an underlying mint.
    /// All configuration and harvest state start at zero.
    pub fn initialize_vault(ctx: Context<InitializeVault>) -> Result<()> {
        instructions::initialize_vault::handler(ctx)
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    /// Set the fee taken on harvested profit (1e18 = 100%)
    pub fn set_fee_percent(ctx: Context<ConfigureVault>, new_fee_percent: u64) -> Result<()> {
        instructions::configure::set_fee_percent_handler(ctx, new_fee_percent)
    }

    /// Set how long after a window opens further harvests are allowed
    pub fn set_harvest_window(ctx: Context<ConfigureVault>, new_harvest_window: i64) -> Result<()> {
        instructions::configure::set_harvest_window_handler(ctx, new_harvest_window)
    }

    /// Set the harvest delay.
    /// Applied immediately on a fresh vault, otherwise at the next harvest.
    pub fn set_harvest_delay(ctx: Context<ConfigureVault>, new_harvest_delay: i64) -> Result<()> {
        instructions::configure::set_harvest_delay_handler(ctx, new_harvest_delay)
    }

    /// Set the share of holdings to keep as float (1e18 = 100%)
    pub fn set_target_float_percent(
        ctx: Context<ConfigureVault>,
        new_target_float_percent: u128,
    ) -> Result<()> {
        instructions::configure::set_target_float_percent_handler(ctx, new_target_float_percent)
    }

    // =========================================================================
    // STRATEGY REGISTRY
    // =========================================================================

    /// Allow a strategy to be harvested
    pub fn trust_strategy(ctx: Context<ManageStrategies>, strategy: Pubkey) -> Result<()> {
        instructions::strategies::trust_handler(ctx, strategy)
    }

    /// Stop a strategy from being harvested (recorded balance is kept)
    pub fn distrust_strategy(ctx: Context<ManageStrategies>, strategy: Pubkey) -> Result<()> {
        instructions::strategies::distrust_handler(ctx, strategy)
    }

    /// Record a strategy's trust flag and current balance.
    /// Total strategy holdings move by the balance change, so profit is
    /// only booked on what the strategy gains afterwards.
    pub fn set_strategy(
        ctx: Context<ManageStrategies>,
        strategy: Pubkey,
        trusted: bool,
        balance: u64,
    ) -> Result<()> {
        instructions::strategies::set_handler(ctx, strategy, trusted, balance)
    }

    // =========================================================================
    // WITHDRAWAL QUEUE
    // =========================================================================
    //
    // The tip (last entry) is drawn from first during withdrawals.
    // =========================================================================

    pub fn set_withdrawal_queue(ctx: Context<ManageStrategies>, new_queue: Vec<Pubkey>) -> Result<()> {
        instructions::withdrawal_queue::set_handler(ctx, new_queue)
    }

    pub fn push_to_withdrawal_queue(ctx: Context<ManageStrategies>, strategy: Pubkey) -> Result<()> {
        instructions::withdrawal_queue::push_handler(ctx, strategy)
    }

    pub fn pop_from_withdrawal_queue(ctx: Context<ManageStrategies>) -> Result<Pubkey> {
        instructions::withdrawal_queue::pop_handler(ctx)
    }

    pub fn replace_withdrawal_queue_index(
        ctx: Context<ManageStrategies>,
        index: u8,
        replacement: Pubkey,
    ) -> Result<()> {
        instructions::withdrawal_queue::replace_index_handler(ctx, index, replacement)
    }

    /// Move the tip into `index`, shrinking the queue by one
    pub fn replace_withdrawal_queue_index_with_tip(
        ctx: Context<ManageStrategies>,
        index: u8,
    ) -> Result<()> {
        instructions::withdrawal_queue::replace_index_with_tip_handler(ctx, index)
    }

    pub fn swap_withdrawal_queue_indexes(
        ctx: Context<ManageStrategies>,
        index1: u8,
        index2: u8,
    ) -> Result<()> {
        instructions::withdrawal_queue::swap_indexes_handler(ctx, index1, index2)
    }

    // =========================================================================
    // HARVEST
    // =========================================================================

    /// Harvest profit and loss from a list of trusted strategies.
    ///
    /// Pass each strategy's underlying token account as remaining_accounts,
    /// in the same order as `strategies`.
    pub fn harvest(ctx: Context<HarvestStrategies>, strategies: Vec<Pubkey>) -> Result<()> {
        instructions::harvest::handler(ctx, strategies)
    }

    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Profit from past harvests that has not unlocked yet
    pub fn locked_profit(ctx: Context<ReadVault>) -> Result<u64> {
        instructions::views::locked_profit_handler(ctx)
    }

    /// Underlying held directly by the vault
    pub fn total_float(ctx: Context<ReadVaultHoldings>) -> Result<u64> {
        instructions::views::total_float_handler(ctx)
    }

    /// Float plus strategy holdings, minus locked profit
    pub fn total_holdings(ctx: Context<ReadVaultHoldings>) -> Result<u64> {
        instructions::views::total_holdings_handler(ctx)
    }

    pub fn get_withdrawal_queue(ctx: Context<ReadVault>) -> Result<Vec<Pubkey>> {
        instructions::views::withdrawal_queue_handler(ctx)
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[error_code]
pub enum VaultError {
    #[msg("Fee percent must be above zero and at most 100%")]
    InvalidFeePercent,

    #[msg("Harvest window must not exceed the harvest delay")]
    InvalidHarvestWindow,

    #[msg("Harvest delay must be between 1 second and 365 days and cover the harvest window")]
    InvalidHarvestDelay,

    #[msg("Target float percent is at or above the sentinel ceiling")]
    InvalidTargetFloatPercent,

    #[msg("Harvest window is closed")]
    HarvestWindowClosed,

    #[msg("Strategy is not trusted")]
    UntrustedStrategy,

    #[msg("Could not read strategy underlying balance")]
    StrategyQueryFailed,

    #[msg("Strategy registry is full")]
    StrategyRegistryFull,

    #[msg("Withdrawal queue exceeds maximum size")]
    WithdrawalQueueTooLarge,

    #[msg("Withdrawal queue is full")]
    WithdrawalQueueFull,

    #[msg("Withdrawal queue is empty")]
    WithdrawalQueueEmpty,

    #[msg("Withdrawal queue index out of range")]
    InvalidQueueIndex,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Math underflow")]
    MathUnderflow,

    #[msg("Unauthorized")]
    Unauthorized,

    #[msg("Float account must hold the underlying mint and belong to the vault")]
    InvalidFloatAccount,
}

// =============================================================================
// EVENTS
// =============================================================================

#[event]
pub struct VaultInitialized {
    pub vault: Pubkey,
    pub underlying_mint: Pubkey,
    pub float_account: Pubkey,
    pub authority: Pubkey,
}

#[event]
pub struct FeePercentUpdated {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub new_fee_percent: u64,
}

#[event]
pub struct HarvestWindowUpdated {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub new_harvest_window: i64,
}

#[event]
pub struct HarvestDelayUpdated {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub new_harvest_delay: i64,
}

#[event]
pub struct HarvestDelayUpdateScheduled {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub new_harvest_delay: i64,
}

#[event]
pub struct TargetFloatPercentUpdated {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub new_target_float_percent: u128,
}

#[event]
pub struct StrategyTrusted {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub strategy: Pubkey,
}

#[event]
pub struct StrategyDistrusted {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub strategy: Pubkey,
}

#[event]
pub struct StrategyUpdated {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub strategy: Pubkey,
    pub trusted: bool,
    pub balance: u64,
    pub total_strategy_holdings: u64,
}

#[event]
pub struct WithdrawalQueueSet {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub replaced_queue: Vec<Pubkey>,
}

#[event]
pub struct WithdrawalQueuePushed {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub pushed_strategy: Pubkey,
}

#[event]
pub struct WithdrawalQueuePopped {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub popped_strategy: Pubkey,
}

#[event]
pub struct WithdrawalQueueIndexReplaced {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub index: u8,
    pub replaced_strategy: Pubkey,
    pub replacement_strategy: Pubkey,
}

#[event]
pub struct WithdrawalQueueIndexReplacedWithTip {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub index: u8,
    pub replaced_strategy: Pubkey,
    pub tip_strategy: Pubkey,
}

#[event]
pub struct WithdrawalQueueIndexesSwapped {
    pub vault: Pubkey,
    pub updated_by: Pubkey,
    pub index1: u8,
    pub index2: u8,
    pub new_strategy1: Pubkey,
    pub new_strategy2: Pubkey,
}

#[event]
pub struct Harvest {
    pub vault: Pubkey,
    pub harvested_by: Pubkey,
    pub strategies: Vec<Pubkey>,
    pub total_profit_accrued: u64,
    pub fees_accrued: u64,
    pub max_locked_profit: u64,
}
