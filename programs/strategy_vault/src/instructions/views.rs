/**
 * View Instructions
 *
 * Read-only; values come back as return data.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::{state::Vault, VaultError, VAULT_SEED};

#[derive(Accounts)]
pub struct ReadVault<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,
}

#[derive(Accounts)]
pub struct ReadVaultHoldings<'info> {
    #[account(
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
    )]
    pub vault: Account<'info, Vault>,

    #[account(address = vault.float_account @ VaultError::InvalidFloatAccount)]
    pub float_account: InterfaceAccount<'info, TokenAccount>,
}

pub fn locked_profit_handler(ctx: Context<ReadVault>) -> Result<u64> {
    let clock = Clock::get()?;
    ctx.accounts.vault.locked_profit(clock.unix_timestamp)
}

pub fn total_float_handler(ctx: Context<ReadVaultHoldings>) -> Result<u64> {
    Ok(ctx.accounts.float_account.amount)
}

pub fn total_holdings_handler(ctx: Context<ReadVaultHoldings>) -> Result<u64> {
    let clock = Clock::get()?;
    let total_float = ctx.accounts.float_account.amount;

    ctx.accounts.vault.total_holdings(clock.unix_timestamp, total_float)
}

pub fn withdrawal_queue_handler(ctx: Context<ReadVault>) -> Result<Vec<Pubkey>> {
    Ok(ctx.accounts.vault.withdrawal_queue.clone())
}
