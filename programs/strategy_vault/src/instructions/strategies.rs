/**
 * Strategy Registry Instructions
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    state::Vault,
    StrategyDistrusted,
    StrategyTrusted,
    StrategyUpdated,
    VaultError,
    VAULT_SEED,
};

/// Accounts for registry and withdrawal queue management
#[derive(Accounts)]
pub struct ManageStrategies<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault: Account<'info, Vault>,
}

pub fn trust_handler(ctx: Context<ManageStrategies>, strategy: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.trust_strategy(strategy)?;

    emit!(StrategyTrusted {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        strategy,
    });

    msg!("Strategy {} trusted", strategy);

    Ok(())
}

pub fn distrust_handler(ctx: Context<ManageStrategies>, strategy: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.distrust_strategy(strategy)?;

    emit!(StrategyDistrusted {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        strategy,
    });

    msg!("Strategy {} distrusted", strategy);

    Ok(())
}

pub fn set_handler(
    ctx: Context<ManageStrategies>,
    strategy: Pubkey,
    trusted: bool,
    balance: u64,
) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.register_strategy(strategy, trusted, balance)?;

    emit!(StrategyUpdated {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        strategy,
        trusted,
        balance,
        total_strategy_holdings: vault.total_strategy_holdings,
    });

    msg!(
        "Strategy {} set: trusted={}, balance={}, holdings={}",
        strategy,
        trusted,
        balance,
        vault.total_strategy_holdings,
    );

    Ok(())
}
