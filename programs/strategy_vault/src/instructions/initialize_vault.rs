/**
 * Initialize Vault Instruction
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount};

use crate::{
    state::Vault,
    VaultError,
    VaultInitialized,
    VAULT_SEED,
};

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    pub underlying_mint: InterfaceAccount<'info, Mint>,

    #[account(
        init,
        payer = authority,
        space = Vault::LEN,
        seeds = [VAULT_SEED, underlying_mint.key().as_ref()],
        bump,
    )]
    pub vault: Account<'info, Vault>,

    /// Float token account (created separately, owned by the vault PDA)
    #[account(
        constraint = float_account.mint == underlying_mint.key() @ VaultError::InvalidFloatAccount,
        constraint = float_account.owner == vault.key() @ VaultError::InvalidFloatAccount,
    )]
    pub float_account: InterfaceAccount<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeVault>) -> Result<()> {
    let vault = &mut ctx.accounts.vault;

    vault.initialize(
        ctx.accounts.authority.key(),
        ctx.accounts.underlying_mint.key(),
        ctx.accounts.float_account.key(),
        ctx.bumps.vault,
    );

    emit!(VaultInitialized {
        vault: vault.key(),
        underlying_mint: vault.underlying_mint,
        float_account: vault.float_account,
        authority: vault.authority,
    });

    msg!("Vault initialized for mint {}", vault.underlying_mint);

    Ok(())
}
