/**
 * Vault Configuration Instructions
 *
 * Harvest delay changes on a live vault are staged until the next harvest
 * so the profit unlock schedule can't be moved mid-cycle.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    state::{HarvestDelayChange, Vault},
    FeePercentUpdated,
    HarvestDelayUpdateScheduled,
    HarvestDelayUpdated,
    HarvestWindowUpdated,
    TargetFloatPercentUpdated,
    VaultError,
    VAULT_SEED,
};

#[derive(Accounts)]
pub struct ConfigureVault<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault: Account<'info, Vault>,
}

// =============================================================================
// FEE PERCENT
// =============================================================================

pub fn set_fee_percent_handler(ctx: Context<ConfigureVault>, new_fee_percent: u64) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.set_fee_percent(new_fee_percent)?;

    emit!(FeePercentUpdated {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        new_fee_percent,
    });

    msg!("Fee percent set to {}", new_fee_percent);

    Ok(())
}

// =============================================================================
// HARVEST WINDOW
// =============================================================================

pub fn set_harvest_window_handler(ctx: Context<ConfigureVault>, new_harvest_window: i64) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.set_harvest_window(new_harvest_window)?;

    emit!(HarvestWindowUpdated {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        new_harvest_window,
    });

    msg!("Harvest window set to {}s", new_harvest_window);

    Ok(())
}

// =============================================================================
// HARVEST DELAY
// =============================================================================

pub fn set_harvest_delay_handler(ctx: Context<ConfigureVault>, new_harvest_delay: i64) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    let vault_key = vault.key();
    let updated_by = ctx.accounts.authority.key();

    match vault.set_harvest_delay(new_harvest_delay)? {
        HarvestDelayChange::Applied => {
            emit!(HarvestDelayUpdated {
                vault: vault_key,
                updated_by,
                new_harvest_delay,
            });
            msg!("Harvest delay set to {}s", new_harvest_delay);
        }
        HarvestDelayChange::Scheduled => {
            emit!(HarvestDelayUpdateScheduled {
                vault: vault_key,
                updated_by,
                new_harvest_delay,
            });
            msg!("Harvest delay {}s → {}s at next harvest", vault.harvest_delay, new_harvest_delay);
        }
    }

    Ok(())
}

// =============================================================================
// TARGET FLOAT PERCENT
// =============================================================================

pub fn set_target_float_percent_handler(
    ctx: Context<ConfigureVault>,
    new_target_float_percent: u128,
) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.set_target_float_percent(new_target_float_percent)?;

    emit!(TargetFloatPercentUpdated {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        new_target_float_percent,
    });

    msg!("Target float percent set to {}", new_target_float_percent);

    Ok(())
}
