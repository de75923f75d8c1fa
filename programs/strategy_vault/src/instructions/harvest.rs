/**
 * Harvest Instruction
 *
 * Reads each strategy's underlying token account and hands the balances to
 * the vault's harvest engine.
 *
 * remaining_accounts: one token account per strategy, same order as the
 * `strategies` argument. Each must hold the underlying mint and be owned
 * by the strategy address.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;
use anchor_lang::CheckOwner;
use anchor_spl::token_interface::TokenAccount;

use crate::{
    state::{StrategyBalances, Vault},
    Harvest,
    HarvestDelayUpdated,
    VaultError,
    VAULT_SEED,
};

#[derive(Accounts)]
pub struct HarvestStrategies<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.underlying_mint.as_ref()],
        bump = vault.bump,
        has_one = authority @ VaultError::Unauthorized,
    )]
    pub vault: Account<'info, Vault>,
}

/// Strategy balances read from token accounts passed as remaining_accounts
pub struct StrategyTokenAccounts<'a, 'info> {
    pub accounts: &'a [AccountInfo<'info>],
    pub underlying_mint: Pubkey,
}

impl StrategyBalances for StrategyTokenAccounts<'_, '_> {
    fn underlying_balance(&self, position: usize, strategy: &Pubkey) -> Result<u64> {
        let info = self
            .accounts
            .get(position)
            .ok_or_else(|| error!(VaultError::StrategyQueryFailed))?;

        read_token_balance(info, &self.underlying_mint, strategy)
    }
}

/// Amount held by a token account of `mint` owned by `owner`
pub fn read_token_balance(info: &AccountInfo, mint: &Pubkey, owner: &Pubkey) -> Result<u64> {
    TokenAccount::check_owner(info.owner)?;

    let data = info.try_borrow_data()?;
    let mut bytes: &[u8] = &data;
    let token_account = TokenAccount::try_deserialize(&mut bytes)?;

    require_keys_eq!(token_account.mint, *mint, VaultError::StrategyQueryFailed);
    require_keys_eq!(token_account.owner, *owner, VaultError::StrategyQueryFailed);

    Ok(token_account.amount)
}

pub fn handler(ctx: Context<HarvestStrategies>, strategies: Vec<Pubkey>) -> Result<()> {
    let clock = Clock::get()?;
    let vault = &mut ctx.accounts.vault;

    let balances = StrategyTokenAccounts {
        accounts: ctx.remaining_accounts,
        underlying_mint: vault.underlying_mint,
    };

    let report = vault.harvest(clock.unix_timestamp, &strategies, &balances)?;
    let vault_key = vault.key();
    let harvested_by = ctx.accounts.authority.key();

    if let Some(new_harvest_delay) = report.applied_harvest_delay {
        emit!(HarvestDelayUpdated {
            vault: vault_key,
            updated_by: harvested_by,
            new_harvest_delay,
        });
        msg!("Harvest delay now {}s", new_harvest_delay);
    }

    msg!(
        "✅ Harvested {} strategies: profit={}, fees={}, locked={}, holdings={}",
        strategies.len(),
        report.total_profit_accrued,
        report.fees_accrued,
        report.max_locked_profit,
        report.total_strategy_holdings,
    );

    emit!(Harvest {
        vault: vault_key,
        harvested_by,
        strategies,
        total_profit_accrued: report.total_profit_accrued,
        fees_accrued: report.fees_accrued,
        max_locked_profit: report.max_locked_profit,
    });

    Ok(())
}
