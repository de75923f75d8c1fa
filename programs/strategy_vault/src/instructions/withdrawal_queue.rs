/**
 * Withdrawal Queue Instructions
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{
    instructions::ManageStrategies,
    WithdrawalQueueIndexReplaced,
    WithdrawalQueueIndexReplacedWithTip,
    WithdrawalQueueIndexesSwapped,
    WithdrawalQueuePopped,
    WithdrawalQueuePushed,
    WithdrawalQueueSet,
};

pub fn set_handler(ctx: Context<ManageStrategies>, new_queue: Vec<Pubkey>) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    let replaced_queue = vault.set_withdrawal_queue(new_queue)?;

    emit!(WithdrawalQueueSet {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        replaced_queue,
    });

    msg!("Withdrawal queue set ({} strategies)", vault.withdrawal_queue.len());

    Ok(())
}

pub fn push_handler(ctx: Context<ManageStrategies>, strategy: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.push_to_withdrawal_queue(strategy)?;

    emit!(WithdrawalQueuePushed {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        pushed_strategy: strategy,
    });

    msg!("Pushed {} to withdrawal queue", strategy);

    Ok(())
}

pub fn pop_handler(ctx: Context<ManageStrategies>) -> Result<Pubkey> {
    let vault = &mut ctx.accounts.vault;
    let popped_strategy = vault.pop_from_withdrawal_queue()?;

    emit!(WithdrawalQueuePopped {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        popped_strategy,
    });

    msg!("Popped {} from withdrawal queue", popped_strategy);

    Ok(popped_strategy)
}

pub fn replace_index_handler(
    ctx: Context<ManageStrategies>,
    index: u8,
    replacement: Pubkey,
) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    let replaced_strategy = vault.replace_withdrawal_queue_index(index, replacement)?;

    emit!(WithdrawalQueueIndexReplaced {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        index,
        replaced_strategy,
        replacement_strategy: replacement,
    });

    msg!("Withdrawal queue[{}]: {} → {}", index, replaced_strategy, replacement);

    Ok(())
}

pub fn replace_index_with_tip_handler(ctx: Context<ManageStrategies>, index: u8) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    let (replaced_strategy, tip_strategy) = vault.replace_withdrawal_queue_index_with_tip(index)?;

    emit!(WithdrawalQueueIndexReplacedWithTip {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        index,
        replaced_strategy,
        tip_strategy,
    });

    msg!("Withdrawal queue[{}]: {} → tip {}", index, replaced_strategy, tip_strategy);

    Ok(())
}

pub fn swap_indexes_handler(ctx: Context<ManageStrategies>, index1: u8, index2: u8) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.swap_withdrawal_queue_indexes(index1, index2)?;

    let new_strategy1 = vault.withdrawal_queue[index1 as usize];
    let new_strategy2 = vault.withdrawal_queue[index2 as usize];

    emit!(WithdrawalQueueIndexesSwapped {
        vault: vault.key(),
        updated_by: ctx.accounts.authority.key(),
        index1,
        index2,
        new_strategy1,
        new_strategy2,
    });

    msg!("Withdrawal queue swapped [{}] and [{}]", index1, index2);

    Ok(())
}
