/**
 * Withdrawal Queue
 *
 * Ordered strategy list used to pull liquidity during withdrawals.
 * The tip (last entry) is drawn from first. Entries are not checked
 * against the registry here; trust is re-checked wherever the queue is used.
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

use anchor_lang::prelude::*;

use crate::{state::Vault, VaultError, MAX_WITHDRAWAL_QUEUE_SIZE};

impl Vault {
    fn queue_index(&self, index: u8) -> Result<usize> {
        let index = index as usize;
        require!(index < self.withdrawal_queue.len(), VaultError::InvalidQueueIndex);
        Ok(index)
    }

    /// Replace the whole queue, returning the old one
    pub fn set_withdrawal_queue(&mut self, new_queue: Vec<Pubkey>) -> Result<Vec<Pubkey>> {
        require!(
            new_queue.len() <= MAX_WITHDRAWAL_QUEUE_SIZE,
            VaultError::WithdrawalQueueTooLarge
        );

        Ok(std::mem::replace(&mut self.withdrawal_queue, new_queue))
    }

    pub fn push_to_withdrawal_queue(&mut self, strategy: Pubkey) -> Result<()> {
        require!(
            self.withdrawal_queue.len() < MAX_WITHDRAWAL_QUEUE_SIZE,
            VaultError::WithdrawalQueueFull
        );

        self.withdrawal_queue.push(strategy);
        Ok(())
    }

    /// Remove and return the tip
    pub fn pop_from_withdrawal_queue(&mut self) -> Result<Pubkey> {
        self.withdrawal_queue
            .pop()
            .ok_or_else(|| error!(VaultError::WithdrawalQueueEmpty))
    }

    /// Overwrite the entry at `index`, returning what was there
    pub fn replace_withdrawal_queue_index(&mut self, index: u8, replacement: Pubkey) -> Result<Pubkey> {
        let index = self.queue_index(index)?;
        Ok(std::mem::replace(&mut self.withdrawal_queue[index], replacement))
    }

    /// Move the tip into `index` and shrink the queue.
    /// Returns (replaced, tip). Using the tip's own index just pops it.
    pub fn replace_withdrawal_queue_index_with_tip(&mut self, index: u8) -> Result<(Pubkey, Pubkey)> {
        let index = self.queue_index(index)?;
        let tip = self.pop_from_withdrawal_queue()?;

        if index == self.withdrawal_queue.len() {
            return Ok((tip, tip));
        }

        let replaced = std::mem::replace(&mut self.withdrawal_queue[index], tip);
        Ok((replaced, tip))
    }

    pub fn swap_withdrawal_queue_indexes(&mut self, index1: u8, index2: u8) -> Result<()> {
        let index1 = self.queue_index(index1)?;
        let index2 = self.queue_index(index2)?;

        self.withdrawal_queue.swap(index1, index2);
        Ok(())
    }
}
