/**
 * State Accounts for Strategy Vault
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

pub mod vault;
pub mod strategy;
pub mod harvest;
pub mod withdrawal_queue;

pub use vault::*;
pub use strategy::*;
pub use harvest::*;
