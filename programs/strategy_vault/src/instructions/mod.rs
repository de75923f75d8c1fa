/**
 * Instructions for Strategy Vault
 *
 * Made by LabsX402 for Solana
 * https://x.com/LabsX402
 */

pub mod initialize_vault;
pub mod configure;
pub mod strategies;
pub mod withdrawal_queue;
pub mod harvest;
pub mod views;

pub use initialize_vault::*;
pub use configure::*;
pub use strategies::*;
pub use withdrawal_queue::*;
pub use harvest::*;
pub use views::*;
