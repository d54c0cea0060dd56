//! Wallets module - per-user prepaid balances.

mod wallets_model;
mod wallets_service;
mod wallets_traits;

pub use wallets_model::Wallet;
pub use wallets_service::WalletService;
pub use wallets_traits::{WalletRepositoryTrait, WalletServiceTrait};
