use async_trait::async_trait;
use rust_decimal::Decimal;

use super::wallets_model::Wallet;
use crate::errors::Result;

/// Trait for wallet persistence.
#[async_trait]
pub trait WalletRepositoryTrait: Send + Sync {
    fn find(&self, user_id: &str) -> Result<Option<Wallet>>;
    /// Returns the wallet, inserting a zero-balance one when absent.
    async fn get_or_create(&self, user_id: &str) -> Result<Wallet>;
    /// Adds `amount` (signed) to the balance in a single write, creating the
    /// wallet when absent.
    async fn increment(&self, user_id: &str, amount: Decimal) -> Result<Wallet>;
}

#[async_trait]
pub trait WalletServiceTrait: Send + Sync {
    async fn get_wallet(&self, user_id: &str) -> Result<Wallet>;
    /// `amount` is the raw user input, e.g. `"25"` or `"-10.5"`.
    async fn adjust_balance(&self, user_id: &str, amount: &str) -> Result<Wallet>;
}
