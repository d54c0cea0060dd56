use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use super::wallets_model::Wallet;
use super::wallets_traits::{WalletRepositoryTrait, WalletServiceTrait};
use crate::errors::{Error, Result};
use crate::users::UserRepositoryTrait;
use crate::utils::parse_amount;

pub struct WalletService {
    repository: Arc<dyn WalletRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl WalletService {
    pub fn new(
        repository: Arc<dyn WalletRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            user_repository,
        }
    }

    fn ensure_user(&self, user_id: &str) -> Result<()> {
        if user_id.trim().is_empty() {
            return Err(Error::missing_field("userId"));
        }
        self.user_repository.get_by_id(user_id).map(|_| ())
    }
}

#[async_trait]
impl WalletServiceTrait for WalletService {
    async fn get_wallet(&self, user_id: &str) -> Result<Wallet> {
        self.ensure_user(user_id)?;
        self.repository.get_or_create(user_id).await
    }

    async fn adjust_balance(&self, user_id: &str, amount: &str) -> Result<Wallet> {
        let amount = parse_amount(amount)?;
        self.ensure_user(user_id)?;

        let wallet = self.repository.increment(user_id, amount).await?;
        info!(
            "Adjusted wallet of user {} by {}; balance is now {}",
            user_id, amount, wallet.balance
        );
        Ok(wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::users_service_tests::{user, MockUserRepository};
    use crate::ErrorKind;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockWalletRepository {
        wallets: Mutex<HashMap<String, Wallet>>,
    }

    #[async_trait]
    impl WalletRepositoryTrait for MockWalletRepository {
        fn find(&self, user_id: &str) -> Result<Option<Wallet>> {
            Ok(self.wallets.lock().unwrap().get(user_id).cloned())
        }

        async fn get_or_create(&self, user_id: &str) -> Result<Wallet> {
            Ok(self
                .wallets
                .lock()
                .unwrap()
                .entry(user_id.to_string())
                .or_insert_with(|| Wallet {
                    user_id: user_id.to_string(),
                    balance: Decimal::ZERO,
                    last_updated: Utc::now().naive_utc(),
                })
                .clone())
        }

        async fn increment(&self, user_id: &str, amount: Decimal) -> Result<Wallet> {
            let mut wallets = self.wallets.lock().unwrap();
            let wallet = wallets.entry(user_id.to_string()).or_insert_with(|| Wallet {
                user_id: user_id.to_string(),
                balance: Decimal::ZERO,
                last_updated: Utc::now().naive_utc(),
            });
            wallet.balance += amount;
            wallet.last_updated = Utc::now().naive_utc();
            Ok(wallet.clone())
        }
    }

    fn service() -> (WalletService, Arc<MockWalletRepository>) {
        let wallets = Arc::new(MockWalletRepository::default());
        let users = Arc::new(MockUserRepository::with_users(vec![user("u1", vec![])]));
        (WalletService::new(wallets.clone(), users), wallets)
    }

    #[tokio::test]
    async fn test_wallet_created_lazily() {
        let (service, wallets) = service();
        assert!(wallets.find("u1").unwrap().is_none());
        let wallet = service.get_wallet("u1").await.unwrap();
        assert_eq!(wallet.balance, dec!(0));
        assert!(wallets.find("u1").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_signed_adjustments() {
        let (service, _) = service();
        service.adjust_balance("u1", "25").await.unwrap();
        let wallet = service.adjust_balance("u1", "-10.5").await.unwrap();
        assert_eq!(wallet.balance, dec!(14.5));
    }

    #[tokio::test]
    async fn test_invalid_amount_and_unknown_user() {
        let (service, wallets) = service();
        let err = service.adjust_balance("u1", "lots").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(wallets.find("u1").unwrap().is_none());

        let err = service.adjust_balance("ghost", "5").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
