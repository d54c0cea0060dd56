use async_trait::async_trait;
use rust_decimal::Decimal;

use super::discount_table::{Discount, DiscountTable};
use super::users_model::{NewUser, User, UserUpdate};
use crate::errors::Result;

/// Trait for user persistence, including each user's discount rows.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn get_by_id(&self, user_id: &str) -> Result<User>;
    /// All users, newest first.
    fn list(&self) -> Result<Vec<User>>;
    async fn create(&self, new_user: NewUser) -> Result<User>;
    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<User>;
    /// Deletes the user together with their discounts and wallet.
    async fn delete(&self, user_id: &str) -> Result<usize>;
    /// Writes one discount row, replacing an existing row for the same
    /// service. Fails with NotFound when the user does not exist.
    async fn upsert_discount(&self, user_id: &str, discount: Discount) -> Result<DiscountTable>;
    /// Removes the discount row for a service, if present. Fails with
    /// NotFound when the user does not exist.
    async fn remove_discount(&self, user_id: &str, service_id: &str) -> Result<DiscountTable>;
}

/// Trait for user management.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn list_users(&self) -> Result<Vec<User>>;
    fn get_user(&self, user_id: &str) -> Result<User>;
    async fn create_user(&self, new_user: NewUser) -> Result<User>;
    async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User>;
    async fn delete_user(&self, user_id: &str) -> Result<()>;
}

/// Trait for managing a user's discount table.
#[async_trait]
pub trait DiscountServiceTrait: Send + Sync {
    fn get_discounts(&self, user_id: &str) -> Result<DiscountTable>;
    async fn set_discount(
        &self,
        user_id: &str,
        service_id: &str,
        percent: Decimal,
    ) -> Result<DiscountTable>;
    async fn delete_discount(&self, user_id: &str, service_id: &str) -> Result<DiscountTable>;
}
