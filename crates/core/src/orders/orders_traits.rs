use async_trait::async_trait;

use super::orders_model::{NewOrder, Order};
use crate::errors::Result;
use crate::identity::Identity;

/// Trait for order persistence.
#[async_trait]
pub trait OrderRepositoryTrait: Send + Sync {
    fn list_all(&self) -> Result<Vec<Order>>;
    /// Orders placed by one user, newest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Order>>;
    async fn insert(&self, new_order: NewOrder) -> Result<Order>;
}

/// Trait for reading orders on behalf of a caller.
pub trait OrderServiceTrait: Send + Sync {
    fn list_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>>;
    /// Orders for `requested_user_id`, or for the caller when absent.
    fn list_orders_for(
        &self,
        identity: Option<&Identity>,
        requested_user_id: Option<&str>,
    ) -> Result<Vec<Order>>;
}
