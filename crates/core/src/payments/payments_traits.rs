use async_trait::async_trait;

use super::payments_model::{NewPayment, Payment};
use crate::errors::Result;

/// Trait for payment persistence.
#[async_trait]
pub trait PaymentRepositoryTrait: Send + Sync {
    /// Every payment whose status is `paid`.
    fn list_paid(&self) -> Result<Vec<Payment>>;
    /// One user's payments, newest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Payment>>;
    async fn insert(&self, new_payment: NewPayment) -> Result<Payment>;
}

pub trait PaymentServiceTrait: Send + Sync {
    fn list_top_ups(&self, user_id: &str) -> Result<Vec<Payment>>;
}
