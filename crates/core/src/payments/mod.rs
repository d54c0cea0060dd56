//! Payments module - wallet top-ups.

mod payments_model;
mod payments_traits;

use std::sync::Arc;

pub use payments_model::{NewPayment, Payment, PaymentStatus, PaymentType};
pub use payments_traits::{PaymentRepositoryTrait, PaymentServiceTrait};

use crate::errors::{Error, Result};

pub struct PaymentService {
    repository: Arc<dyn PaymentRepositoryTrait>,
}

impl PaymentService {
    pub fn new(repository: Arc<dyn PaymentRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl PaymentServiceTrait for PaymentService {
    fn list_top_ups(&self, user_id: &str) -> Result<Vec<Payment>> {
        if user_id.trim().is_empty() {
            return Err(Error::missing_field("userId"));
        }
        self.repository.list_for_user(user_id)
    }
}
