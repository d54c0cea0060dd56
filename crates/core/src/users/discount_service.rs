use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use rust_decimal::Decimal;

use super::discount_table::{Discount, DiscountTable};
use super::users_traits::{DiscountServiceTrait, UserRepositoryTrait};
use crate::catalog::normalize_service_id;
use crate::errors::{Error, Result};

/// Service for setting and clearing per-user service discounts.
///
/// Each write touches a single (user, service) row, so concurrent edits to
/// different services of the same user never overwrite each other.
pub struct DiscountService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl DiscountService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

fn require_ids(user_id: &str, service_id: &str) -> Result<String> {
    if user_id.trim().is_empty() {
        return Err(Error::missing_field("userId"));
    }
    let service_id = normalize_service_id(service_id);
    if service_id.is_empty() {
        return Err(Error::missing_field("serviceId"));
    }
    Ok(service_id)
}

#[async_trait]
impl DiscountServiceTrait for DiscountService {
    fn get_discounts(&self, user_id: &str) -> Result<DiscountTable> {
        Ok(self.repository.get_by_id(user_id)?.discounts)
    }

    async fn set_discount(
        &self,
        user_id: &str,
        service_id: &str,
        percent: Decimal,
    ) -> Result<DiscountTable> {
        let service_id = require_ids(user_id, service_id)?;
        let discount = Discount::new(&service_id, percent.normalize());
        discount.validate()?;

        let table = self.repository.upsert_discount(user_id, discount).await?;
        info!(
            "Set {}% discount on service {} for user {}",
            percent, service_id, user_id
        );
        Ok(table)
    }

    async fn delete_discount(&self, user_id: &str, service_id: &str) -> Result<DiscountTable> {
        let service_id = require_ids(user_id, service_id)?;
        let table = self.repository.remove_discount(user_id, &service_id).await?;
        info!("Cleared discount on service {} for user {}", service_id, user_id);
        Ok(table)
    }
}
