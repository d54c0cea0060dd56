use std::sync::Arc;

use log::debug;
use rust_decimal::Decimal;

use super::pricing_model::{resolve_with_rate, DiscountedPlatform, ResolvedPrice};
use crate::catalog::CatalogServiceTrait;
use crate::errors::Result;
use crate::identity::{require_identity, Identity};
use crate::users::{User, UserRepositoryTrait};

/// Trait for resolving user-specific prices.
pub trait PricingServiceTrait: Send + Sync {
    /// Looks the service up in the catalog (first match) and applies the
    /// user's discount.
    fn resolve_price(&self, user: &User, service_id: &str) -> Result<ResolvedPrice>;
    fn resolve_price_with_rate(
        &self,
        user: &User,
        service_id: &str,
        base_rate: Decimal,
    ) -> ResolvedPrice;
    fn resolve_price_for_user(&self, user_id: &str, service_id: &str) -> Result<ResolvedPrice>;
    fn discounted_platform(
        &self,
        identity: Option<&Identity>,
        platform_name: &str,
    ) -> Result<DiscountedPlatform>;
}

/// Price resolution over the live catalog. Nothing is cached between calls.
pub struct PricingService {
    catalog_service: Arc<dyn CatalogServiceTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
}

impl PricingService {
    pub fn new(
        catalog_service: Arc<dyn CatalogServiceTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
    ) -> Self {
        Self {
            catalog_service,
            user_repository,
        }
    }
}

impl PricingServiceTrait for PricingService {
    fn resolve_price(&self, user: &User, service_id: &str) -> Result<ResolvedPrice> {
        let service = self.catalog_service.find_service(service_id)?;
        Ok(self.resolve_price_with_rate(user, &service.service_id, service.rate))
    }

    fn resolve_price_with_rate(
        &self,
        user: &User,
        service_id: &str,
        base_rate: Decimal,
    ) -> ResolvedPrice {
        resolve_with_rate(&user.discounts, service_id, base_rate)
    }

    fn resolve_price_for_user(&self, user_id: &str, service_id: &str) -> Result<ResolvedPrice> {
        let user = self.user_repository.get_by_id(user_id)?;
        let price = self.resolve_price(&user, service_id)?;
        debug!(
            "Resolved service {} for user {}: {} -> {}",
            price.service_id, user_id, price.base_rate, price.effective_price
        );
        Ok(price)
    }

    fn discounted_platform(
        &self,
        identity: Option<&Identity>,
        platform_name: &str,
    ) -> Result<DiscountedPlatform> {
        let identity = require_identity(identity)?;
        let user = self.user_repository.get_by_id(&identity.user_id)?;
        let platform = self.catalog_service.get_platform_by_name(platform_name)?;
        Ok(DiscountedPlatform::build(platform, &user.discounts))
    }
}
