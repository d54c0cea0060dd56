use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::catalog::{normalize_service_id, Platform, Service};
use crate::users::DiscountTable;

/// Price of one service for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPrice {
    pub service_id: String,
    pub base_rate: Decimal,
    pub discount_percent: Option<Decimal>,
    pub effective_price: Decimal,
}

/// `base_rate * (1 - percent / 100)`, or `base_rate` when undiscounted.
pub fn apply_discount(base_rate: Decimal, percent: Option<Decimal>) -> Decimal {
    match percent {
        Some(percent) => base_rate * (Decimal::ONE - percent / dec!(100)),
        None => base_rate,
    }
}

/// Overlays a discount table on a known base rate.
pub fn resolve_with_rate(
    discounts: &DiscountTable,
    service_id: &str,
    base_rate: Decimal,
) -> ResolvedPrice {
    let discount_percent = discounts.get(service_id);
    ResolvedPrice {
        service_id: normalize_service_id(service_id),
        base_rate,
        discount_percent,
        effective_price: apply_discount(base_rate, discount_percent),
    }
}

/// A catalog service annotated for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountedService {
    #[serde(flatten)]
    pub service: Service,
    pub discount_applied: Option<Decimal>,
    pub effective_price: Decimal,
}

/// A platform's catalog as one user sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountedPlatform {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub categories: IndexMap<String, Vec<DiscountedService>>,
}

impl DiscountedPlatform {
    pub fn build(platform: Platform, discounts: &DiscountTable) -> Self {
        let categories = platform
            .categories
            .into_iter()
            .map(|(name, services)| {
                let annotated = services
                    .into_iter()
                    .map(|service| {
                        let discount_applied = discounts.get(&service.service_id);
                        DiscountedService {
                            effective_price: apply_discount(service.rate, discount_applied),
                            discount_applied,
                            service,
                        }
                    })
                    .collect();
                (name, annotated)
            })
            .collect();

        Self {
            id: platform.id,
            name: platform.name,
            image: platform.image,
            description: platform.description,
            categories,
        }
    }
}
