//! Pricing module - overlays user discounts on catalog rates.

mod pricing_model;
mod pricing_service;


pub use pricing_model::{
    apply_discount, resolve_with_rate, DiscountedPlatform, DiscountedService, ResolvedPrice,
};
pub use pricing_service::{PricingService, PricingServiceTrait};
