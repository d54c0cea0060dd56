//! Catalog module - platforms, their categories and service rate cards.

mod catalog_model;
mod catalog_service;
mod catalog_traits;
pub mod category_ops;

#[cfg(test)]
pub(crate) mod catalog_service_tests;

pub use catalog_model::{
    deserialize_service_id, normalize_platform_name, normalize_service_id, CategoryMap,
    NewPlatform, NewService, Platform, PlatformSummary, PlatformUpdate, Service, ServicePatch,
    ServiceRef,
};
pub use catalog_service::CatalogService;
pub use catalog_traits::{CatalogRepositoryTrait, CatalogServiceTrait};
