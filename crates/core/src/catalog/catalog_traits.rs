use async_trait::async_trait;

use super::catalog_model::{
    CategoryMap, NewPlatform, NewService, Platform, PlatformSummary, PlatformUpdate, Service,
    ServicePatch, ServiceRef,
};
use crate::errors::Result;

/// Trait for platform catalog persistence.
#[async_trait]
pub trait CatalogRepositoryTrait: Send + Sync {
    fn get_by_id(&self, platform_id: &str) -> Result<Platform>;
    /// Looks up by the already-normalized name.
    fn get_by_name(&self, name: &str) -> Result<Platform>;
    /// All platforms ordered by name.
    fn list(&self) -> Result<Vec<Platform>>;
    async fn create(&self, new_platform: NewPlatform) -> Result<Platform>;
    /// Updates name, image and description. Categories are left as they are.
    async fn update_profile(&self, platform_id: &str, update: PlatformUpdate) -> Result<Platform>;
    /// Replaces the category map if the stored version still equals
    /// `expected_version`, bumping it by one. Fails with
    /// `Error::ConcurrentModification` otherwise.
    async fn update_categories(
        &self,
        platform_id: &str,
        expected_version: i64,
        categories: CategoryMap,
    ) -> Result<Platform>;
    async fn delete(&self, platform_id: &str) -> Result<usize>;
}

/// Trait for catalog operations.
#[async_trait]
pub trait CatalogServiceTrait: Send + Sync {
    fn list_platforms(&self) -> Result<Vec<PlatformSummary>>;
    fn list_catalog(&self) -> Result<Vec<Platform>>;
    fn get_platform(&self, platform_id: &str) -> Result<Platform>;
    fn get_platform_by_name(&self, name: &str) -> Result<Platform>;
    /// First service with this id in catalog order.
    fn find_service(&self, service_id: &str) -> Result<Service>;
    async fn create_platform(&self, new_platform: NewPlatform) -> Result<Platform>;
    async fn update_platform(&self, platform_id: &str, update: PlatformUpdate) -> Result<Platform>;
    async fn delete_platform(&self, platform_id: &str) -> Result<()>;
    async fn add_category(&self, platform_id: &str, name: &str) -> Result<Platform>;
    async fn rename_category(&self, platform_id: &str, old: &str, new: &str) -> Result<Platform>;
    async fn delete_category(&self, platform_id: &str, name: &str) -> Result<Platform>;
    async fn add_service(
        &self,
        platform_id: &str,
        category: &str,
        new_service: NewService,
    ) -> Result<Service>;
    async fn update_service(
        &self,
        platform_id: &str,
        category: &str,
        service_ref: ServiceRef,
        patch: ServicePatch,
    ) -> Result<Service>;
    async fn delete_service(
        &self,
        platform_id: &str,
        category: &str,
        service_ref: ServiceRef,
    ) -> Result<Service>;
}
