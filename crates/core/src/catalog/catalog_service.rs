use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use uuid::Uuid;

use super::catalog_model::{
    normalize_platform_name, normalize_service_id, CategoryMap, NewPlatform, NewService,
    Platform, PlatformSummary, PlatformUpdate, Service, ServicePatch, ServiceRef,
};
use super::catalog_traits::{CatalogRepositoryTrait, CatalogServiceTrait};
use super::category_ops;
use crate::constants::MAX_CATALOG_WRITE_ATTEMPTS;
use crate::errors::{Error, ErrorKind, Result};

/// Service for the platform / category / service catalog.
pub struct CatalogService {
    repository: Arc<dyn CatalogRepositoryTrait>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn CatalogRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn find_by_name(&self, normalized_name: &str) -> Result<Option<Platform>> {
        match self.repository.get_by_name(normalized_name) {
            Ok(platform) => Ok(Some(platform)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Read, mutate, compare-and-swap. A lost race re-reads the platform and
    /// re-applies `op` to the fresh categories.
    async fn mutate_categories<T, F>(&self, platform_id: &str, op: F) -> Result<(Platform, T)>
    where
        F: Fn(&mut CategoryMap) -> Result<T> + Send + Sync,
        T: Send,
    {
        for attempt in 1..=MAX_CATALOG_WRITE_ATTEMPTS {
            let platform = self.repository.get_by_id(platform_id)?;
            let mut categories = platform.categories.clone();
            let outcome = op(&mut categories)?;

            match self
                .repository
                .update_categories(platform_id, platform.version, categories)
                .await
            {
                Ok(updated) => return Ok((updated, outcome)),
                Err(Error::ConcurrentModification(reason)) => {
                    warn!(
                        "Catalog write on platform {} lost a race (attempt {}/{}): {}",
                        platform_id, attempt, MAX_CATALOG_WRITE_ATTEMPTS, reason
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::ConcurrentModification(format!(
            "Platform '{}' kept changing; gave up after {} attempts",
            platform_id, MAX_CATALOG_WRITE_ATTEMPTS
        )))
    }
}

#[async_trait]
impl CatalogServiceTrait for CatalogService {
    fn list_platforms(&self) -> Result<Vec<PlatformSummary>> {
        Ok(self
            .repository
            .list()?
            .iter()
            .map(Platform::summary)
            .collect())
    }

    fn list_catalog(&self) -> Result<Vec<Platform>> {
        self.repository.list()
    }

    fn get_platform(&self, platform_id: &str) -> Result<Platform> {
        self.repository.get_by_id(platform_id)
    }

    fn get_platform_by_name(&self, name: &str) -> Result<Platform> {
        let normalized = normalize_platform_name(name);
        if normalized.is_empty() {
            return Err(Error::missing_field("name"));
        }
        self.repository.get_by_name(&normalized)
    }

    fn find_service(&self, service_id: &str) -> Result<Service> {
        let wanted = normalize_service_id(service_id);
        if wanted.is_empty() {
            return Err(Error::missing_field("serviceId"));
        }

        self.repository
            .list()?
            .into_iter()
            .flat_map(|platform| platform.categories.into_values().flatten())
            .find(|service| normalize_service_id(&service.service_id) == wanted)
            .ok_or_else(|| Error::not_found("Service", &wanted))
    }

    async fn create_platform(&self, new_platform: NewPlatform) -> Result<Platform> {
        new_platform.validate()?;
        let new_platform = new_platform.normalized();

        if self.find_by_name(&new_platform.name)?.is_some() {
            return Err(Error::Conflict(format!(
                "Platform '{}' already exists",
                new_platform.name
            )));
        }

        let created = self.repository.create(new_platform).await?;
        info!("Created platform {} ({})", created.name, created.id);
        Ok(created)
    }

    async fn update_platform(&self, platform_id: &str, update: PlatformUpdate) -> Result<Platform> {
        update.validate()?;
        let update = update.normalized();

        if let Some(existing) = self.find_by_name(&update.name)? {
            if existing.id != platform_id {
                return Err(Error::Conflict(format!(
                    "Platform '{}' already exists",
                    update.name
                )));
            }
        }

        let updated = self.repository.update_profile(platform_id, update).await?;
        debug!("Updated platform {}", platform_id);
        Ok(updated)
    }

    async fn delete_platform(&self, platform_id: &str) -> Result<()> {
        let deleted = self.repository.delete(platform_id).await?;
        if deleted == 0 {
            return Err(Error::not_found("Platform", platform_id));
        }
        info!("Deleted platform {}", platform_id);
        Ok(())
    }

    async fn add_category(&self, platform_id: &str, name: &str) -> Result<Platform> {
        let (platform, _) = self
            .mutate_categories(platform_id, |categories| {
                category_ops::add_category(categories, name)
            })
            .await?;
        debug!("Added category '{}' to platform {}", name.trim(), platform_id);
        Ok(platform)
    }

    async fn rename_category(&self, platform_id: &str, old: &str, new: &str) -> Result<Platform> {
        let (platform, _) = self
            .mutate_categories(platform_id, |categories| {
                category_ops::rename_category(categories, old, new)
            })
            .await?;
        debug!(
            "Renamed category '{}' to '{}' on platform {}",
            old.trim(),
            new.trim(),
            platform_id
        );
        Ok(platform)
    }

    async fn delete_category(&self, platform_id: &str, name: &str) -> Result<Platform> {
        let (platform, removed) = self
            .mutate_categories(platform_id, |categories| {
                category_ops::delete_category(categories, name)
            })
            .await?;
        info!(
            "Deleted category '{}' ({} services) from platform {}",
            name.trim(),
            removed.len(),
            platform_id
        );
        Ok(platform)
    }

    async fn add_service(
        &self,
        platform_id: &str,
        category: &str,
        new_service: NewService,
    ) -> Result<Service> {
        // One key per request, so a retried write does not mint a new one.
        let key = Uuid::now_v7().to_string();
        let (_, service) = self
            .mutate_categories(platform_id, |categories| {
                category_ops::add_service(categories, category, &key, new_service.clone())
            })
            .await?;
        debug!(
            "Added service {} to '{}' on platform {}",
            service.service_id, category, platform_id
        );
        Ok(service)
    }

    async fn update_service(
        &self,
        platform_id: &str,
        category: &str,
        service_ref: ServiceRef,
        patch: ServicePatch,
    ) -> Result<Service> {
        let (_, service) = self
            .mutate_categories(platform_id, |categories| {
                category_ops::update_service(categories, category, &service_ref, &patch)
            })
            .await?;
        debug!(
            "Updated service {} in '{}' on platform {}",
            service_ref, category, platform_id
        );
        Ok(service)
    }

    async fn delete_service(
        &self,
        platform_id: &str,
        category: &str,
        service_ref: ServiceRef,
    ) -> Result<Service> {
        let (_, removed) = self
            .mutate_categories(platform_id, |categories| {
                category_ops::delete_service(categories, category, &service_ref)
            })
            .await?;
        info!(
            "Deleted service {} from '{}' on platform {}",
            removed.service_id, category, platform_id
        );
        Ok(removed)
    }
}
