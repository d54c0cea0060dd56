use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal_macros::dec;

use super::*;
use crate::errors::{Error, ErrorKind, Result};

#[derive(Default)]
pub(crate) struct MockCatalogRepository {
    platforms: Mutex<HashMap<String, Platform>>,
    /// Number of upcoming `update_categories` calls that lose the race.
    stale_writes: AtomicUsize,
    cas_attempts: AtomicUsize,
}

impl MockCatalogRepository {
    fn with_stale_writes(self, n: usize) -> Self {
        self.stale_writes.store(n, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl CatalogRepositoryTrait for MockCatalogRepository {
    fn get_by_id(&self, platform_id: &str) -> Result<Platform> {
        self.platforms
            .lock()
            .unwrap()
            .get(platform_id)
            .cloned()
            .ok_or_else(|| Error::not_found("Platform", platform_id))
    }

    fn get_by_name(&self, name: &str) -> Result<Platform> {
        self.platforms
            .lock()
            .unwrap()
            .values()
            .find(|p| p.name == name)
            .cloned()
            .ok_or_else(|| Error::not_found("Platform", name))
    }

    fn list(&self) -> Result<Vec<Platform>> {
        let mut all: Vec<Platform> = self.platforms.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn create(&self, new_platform: NewPlatform) -> Result<Platform> {
        let now = Utc::now().naive_utc();
        let mut platforms = self.platforms.lock().unwrap();
        let platform = Platform {
            id: new_platform
                .id
                .unwrap_or_else(|| format!("p{}", platforms.len() + 1)),
            name: new_platform.name,
            image: new_platform.image,
            description: new_platform.description,
            categories: CategoryMap::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        platforms.insert(platform.id.clone(), platform.clone());
        Ok(platform)
    }

    async fn update_profile(&self, platform_id: &str, update: PlatformUpdate) -> Result<Platform> {
        let mut platforms = self.platforms.lock().unwrap();
        let platform = platforms
            .get_mut(platform_id)
            .ok_or_else(|| Error::not_found("Platform", platform_id))?;
        platform.name = update.name;
        platform.image = update.image;
        platform.description = update.description;
        Ok(platform.clone())
    }

    async fn update_categories(
        &self,
        platform_id: &str,
        expected_version: i64,
        categories: CategoryMap,
    ) -> Result<Platform> {
        self.cas_attempts.fetch_add(1, Ordering::SeqCst);
        let mut platforms = self.platforms.lock().unwrap();
        let platform = platforms
            .get_mut(platform_id)
            .ok_or_else(|| Error::not_found("Platform", platform_id))?;

        if self.stale_writes.load(Ordering::SeqCst) > 0 {
            // Simulate another writer landing first.
            self.stale_writes.fetch_sub(1, Ordering::SeqCst);
            platform.version += 1;
        }
        if platform.version != expected_version {
            return Err(Error::ConcurrentModification(format!(
                "expected version {}, found {}",
                expected_version, platform.version
            )));
        }
        platform.categories = categories;
        platform.version += 1;
        Ok(platform.clone())
    }

    async fn delete(&self, platform_id: &str) -> Result<usize> {
        Ok(usize::from(
            self.platforms.lock().unwrap().remove(platform_id).is_some(),
        ))
    }
}

fn new_platform(name: &str) -> NewPlatform {
    NewPlatform {
        id: None,
        name: name.to_string(),
        image: format!("https://cdn.example.com/{}.png", name.trim().to_lowercase()),
        description: String::new(),
    }
}

fn new_service(id: &str) -> NewService {
    NewService {
        service_id: id.to_string(),
        rate: dec!(0.5),
        min: 10,
        max: 10_000,
        description: format!("service {}", id),
    }
}

async fn service_with_platform(repo: MockCatalogRepository) -> (CatalogService, String) {
    let service = CatalogService::new(Arc::new(repo));
    let platform = service
        .create_platform(new_platform("Instagram"))
        .await
        .unwrap();
    (service, platform.id)
}

#[tokio::test]
async fn test_create_platform_normalizes_and_rejects_duplicates() {
    let (service, id) = service_with_platform(MockCatalogRepository::default()).await;
    let platform = service.get_platform(&id).unwrap();
    assert_eq!(platform.name, "instagram");
    assert_eq!(platform.version, 0);
    assert!(platform.categories.is_empty());

    let err = service
        .create_platform(new_platform(" INSTAGRAM "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(service.get_platform_by_name("InstaGram ").unwrap().id, id);
}

#[tokio::test]
async fn test_create_platform_requires_name_and_image() {
    let service = CatalogService::new(Arc::new(MockCatalogRepository::default()));
    let mut input = new_platform("tiktok");
    input.image = "  ".to_string();
    let err = service.create_platform(input).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_update_platform_cannot_take_another_name() {
    let (service, id) = service_with_platform(MockCatalogRepository::default()).await;
    service.create_platform(new_platform("youtube")).await.unwrap();

    let err = service
        .update_platform(
            &id,
            PlatformUpdate {
                name: "YouTube".into(),
                image: "https://cdn.example.com/x.png".into(),
                description: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let renamed = service
        .update_platform(
            &id,
            PlatformUpdate {
                name: "Instagram".into(),
                image: "https://cdn.example.com/ig2.png".into(),
                description: "photos".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.image, "https://cdn.example.com/ig2.png");
}

#[tokio::test]
async fn test_add_category_conflict_leaves_platform_unchanged() {
    let (service, id) = service_with_platform(MockCatalogRepository::default()).await;
    service.add_category(&id, "promo").await.unwrap();
    let before = service.get_platform(&id).unwrap();

    let err = service.add_category(&id, "promo").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(service.get_platform(&id).unwrap(), before);
}

#[tokio::test]
async fn test_mutators_on_missing_platform() {
    let service = CatalogService::new(Arc::new(MockCatalogRepository::default()));
    let err = service.add_category("missing", "promo").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let err = service.delete_platform("missing").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_service_out_of_bounds_performs_no_write() {
    let repo = Arc::new(MockCatalogRepository::default());
    let service = CatalogService::new(repo.clone());
    let id = service
        .create_platform(new_platform("instagram"))
        .await
        .unwrap()
        .id;
    service.add_category(&id, "promo").await.unwrap();
    for sid in ["1", "2", "3"] {
        service.add_service(&id, "promo", new_service(sid)).await.unwrap();
    }
    let before = service.get_platform(&id).unwrap();
    let attempts_before = repo.cas_attempts.load(Ordering::SeqCst);

    let err = service
        .delete_service(&id, "promo", ServiceRef::Index(5))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(service.get_platform(&id).unwrap(), before);
    assert_eq!(repo.cas_attempts.load(Ordering::SeqCst), attempts_before);
}

#[tokio::test]
async fn test_update_and_delete_misses_perform_no_write() {
    let repo = Arc::new(MockCatalogRepository::default());
    let service = CatalogService::new(repo.clone());
    let id = service
        .create_platform(new_platform("tiktok"))
        .await
        .unwrap()
        .id;
    service.add_category(&id, "views").await.unwrap();
    for sid in ["1", "2"] {
        service.add_service(&id, "views", new_service(sid)).await.unwrap();
    }
    let before = service.get_platform(&id).unwrap();
    let attempts_before = repo.cas_attempts.load(Ordering::SeqCst);
    let patch = ServicePatch {
        rate: Some(dec!(3)),
        ..Default::default()
    };

    let err = service
        .update_service(&id, "views", ServiceRef::Index(2), patch.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service
        .update_service(&id, "likes", ServiceRef::Index(0), patch)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service
        .delete_service(&id, "likes", ServiceRef::Index(0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(service.get_platform(&id).unwrap(), before);
    assert_eq!(repo.cas_attempts.load(Ordering::SeqCst), attempts_before);
}

#[tokio::test]
async fn test_services_get_stable_keys() {
    let (service, id) = service_with_platform(MockCatalogRepository::default()).await;
    service.add_category(&id, "followers").await.unwrap();
    let first = service
        .add_service(&id, "followers", new_service("100"))
        .await
        .unwrap();
    let second = service
        .add_service(&id, "followers", new_service("200"))
        .await
        .unwrap();
    assert_ne!(first.key, second.key);
    assert_eq!(second.order, 1);

    service
        .delete_service(&id, "followers", ServiceRef::Key(first.key.clone()))
        .await
        .unwrap();
    let updated = service
        .update_service(
            &id,
            "followers",
            ServiceRef::Key(second.key.clone()),
            ServicePatch {
                rate: Some(dec!(0.75)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.order, 0);
    assert_eq!(updated.rate, dec!(0.75));
}

#[tokio::test]
async fn test_lost_race_is_retried_against_fresh_version() {
    let repo = Arc::new(MockCatalogRepository::default());
    let service = CatalogService::new(repo.clone());
    let id = service
        .create_platform(new_platform("instagram"))
        .await
        .unwrap()
        .id;

    repo.stale_writes.store(2, Ordering::SeqCst);
    let platform = service.add_category(&id, "promo").await.unwrap();
    assert!(platform.categories.contains_key("promo"));
    assert_eq!(repo.cas_attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_retry_exhaustion_is_a_conflict() {
    let (service, id) =
        service_with_platform(MockCatalogRepository::default().with_stale_writes(10)).await;

    let err = service.add_category(&id, "promo").await.unwrap_err();
    assert!(matches!(err, Error::ConcurrentModification(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(service.get_platform(&id).unwrap().categories.is_empty());
}

#[tokio::test]
async fn test_find_service_uses_first_match_in_catalog_order() {
    let service = CatalogService::new(Arc::new(MockCatalogRepository::default()));
    let tiktok = service.create_platform(new_platform("tiktok")).await.unwrap();
    let facebook = service.create_platform(new_platform("facebook")).await.unwrap();

    service.add_category(&tiktok.id, "likes").await.unwrap();
    service.add_category(&facebook.id, "likes").await.unwrap();

    let mut cheap = new_service("42");
    cheap.rate = dec!(0.10);
    service.add_service(&facebook.id, "likes", cheap).await.unwrap();
    let mut pricey = new_service("42");
    pricey.rate = dec!(0.90);
    service.add_service(&tiktok.id, "likes", pricey).await.unwrap();

    // Platforms are walked by name: "facebook" before "tiktok".
    assert_eq!(service.find_service(" 42").unwrap().rate, dec!(0.10));
    assert_eq!(
        service.find_service("43").unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_list_platforms_returns_summaries() {
    let (service, id) = service_with_platform(MockCatalogRepository::default()).await;
    service.add_category(&id, "promo").await.unwrap();

    let summaries = service.list_platforms().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].name, "instagram");
    assert_eq!(service.list_catalog().unwrap()[0].categories.len(), 1);
}
