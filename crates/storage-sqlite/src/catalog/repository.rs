use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use uuid::Uuid;

use brezora_core::catalog::{
    CatalogRepositoryTrait, CategoryMap, NewPlatform, Platform, PlatformUpdate,
};
use brezora_core::{Error, Result};

use super::model::{categories_to_json, NewPlatformDB, PlatformDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::platforms;

pub struct CatalogRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl CatalogRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        CatalogRepository { pool, writer }
    }
}

fn load_platform(conn: &mut SqliteConnection, platform_id: &str) -> Result<Option<Platform>> {
    platforms::table
        .find(platform_id)
        .select(PlatformDB::as_select())
        .first::<PlatformDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Platform::try_from)
        .transpose()
}

#[async_trait]
impl CatalogRepositoryTrait for CatalogRepository {
    fn get_by_id(&self, platform_id: &str) -> Result<Platform> {
        let mut conn = get_connection(&self.pool)?;
        load_platform(&mut conn, platform_id)?
            .ok_or_else(|| Error::not_found("Platform", platform_id))
    }

    fn get_by_name(&self, name: &str) -> Result<Platform> {
        let mut conn = get_connection(&self.pool)?;
        platforms::table
            .filter(platforms::name.eq(name))
            .select(PlatformDB::as_select())
            .first::<PlatformDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?
            .ok_or_else(|| Error::not_found("Platform", name))?
            .try_into()
    }

    fn list(&self) -> Result<Vec<Platform>> {
        let mut conn = get_connection(&self.pool)?;
        platforms::table
            .order(platforms::name.asc())
            .select(PlatformDB::as_select())
            .load::<PlatformDB>(&mut conn)
            .map_err(StorageError::from)?
            .into_iter()
            .map(Platform::try_from)
            .collect()
    }

    async fn create(&self, new_platform: NewPlatform) -> Result<Platform> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Platform> {
                let now = Utc::now().naive_utc();
                let row = NewPlatformDB {
                    id: new_platform
                        .id
                        .filter(|id| !id.trim().is_empty())
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    name: new_platform.name,
                    image: new_platform.image,
                    description: new_platform.description,
                    categories: categories_to_json(&CategoryMap::new())?,
                    version: 0,
                    created_at: now,
                    updated_at: now,
                };

                let result_db = diesel::insert_into(platforms::table)
                    .values(&row)
                    .returning(PlatformDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Platform::try_from(result_db)
            })
            .await
    }

    async fn update_profile(&self, platform_id: &str, update: PlatformUpdate) -> Result<Platform> {
        let platform_id = platform_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Platform> {
                let updated = diesel::update(platforms::table.find(&platform_id))
                    .set((
                        platforms::name.eq(&update.name),
                        platforms::image.eq(&update.image),
                        platforms::description.eq(&update.description),
                        platforms::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(PlatformDB::as_returning())
                    .get_result::<PlatformDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?
                    .ok_or_else(|| Error::not_found("Platform", &platform_id))?;
                Platform::try_from(updated)
            })
            .await
    }

    async fn update_categories(
        &self,
        platform_id: &str,
        expected_version: i64,
        categories: CategoryMap,
    ) -> Result<Platform> {
        let platform_id = platform_id.to_string();
        let categories_json = categories_to_json(&categories)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Platform> {
                let written = diesel::update(
                    platforms::table
                        .filter(platforms::id.eq(&platform_id))
                        .filter(platforms::version.eq(expected_version)),
                )
                .set((
                    platforms::categories.eq(&categories_json),
                    platforms::version.eq(expected_version + 1),
                    platforms::updated_at.eq(Utc::now().naive_utc()),
                ))
                .returning(PlatformDB::as_returning())
                .get_result::<PlatformDB>(conn)
                .optional()
                .map_err(StorageError::from)?;

                match written {
                    Some(row) => Platform::try_from(row),
                    None => match load_platform(conn, &platform_id)? {
                        None => Err(Error::not_found("Platform", &platform_id)),
                        Some(current) => {
                            debug!(
                                "Stale category write for platform {}: expected version {}, found {}",
                                platform_id, expected_version, current.version
                            );
                            Err(Error::ConcurrentModification(format!(
                                "platform '{}' changed (expected version {}, found {})",
                                platform_id, expected_version, current.version
                            )))
                        }
                    },
                }
            })
            .await
    }

    async fn delete(&self, platform_id: &str) -> Result<usize> {
        let platform_id = platform_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(platforms::table.find(platform_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
