//! Database models for platforms.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use brezora_core::catalog::{CategoryMap, Platform};
use brezora_core::Error;

/// Database model for platforms. `categories` holds the JSON category map.
#[derive(
    Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::platforms)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct PlatformDB {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub categories: String,
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::platforms)]
pub struct NewPlatformDB {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub categories: String,
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub(crate) fn categories_to_json(categories: &CategoryMap) -> Result<String, Error> {
    Ok(serde_json::to_string(categories)?)
}

impl TryFrom<PlatformDB> for Platform {
    type Error = Error;

    fn try_from(db: PlatformDB) -> Result<Self, Self::Error> {
        let categories: CategoryMap = if db.categories.trim().is_empty() {
            CategoryMap::new()
        } else {
            serde_json::from_str(&db.categories)?
        };
        Ok(Platform {
            id: db.id,
            name: db.name,
            image: db.image,
            description: db.description,
            categories,
            version: db.version,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}
