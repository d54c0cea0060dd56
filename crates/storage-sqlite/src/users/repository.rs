use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use uuid::Uuid;

use brezora_core::users::{
    Discount, DiscountTable, NewUser, User, UserRepositoryTrait, UserUpdate,
};
use brezora_core::{Error, Result};

use super::model::{UserDB, UserDiscountDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{user_discounts, users, wallets};
use crate::utils::decimal_to_text;

pub struct UserRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        UserRepository { pool, writer }
    }
}

fn load_user_row(conn: &mut SqliteConnection, user_id: &str) -> Result<UserDB> {
    users::table
        .find(user_id)
        .select(UserDB::as_select())
        .first::<UserDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| Error::not_found("User", user_id))
}

fn load_discount_rows(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<UserDiscountDB>> {
    Ok(user_discounts::table
        .filter(user_discounts::user_id.eq(user_id))
        .order(user_discounts::position.asc())
        .select(UserDiscountDB::as_select())
        .load::<UserDiscountDB>(conn)
        .map_err(StorageError::from)?)
}

fn load_user(conn: &mut SqliteConnection, user_id: &str) -> Result<User> {
    let row = load_user_row(conn, user_id)?;
    let discounts = load_discount_rows(conn, user_id)?;
    Ok(row.into_user(discounts))
}

fn load_discount_table(conn: &mut SqliteConnection, user_id: &str) -> Result<DiscountTable> {
    let rows = load_discount_rows(conn, user_id)?;
    Ok(DiscountTable::from_entries(rows.into_iter().map(Discount::from)))
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        load_user(&mut conn, user_id)
    }

    fn list(&self) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .order(users::created_at.desc())
            .select(UserDB::as_select())
            .load::<UserDB>(&mut conn)
            .map_err(StorageError::from)?;

        let mut discounts_by_user: HashMap<String, Vec<UserDiscountDB>> = HashMap::new();
        for discount in user_discounts::table
            .order((user_discounts::user_id.asc(), user_discounts::position.asc()))
            .select(UserDiscountDB::as_select())
            .load::<UserDiscountDB>(&mut conn)
            .map_err(StorageError::from)?
        {
            discounts_by_user
                .entry(discount.user_id.clone())
                .or_default()
                .push(discount);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let discounts = discounts_by_user.remove(&row.id).unwrap_or_default();
                row.into_user(discounts)
            })
            .collect())
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let now = Utc::now().naive_utc();
                let row = UserDB {
                    id: new_user
                        .id
                        .filter(|id| !id.trim().is_empty())
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    name: new_user.name,
                    email: new_user.email,
                    is_admin: new_user.is_admin,
                    created_at: now,
                    updated_at: now,
                };
                let inserted = diesel::insert_into(users::table)
                    .values(&row)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(inserted.into_user(Vec::new()))
            })
            .await
    }

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<User> {
                let current = load_user_row(conn, &user_id)?;
                diesel::update(users::table.find(&user_id))
                    .set((
                        users::name.eq(update.name.unwrap_or(current.name)),
                        users::email.eq(update.email.unwrap_or(current.email)),
                        users::is_admin.eq(update.is_admin.unwrap_or(current.is_admin)),
                        users::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                load_user(conn, &user_id)
            })
            .await
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(user_discounts::table.filter(user_discounts::user_id.eq(&user_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                diesel::delete(wallets::table.find(&user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(diesel::delete(users::table.find(&user_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn upsert_discount(&self, user_id: &str, discount: Discount) -> Result<DiscountTable> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<DiscountTable> {
                load_user_row(conn, &user_id)?;

                let last_position: Option<i32> = user_discounts::table
                    .filter(user_discounts::user_id.eq(&user_id))
                    .select(max(user_discounts::position))
                    .first(conn)
                    .map_err(StorageError::from)?;
                let row = UserDiscountDB::from_discount(
                    &user_id,
                    &discount,
                    last_position.map_or(0, |p| p + 1),
                );

                // Only the percent changes on conflict; the entry keeps its slot.
                diesel::insert_into(user_discounts::table)
                    .values(&row)
                    .on_conflict((user_discounts::user_id, user_discounts::service_id))
                    .do_update()
                    .set(user_discounts::discount.eq(decimal_to_text(discount.discount)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                debug!(
                    "Stored discount {}% on service {} for user {}",
                    discount.discount, discount.service_id, user_id
                );
                load_discount_table(conn, &user_id)
            })
            .await
    }

    async fn remove_discount(&self, user_id: &str, service_id: &str) -> Result<DiscountTable> {
        let user_id = user_id.to_string();
        let service_id = service_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<DiscountTable> {
                load_user_row(conn, &user_id)?;
                diesel::delete(
                    user_discounts::table
                        .filter(user_discounts::user_id.eq(&user_id))
                        .filter(user_discounts::service_id.eq(&service_id)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                load_discount_table(conn, &user_id)
            })
            .await
    }
}
