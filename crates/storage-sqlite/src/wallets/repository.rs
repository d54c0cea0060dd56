use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;

use brezora_core::wallets::{Wallet, WalletRepositoryTrait};
use brezora_core::Result;

use super::model::WalletDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::wallets;

pub struct WalletRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl WalletRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        WalletRepository { pool, writer }
    }
}

fn find_wallet(conn: &mut SqliteConnection, user_id: &str) -> Result<Option<Wallet>> {
    Ok(wallets::table
        .find(user_id)
        .select(WalletDB::as_select())
        .first::<WalletDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .map(Wallet::from))
}

#[async_trait]
impl WalletRepositoryTrait for WalletRepository {
    fn find(&self, user_id: &str) -> Result<Option<Wallet>> {
        let mut conn = get_connection(&self.pool)?;
        find_wallet(&mut conn, user_id)
    }

    async fn get_or_create(&self, user_id: &str) -> Result<Wallet> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Wallet> {
                let fresh = WalletDB {
                    user_id: user_id.clone(),
                    balance: "0".to_string(),
                    last_updated: Utc::now().naive_utc(),
                };
                diesel::insert_or_ignore_into(wallets::table)
                    .values(&fresh)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(wallets::table
                    .find(&user_id)
                    .select(WalletDB::as_select())
                    .first::<WalletDB>(conn)
                    .map_err(StorageError::from)?
                    .into())
            })
            .await
    }

    async fn increment(&self, user_id: &str, amount: Decimal) -> Result<Wallet> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Wallet> {
                // Read and write share the writer's immediate transaction.
                let current = find_wallet(conn, &user_id)?
                    .map(|w| w.balance)
                    .unwrap_or(Decimal::ZERO);
                let updated = Wallet {
                    user_id: user_id.clone(),
                    balance: current + amount,
                    last_updated: Utc::now().naive_utc(),
                };
                let row = WalletDB::from(&updated);

                diesel::insert_into(wallets::table)
                    .values(&row)
                    .on_conflict(wallets::user_id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                debug!(
                    "Wallet {} balance {} -> {}",
                    user_id, current, updated.balance
                );
                Ok(updated)
            })
            .await
    }
}
