//! Database models for wallets.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use brezora_core::wallets::Wallet;

use crate::utils::{decimal_to_text, parse_decimal_tolerant};

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletDB {
    pub user_id: String,
    pub balance: String,
    pub last_updated: NaiveDateTime,
}

impl From<WalletDB> for Wallet {
    fn from(db: WalletDB) -> Self {
        Self {
            balance: parse_decimal_tolerant(&db.balance, "balance"),
            user_id: db.user_id,
            last_updated: db.last_updated,
        }
    }
}

impl From<&Wallet> for WalletDB {
    fn from(wallet: &Wallet) -> Self {
        Self {
            user_id: wallet.user_id.clone(),
            balance: decimal_to_text(wallet.balance),
            last_updated: wallet.last_updated,
        }
    }
}
