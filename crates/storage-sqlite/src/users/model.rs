//! Database models for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use brezora_core::users::{Discount, DiscountTable, User};

use crate::utils::{decimal_to_text, parse_decimal_tolerant};

#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// One discount entry. `position` keeps the order entries were first added.
#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::user_discounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDiscountDB {
    pub user_id: String,
    pub service_id: String,
    pub discount: String,
    pub position: i32,
}

impl UserDiscountDB {
    pub fn from_discount(user_id: &str, discount: &Discount, position: i32) -> Self {
        Self {
            user_id: user_id.to_string(),
            service_id: discount.service_id.clone(),
            discount: decimal_to_text(discount.discount),
            position,
        }
    }
}

impl From<UserDiscountDB> for Discount {
    fn from(db: UserDiscountDB) -> Self {
        Discount::new(
            &db.service_id,
            parse_decimal_tolerant(&db.discount, "discount"),
        )
    }
}

impl UserDB {
    /// Rows must already be ordered by position.
    pub fn into_user(self, discount_rows: Vec<UserDiscountDB>) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            is_admin: self.is_admin,
            created_at: self.created_at,
            discounts: DiscountTable::from_entries(discount_rows.into_iter().map(Discount::from)),
        }
    }
}
