//! Database models for payments.

use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;

use brezora_core::payments::{Payment, PaymentStatus, PaymentType};

use crate::utils::parse_optional_decimal;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PaymentDB {
    pub id: String,
    pub user_id: String,
    pub payment_type: String,
    pub amount: Option<String>,
    pub status: String,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub signature: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<PaymentDB> for Payment {
    fn from(db: PaymentDB) -> Self {
        let payment_type = PaymentType::from_str(&db.payment_type).unwrap_or_else(|e| {
            warn!("Payment {}: {}; reading as manual", db.id, e);
            PaymentType::Manual
        });
        let status = PaymentStatus::from_str(&db.status).unwrap_or_else(|e| {
            warn!("Payment {}: {}; reading as pending", db.id, e);
            PaymentStatus::Pending
        });
        Self {
            amount: parse_optional_decimal(db.amount.as_deref(), "amount"),
            id: db.id,
            user_id: db.user_id,
            payment_type,
            status,
            order_id: db.order_id,
            payment_id: db.payment_id,
            signature: db.signature,
            created_at: db.created_at,
        }
    }
}
