use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use uuid::Uuid;

use brezora_core::payments::{NewPayment, Payment, PaymentRepositoryTrait, PaymentStatus};
use brezora_core::Result;

use super::model::PaymentDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::payments;
use crate::utils::decimal_to_text;

pub struct PaymentRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PaymentRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        PaymentRepository { pool, writer }
    }
}

#[async_trait]
impl PaymentRepositoryTrait for PaymentRepository {
    fn list_paid(&self) -> Result<Vec<Payment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = payments::table
            .filter(payments::status.eq(PaymentStatus::Paid.as_str()))
            .order(payments::created_at.asc())
            .select(PaymentDB::as_select())
            .load::<PaymentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Payment>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = payments::table
            .filter(payments::user_id.eq(user_id))
            .order(payments::created_at.desc())
            .select(PaymentDB::as_select())
            .load::<PaymentDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }

    async fn insert(&self, new_payment: NewPayment) -> Result<Payment> {
        new_payment.validate()?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Payment> {
                let row = PaymentDB {
                    id: new_payment
                        .id
                        .filter(|id| !id.trim().is_empty())
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    user_id: new_payment.user_id,
                    payment_type: new_payment.payment_type.as_str().to_string(),
                    amount: Some(decimal_to_text(new_payment.amount)),
                    status: new_payment.status.as_str().to_string(),
                    order_id: new_payment.order_id,
                    payment_id: new_payment.payment_id,
                    signature: new_payment.signature,
                    created_at: Utc::now().naive_utc(),
                };
                let inserted = diesel::insert_into(payments::table)
                    .values(&row)
                    .returning(PaymentDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Payment::from(inserted))
            })
            .await
    }
}
