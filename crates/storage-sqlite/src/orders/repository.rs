use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use uuid::Uuid;

use brezora_core::orders::{NewOrder, Order, OrderRepositoryTrait};
use brezora_core::Result;

use super::model::OrderDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::orders;
use crate::utils::decimal_to_text;

pub struct OrderRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl OrderRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        OrderRepository { pool, writer }
    }
}

#[async_trait]
impl OrderRepositoryTrait for OrderRepository {
    fn list_all(&self) -> Result<Vec<Order>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = orders::table
            .order((orders::created_at.asc(), orders::id.asc()))
            .select(OrderDB::as_select())
            .load::<OrderDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = orders::table
            .filter(orders::user_id.eq(user_id))
            .order(orders::created_at.desc())
            .select(OrderDB::as_select())
            .load::<OrderDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn insert(&self, new_order: NewOrder) -> Result<Order> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Order> {
                let row = OrderDB {
                    id: new_order
                        .id
                        .filter(|id| !id.trim().is_empty())
                        .unwrap_or_else(|| Uuid::new_v4().to_string()),
                    user_id: new_order.user_id,
                    price: new_order.price.map(decimal_to_text),
                    quantity: new_order.quantity,
                    start_count: None,
                    status: new_order.status,
                    remains: None,
                    actual_order_id_from_api: new_order.actual_order_id_from_api,
                    platform_service: new_order.platform_service,
                    link: new_order.link,
                    created_at: Utc::now().naive_utc(),
                };
                let inserted = diesel::insert_into(orders::table)
                    .values(&row)
                    .returning(OrderDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Order::from(inserted))
            })
            .await
    }
}
