//! Database models for orders.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use brezora_core::orders::Order;

use crate::utils::parse_optional_decimal;

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderDB {
    pub id: String,
    pub user_id: String,
    pub price: Option<String>,
    pub quantity: i64,
    pub start_count: Option<i64>,
    pub status: String,
    pub remains: Option<i64>,
    pub actual_order_id_from_api: Option<String>,
    pub platform_service: Option<String>,
    pub link: String,
    pub created_at: NaiveDateTime,
}

impl From<OrderDB> for Order {
    fn from(db: OrderDB) -> Self {
        Self {
            price: parse_optional_decimal(db.price.as_deref(), "price"),
            id: db.id,
            user_id: db.user_id,
            quantity: db.quantity,
            start_count: db.start_count,
            status: db.status,
            remains: db.remains,
            actual_order_id_from_api: db.actual_order_id_from_api,
            platform_service: db.platform_service,
            link: db.link,
            created_at: db.created_at,
        }
    }
}
