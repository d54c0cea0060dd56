//! Order domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A purchase placed by a user and forwarded to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Amount charged to the user. `None` when the stored value is missing
    /// or not a number.
    pub price: Option<Decimal>,
    pub quantity: i64,
    pub start_count: Option<i64>,
    pub status: String,
    pub remains: Option<i64>,
    /// The provider's id for this order, once it has been placed remotely.
    pub actual_order_id_from_api: Option<String>,
    pub platform_service: Option<String>,
    pub link: String,
    pub created_at: NaiveDateTime,
}

impl Order {
    pub fn price_or_zero(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }

    /// The provider order id, ignoring blank values.
    pub fn provider_order_id(&self) -> Option<&str> {
        self.actual_order_id_from_api
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Input model for recording an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_id: String,
    pub price: Option<Decimal>,
    pub quantity: i64,
    pub status: String,
    pub actual_order_id_from_api: Option<String>,
    pub platform_service: Option<String>,
    pub link: String,
}
