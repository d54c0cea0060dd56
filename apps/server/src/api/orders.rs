use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use brezora_core::orders::Order;
use serde::Deserialize;

use crate::{auth::CurrentIdentity, error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrdersQuery {
    user_id: Option<String>,
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<Json<Vec<Order>>> {
    let requested = query.user_id.as_deref().filter(|id| !id.trim().is_empty());
    Ok(Json(
        state
            .order_service
            .list_orders_for(identity.get(), requested)?,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/orders", get(list_orders))
}
