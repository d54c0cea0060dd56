use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use brezora_core::{
    catalog::deserialize_service_id,
    orders::Order,
    payments::Payment,
    pricing::ResolvedPrice,
    users::{DiscountTable, NewUser, User, UserUpdate},
    wallets::Wallet,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetDiscountRequest {
    #[serde(deserialize_with = "deserialize_service_id")]
    service_id: String,
    discount: Decimal,
}

/// `amount` may be sent as a JSON number or a numeric string.
#[derive(Deserialize)]
struct AdjustWalletRequest {
    amount: Value,
}

async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.user_service.list_users()?))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.user_service.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.user_service.get_user(&id)?))
}

async fn update_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserUpdate>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.user_service.update_user(&id, payload).await?))
}

async fn delete_user(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.user_service.delete_user(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_discount(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetDiscountRequest>,
) -> ApiResult<Json<DiscountTable>> {
    Ok(Json(
        state
            .discount_service
            .set_discount(&id, &body.service_id, body.discount)
            .await?,
    ))
}

async fn delete_discount(
    Path((id, service_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DiscountTable>> {
    Ok(Json(
        state
            .discount_service
            .delete_discount(&id, &service_id)
            .await?,
    ))
}

async fn resolve_price(
    Path((id, service_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ResolvedPrice>> {
    Ok(Json(
        state
            .pricing_service
            .resolve_price_for_user(&id, &service_id)?,
    ))
}

async fn list_user_orders(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Order>>> {
    Ok(Json(state.order_service.list_orders_for_user(&id)?))
}

async fn get_wallet(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Wallet>> {
    Ok(Json(state.wallet_service.get_wallet(&id).await?))
}

async fn adjust_wallet(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<AdjustWalletRequest>,
) -> ApiResult<Json<Wallet>> {
    let amount = match body.amount {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return Err(ApiError::BadRequest("amount must be a number".to_string())),
    };
    Ok(Json(
        state.wallet_service.adjust_balance(&id, &amount).await?,
    ))
}

async fn list_top_ups(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Payment>>> {
    Ok(Json(state.payment_service.list_top_ups(&id)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/{id}/discounts", put(set_discount))
        .route(
            "/users/{id}/discounts/{service_id}",
            delete(delete_discount),
        )
        .route("/users/{id}/prices/{service_id}", get(resolve_price))
        .route("/users/{id}/orders", get(list_user_orders))
        .route("/users/{id}/wallet", get(get_wallet).post(adjust_wallet))
        .route("/users/{id}/topups", get(list_top_ups))
}
