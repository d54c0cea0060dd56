use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use brezora_core::earnings::{ChargeReport, OrderEarnings, PaymentEarnings};
use brezora_provider::ProviderBalance;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn order_earnings(State(state): State<Arc<AppState>>) -> ApiResult<Json<OrderEarnings>> {
    let earnings = state
        .earnings_service
        .reconcile_order_earnings()
        .await
        .map_err(ApiError::generic("Failed to calculate earnings"))?;
    Ok(Json(earnings))
}

async fn payment_earnings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PaymentEarnings>> {
    let earnings = state
        .earnings_service
        .reconcile_payment_earnings()
        .await
        .map_err(ApiError::generic("Failed to calculate earnings"))?;
    Ok(Json(earnings))
}

async fn provider_balance(State(state): State<Arc<AppState>>) -> ApiResult<Json<ProviderBalance>> {
    let balance = state
        .earnings_service
        .get_provider_balance()
        .await
        .map_err(ApiError::generic("Failed to fetch provider balance"))?;
    Ok(Json(balance))
}

async fn charge_report(State(state): State<Arc<AppState>>) -> ApiResult<Json<ChargeReport>> {
    let report = state
        .earnings_service
        .api_charge_report()
        .await
        .map_err(ApiError::generic("Failed to build charge report"))?;
    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard/earnings/orders", get(order_earnings))
        .route("/dashboard/earnings/payments", get(payment_earnings))
        .route("/dashboard/provider/balance", get(provider_balance))
        .route("/dashboard/provider/charges", get(charge_report))
}
