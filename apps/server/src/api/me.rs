use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use brezora_core::pricing::DiscountedPlatform;

use crate::{auth::CurrentIdentity, error::ApiResult, main_lib::AppState};

/// The platform's catalog priced for the caller.
async fn discounted_platform(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
    identity: CurrentIdentity,
) -> ApiResult<Json<DiscountedPlatform>> {
    Ok(Json(
        state
            .pricing_service
            .discounted_platform(identity.get(), &name)?,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/me/platforms/{name}", get(discounted_platform))
}
