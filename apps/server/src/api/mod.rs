use std::sync::Arc;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    auth::{require_admin, resolve_identity},
    config::Config,
    main_lib::AppState,
};

mod dashboard;
mod health;
mod me;
mod orders;
mod platforms;
mod users;

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let admin = Router::new()
        .merge(platforms::router())
        .merge(users::router())
        .route_layer(middleware::from_fn(require_admin));

    let bounded = Router::new()
        .merge(health::router())
        .merge(orders::router())
        .merge(me::router())
        .merge(admin)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ));

    // Provider-backed reports issue one request per status chunk, each bounded
    // by the provider timeout, so they sit outside the request timeout.
    let reports = dashboard::router().route_layer(middleware::from_fn(require_admin));

    let api = Router::new()
        .merge(bounded)
        .merge(reports)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_identity,
        ));

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
}
