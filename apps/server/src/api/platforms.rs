use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use brezora_core::catalog::{
    NewPlatform, NewService, Platform, PlatformSummary, PlatformUpdate, Service, ServicePatch,
    ServiceRef,
};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
struct CategoryName {
    name: String,
}

async fn list_platforms(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PlatformSummary>>> {
    Ok(Json(state.catalog_service.list_platforms()?))
}

async fn list_catalog(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Platform>>> {
    Ok(Json(state.catalog_service.list_catalog()?))
}

async fn create_platform(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPlatform>,
) -> ApiResult<(StatusCode, Json<Platform>)> {
    let created = state.catalog_service.create_platform(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_platform(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Platform>> {
    Ok(Json(state.catalog_service.get_platform(&id)?))
}

async fn get_platform_by_name(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Platform>> {
    Ok(Json(state.catalog_service.get_platform_by_name(&name)?))
}

async fn update_platform(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PlatformUpdate>,
) -> ApiResult<Json<Platform>> {
    Ok(Json(
        state.catalog_service.update_platform(&id, payload).await?,
    ))
}

async fn delete_platform(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.catalog_service.delete_platform(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CategoryName>,
) -> ApiResult<Json<Platform>> {
    Ok(Json(
        state.catalog_service.add_category(&id, &body.name).await?,
    ))
}

async fn rename_category(
    Path((id, category)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<CategoryName>,
) -> ApiResult<Json<Platform>> {
    Ok(Json(
        state
            .catalog_service
            .rename_category(&id, &category, &body.name)
            .await?,
    ))
}

async fn delete_category(
    Path((id, category)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Platform>> {
    Ok(Json(
        state.catalog_service.delete_category(&id, &category).await?,
    ))
}

async fn add_service(
    Path((id, category)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewService>,
) -> ApiResult<(StatusCode, Json<Service>)> {
    let service = state
        .catalog_service
        .add_service(&id, &category, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(service)))
}

async fn update_service(
    Path((id, category, service_ref)): Path<(String, String, String)>,
    State(state): State<Arc<AppState>>,
    Json(patch): Json<ServicePatch>,
) -> ApiResult<Json<Service>> {
    let service_ref: ServiceRef = service_ref.parse()?;
    Ok(Json(
        state
            .catalog_service
            .update_service(&id, &category, service_ref, patch)
            .await?,
    ))
}

async fn delete_service(
    Path((id, category, service_ref)): Path<(String, String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Service>> {
    let service_ref: ServiceRef = service_ref.parse()?;
    Ok(Json(
        state
            .catalog_service
            .delete_service(&id, &category, service_ref)
            .await?,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/catalog", get(list_catalog))
        .route("/platforms", get(list_platforms).post(create_platform))
        .route("/platforms/by-name/{name}", get(get_platform_by_name))
        .route(
            "/platforms/{id}",
            get(get_platform)
                .put(update_platform)
                .delete(delete_platform),
        )
        .route("/platforms/{id}/categories", post(add_category))
        .route(
            "/platforms/{id}/categories/{category}",
            put(rename_category).delete(delete_category),
        )
        .route(
            "/platforms/{id}/categories/{category}/services",
            post(add_service),
        )
        .route(
            "/platforms/{id}/categories/{category}/services/{service_ref}",
            put(update_service).delete(delete_service),
        )
}
