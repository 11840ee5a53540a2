//! Store creation handlers: the synchronous variant and its async twin.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::dto::request::CreateStoreRequest;
use crate::dto::response::{ApiResponse, StoreResponse, TaskAcceptedResponse};
use crate::error::ApiResult;
use crate::extractors::RequesterId;
use crate::state::AppState;

/// Task type tag for async store creation.
const STORE_CREATE: &str = "STORE_CREATE";

/// POST /api/stores
pub async fn create_store(
    State(state): State<AppState>,
    RequesterId(requester): RequesterId,
    Json(req): Json<CreateStoreRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<StoreResponse>>)> {
    let store = state
        .stores
        .create_store(&req.name, &req.timezone, requester)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(store.into()))))
}

/// POST /api/stores/async
///
/// Admits a task record (committed before this handler returns), hands
/// the actual creation to the database-bound worker pool, and responds
/// 202 with the id to poll. The handler never awaits the outcome.
pub async fn create_store_async(
    State(state): State<AppState>,
    RequesterId(requester): RequesterId,
    Json(req): Json<CreateStoreRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<TaskAcceptedResponse>>)> {
    let task = state.tasks.create_task(STORE_CREATE, requester, &req).await?;

    let stores = Arc::clone(&state.stores);
    state
        .runner
        .dispatch(task.id.clone(), move || async move {
            stores
                .create_store(&req.name, &req.timezone, requester)
                .await
        })
        .await;

    Ok((StatusCode::ACCEPTED, Json(ApiResponse::ok(task.into()))))
}

/// GET /api/stores/{id}
pub async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<StoreResponse>>> {
    let store = state.stores.get_store(id).await?;
    Ok(Json(ApiResponse::ok(store.into())))
}
