//! Task polling handlers.

use axum::Json;
use axum::extract::{Path, State};

use shiftwise_core::types::TaskId;

use crate::dto::response::{ApiResponse, TaskStatusResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/tasks/{id}
///
/// Status snapshot for polling clients. A failed task's error message is
/// visible here (and only here).
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> ApiResult<Json<ApiResponse<TaskStatusResponse>>> {
    let task = state.tasks.get_task(&id).await?;
    Ok(Json(ApiResponse::ok(task.into())))
}

/// GET /api/tasks/{id}/result
///
/// Returns the raw stored result payload. Any non-COMPLETED status —
/// including FAILED and CANCELLED — yields the same 400 "not completed"
/// error as a still-running task.
pub async fn get_task_result(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
) -> ApiResult<Json<serde_json::Value>> {
    let result = state.tasks.get_result(&id).await?;
    Ok(Json(result))
}
