//! Session REST API handlers
//!
//! Thin renderers over the occupancy engine: all occupancy/billing rules
//! live in the application layer.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CloseSessionRequest, MonthlyRevenueDto, OpenSessionRequest, SessionDto, SessionListParams,
};
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    params(SessionListParams),
    responses(
        (status = 200, description = "Filtered session history", body = ApiResponse<Vec<SessionDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<SessionListParams>,
) -> Result<Json<ApiResponse<Vec<SessionDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let filter = params.into_filter().map_err(error_response)?;
    let sessions = state
        .occupancy
        .list_filtered(&filter)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        sessions.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/open",
    tag = "Sessions",
    responses(
        (status = 200, description = "Sessions currently in progress", body = ApiResponse<Vec<SessionDto>>)
    )
)]
pub async fn list_open_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SessionDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let sessions = state
        .occupancy
        .list_open_sessions()
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        sessions.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/by-vehicle/{vehicle_id}",
    tag = "Sessions",
    params(("vehicle_id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle session history", body = ApiResponse<Vec<SessionDto>>)
    )
)]
pub async fn list_sessions_for_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<SessionDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let sessions = state
        .occupancy
        .sessions_for_vehicle(vehicle_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        sessions.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/revenue/monthly",
    tag = "Sessions",
    responses(
        (status = 200, description = "Revenue per month of exit, ascending", body = ApiResponse<Vec<MonthlyRevenueDto>>)
    )
)]
pub async fn monthly_revenue(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MonthlyRevenueDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let revenue = state
        .occupancy
        .monthly_revenue()
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        revenue.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(("id" = i32, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session details", body = ApiResponse<SessionDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SessionDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.occupancy.get_session(id).await {
        Ok(Some(session)) => Ok(Json(ApiResponse::success(session.into()))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Session {} not found", id))),
        )),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "Sessions",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = ApiResponse<SessionDto>),
        (status = 404, description = "Space or vehicle not found"),
        (status = 409, description = "Space already occupied")
    )
)]
pub async fn open_session(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<OpenSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    let session = state
        .occupancy
        .open_session(req.space_id, req.vehicle_id, req.entry_time)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(session.into()))))
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/close",
    tag = "Sessions",
    params(("id" = i32, Path, description = "Session ID")),
    request_body = CloseSessionRequest,
    responses(
        (status = 200, description = "Session closed with settled charge", body = ApiResponse<SessionDto>),
        (status = 400, description = "Exit before entry"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Already closed")
    )
)]
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<CloseSessionRequest>,
) -> Result<Json<ApiResponse<SessionDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let session = state
        .occupancy
        .close_session(id, req.exit_time)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(session.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(("id" = i32, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Deleted (administrative override)"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .occupancy
        .delete_session(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success("Session deleted".to_string())))
}
