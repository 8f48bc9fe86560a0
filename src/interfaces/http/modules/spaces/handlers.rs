//! Space REST API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    parse_kind, parse_status, CreateSpaceRequest, FreeSpacesParams, SpaceDto, SpaceListParams,
    UpdateSpaceRequest,
};
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/spaces",
    tag = "Spaces",
    params(SpaceListParams),
    responses(
        (status = 200, description = "Space list", body = ApiResponse<Vec<SpaceDto>>)
    )
)]
pub async fn list_spaces(
    State(state): State<AppState>,
    Query(params): Query<SpaceListParams>,
) -> Result<Json<ApiResponse<Vec<SpaceDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let kind = params
        .kind
        .as_deref()
        .map(parse_kind)
        .transpose()
        .map_err(error_response)?;
    let status = params
        .status
        .as_deref()
        .map(parse_status)
        .transpose()
        .map_err(error_response)?;

    let spaces = state
        .spaces
        .list_filtered(kind, status)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        spaces.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/spaces/free",
    tag = "Spaces",
    params(FreeSpacesParams),
    responses(
        (status = 200, description = "Free spaces of the given kind", body = ApiResponse<Vec<SpaceDto>>)
    )
)]
pub async fn list_free_spaces(
    State(state): State<AppState>,
    Query(params): Query<FreeSpacesParams>,
) -> Result<Json<ApiResponse<Vec<SpaceDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let kind = parse_kind(&params.kind).map_err(error_response)?;
    let spaces = state.spaces.list_free(kind).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        spaces.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/spaces/{id}",
    tag = "Spaces",
    params(("id" = i32, Path, description = "Space ID")),
    responses(
        (status = 200, description = "Space details", body = ApiResponse<SpaceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_space(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SpaceDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.spaces.get_space(id).await {
        Ok(Some(space)) => Ok(Json(ApiResponse::success(space.into()))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Space {} not found", id))),
        )),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/spaces",
    tag = "Spaces",
    request_body = CreateSpaceRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<SpaceDto>),
        (status = 409, description = "Label already in use")
    )
)]
pub async fn create_space(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateSpaceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SpaceDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    let kind = parse_kind(&req.kind).map_err(error_response)?;
    let created = state
        .spaces
        .create_space(&req.label, kind, req.hourly_rate)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/spaces/{id}",
    tag = "Spaces",
    params(("id" = i32, Path, description = "Space ID")),
    request_body = UpdateSpaceRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<SpaceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_space(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateSpaceRequest>,
) -> Result<Json<ApiResponse<SpaceDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let kind = parse_kind(&req.kind).map_err(error_response)?;
    let updated = state
        .spaces
        .update_space(id, &req.label, kind, req.hourly_rate)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/spaces/{id}",
    tag = "Spaces",
    params(("id" = i32, Path, description = "Space ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Space has an open session")
    )
)]
pub async fn delete_space(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    state.spaces.delete_space(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success("Space deleted".to_string())))
}
