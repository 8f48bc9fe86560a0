//! Vehicle REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{parse_category, CreateVehicleRequest, UpdateVehicleRequest, VehicleDto};
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    responses(
        (status = 200, description = "Vehicle list", body = ApiResponse<Vec<VehicleDto>>)
    )
)]
pub async fn list_vehicles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<VehicleDto>>>, (StatusCode, Json<ApiResponse<()>>)> {
    let vehicles = state.vehicles.list_vehicles().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        vehicles.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/by-plate/{plate}",
    tag = "Vehicles",
    params(("plate" = String, Path, description = "Plate identifier, any casing")),
    responses(
        (status = 200, description = "Vehicle details", body = ApiResponse<VehicleDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn find_by_plate(
    State(state): State<AppState>,
    Path(plate): Path<String>,
) -> Result<Json<ApiResponse<VehicleDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.vehicles.find_by_plate(&plate).await {
        Ok(Some(vehicle)) => Ok(Json(ApiResponse::success(vehicle.into()))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Vehicle '{}' not found", plate))),
        )),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Vehicle details", body = ApiResponse<VehicleDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<VehicleDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.vehicles.get_vehicle(id).await {
        Ok(Some(vehicle)) => Ok(Json(ApiResponse::success(vehicle.into()))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Vehicle {} not found", id))),
        )),
        Err(e) => Err(error_response(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    tag = "Vehicles",
    request_body = CreateVehicleRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<VehicleDto>),
        (status = 409, description = "Plate already registered")
    )
)]
pub async fn create_vehicle(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleDto>>), (StatusCode, Json<ApiResponse<()>>)> {
    let category = parse_category(&req.category).map_err(error_response)?;
    let created = state
        .vehicles
        .create_vehicle(&req.plate, &req.make, category)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(created.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = i32, Path, description = "Vehicle ID")),
    request_body = UpdateVehicleRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<VehicleDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<VehicleDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    let category = parse_category(&req.category).map_err(error_response)?;
    let updated = state
        .vehicles
        .update_vehicle(id, &req.plate, &req.make, category)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{id}",
    tag = "Vehicles",
    params(("id" = i32, Path, description = "Vehicle ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Vehicle has an open session")
    )
)]
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ApiResponse<()>>)> {
    state
        .vehicles
        .delete_vehicle(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success("Vehicle deleted".to_string())))
}
