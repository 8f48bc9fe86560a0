//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::ApiResponse;
use super::modules::health::handlers::{self as health, HealthState};
use super::modules::request_id::request_id_middleware;
use super::modules::{sessions, spaces, vehicles, AppState};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Spaces
        spaces::handlers::list_spaces,
        spaces::handlers::list_free_spaces,
        spaces::handlers::get_space,
        spaces::handlers::create_space,
        spaces::handlers::update_space,
        spaces::handlers::delete_space,
        // Vehicles
        vehicles::handlers::list_vehicles,
        vehicles::handlers::find_by_plate,
        vehicles::handlers::get_vehicle,
        vehicles::handlers::create_vehicle,
        vehicles::handlers::update_vehicle,
        vehicles::handlers::delete_vehicle,
        // Sessions
        sessions::handlers::list_sessions,
        sessions::handlers::list_open_sessions,
        sessions::handlers::list_sessions_for_vehicle,
        sessions::handlers::monthly_revenue,
        sessions::handlers::get_session,
        sessions::handlers::open_session,
        sessions::handlers::close_session,
        sessions::handlers::delete_session,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
            // Spaces
            spaces::dto::SpaceDto,
            spaces::dto::CreateSpaceRequest,
            spaces::dto::UpdateSpaceRequest,
            // Vehicles
            vehicles::dto::VehicleDto,
            vehicles::dto::CreateVehicleRequest,
            vehicles::dto::UpdateVehicleRequest,
            // Sessions
            sessions::dto::SessionDto,
            sessions::dto::OpenSessionRequest,
            sessions::dto::CloseSessionRequest,
            sessions::dto::MonthlyRevenueDto,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Spaces", description = "Parking space management"),
        (name = "Vehicles", description = "Registered vehicle management"),
        (name = "Sessions", description = "Occupancy sessions: open, close, history, revenue"),
    ),
    info(
        title = "Parking Service API",
        version = "1.0.0",
        description = "REST API for parking occupancy and billing",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(state: AppState, db: DatabaseConnection) -> Router {
    let health_state = HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let space_routes = Router::new()
        .route(
            "/",
            get(spaces::handlers::list_spaces).post(spaces::handlers::create_space),
        )
        .route("/free", get(spaces::handlers::list_free_spaces))
        .route(
            "/{id}",
            get(spaces::handlers::get_space)
                .put(spaces::handlers::update_space)
                .delete(spaces::handlers::delete_space),
        )
        .with_state(state.clone());

    let vehicle_routes = Router::new()
        .route(
            "/",
            get(vehicles::handlers::list_vehicles).post(vehicles::handlers::create_vehicle),
        )
        .route("/by-plate/{plate}", get(vehicles::handlers::find_by_plate))
        .route(
            "/{id}",
            get(vehicles::handlers::get_vehicle)
                .put(vehicles::handlers::update_vehicle)
                .delete(vehicles::handlers::delete_vehicle),
        )
        .with_state(state.clone());

    let session_routes = Router::new()
        .route(
            "/",
            get(sessions::handlers::list_sessions).post(sessions::handlers::open_session),
        )
        .route("/open", get(sessions::handlers::list_open_sessions))
        .route(
            "/by-vehicle/{vehicle_id}",
            get(sessions::handlers::list_sessions_for_vehicle),
        )
        .route("/revenue/monthly", get(sessions::handlers::monthly_revenue))
        .route(
            "/{id}",
            get(sessions::handlers::get_session).delete(sessions::handlers::delete_session),
        )
        .route("/{id}/close", post(sessions::handlers::close_session))
        .with_state(state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::health_check).with_state(health_state))
        // Resources
        .nest("/api/v1/spaces", space_routes)
        .nest("/api/v1/vehicles", vehicle_routes)
        .nest("/api/v1/sessions", session_routes)
        // Middleware
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
