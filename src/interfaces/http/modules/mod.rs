//! HTTP handler modules

pub mod health;
pub mod request_id;
pub mod sessions;
pub mod spaces;
pub mod vehicles;

use std::sync::Arc;

use crate::application::{OccupancyService, SpaceService, VehicleService};

/// Shared state for all resource routes.
#[derive(Clone)]
pub struct AppState {
    pub spaces: Arc<SpaceService>,
    pub vehicles: Arc<VehicleService>,
    pub occupancy: Arc<OccupancyService>,
}
