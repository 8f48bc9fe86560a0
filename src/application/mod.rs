//! Application layer: business logic services

pub mod services;

pub use services::{OccupancyService, SpaceService, VehicleService};
