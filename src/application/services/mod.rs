//! Business logic services
//!
//! All validation lives here; the HTTP layer renders results and the
//! repositories move data.

pub mod occupancy;
pub mod space;
pub mod vehicle;

pub use occupancy::OccupancyService;
pub use space::SpaceService;
pub use vehicle::VehicleService;
