//! Vehicle aggregate

pub mod model;
pub mod repository;

pub use model::{Vehicle, VehicleCategory};
pub use repository::VehicleRepository;
