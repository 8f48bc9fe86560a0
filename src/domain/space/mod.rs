//! Parking space aggregate

pub mod model;
pub mod repository;

pub use model::{Space, SpaceKind, SpaceStatus};
pub use repository::SpaceRepository;
