//! # Parking Occupancy & Billing Service
//!
//! Tracks physical parking spaces, registered vehicles and timed occupancy
//! sessions, and computes the charge owed when a session is closed.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, repository traits and errors
//! - **application**: Business logic services (occupancy, billing, CRUD rules)
//! - **infrastructure**: External concerns (SeaORM persistence, in-memory storage)
//! - **interfaces**: REST API with Swagger documentation
//!
//! The occupancy invariant — at most one open session per space — is enforced
//! at the storage layer (partial unique index + transaction), not by an
//! application-level pre-check alone.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
