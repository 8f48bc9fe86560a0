//! Occupancy session aggregate

pub mod model;
pub mod repository;

pub use model::{MonthlyRevenue, Session, SessionFilter, SessionStatus};
pub use repository::SessionRepository;
