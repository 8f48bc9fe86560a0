//! SeaORM entities

pub mod session;
pub mod space;
pub mod vehicle;
