//! SeaORM repository implementations

pub mod repository_provider;
pub mod session_repository;
pub mod space_repository;
pub mod vehicle_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use session_repository::SeaOrmSessionRepository;
pub use space_repository::SeaOrmSpaceRepository;
pub use vehicle_repository::SeaOrmVehicleRepository;
