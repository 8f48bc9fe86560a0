//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::session::SessionRepository;
use crate::domain::space::SpaceRepository;
use crate::domain::vehicle::VehicleRepository;

use super::session_repository::SeaOrmSessionRepository;
use super::space_repository::SeaOrmSpaceRepository;
use super::vehicle_repository::SeaOrmVehicleRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let space = repos.spaces().find_by_id(1).await?;
/// let open = repos.sessions().find_open_for_space(1).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    spaces: SeaOrmSpaceRepository,
    vehicles: SeaOrmVehicleRepository,
    sessions: SeaOrmSessionRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            spaces: SeaOrmSpaceRepository::new(db.clone()),
            vehicles: SeaOrmVehicleRepository::new(db.clone()),
            sessions: SeaOrmSessionRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn spaces(&self) -> &dyn SpaceRepository {
        &self.spaces
    }

    fn vehicles(&self) -> &dyn VehicleRepository {
        &self.vehicles
    }

    fn sessions(&self) -> &dyn SessionRepository {
        &self.sessions
    }
}
