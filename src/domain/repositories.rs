//! Repository provider interface
//!
//! One injected handle exposing per-aggregate repositories, all backed by
//! the same store. Replaces any notion of a process-global connection.

use crate::domain::session::SessionRepository;
use crate::domain::space::SpaceRepository;
use crate::domain::vehicle::VehicleRepository;

pub trait RepositoryProvider: Send + Sync {
    fn spaces(&self) -> &dyn SpaceRepository;
    fn vehicles(&self) -> &dyn VehicleRepository;
    fn sessions(&self) -> &dyn SessionRepository;
}
