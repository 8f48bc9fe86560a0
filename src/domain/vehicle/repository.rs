//! Vehicle repository interface

use async_trait::async_trait;

use super::model::Vehicle;
use crate::domain::DomainResult;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Persist a new vehicle and return it with its assigned ID.
    async fn create(&self, vehicle: Vehicle) -> DomainResult<Vehicle>;
    async fn update(&self, vehicle: Vehicle) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Vehicle>>;
    /// All vehicles, ordered by plate.
    async fn find_all(&self) -> DomainResult<Vec<Vehicle>>;
    /// Lookup by already-normalized plate.
    async fn find_by_plate(&self, plate: &str) -> DomainResult<Option<Vehicle>>;
}
