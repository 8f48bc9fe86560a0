//! Vehicle management service

use std::sync::Arc;

use tracing::info;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Vehicle, VehicleCategory};

/// CRUD rules for registered vehicles.
pub struct VehicleService {
    repos: Arc<dyn RepositoryProvider>,
}

impl VehicleService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_vehicle(
        &self,
        plate: &str,
        make: &str,
        category: VehicleCategory,
    ) -> DomainResult<Vehicle> {
        let vehicle = Vehicle::new(plate, make, category);
        if vehicle.plate.is_empty() {
            return Err(DomainError::Validation("vehicle plate must not be empty".into()));
        }

        let created = self.repos.vehicles().create(vehicle).await?;

        info!(vehicle_id = created.id, plate = %created.plate, "Vehicle registered");
        Ok(created)
    }

    pub async fn update_vehicle(
        &self,
        id: i32,
        plate: &str,
        make: &str,
        category: VehicleCategory,
    ) -> DomainResult<Vehicle> {
        let plate = Vehicle::normalize_plate(plate);
        if plate.is_empty() {
            return Err(DomainError::Validation("vehicle plate must not be empty".into()));
        }

        if self.repos.vehicles().find_by_id(id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: id.to_string(),
            });
        }

        let updated = Vehicle {
            id,
            plate,
            make: make.to_string(),
            category,
        };
        self.repos.vehicles().update(updated.clone()).await?;

        info!(vehicle_id = id, plate = %updated.plate, "Vehicle updated");
        Ok(updated)
    }

    pub async fn delete_vehicle(&self, id: i32) -> DomainResult<()> {
        if self.repos.vehicles().find_by_id(id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: id.to_string(),
            });
        }

        if self.repos.sessions().has_open_for_vehicle(id).await? {
            return Err(DomainError::ReferencedByOpenSession {
                entity: "Vehicle",
                id,
            });
        }

        self.repos.vehicles().delete(id).await?;
        info!(vehicle_id = id, "Vehicle deleted");
        Ok(())
    }

    pub async fn get_vehicle(&self, id: i32) -> DomainResult<Option<Vehicle>> {
        self.repos.vehicles().find_by_id(id).await
    }

    pub async fn list_vehicles(&self) -> DomainResult<Vec<Vehicle>> {
        self.repos.vehicles().find_all().await
    }

    pub async fn find_by_plate(&self, plate: &str) -> DomainResult<Option<Vehicle>> {
        self.repos
            .vehicles()
            .find_by_plate(&Vehicle::normalize_plate(plate))
            .await
    }
}

// ── Tests ──────────────────────────────────────────────────────
