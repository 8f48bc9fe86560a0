//! SeaORM implementation of VehicleRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::vehicle::{Vehicle, VehicleCategory, VehicleRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::vehicle;

pub struct SeaOrmVehicleRepository {
    db: DatabaseConnection,
}

impl SeaOrmVehicleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: vehicle::Model) -> Vehicle {
    Vehicle {
        id: m.id,
        plate: m.plate,
        make: m.make,
        category: VehicleCategory::from_str(&m.category).unwrap_or(VehicleCategory::Standard),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::StorageUnavailable(e.to_string())
}

fn insert_err(e: sea_orm::DbErr, plate: &str) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") {
        DomainError::DuplicateKey(format!("vehicle plate '{}'", plate))
    } else {
        DomainError::StorageUnavailable(msg)
    }
}

// ── VehicleRepository impl ──────────────────────────────────────

#[async_trait]
impl VehicleRepository for SeaOrmVehicleRepository {
    async fn create(&self, vehicle: Vehicle) -> DomainResult<Vehicle> {
        debug!("Creating vehicle: {}", vehicle.plate);

        let model = vehicle::ActiveModel {
            id: NotSet,
            plate: Set(vehicle.plate.clone()),
            make: Set(vehicle.make.clone()),
            category: Set(vehicle.category.as_str().to_string()),
        };
        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| insert_err(e, &vehicle.plate))?;
        Ok(model_to_domain(inserted))
    }

    async fn update(&self, vehicle: Vehicle) -> DomainResult<()> {
        debug!("Updating vehicle: {}", vehicle.id);

        let existing = vehicle::Entity::find_by_id(vehicle.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: vehicle.id.to_string(),
            });
        }

        let model = vehicle::ActiveModel {
            id: Set(vehicle.id),
            plate: Set(vehicle.plate.clone()),
            make: Set(vehicle.make.clone()),
            category: Set(vehicle.category.as_str().to_string()),
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| insert_err(e, &vehicle.plate))?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = vehicle::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: id.to_string(),
            });
        }

        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Vehicle>> {
        let model = vehicle::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Vehicle>> {
        let models = vehicle::Entity::find()
            .order_by_asc(vehicle::Column::Plate)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_by_plate(&self, plate: &str) -> DomainResult<Option<Vehicle>> {
        let model = vehicle::Entity::find()
            .filter(vehicle::Column::Plate.eq(plate))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::migrator::Migrator;
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    async fn test_repo() -> SeaOrmVehicleRepository {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        SeaOrmVehicleRepository::new(db)
    }

    #[tokio::test]
    async fn create_and_read_back_roundtrip() {
        let repo = test_repo().await;
        let created = repo
            .create(Vehicle::new("ab-123-cd", "Renault Clio", VehicleCategory::Standard))
            .await
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.plate, "AB-123-CD");

        let loaded = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
    }

    #[tokio::test]
    async fn find_by_plate_uses_normalized_form() {
        let repo = test_repo().await;
        repo.create(Vehicle::new("xy-99-z", "Yamaha MT-07", VehicleCategory::Compact))
            .await
            .unwrap();

        let found = repo
            .find_by_plate(&Vehicle::normalize_plate(" xy-99-z "))
            .await
            .unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().make, "Yamaha MT-07");
    }

    #[tokio::test]
    async fn duplicate_plate_is_rejected() {
        let repo = test_repo().await;
        repo.create(Vehicle::new("AA-111-AA", "Peugeot 208", VehicleCategory::Standard))
            .await
            .unwrap();
        let err = repo
            .create(Vehicle::new("aa-111-aa", "Fiat Panda", VehicleCategory::Standard))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn find_all_orders_by_plate() {
        let repo = test_repo().await;
        repo.create(Vehicle::new("BB-222-BB", "Tesla Model 3", VehicleCategory::Standard))
            .await
            .unwrap();
        repo.create(Vehicle::new("AA-111-AA", "Peugeot 208", VehicleCategory::Standard))
            .await
            .unwrap();

        let plates: Vec<String> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.plate)
            .collect();
        assert_eq!(plates, vec!["AA-111-AA", "BB-222-BB"]);
    }

    #[tokio::test]
    async fn delete_missing_vehicle_is_not_found() {
        let repo = test_repo().await;
        let err = repo.delete(9).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Vehicle", .. }));
    }
}
