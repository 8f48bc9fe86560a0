//! Space management service

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Space, SpaceKind, SpaceStatus,
};

/// CRUD rules for parking spaces.
///
/// Occupancy state is never writable through this service; it only changes
/// inside the engine's atomic open/close operations.
pub struct SpaceService {
    repos: Arc<dyn RepositoryProvider>,
}

impl SpaceService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_space(
        &self,
        label: &str,
        kind: SpaceKind,
        hourly_rate: Decimal,
    ) -> DomainResult<Space> {
        let label = label.trim();
        validate_space_fields(label, hourly_rate)?;

        let created = self
            .repos
            .spaces()
            .create(Space::new(label, kind, hourly_rate))
            .await?;

        info!(space_id = created.id, label = %created.label, "Space created");
        Ok(created)
    }

    pub async fn update_space(
        &self,
        id: i32,
        label: &str,
        kind: SpaceKind,
        hourly_rate: Decimal,
    ) -> DomainResult<Space> {
        let label = label.trim();
        validate_space_fields(label, hourly_rate)?;

        let existing = self
            .repos
            .spaces()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: id.to_string(),
            })?;

        // Occupancy state carries over untouched
        let updated = Space {
            id,
            label: label.to_string(),
            kind,
            status: existing.status,
            hourly_rate,
        };
        self.repos.spaces().update(updated.clone()).await?;

        info!(space_id = id, label = %updated.label, "Space updated");
        Ok(updated)
    }

    pub async fn delete_space(&self, id: i32) -> DomainResult<()> {
        if self.repos.spaces().find_by_id(id).await?.is_none() {
            return Err(DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: id.to_string(),
            });
        }

        if self.repos.sessions().find_open_for_space(id).await?.is_some() {
            return Err(DomainError::ReferencedByOpenSession {
                entity: "Space",
                id,
            });
        }

        self.repos.spaces().delete(id).await?;
        info!(space_id = id, "Space deleted");
        Ok(())
    }

    pub async fn get_space(&self, id: i32) -> DomainResult<Option<Space>> {
        self.repos.spaces().find_by_id(id).await
    }

    pub async fn list_spaces(&self) -> DomainResult<Vec<Space>> {
        self.repos.spaces().find_all().await
    }

    pub async fn list_filtered(
        &self,
        kind: Option<SpaceKind>,
        status: Option<SpaceStatus>,
    ) -> DomainResult<Vec<Space>> {
        self.repos.spaces().find_filtered(kind, status).await
    }

    pub async fn list_free(&self, kind: SpaceKind) -> DomainResult<Vec<Space>> {
        self.repos.spaces().find_free_by_kind(kind).await
    }
}

fn validate_space_fields(label: &str, hourly_rate: Decimal) -> DomainResult<()> {
    if label.is_empty() {
        return Err(DomainError::Validation("space label must not be empty".into()));
    }
    if hourly_rate < Decimal::ZERO {
        return Err(DomainError::Validation(
            "hourly rate must not be negative".into(),
        ));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FixedClock, Session, VehicleCategory};
    use crate::infrastructure::storage::InMemoryRepositoryProvider;
    use chrono::{TimeZone, Utc};

    fn service() -> (Arc<InMemoryRepositoryProvider>, SpaceService) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        (repos.clone(), SpaceService::new(repos))
    }

    #[tokio::test]
    async fn create_get_roundtrip() {
        let (_, svc) = service();
        let created = svc
            .create_space("A-01", SpaceKind::Standard, Decimal::new(300, 2))
            .await
            .unwrap();

        let loaded = svc.get_space(created.id).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert_eq!(loaded.status, SpaceStatus::Free);
    }

    #[tokio::test]
    async fn label_is_trimmed_and_required() {
        let (_, svc) = service();
        let created = svc
            .create_space("  B-07 ", SpaceKind::Compact, Decimal::ONE)
            .await
            .unwrap();
        assert_eq!(created.label, "B-07");

        let err = svc
            .create_space("   ", SpaceKind::Compact, Decimal::ONE)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn negative_rate_is_rejected() {
        let (_, svc) = service();
        let err = svc
            .create_space("A-01", SpaceKind::Standard, Decimal::new(-100, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_label_is_rejected() {
        let (_, svc) = service();
        svc.create_space("A-01", SpaceKind::Standard, Decimal::ONE)
            .await
            .unwrap();
        let err = svc
            .create_space("A-01", SpaceKind::Accessible, Decimal::ONE)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn update_preserves_occupancy_state() {
        let (repos, svc) = service();
        let space = svc
            .create_space("A-01", SpaceKind::Standard, Decimal::new(300, 2))
            .await
            .unwrap();
        let vehicle = repos
            .vehicles()
            .create(crate::domain::Vehicle::new(
                "AA-111-AA",
                "Peugeot 208",
                VehicleCategory::Standard,
            ))
            .await
            .unwrap();

        // Occupy through the engine path
        let engine = crate::application::OccupancyService::new(
            repos.clone(),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())),
        );
        engine.open_session(space.id, vehicle.id, None).await.unwrap();

        let updated = svc
            .update_space(space.id, "A-01", SpaceKind::Standard, Decimal::new(400, 2))
            .await
            .unwrap();
        assert_eq!(updated.status, SpaceStatus::Occupied);
        assert_eq!(updated.hourly_rate, Decimal::new(400, 2));
    }

    #[tokio::test]
    async fn delete_with_open_session_is_rejected() {
        let (repos, svc) = service();
        let space = svc
            .create_space("A-01", SpaceKind::Standard, Decimal::ONE)
            .await
            .unwrap();
        let vehicle = repos
            .vehicles()
            .create(crate::domain::Vehicle::new(
                "AA-111-AA",
                "Peugeot 208",
                VehicleCategory::Standard,
            ))
            .await
            .unwrap();
        repos
            .sessions()
            .create(&Session::open(
                space.clone(),
                vehicle,
                Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
            ))
            .await
            .unwrap();

        let err = svc.delete_space(space.id).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::ReferencedByOpenSession { entity: "Space", id } if id == space.id
        ));

        // Still there
        assert!(svc.get_space(space.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_missing_space_is_not_found() {
        let (_, svc) = service();
        let err = svc.delete_space(404).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Space", .. }));
    }
}
