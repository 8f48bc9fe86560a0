//! In-memory repository implementations for development and testing
//!
//! Spaces and vehicles live in lock-free maps; session writes serialize
//! through one async mutex, which doubles as the atomicity guarantee the
//! SQL backend gets from its transaction + partial unique index.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use crate::domain::repositories::RepositoryProvider;
use crate::domain::session::{
    MonthlyRevenue, Session, SessionFilter, SessionRepository, SessionStatus,
};
use crate::domain::space::{Space, SpaceKind, SpaceRepository, SpaceStatus};
use crate::domain::vehicle::{Vehicle, VehicleRepository};
use crate::domain::{DomainError, DomainResult};

/// Session row as stored: references by ID, snapshots joined on read.
#[derive(Debug, Clone)]
struct SessionRecord {
    id: i32,
    space_id: i32,
    vehicle_id: i32,
    entry_time: chrono::DateTime<chrono::Utc>,
    exit_time: Option<chrono::DateTime<chrono::Utc>>,
    charge: Option<Decimal>,
}

struct Inner {
    spaces: DashMap<i32, Space>,
    vehicles: DashMap<i32, Vehicle>,
    sessions: Mutex<HashMap<i32, SessionRecord>>,
    space_counter: AtomicI32,
    vehicle_counter: AtomicI32,
    session_counter: AtomicI32,
}

impl Inner {
    fn new() -> Self {
        Self {
            spaces: DashMap::new(),
            vehicles: DashMap::new(),
            sessions: Mutex::new(HashMap::new()),
            space_counter: AtomicI32::new(1),
            vehicle_counter: AtomicI32::new(1),
            session_counter: AtomicI32::new(1),
        }
    }

    fn hydrate(&self, record: &SessionRecord) -> Option<Session> {
        let space = self.spaces.get(&record.space_id)?.clone();
        let vehicle = self.vehicles.get(&record.vehicle_id)?.clone();
        Some(Session {
            id: record.id,
            space,
            vehicle,
            entry_time: record.entry_time,
            exit_time: record.exit_time,
            charge: record.charge,
        })
    }

    fn set_space_status(&self, space_id: i32, status: SpaceStatus) {
        if let Some(mut space) = self.spaces.get_mut(&space_id) {
            space.status = status;
        }
    }
}

// ── Space repository ────────────────────────────────────────────

pub struct InMemorySpaceRepository {
    inner: Arc<Inner>,
}

#[async_trait]
impl SpaceRepository for InMemorySpaceRepository {
    async fn create(&self, space: Space) -> DomainResult<Space> {
        if self.inner.spaces.iter().any(|s| s.label == space.label) {
            return Err(DomainError::DuplicateKey(format!(
                "space label '{}'",
                space.label
            )));
        }
        let id = self.inner.space_counter.fetch_add(1, Ordering::SeqCst);
        let created = Space { id, ..space };
        self.inner.spaces.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, space: Space) -> DomainResult<()> {
        if !self.inner.spaces.contains_key(&space.id) {
            return Err(DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: space.id.to_string(),
            });
        }
        if self
            .inner
            .spaces
            .iter()
            .any(|s| s.id != space.id && s.label == space.label)
        {
            return Err(DomainError::DuplicateKey(format!(
                "space label '{}'",
                space.label
            )));
        }
        self.inner.spaces.insert(space.id, space);
        Ok(())
    }

    async fn update_status(&self, id: i32, status: SpaceStatus) -> DomainResult<()> {
        let Some(mut space) = self.inner.spaces.get_mut(&id) else {
            return Err(DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: id.to_string(),
            });
        };
        space.status = status;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.inner
            .spaces
            .remove(&id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: id.to_string(),
            })?;
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Space>> {
        Ok(self.inner.spaces.get(&id).map(|s| s.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Space>> {
        let mut all: Vec<Space> = self.inner.spaces.iter().map(|s| s.clone()).collect();
        all.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(all)
    }

    async fn find_filtered(
        &self,
        kind: Option<SpaceKind>,
        status: Option<SpaceStatus>,
    ) -> DomainResult<Vec<Space>> {
        let mut matched: Vec<Space> = self
            .inner
            .spaces
            .iter()
            .filter(|s| kind.map_or(true, |k| s.kind == k))
            .filter(|s| status.map_or(true, |st| s.status == st))
            .map(|s| s.clone())
            .collect();
        matched.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(matched)
    }

    async fn find_free_by_kind(&self, kind: SpaceKind) -> DomainResult<Vec<Space>> {
        self.find_filtered(Some(kind), Some(SpaceStatus::Free)).await
    }
}

// ── Vehicle repository ──────────────────────────────────────────

pub struct InMemoryVehicleRepository {
    inner: Arc<Inner>,
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn create(&self, vehicle: Vehicle) -> DomainResult<Vehicle> {
        if self.inner.vehicles.iter().any(|v| v.plate == vehicle.plate) {
            return Err(DomainError::DuplicateKey(format!(
                "vehicle plate '{}'",
                vehicle.plate
            )));
        }
        let id = self.inner.vehicle_counter.fetch_add(1, Ordering::SeqCst);
        let created = Vehicle { id, ..vehicle };
        self.inner.vehicles.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, vehicle: Vehicle) -> DomainResult<()> {
        if !self.inner.vehicles.contains_key(&vehicle.id) {
            return Err(DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: vehicle.id.to_string(),
            });
        }
        if self
            .inner
            .vehicles
            .iter()
            .any(|v| v.id != vehicle.id && v.plate == vehicle.plate)
        {
            return Err(DomainError::DuplicateKey(format!(
                "vehicle plate '{}'",
                vehicle.plate
            )));
        }
        self.inner.vehicles.insert(vehicle.id, vehicle);
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        self.inner
            .vehicles
            .remove(&id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: id.to_string(),
            })?;
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Vehicle>> {
        Ok(self.inner.vehicles.get(&id).map(|v| v.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Vehicle>> {
        let mut all: Vec<Vehicle> = self.inner.vehicles.iter().map(|v| v.clone()).collect();
        all.sort_by(|a, b| a.plate.cmp(&b.plate));
        Ok(all)
    }

    async fn find_by_plate(&self, plate: &str) -> DomainResult<Option<Vehicle>> {
        Ok(self
            .inner
            .vehicles
            .iter()
            .find(|v| v.plate == plate)
            .map(|v| v.clone()))
    }
}

// ── Session repository ──────────────────────────────────────────

pub struct InMemorySessionRepository {
    inner: Arc<Inner>,
}

impl InMemorySessionRepository {
    fn matches(&self, record: &SessionRecord, filter: &SessionFilter) -> bool {
        if let Some(kind) = filter.space_kind {
            match self.inner.spaces.get(&record.space_id) {
                Some(space) if space.kind == kind => {}
                _ => return false,
            }
        }
        match filter.status {
            Some(SessionStatus::Open) if record.exit_time.is_some() => return false,
            Some(SessionStatus::Closed) if record.exit_time.is_none() => return false,
            _ => {}
        }
        let entry_date = record.entry_time.date_naive();
        if let Some(from) = filter.date_from {
            if entry_date < from {
                return false;
            }
        }
        if let Some(to) = filter.date_to {
            if entry_date > to {
                return false;
            }
        }
        true
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, new_session: &Session) -> DomainResult<Session> {
        let mut sessions = self.inner.sessions.lock().await;

        if new_session.is_open()
            && sessions
                .values()
                .any(|r| r.space_id == new_session.space.id && r.exit_time.is_none())
        {
            return Err(DomainError::SpaceOccupied(new_session.space.id));
        }

        let id = self.inner.session_counter.fetch_add(1, Ordering::SeqCst);
        sessions.insert(
            id,
            SessionRecord {
                id,
                space_id: new_session.space.id,
                vehicle_id: new_session.vehicle.id,
                entry_time: new_session.entry_time,
                exit_time: new_session.exit_time,
                charge: new_session.charge,
            },
        );

        let mut created = new_session.clone();
        created.id = id;
        if created.is_open() {
            self.inner
                .set_space_status(new_session.space.id, SpaceStatus::Occupied);
            created.space.status = SpaceStatus::Occupied;
        }
        Ok(created)
    }

    async fn record_exit(&self, closed: &Session) -> DomainResult<()> {
        let mut sessions = self.inner.sessions.lock().await;

        let Some(record) = sessions.get_mut(&closed.id) else {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: closed.id.to_string(),
            });
        };
        record.exit_time = closed.exit_time;
        record.charge = closed.charge;

        self.inner.set_space_status(closed.space.id, SpaceStatus::Free);
        Ok(())
    }

    async fn update(&self, updated: &Session) -> DomainResult<()> {
        let mut sessions = self.inner.sessions.lock().await;

        if !sessions.contains_key(&updated.id) {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: updated.id.to_string(),
            });
        }
        sessions.insert(
            updated.id,
            SessionRecord {
                id: updated.id,
                space_id: updated.space.id,
                vehicle_id: updated.vehicle.id,
                entry_time: updated.entry_time,
                exit_time: updated.exit_time,
                charge: updated.charge,
            },
        );
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let mut sessions = self.inner.sessions.lock().await;
        sessions.remove(&id).ok_or_else(|| DomainError::NotFound {
            entity: "Session",
            field: "id",
            value: id.to_string(),
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Session>> {
        let sessions = self.inner.sessions.lock().await;
        Ok(sessions.get(&id).and_then(|r| self.inner.hydrate(r)))
    }

    async fn find_all(&self) -> DomainResult<Vec<Session>> {
        let sessions = self.inner.sessions.lock().await;
        let mut all: Vec<Session> = sessions
            .values()
            .filter_map(|r| self.inner.hydrate(r))
            .collect();
        all.sort_by(|a, b| b.entry_time.cmp(&a.entry_time).then(b.id.cmp(&a.id)));
        Ok(all)
    }

    async fn find_open(&self) -> DomainResult<Vec<Session>> {
        let sessions = self.inner.sessions.lock().await;
        let mut open: Vec<Session> = sessions
            .values()
            .filter(|r| r.exit_time.is_none())
            .filter_map(|r| self.inner.hydrate(r))
            .collect();
        open.sort_by(|a, b| a.entry_time.cmp(&b.entry_time).then(a.id.cmp(&b.id)));
        Ok(open)
    }

    async fn find_open_for_space(&self, space_id: i32) -> DomainResult<Option<Session>> {
        let sessions = self.inner.sessions.lock().await;
        Ok(sessions
            .values()
            .find(|r| r.space_id == space_id && r.exit_time.is_none())
            .and_then(|r| self.inner.hydrate(r)))
    }

    async fn has_open_for_vehicle(&self, vehicle_id: i32) -> DomainResult<bool> {
        let sessions = self.inner.sessions.lock().await;
        Ok(sessions
            .values()
            .any(|r| r.vehicle_id == vehicle_id && r.exit_time.is_none()))
    }

    async fn find_by_vehicle(&self, vehicle_id: i32) -> DomainResult<Vec<Session>> {
        let sessions = self.inner.sessions.lock().await;
        let mut history: Vec<Session> = sessions
            .values()
            .filter(|r| r.vehicle_id == vehicle_id)
            .filter_map(|r| self.inner.hydrate(r))
            .collect();
        history.sort_by(|a, b| b.entry_time.cmp(&a.entry_time).then(b.id.cmp(&a.id)));
        Ok(history)
    }

    async fn find_filtered(&self, filter: &SessionFilter) -> DomainResult<Vec<Session>> {
        let sessions = self.inner.sessions.lock().await;
        let mut matched: Vec<Session> = sessions
            .values()
            .filter(|r| self.matches(r, filter))
            .filter_map(|r| self.inner.hydrate(r))
            .collect();
        matched.sort_by(|a, b| b.entry_time.cmp(&a.entry_time).then(b.id.cmp(&a.id)));
        Ok(matched)
    }

    async fn monthly_revenue(&self) -> DomainResult<Vec<MonthlyRevenue>> {
        let sessions = self.inner.sessions.lock().await;
        let mut buckets: std::collections::BTreeMap<String, Decimal> =
            std::collections::BTreeMap::new();
        for record in sessions.values() {
            let (Some(exit), Some(charge)) = (record.exit_time, record.charge) else {
                continue;
            };
            let key = format!("{:04}-{:02}", exit.year(), exit.month());
            *buckets.entry(key).or_insert(Decimal::ZERO) += charge;
        }
        Ok(buckets
            .into_iter()
            .map(|(month, total)| MonthlyRevenue { month, total })
            .collect())
    }
}

// ── Provider ────────────────────────────────────────────────────

/// In-memory provider over one shared store
pub struct InMemoryRepositoryProvider {
    spaces: InMemorySpaceRepository,
    vehicles: InMemoryVehicleRepository,
    sessions: InMemorySessionRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let inner = Arc::new(Inner::new());
        Self {
            spaces: InMemorySpaceRepository {
                inner: inner.clone(),
            },
            vehicles: InMemoryVehicleRepository {
                inner: inner.clone(),
            },
            sessions: InMemorySessionRepository { inner },
        }
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
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

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    async fn seeded() -> (InMemoryRepositoryProvider, Space, Vehicle) {
        let provider = InMemoryRepositoryProvider::new();
        let space = provider
            .spaces()
            .create(Space::new(
                "A-01",
                SpaceKind::Standard,
                Decimal::new(250, 2),
            ))
            .await
            .unwrap();
        let vehicle = provider
            .vehicles()
            .create(Vehicle::new(
                "AA-111-AA",
                "Peugeot 208",
                crate::domain::VehicleCategory::Standard,
            ))
            .await
            .unwrap();
        (provider, space, vehicle)
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially() {
        let (provider, space, _) = seeded().await;
        assert_eq!(space.id, 1);
        let second = provider
            .spaces()
            .create(Space::new("A-02", SpaceKind::Compact, Decimal::new(150, 2)))
            .await
            .unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn duplicate_label_and_plate_are_rejected() {
        let (provider, _, _) = seeded().await;
        let err = provider
            .spaces()
            .create(Space::new("A-01", SpaceKind::Compact, Decimal::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey(_)));

        let err = provider
            .vehicles()
            .create(Vehicle::new(
                "aa-111-aa",
                "Fiat Panda",
                crate::domain::VehicleCategory::Standard,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateKey(_)));
    }

    #[tokio::test]
    async fn open_conflict_on_same_space() {
        let (provider, space, vehicle) = seeded().await;
        let entry = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        provider
            .sessions()
            .create(&Session::open(space.clone(), vehicle.clone(), entry))
            .await
            .unwrap();
        let err = provider
            .sessions()
            .create(&Session::open(space.clone(), vehicle, entry))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SpaceOccupied(id) if id == space.id));

        let stored = provider.spaces().find_by_id(space.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SpaceStatus::Occupied);
    }

    #[tokio::test]
    async fn record_exit_frees_the_space() {
        let (provider, space, vehicle) = seeded().await;
        let entry = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut session = provider
            .sessions()
            .create(&Session::open(space.clone(), vehicle, entry))
            .await
            .unwrap();

        session.exit_time = Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap());
        session.charge = Some(Decimal::new(250, 2));
        provider.sessions().record_exit(&session).await.unwrap();

        let stored = provider.spaces().find_by_id(space.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SpaceStatus::Free);
        assert!(provider
            .sessions()
            .find_open_for_space(space.id)
            .await
            .unwrap()
            .is_none());
    }
}
