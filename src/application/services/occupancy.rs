//! Occupancy & billing engine
//!
//! Owns the Free -> Occupied -> Free state machine per space: one open
//! session at a time, entry/exit defaulting through the injected clock,
//! charge computation at close. Each open/close pairs the session write with
//! the space flip through one atomic repository call; the application-level
//! occupancy lookup here is a fast-fail convenience, the storage constraint
//! is what actually decides races.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::{
    Clock, DomainError, DomainResult, MonthlyRevenue, RepositoryProvider, Session, SessionFilter,
    SpaceStatus,
};

pub struct OccupancyService {
    repos: Arc<dyn RepositoryProvider>,
    clock: Arc<dyn Clock>,
}

impl OccupancyService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { repos, clock }
    }

    /// Assign a space to a vehicle, flipping the space to Occupied.
    ///
    /// `entry_time` defaults to now. Fails with `SpaceOccupied` when the
    /// space already has an open session, including when a concurrent open
    /// wins the race at the storage layer.
    pub async fn open_session(
        &self,
        space_id: i32,
        vehicle_id: i32,
        entry_time: Option<DateTime<Utc>>,
    ) -> DomainResult<Session> {
        let space = self
            .repos
            .spaces()
            .find_by_id(space_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: space_id.to_string(),
            })?;
        let vehicle = self
            .repos
            .vehicles()
            .find_by_id(vehicle_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Vehicle",
                field: "id",
                value: vehicle_id.to_string(),
            })?;

        if self
            .repos
            .sessions()
            .find_open_for_space(space_id)
            .await?
            .is_some()
        {
            return Err(DomainError::SpaceOccupied(space_id));
        }

        let entry_time = entry_time.unwrap_or_else(|| self.clock.now());
        let session = Session::open(space, vehicle, entry_time);
        let created = self.repos.sessions().create(&session).await?;

        info!(
            session_id = created.id,
            space = %created.space.label,
            plate = %created.vehicle.plate,
            "Session opened"
        );
        Ok(created)
    }

    /// Close a session, computing the charge and freeing the space.
    ///
    /// `exit_time` defaults to now. Closing is one-way: a second close on
    /// the same session fails with `AlreadyClosed` and changes nothing.
    pub async fn close_session(
        &self,
        session_id: i32,
        exit_time: Option<DateTime<Utc>>,
    ) -> DomainResult<Session> {
        let mut session = self
            .repos
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: session_id.to_string(),
            })?;

        if session.exit_time.is_some() {
            return Err(DomainError::AlreadyClosed(session_id));
        }

        let exit_time = exit_time.unwrap_or_else(|| self.clock.now());
        if exit_time < session.entry_time {
            return Err(DomainError::InvalidTimeRange(format!(
                "exit {} is before entry {}",
                exit_time, session.entry_time
            )));
        }

        let charge = session.compute_charge(exit_time);
        session.exit_time = Some(exit_time);
        session.charge = Some(charge);

        self.repos.sessions().record_exit(&session).await?;
        session.space.status = SpaceStatus::Free;

        info!(
            session_id,
            space = %session.space.label,
            plate = %session.vehicle.plate,
            charge = %charge,
            "Session closed"
        );
        Ok(session)
    }

    // ── Queries ────────────────────────────────────────────────

    pub async fn get_session(&self, id: i32) -> DomainResult<Option<Session>> {
        self.repos.sessions().find_by_id(id).await
    }

    pub async fn list_sessions(&self) -> DomainResult<Vec<Session>> {
        self.repos.sessions().find_all().await
    }

    pub async fn list_open_sessions(&self) -> DomainResult<Vec<Session>> {
        self.repos.sessions().find_open().await
    }

    pub async fn sessions_for_vehicle(&self, vehicle_id: i32) -> DomainResult<Vec<Session>> {
        self.repos.sessions().find_by_vehicle(vehicle_id).await
    }

    /// Filtered history. Rejects a window whose end precedes its start.
    pub async fn list_filtered(&self, filter: &SessionFilter) -> DomainResult<Vec<Session>> {
        if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
            if to < from {
                return Err(DomainError::InvalidTimeRange(format!(
                    "filter end {} is before start {}",
                    to, from
                )));
            }
        }
        self.repos.sessions().find_filtered(filter).await
    }

    pub async fn monthly_revenue(&self) -> DomainResult<Vec<MonthlyRevenue>> {
        self.repos.sessions().monthly_revenue().await
    }

    /// Administrative removal of a session, regardless of state.
    pub async fn delete_session(&self, id: i32) -> DomainResult<()> {
        self.repos.sessions().delete(id).await?;
        info!(session_id = id, "Session deleted");
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────
