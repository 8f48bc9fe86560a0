//! Session repository interface
//!
//! `create` and `record_exit` are the two atomic units of the occupancy
//! state machine: each combines the session write with the matching space
//! status flip in a single storage transaction, so a crash between the two
//! steps can never leave an occupied space with no open session (or the
//! reverse).

use async_trait::async_trait;

use super::model::{MonthlyRevenue, Session, SessionFilter};
use crate::domain::DomainResult;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist a session as given (open or pre-filled) and return it with
    /// its assigned ID.
    ///
    /// For an open session this is the atomic insert-if-no-open-session
    /// operation: a concurrent open on the same space fails with
    /// `SpaceOccupied`, and the space is flipped to Occupied in the same
    /// transaction.
    async fn create(&self, session: &Session) -> DomainResult<Session>;

    /// Persist exit time and charge, and flip the space back to Free, as one
    /// atomic unit.
    async fn record_exit(&self, session: &Session) -> DomainResult<()>;

    /// Full overwrite by ID (administrative). Performs no status flips.
    async fn update(&self, session: &Session) -> DomainResult<()>;

    /// Administrative removal, regardless of state.
    async fn delete(&self, id: i32) -> DomainResult<()>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Session>>;

    /// All sessions, most recent entry first.
    async fn find_all(&self) -> DomainResult<Vec<Session>>;

    /// Open sessions, oldest entry first.
    async fn find_open(&self) -> DomainResult<Vec<Session>>;

    /// The open session on a space, if any. At most one exists.
    async fn find_open_for_space(&self, space_id: i32) -> DomainResult<Option<Session>>;

    /// Whether any open session references the vehicle.
    async fn has_open_for_vehicle(&self, vehicle_id: i32) -> DomainResult<bool>;

    /// A vehicle's history, most recent entry first.
    async fn find_by_vehicle(&self, vehicle_id: i32) -> DomainResult<Vec<Session>>;

    /// Filtered history, most recent entry first.
    async fn find_filtered(&self, filter: &SessionFilter) -> DomainResult<Vec<Session>>;

    /// Closed-session revenue grouped by calendar month of exit, ascending.
    async fn monthly_revenue(&self) -> DomainResult<Vec<MonthlyRevenue>>;
}
