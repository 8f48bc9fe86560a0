//! SeaORM implementation of SessionRepository
//!
//! `create` and `record_exit` wrap the session write and the space status
//! flip in one database transaction. The open-session uniqueness is enforced
//! by the `ux_sessions_open_space` partial index, so a losing racer surfaces
//! here as a UNIQUE violation and is mapped to `SpaceOccupied`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveTime};
use log::debug;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::session::{
    MonthlyRevenue, Session, SessionFilter, SessionRepository, SessionStatus,
};
use crate::domain::space::SpaceStatus;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{session, space, vehicle};

use super::space_repository::model_to_domain as space_to_domain;
use super::vehicle_repository::model_to_domain as vehicle_to_domain;

pub struct SeaOrmSessionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Join space and vehicle snapshots onto a session row. Rows whose
    /// references are gone are treated as absent, like an inner join.
    async fn hydrate_row(&self, row: session::Model) -> DomainResult<Option<Session>> {
        let space_model = space::Entity::find_by_id(row.space_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        let vehicle_model = vehicle::Entity::find_by_id(row.vehicle_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let (Some(space_model), Some(vehicle_model)) = (space_model, vehicle_model) else {
            return Ok(None);
        };

        Ok(Some(row_to_domain(
            row,
            space_to_domain(space_model),
            vehicle_to_domain(vehicle_model),
        )))
    }

    async fn hydrate_rows(&self, rows: Vec<session::Model>) -> DomainResult<Vec<Session>> {
        let spaces: HashMap<i32, space::Model> = space::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();
        let vehicles: HashMap<i32, vehicle::Model> = vehicle::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let space_model = spaces.get(&row.space_id)?.clone();
                let vehicle_model = vehicles.get(&row.vehicle_id)?.clone();
                Some(row_to_domain(
                    row,
                    space_to_domain(space_model),
                    vehicle_to_domain(vehicle_model),
                ))
            })
            .collect())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn row_to_domain(
    row: session::Model,
    space: crate::domain::Space,
    vehicle: crate::domain::Vehicle,
) -> Session {
    Session {
        id: row.id,
        space,
        vehicle,
        entry_time: row.entry_time,
        exit_time: row.exit_time,
        charge: row.charge,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::StorageUnavailable(e.to_string())
}

fn insert_err(e: sea_orm::DbErr, space_id: i32) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") {
        DomainError::SpaceOccupied(space_id)
    } else {
        DomainError::StorageUnavailable(msg)
    }
}

/// Flip a space's status inside the caller's transaction.
async fn set_space_status<C: ConnectionTrait>(
    conn: &C,
    space_id: i32,
    status: SpaceStatus,
) -> DomainResult<()> {
    let model = space::ActiveModel {
        id: Set(space_id),
        status: Set(status.as_str().to_string()),
        label: NotSet,
        kind: NotSet,
        hourly_rate: NotSet,
    };
    model.update(conn).await.map_err(|e| match e {
        sea_orm::DbErr::RecordNotUpdated => DomainError::NotFound {
            entity: "Space",
            field: "id",
            value: space_id.to_string(),
        },
        other => db_err(other),
    })?;
    Ok(())
}

fn day_start(date: NaiveDate) -> chrono::DateTime<chrono::Utc> {
    date.and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap()).and_utc()
}

// ── SessionRepository impl ──────────────────────────────────────

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn create(&self, new_session: &Session) -> DomainResult<Session> {
        debug!(
            "Creating session: space={}, vehicle={}",
            new_session.space.id, new_session.vehicle.id
        );

        let txn = self.db.begin().await.map_err(db_err)?;

        let model = session::ActiveModel {
            id: NotSet,
            space_id: Set(new_session.space.id),
            vehicle_id: Set(new_session.vehicle.id),
            entry_time: Set(new_session.entry_time),
            exit_time: Set(new_session.exit_time),
            charge: Set(new_session.charge),
        };
        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| insert_err(e, new_session.space.id))?;

        if inserted.exit_time.is_none() {
            set_space_status(&txn, new_session.space.id, SpaceStatus::Occupied).await?;
        }

        txn.commit().await.map_err(db_err)?;

        let mut created = new_session.clone();
        created.id = inserted.id;
        if created.is_open() {
            created.space.status = SpaceStatus::Occupied;
        }
        Ok(created)
    }

    async fn record_exit(&self, closed: &Session) -> DomainResult<()> {
        debug!("Recording exit for session: {}", closed.id);

        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = session::Entity::find_by_id(closed.id)
            .one(&txn)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: closed.id.to_string(),
            });
        };

        let mut active: session::ActiveModel = existing.into();
        active.exit_time = Set(closed.exit_time);
        active.charge = Set(closed.charge);
        active.update(&txn).await.map_err(db_err)?;

        set_space_status(&txn, closed.space.id, SpaceStatus::Free).await?;

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn update(&self, updated: &Session) -> DomainResult<()> {
        debug!("Updating session: {}", updated.id);

        let existing = session::Entity::find_by_id(updated.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: updated.id.to_string(),
            });
        }

        let model = session::ActiveModel {
            id: Set(updated.id),
            space_id: Set(updated.space.id),
            vehicle_id: Set(updated.vehicle.id),
            entry_time: Set(updated.entry_time),
            exit_time: Set(updated.exit_time),
            charge: Set(updated.charge),
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| insert_err(e, updated.space.id))?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = session::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Session",
                field: "id",
                value: id.to_string(),
            });
        }

        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Session>> {
        let row = session::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => self.hydrate_row(row).await,
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> DomainResult<Vec<Session>> {
        let rows = session::Entity::find()
            .order_by_desc(session::Column::EntryTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate_rows(rows).await
    }

    async fn find_open(&self) -> DomainResult<Vec<Session>> {
        let rows = session::Entity::find()
            .filter(session::Column::ExitTime.is_null())
            .order_by_asc(session::Column::EntryTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate_rows(rows).await
    }

    async fn find_open_for_space(&self, space_id: i32) -> DomainResult<Option<Session>> {
        let row = session::Entity::find()
            .filter(session::Column::SpaceId.eq(space_id))
            .filter(session::Column::ExitTime.is_null())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => self.hydrate_row(row).await,
            None => Ok(None),
        }
    }

    async fn has_open_for_vehicle(&self, vehicle_id: i32) -> DomainResult<bool> {
        let count = session::Entity::find()
            .filter(session::Column::VehicleId.eq(vehicle_id))
            .filter(session::Column::ExitTime.is_null())
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn find_by_vehicle(&self, vehicle_id: i32) -> DomainResult<Vec<Session>> {
        let rows = session::Entity::find()
            .filter(session::Column::VehicleId.eq(vehicle_id))
            .order_by_desc(session::Column::EntryTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate_rows(rows).await
    }

    async fn find_filtered(&self, filter: &SessionFilter) -> DomainResult<Vec<Session>> {
        let mut query = session::Entity::find();

        if let Some(kind) = filter.space_kind {
            let ids: Vec<i32> = space::Entity::find()
                .filter(space::Column::Kind.eq(kind.as_str()))
                .all(&self.db)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(|m| m.id)
                .collect();
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(session::Column::SpaceId.is_in(ids));
        }

        match filter.status {
            Some(SessionStatus::Open) => {
                query = query.filter(session::Column::ExitTime.is_null());
            }
            Some(SessionStatus::Closed) => {
                query = query.filter(session::Column::ExitTime.is_not_null());
            }
            None => {}
        }

        if let Some(from) = filter.date_from {
            query = query.filter(session::Column::EntryTime.gte(day_start(from)));
        }
        if let Some(to) = filter.date_to {
            // Inclusive upper bound on the entry *date*
            if let Some(next_day) = to.succ_opt() {
                query = query.filter(session::Column::EntryTime.lt(day_start(next_day)));
            }
        }

        let rows = query
            .order_by_desc(session::Column::EntryTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate_rows(rows).await
    }

    async fn monthly_revenue(&self) -> DomainResult<Vec<MonthlyRevenue>> {
        let rows = session::Entity::find()
            .filter(session::Column::ExitTime.is_not_null())
            .order_by_asc(session::Column::ExitTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
        for row in rows {
            let (Some(exit), Some(charge)) = (row.exit_time, row.charge) else {
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

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::space::{Space, SpaceKind, SpaceRepository};
    use crate::domain::vehicle::{Vehicle, VehicleCategory, VehicleRepository};
    use crate::infrastructure::database::migrator::Migrator;
    use crate::infrastructure::database::repositories::{
        SeaOrmSpaceRepository, SeaOrmVehicleRepository,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use sea_orm::{ConnectOptions, Database};
    use sea_orm_migration::MigratorTrait;

    struct Fixture {
        spaces: SeaOrmSpaceRepository,
        sessions: SeaOrmSessionRepository,
        space: Space,
        vehicle: Vehicle,
    }

    async fn fixture() -> Fixture {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1);
        let db = Database::connect(opts).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let spaces = SeaOrmSpaceRepository::new(db.clone());
        let vehicles = SeaOrmVehicleRepository::new(db.clone());
        let sessions = SeaOrmSessionRepository::new(db);

        let space = spaces
            .create(Space::new("A-01", SpaceKind::Standard, Decimal::new(300, 2)))
            .await
            .unwrap();
        let vehicle = vehicles
            .create(Vehicle::new("AA-111-AA", "Peugeot 208", VehicleCategory::Standard))
            .await
            .unwrap();

        Fixture {
            spaces,
            sessions,
            space,
            vehicle,
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[tokio::test]
    async fn create_and_read_back_roundtrip() {
        let f = fixture().await;
        let created = f
            .sessions
            .create(&Session::open(
                f.space.clone(),
                f.vehicle.clone(),
                at(2024, 1, 10, 9, 0),
            ))
            .await
            .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.space.status, SpaceStatus::Occupied);

        let loaded = f.sessions.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(loaded.entry_time, created.entry_time);
        assert!(loaded.exit_time.is_none());
        assert!(loaded.charge.is_none());
        assert_eq!(loaded.space.id, f.space.id);
        assert_eq!(loaded.vehicle.plate, "AA-111-AA");
    }

    #[tokio::test]
    async fn open_flips_space_to_occupied() {
        let f = fixture().await;
        f.sessions
            .create(&Session::open(
                f.space.clone(),
                f.vehicle.clone(),
                at(2024, 1, 10, 9, 0),
            ))
            .await
            .unwrap();

        let space = f.spaces.find_by_id(f.space.id).await.unwrap().unwrap();
        assert_eq!(space.status, SpaceStatus::Occupied);
    }

    #[tokio::test]
    async fn second_open_on_same_space_is_rejected() {
        let f = fixture().await;
        f.sessions
            .create(&Session::open(
                f.space.clone(),
                f.vehicle.clone(),
                at(2024, 1, 10, 9, 0),
            ))
            .await
            .unwrap();

        let err = f
            .sessions
            .create(&Session::open(
                f.space.clone(),
                f.vehicle.clone(),
                at(2024, 1, 10, 10, 0),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SpaceOccupied(id) if id == f.space.id));
    }

    #[tokio::test]
    async fn record_exit_frees_space_and_persists_charge() {
        let f = fixture().await;
        let mut session = f
            .sessions
            .create(&Session::open(
                f.space.clone(),
                f.vehicle.clone(),
                at(2024, 1, 10, 10, 0),
            ))
            .await
            .unwrap();

        let exit = at(2024, 1, 10, 12, 30);
        session.charge = Some(session.compute_charge(exit));
        session.exit_time = Some(exit);
        f.sessions.record_exit(&session).await.unwrap();

        let loaded = f.sessions.find_by_id(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.exit_time, Some(exit));
        assert_eq!(loaded.charge, Some(Decimal::new(750, 2)));

        let space = f.spaces.find_by_id(f.space.id).await.unwrap().unwrap();
        assert_eq!(space.status, SpaceStatus::Free);

        // Space is reusable once freed
        f.sessions
            .create(&Session::open(
                f.space.clone(),
                f.vehicle.clone(),
                at(2024, 1, 11, 9, 0),
            ))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn closed_session_can_be_inserted_as_given() {
        let f = fixture().await;
        let mut prefilled = Session::open(f.space.clone(), f.vehicle.clone(), at(2024, 1, 5, 8, 0));
        prefilled.exit_time = Some(at(2024, 1, 5, 9, 0));
        prefilled.charge = Some(Decimal::new(300, 2));

        f.sessions.create(&prefilled).await.unwrap();

        // A closed insert never occupies the space
        let space = f.spaces.find_by_id(f.space.id).await.unwrap().unwrap();
        assert_eq!(space.status, SpaceStatus::Free);
    }

    #[tokio::test]
    async fn find_filtered_by_status_and_date() {
        let f = fixture().await;

        let mut closed = Session::open(f.space.clone(), f.vehicle.clone(), at(2024, 1, 5, 8, 0));
        closed.exit_time = Some(at(2024, 1, 5, 9, 0));
        closed.charge = Some(Decimal::new(300, 2));
        f.sessions.create(&closed).await.unwrap();

        f.sessions
            .create(&Session::open(
                f.space.clone(),
                f.vehicle.clone(),
                at(2024, 2, 1, 9, 0),
            ))
            .await
            .unwrap();

        let open_only = f
            .sessions
            .find_filtered(&SessionFilter {
                status: Some(SessionStatus::Open),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(open_only.len(), 1);
        assert!(open_only[0].is_open());

        // Inclusive entry-date window catches only the January session
        let january = f
            .sessions
            .find_filtered(&SessionFilter {
                date_from: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
                date_to: Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(january.len(), 1);
        assert!(!january[0].is_open());

        let wrong_kind = f
            .sessions
            .find_filtered(&SessionFilter {
                space_kind: Some(SpaceKind::Accessible),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(wrong_kind.is_empty());
    }

    #[tokio::test]
    async fn monthly_revenue_groups_by_exit_month() {
        let f = fixture().await;

        let closed_session = |entry: DateTime<Utc>, exit: DateTime<Utc>, cents: i64| {
            let mut s = Session::open(f.space.clone(), f.vehicle.clone(), entry);
            s.exit_time = Some(exit);
            s.charge = Some(Decimal::new(cents, 2));
            s
        };

        let jan = closed_session(at(2024, 1, 10, 9, 0), at(2024, 1, 10, 12, 0), 1000);
        let feb1 = closed_session(at(2024, 2, 3, 9, 0), at(2024, 2, 3, 11, 0), 2000);
        let feb2 = closed_session(at(2024, 2, 20, 9, 0), at(2024, 2, 20, 19, 0), 3000);
        for s in [&jan, &feb1, &feb2] {
            f.sessions.create(s).await.unwrap();
        }

        let revenue = f.sessions.monthly_revenue().await.unwrap();
        assert_eq!(
            revenue,
            vec![
                MonthlyRevenue {
                    month: "2024-01".into(),
                    total: Decimal::new(1000, 2),
                },
                MonthlyRevenue {
                    month: "2024-02".into(),
                    total: Decimal::new(5000, 2),
                },
            ]
        );
    }

    #[tokio::test]
    async fn delete_missing_session_is_not_found() {
        let f = fixture().await;
        let err = f.sessions.delete(123).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Session", .. }));
    }
}
