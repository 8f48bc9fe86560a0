//! SeaORM implementation of SpaceRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::domain::space::{Space, SpaceKind, SpaceRepository, SpaceStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::space;

pub struct SeaOrmSpaceRepository {
    db: DatabaseConnection,
}

impl SeaOrmSpaceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn model_to_domain(m: space::Model) -> Space {
    Space {
        id: m.id,
        label: m.label,
        kind: SpaceKind::from_str(&m.kind).unwrap_or(SpaceKind::Standard),
        status: SpaceStatus::from_str(&m.status).unwrap_or(SpaceStatus::Free),
        hourly_rate: m.hourly_rate,
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::StorageUnavailable(e.to_string())
}

fn insert_err(e: sea_orm::DbErr, label: &str) -> DomainError {
    let msg = e.to_string();
    if msg.contains("UNIQUE") {
        DomainError::DuplicateKey(format!("space label '{}'", label))
    } else {
        DomainError::StorageUnavailable(msg)
    }
}

// ── SpaceRepository impl ────────────────────────────────────────

#[async_trait]
impl SpaceRepository for SeaOrmSpaceRepository {
    async fn create(&self, space: Space) -> DomainResult<Space> {
        debug!("Creating space: {}", space.label);

        let model = space::ActiveModel {
            id: NotSet,
            label: Set(space.label.clone()),
            kind: Set(space.kind.as_str().to_string()),
            status: Set(space.status.as_str().to_string()),
            hourly_rate: Set(space.hourly_rate),
        };
        let inserted = model
            .insert(&self.db)
            .await
            .map_err(|e| insert_err(e, &space.label))?;
        Ok(model_to_domain(inserted))
    }

    async fn update(&self, space: Space) -> DomainResult<()> {
        debug!("Updating space: {}", space.id);

        let existing = space::Entity::find_by_id(space.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            return Err(DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: space.id.to_string(),
            });
        }

        let model = space::ActiveModel {
            id: Set(space.id),
            label: Set(space.label.clone()),
            kind: Set(space.kind.as_str().to_string()),
            status: Set(space.status.as_str().to_string()),
            hourly_rate: Set(space.hourly_rate),
        };
        model
            .update(&self.db)
            .await
            .map_err(|e| insert_err(e, &space.label))?;
        Ok(())
    }

    async fn update_status(&self, id: i32, status: SpaceStatus) -> DomainResult<()> {
        debug!("Updating space status: {} -> {:?}", id, status);

        let model = space::ActiveModel {
            id: Set(id),
            status: Set(status.as_str().to_string()),
            label: NotSet,
            kind: NotSet,
            hourly_rate: NotSet,
        };
        model.update(&self.db).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: id.to_string(),
            },
            other => db_err(other),
        })?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = space::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound {
                entity: "Space",
                field: "id",
                value: id.to_string(),
            });
        }

        Ok(())
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Space>> {
        let model = space::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Space>> {
        let models = space::Entity::find()
            .order_by_asc(space::Column::Label)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_filtered(
        &self,
        kind: Option<SpaceKind>,
        status: Option<SpaceStatus>,
    ) -> DomainResult<Vec<Space>> {
        let mut query = space::Entity::find();
        if let Some(kind) = kind {
            query = query.filter(space::Column::Kind.eq(kind.as_str()));
        }
        if let Some(status) = status {
            query = query.filter(space::Column::Status.eq(status.as_str()));
        }
        let models = query
            .order_by_asc(space::Column::Label)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_free_by_kind(&self, kind: SpaceKind) -> DomainResult<Vec<Space>> {
        self.find_filtered(Some(kind), Some(SpaceStatus::Free)).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
