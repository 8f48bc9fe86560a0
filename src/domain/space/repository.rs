//! Space repository interface

use async_trait::async_trait;

use super::model::{Space, SpaceKind, SpaceStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait SpaceRepository: Send + Sync {
    /// Persist a new space and return it with its assigned ID.
    async fn create(&self, space: Space) -> DomainResult<Space>;
    async fn update(&self, space: Space) -> DomainResult<()>;
    /// Flip only the occupancy state. Used by the atomic open/close paths.
    async fn update_status(&self, id: i32, status: SpaceStatus) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Space>>;
    /// All spaces, ordered by label.
    async fn find_all(&self) -> DomainResult<Vec<Space>>;
    /// Spaces matching the given kind and/or status, ordered by label.
    async fn find_filtered(
        &self,
        kind: Option<SpaceKind>,
        status: Option<SpaceStatus>,
    ) -> DomainResult<Vec<Space>>;
    /// Free spaces of the given kind, ordered by label.
    async fn find_free_by_kind(&self, kind: SpaceKind) -> DomainResult<Vec<Space>>;
}
