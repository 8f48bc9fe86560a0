//! Space API DTOs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{DomainError, Space, SpaceKind, SpaceStatus};

/// Space representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct SpaceDto {
    pub id: i32,
    pub label: String,
    /// Standard, Compact or Accessible
    pub kind: String,
    /// Free or Occupied
    pub status: String,
    pub hourly_rate: Decimal,
}

impl From<Space> for SpaceDto {
    fn from(space: Space) -> Self {
        Self {
            id: space.id,
            label: space.label,
            kind: space.kind.as_str().to_string(),
            status: space.status.as_str().to_string(),
            hourly_rate: space.hourly_rate,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSpaceRequest {
    /// Unique human-readable label
    #[validate(length(min = 1, max = 32))]
    pub label: String,
    /// Standard, Compact or Accessible
    pub kind: String,
    pub hourly_rate: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSpaceRequest {
    #[validate(length(min = 1, max = 32))]
    pub label: String,
    pub kind: String,
    pub hourly_rate: Decimal,
}

/// Query filters for the space listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct SpaceListParams {
    /// Filter by kind: Standard, Compact, Accessible
    pub kind: Option<String>,
    /// Filter by occupancy state: Free, Occupied
    pub status: Option<String>,
}

/// Query parameter for the free-space listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct FreeSpacesParams {
    /// Space kind: Standard, Compact, Accessible
    pub kind: String,
}

pub fn parse_kind(s: &str) -> Result<SpaceKind, DomainError> {
    SpaceKind::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("unknown space kind '{}'", s)))
}

pub fn parse_status(s: &str) -> Result<SpaceStatus, DomainError> {
    SpaceStatus::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("unknown space status '{}'", s)))
}
