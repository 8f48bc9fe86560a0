//! Vehicle API DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{DomainError, Vehicle, VehicleCategory};

/// Vehicle representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleDto {
    pub id: i32,
    /// Case-normalized plate identifier
    pub plate: String,
    pub make: String,
    /// Standard, Compact or Accessible
    pub category: String,
}

impl From<Vehicle> for VehicleDto {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            plate: vehicle.plate,
            make: vehicle.make,
            category: vehicle.category.as_str().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 16))]
    pub plate: String,
    #[validate(length(max = 64))]
    pub make: String,
    /// Standard, Compact or Accessible
    pub category: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 16))]
    pub plate: String,
    #[validate(length(max = 64))]
    pub make: String,
    pub category: String,
}

pub fn parse_category(s: &str) -> Result<VehicleCategory, DomainError> {
    VehicleCategory::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("unknown vehicle category '{}'", s)))
}
