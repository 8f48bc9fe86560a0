//! Session API DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{DomainError, MonthlyRevenue, Session, SessionFilter, SessionStatus};
use crate::interfaces::http::modules::spaces::dto::SpaceDto;
use crate::interfaces::http::modules::vehicles::dto::VehicleDto;

/// Session representation returned by the API.
///
/// Space and vehicle are embedded point-in-time snapshots.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDto {
    pub id: i32,
    pub space: SpaceDto,
    pub vehicle: VehicleDto,
    pub entry_time: DateTime<Utc>,
    /// Null while the session is open
    pub exit_time: Option<DateTime<Utc>>,
    /// Null exactly while exit_time is null
    pub charge: Option<Decimal>,
    /// Open or Closed
    pub status: String,
}

impl From<Session> for SessionDto {
    fn from(session: Session) -> Self {
        let status = session.status().as_str().to_string();
        Self {
            id: session.id,
            space: session.space.into(),
            vehicle: session.vehicle.into(),
            entry_time: session.entry_time,
            exit_time: session.exit_time,
            charge: session.charge,
            status,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OpenSessionRequest {
    pub space_id: i32,
    pub vehicle_id: i32,
    /// Defaults to the current time when omitted
    pub entry_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CloseSessionRequest {
    /// Defaults to the current time when omitted
    #[serde(default)]
    pub exit_time: Option<DateTime<Utc>>,
}

/// Query filters for the session listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct SessionListParams {
    /// Filter by joined space kind: Standard, Compact, Accessible
    pub kind: Option<String>,
    /// Filter by state: Open, Closed
    pub status: Option<String>,
    /// Earliest entry date (inclusive)
    pub date_from: Option<NaiveDate>,
    /// Latest entry date (inclusive)
    pub date_to: Option<NaiveDate>,
}

impl SessionListParams {
    pub fn into_filter(self) -> Result<SessionFilter, DomainError> {
        let space_kind = self
            .kind
            .as_deref()
            .map(crate::interfaces::http::modules::spaces::dto::parse_kind)
            .transpose()?;
        let status = self
            .status
            .as_deref()
            .map(|s| {
                SessionStatus::from_str(s).ok_or_else(|| {
                    DomainError::Validation(format!("unknown session status '{}'", s))
                })
            })
            .transpose()?;
        Ok(SessionFilter {
            space_kind,
            status,
            date_from: self.date_from,
            date_to: self.date_to,
        })
    }
}

/// One month's revenue total
#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyRevenueDto {
    /// Month key in `YYYY-MM` form
    pub month: String,
    pub total: Decimal,
}

impl From<MonthlyRevenue> for MonthlyRevenueDto {
    fn from(entry: MonthlyRevenue) -> Self {
        Self {
            month: entry.month,
            total: entry.total,
        }
    }
}
