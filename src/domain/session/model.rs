//! Session domain entity and query types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::space::{Space, SpaceKind};
use crate::domain::vehicle::Vehicle;

/// Open/closed state of a session, derived from `exit_time`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Vehicle is still on the space
    Open,
    /// Vehicle has left; charge is settled
    Closed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Open" => Some(Self::Open),
            "Closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// One continuous occupancy of a space by a vehicle.
///
/// Carries point-in-time snapshots of the space and the vehicle, not live
/// references. Invariant: `exit_time` and `charge` are set together or not
/// at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Unique session ID
    pub id: i32,
    /// Occupied space snapshot
    pub space: Space,
    /// Parked vehicle snapshot
    pub vehicle: Vehicle,
    /// When the vehicle entered
    pub entry_time: DateTime<Utc>,
    /// When the vehicle left; `None` while the session is open
    pub exit_time: Option<DateTime<Utc>>,
    /// Amount billed at exit; `None` exactly while `exit_time` is `None`
    pub charge: Option<Decimal>,
}

impl Session {
    /// A freshly opened session: no exit, no charge.
    pub fn open(space: Space, vehicle: Vehicle, entry_time: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            space,
            vehicle,
            entry_time,
            exit_time: None,
            charge: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }

    pub fn status(&self) -> SessionStatus {
        if self.is_open() {
            SessionStatus::Open
        } else {
            SessionStatus::Closed
        }
    }

    /// Charge owed for leaving at `exit_time`.
    ///
    /// Elapsed whole minutes divided by 60 (fractional hours are billed,
    /// never rounded up to the next hour), times the space's hourly rate,
    /// rounded to the cent half-up. Callers guarantee `exit_time` is not
    /// before `entry_time`.
    pub fn compute_charge(&self, exit_time: DateTime<Utc>) -> Decimal {
        let minutes = (exit_time - self.entry_time).num_minutes();
        let hours = Decimal::from(minutes) / Decimal::from(60);
        (hours * self.space.hourly_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Filter for historical session queries.
///
/// Date bounds apply to the *calendar date* of the entry time, both ends
/// inclusive.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub space_kind: Option<SpaceKind>,
    pub status: Option<SessionStatus>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

/// Revenue total for one calendar month of session exits
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenue {
    /// Month key in `YYYY-MM` form
    pub month: String,
    /// Sum of charges of sessions closed in that month
    pub total: Decimal,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::space::SpaceStatus;
    use crate::domain::vehicle::VehicleCategory;
    use chrono::TimeZone;

    fn space_with_rate(rate: Decimal) -> Space {
        Space {
            id: 1,
            label: "A-01".into(),
            kind: SpaceKind::Standard,
            status: SpaceStatus::Occupied,
            hourly_rate: rate,
        }
    }

    fn sample_vehicle() -> Vehicle {
        Vehicle::new("AA-111-AA", "Peugeot 208", VehicleCategory::Standard)
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, h, m, s).unwrap()
    }

    #[test]
    fn open_session_has_no_exit_and_no_charge() {
        let session = Session::open(space_with_rate(Decimal::new(300, 2)), sample_vehicle(), at(10, 0, 0));
        assert!(session.is_open());
        assert_eq!(session.status(), SessionStatus::Open);
        assert!(session.exit_time.is_none());
        assert!(session.charge.is_none());
    }

    #[test]
    fn charge_for_two_and_a_half_hours() {
        // 3.00/h, 10:00 -> 12:30 = 2.5h
        let session = Session::open(space_with_rate(Decimal::new(300, 2)), sample_vehicle(), at(10, 0, 0));
        assert_eq!(session.compute_charge(at(12, 30, 0)), Decimal::new(750, 2));
    }

    #[test]
    fn charge_for_quarter_hour() {
        // 5.00/h, 09:00 -> 09:15 = 0.25h
        let session = Session::open(space_with_rate(Decimal::new(500, 2)), sample_vehicle(), at(9, 0, 0));
        assert_eq!(session.compute_charge(at(9, 15, 0)), Decimal::new(125, 2));
    }

    #[test]
    fn zero_duration_bills_zero() {
        let session = Session::open(space_with_rate(Decimal::new(500, 2)), sample_vehicle(), at(9, 0, 0));
        assert_eq!(session.compute_charge(at(9, 0, 0)), Decimal::ZERO);
    }

    #[test]
    fn sub_minute_remainder_is_not_billed() {
        // 59 seconds is zero whole minutes
        let session = Session::open(space_with_rate(Decimal::new(600, 2)), sample_vehicle(), at(9, 0, 0));
        assert_eq!(session.compute_charge(at(9, 0, 59)), Decimal::ZERO);
    }

    #[test]
    fn charge_rounds_half_up_to_cent() {
        // 1.00/h, 7 minutes = 0.11666.. -> 0.12
        let session = Session::open(space_with_rate(Decimal::new(100, 2)), sample_vehicle(), at(9, 0, 0));
        assert_eq!(session.compute_charge(at(9, 7, 0)), Decimal::new(12, 2));
    }

    #[test]
    fn no_rounding_up_to_whole_hours() {
        // 61 minutes at 3.00/h is 3.05, not 6.00
        let session = Session::open(space_with_rate(Decimal::new(300, 2)), sample_vehicle(), at(9, 0, 0));
        assert_eq!(session.compute_charge(at(10, 1, 0)), Decimal::new(305, 2));
    }

    #[test]
    fn session_status_roundtrip() {
        for status in &[SessionStatus::Open, SessionStatus::Closed] {
            let parsed = SessionStatus::from_str(status.as_str()).unwrap();
            assert_eq!(&parsed, status);
        }
        assert!(SessionStatus::from_str("Pending").is_none());
    }

    #[test]
    fn default_filter_matches_everything() {
        let filter = SessionFilter::default();
        assert!(filter.space_kind.is_none());
        assert!(filter.status.is_none());
        assert!(filter.date_from.is_none());
        assert!(filter.date_to.is_none());
    }
}
