//! Vehicle domain entity

/// Vehicle category
///
/// Mirrors [`crate::domain::SpaceKind`] for matching purposes; a vehicle is
/// never forced to park on a space of its own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleCategory {
    Standard,
    Compact,
    Accessible,
}

impl VehicleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Compact => "Compact",
            Self::Accessible => "Accessible",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Standard" => Some(Self::Standard),
            "Compact" => Some(Self::Compact),
            "Accessible" => Some(Self::Accessible),
            _ => None,
        }
    }
}

/// Registered vehicle
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    /// Unique vehicle ID
    pub id: i32,
    /// Plate identifier, unique, stored case-normalized
    pub plate: String,
    /// Free-text make/model label
    pub make: String,
    /// Vehicle category
    pub category: VehicleCategory,
}

impl Vehicle {
    pub fn new(plate: &str, make: impl Into<String>, category: VehicleCategory) -> Self {
        Self {
            id: 0,
            plate: Self::normalize_plate(plate),
            make: make.into(),
            category,
        }
    }

    /// Canonical plate form: trimmed and uppercased. Applied on create,
    /// update and lookup so "ab-123-cd" and "AB-123-CD " collide.
    pub fn normalize_plate(plate: &str) -> String {
        plate.trim().to_uppercase()
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vehicle_normalizes_plate() {
        let v = Vehicle::new("  ab-123-cd ", "Renault Clio", VehicleCategory::Standard);
        assert_eq!(v.plate, "AB-123-CD");
        assert_eq!(v.make, "Renault Clio");
        assert_eq!(v.id, 0);
    }

    #[test]
    fn normalize_plate_is_idempotent() {
        let once = Vehicle::normalize_plate("xy 99 z");
        assert_eq!(Vehicle::normalize_plate(&once), once);
    }

    #[test]
    fn category_roundtrip() {
        for cat in &[
            VehicleCategory::Standard,
            VehicleCategory::Compact,
            VehicleCategory::Accessible,
        ] {
            let parsed = VehicleCategory::from_str(cat.as_str()).unwrap();
            assert_eq!(&parsed, cat);
        }
        assert!(VehicleCategory::from_str("Truck").is_none());
    }
}
