//! Space domain entity

use rust_decimal::Decimal;

/// Kind of parking space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceKind {
    /// Regular car space
    Standard,
    /// Narrow space for motorcycles and compact vehicles
    Compact,
    /// Accessible space (reduced mobility)
    Accessible,
}

impl SpaceKind {
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

/// Occupancy state of a space
///
/// Derived truth: mirrors the existence of an open session referencing the
/// space. Only the atomic open/close operations may change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceStatus {
    Free,
    Occupied,
}

impl Default for SpaceStatus {
    fn default() -> Self {
        Self::Free
    }
}

impl SpaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Occupied => "Occupied",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Free" => Some(Self::Free),
            "Occupied" => Some(Self::Occupied),
            _ => None,
        }
    }
}

/// Physical parking space
#[derive(Debug, Clone, PartialEq)]
pub struct Space {
    /// Unique space ID
    pub id: i32,
    /// Human-readable label, unique across the lot (e.g. "A-12")
    pub label: String,
    /// Space kind
    pub kind: SpaceKind,
    /// Occupancy state
    pub status: SpaceStatus,
    /// Hourly rate billed while occupied, non-negative
    pub hourly_rate: Decimal,
}

impl Space {
    pub fn new(label: impl Into<String>, kind: SpaceKind, hourly_rate: Decimal) -> Self {
        Self {
            id: 0,
            label: label.into(),
            kind,
            status: SpaceStatus::Free,
            hourly_rate,
        }
    }

    pub fn is_free(&self) -> bool {
        self.status == SpaceStatus::Free
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_space_is_free() {
        let s = Space::new("A-01", SpaceKind::Standard, Decimal::new(300, 2));
        assert_eq!(s.id, 0);
        assert_eq!(s.status, SpaceStatus::Free);
        assert!(s.is_free());
        assert_eq!(s.hourly_rate, Decimal::new(300, 2));
    }

    #[test]
    fn space_kind_roundtrip() {
        for kind in &[SpaceKind::Standard, SpaceKind::Compact, SpaceKind::Accessible] {
            let parsed = SpaceKind::from_str(kind.as_str()).unwrap();
            assert_eq!(&parsed, kind);
        }
        assert!(SpaceKind::from_str("Garage").is_none());
    }

    #[test]
    fn space_status_roundtrip() {
        for status in &[SpaceStatus::Free, SpaceStatus::Occupied] {
            let parsed = SpaceStatus::from_str(status.as_str()).unwrap();
            assert_eq!(&parsed, status);
        }
        assert!(SpaceStatus::from_str("Reserved").is_none());
    }
}
