//! Unit-of-measure vocabulary for stock counts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a unit is outside the fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitParseError {
    /// The input was blank.
    #[error("unit cannot be empty")]
    Empty,
    /// The input is not a known unit.
    #[error("unknown unit: {0}")]
    Unknown(String),
}

/// Unit of measure an item is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    #[default]
    Pieces,
    Kg,
    Bags,
    Tons,
    CubicMeters,
    Meters,
    Liters,
    Boxes,
    Rolls,
    Sheets,
}

impl Unit {
    /// Every unit, in the order forms offer them.
    pub const ALL: [Self; 10] = [
        Self::Pieces,
        Self::Kg,
        Self::Bags,
        Self::Tons,
        Self::CubicMeters,
        Self::Meters,
        Self::Liters,
        Self::Boxes,
        Self::Rolls,
        Self::Sheets,
    ];

    /// Wire value used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pieces => "pieces",
            Self::Kg => "kg",
            Self::Bags => "bags",
            Self::Tons => "tons",
            Self::CubicMeters => "cubic_meters",
            Self::Meters => "meters",
            Self::Liters => "liters",
            Self::Boxes => "boxes",
            Self::Rolls => "rolls",
            Self::Sheets => "sheets",
        }
    }

    /// Parse a unit, also accepting the spellings older records use
    /// (`pcs`, `kgs`, `m3`, `litres`, ...).
    #[must_use]
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        let unit = match normalized.as_str() {
            "pieces" | "piece" | "pcs" | "pc" | "units" | "unit" => Self::Pieces,
            "kg" | "kgs" | "kilograms" | "kilogram" => Self::Kg,
            "bags" | "bag" => Self::Bags,
            "tons" | "ton" | "tonnes" | "tonne" => Self::Tons,
            "cubic_meters" | "cubic_meter" | "cubic_metres" | "m3" | "cube" | "cubes" => {
                Self::CubicMeters
            }
            "meters" | "meter" | "metres" | "m" => Self::Meters,
            "liters" | "liter" | "litres" | "l" => Self::Liters,
            "boxes" | "box" => Self::Boxes,
            "rolls" | "roll" => Self::Rolls,
            "sheets" | "sheet" => Self::Sheets,
            _ => return None,
        };
        Some(unit)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Unit {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(UnitParseError::Empty);
        }
        Self::parse_lenient(s).ok_or_else(|| UnitParseError::Unknown(s.trim().to_owned()))
    }
}
