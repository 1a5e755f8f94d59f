//! Canonical warehouse identifiers.
//!
//! The backend has historically stored warehouses either as short codes
//! (`W1`, `WM`) or as long descriptive names. Only the short codes are
//! canonical: [`Warehouse`] serializes to them, and the long names are
//! accepted on input and migrated (see [`Warehouse::parse_lenient`]).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string names no known warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown warehouse: {0}")]
pub struct WarehouseParseError(pub String);

/// A physical warehouse that owns stock.
///
/// Every inventory item belongs to exactly one warehouse. The `all`
/// pseudo-warehouse used by list views is [`WarehouseFilter::All`], which is
/// deliberately a different type so it can never be stored on an item.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Warehouse {
    /// `W1`: sand, aggregates, cement and masonry.
    #[default]
    #[serde(rename = "W1")]
    Aggregates,
    /// `WM`: steel, roofing and pipework.
    #[serde(rename = "WM")]
    Metals,
    /// `W2`: tools, fasteners and safety gear.
    #[serde(rename = "W2")]
    Hardware,
    /// `WP`: paint and finishing materials.
    #[serde(rename = "WP")]
    Paint,
    /// `WE`: electrical and plumbing supplies.
    #[serde(rename = "WE")]
    Electrical,
}

/// Long names older records use, mapped to their canonical warehouse.
///
/// The current display names are matched separately by the catalog.
const LEGACY_NAMES: &[(&str, Warehouse)] = &[
    ("main warehouse", Warehouse::Aggregates),
    ("sand and cement warehouse", Warehouse::Aggregates),
    ("metal yard", Warehouse::Metals),
    ("steel warehouse", Warehouse::Metals),
    ("hardware store", Warehouse::Hardware),
    ("tools warehouse", Warehouse::Hardware),
    ("paint store", Warehouse::Paint),
    ("finishing warehouse", Warehouse::Paint),
    ("electrical warehouse", Warehouse::Electrical),
    ("plumbing warehouse", Warehouse::Electrical),
];

impl Warehouse {
    /// Every warehouse, in display order.
    pub const ALL: [Self; 5] = [
        Self::Aggregates,
        Self::Metals,
        Self::Hardware,
        Self::Paint,
        Self::Electrical,
    ];

    /// Canonical short code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Aggregates => "W1",
            Self::Metals => "WM",
            Self::Hardware => "W2",
            Self::Paint => "WP",
            Self::Electrical => "WE",
        }
    }

    /// Parse a short code (case-insensitive) only.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|w| w.code().eq_ignore_ascii_case(code))
    }

    /// Parse a short code, a current display name or a legacy long name.
    ///
    /// Returns `None` for anything else; callers choose their own fallback.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Option<Self> {
        if let Some(warehouse) = Self::from_code(s) {
            return Some(warehouse);
        }
        let needle = s.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|w| w.display_name().to_lowercase() == needle)
            .or_else(|| {
                LEGACY_NAMES
                    .iter()
                    .find(|(name, _)| *name == needle)
                    .map(|(_, w)| *w)
            })
    }
}

impl std::fmt::Display for Warehouse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Warehouse {
    type Err = WarehouseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s).ok_or_else(|| WarehouseParseError(s.to_owned()))
    }
}

/// Warehouse selection for list views: one warehouse or the `all` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WarehouseFilter {
    /// Aggregate across every warehouse.
    #[default]
    All,
    /// A single warehouse.
    Only(Warehouse),
}

impl WarehouseFilter {
    /// Whether an item stored in `warehouse` passes this filter.
    #[must_use]
    pub fn matches(self, warehouse: Warehouse) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == warehouse,
        }
    }
}

impl std::fmt::Display for WarehouseFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(warehouse) => warehouse.fmt(f),
        }
    }
}

impl std::str::FromStr for WarehouseFilter {
    type Err = WarehouseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl From<Warehouse> for WarehouseFilter {
    fn from(warehouse: Warehouse) -> Self {
        Self::Only(warehouse)
    }
}
