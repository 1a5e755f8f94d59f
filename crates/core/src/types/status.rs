//! Status enums for inventory records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct StatusParseError {
    /// Which enum was being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Lifecycle status of an inventory item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Stocked and orderable.
    #[default]
    Active,
    /// Temporarily not offered.
    Inactive,
    /// No longer stocked.
    Discontinued,
}

impl ItemStatus {
    /// Wire value used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Discontinued => "discontinued",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ItemStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "discontinued" => Ok(Self::Discontinued),
            _ => Err(StatusParseError {
                kind: "item status",
                value: s.to_owned(),
            }),
        }
    }
}

/// How a quantity adjustment is applied to the stored stock count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Replace the stock count.
    #[default]
    Set,
    /// Add to the stock count (goods received).
    Add,
    /// Subtract from the stock count (goods issued).
    Subtract,
}

impl std::fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set => write!(f, "set"),
            Self::Add => write!(f, "add"),
            Self::Subtract => write!(f, "subtract"),
        }
    }
}

impl std::str::FromStr for AdjustmentType {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "set" => Ok(Self::Set),
            "add" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            _ => Err(StatusParseError {
                kind: "adjustment type",
                value: s.to_owned(),
            }),
        }
    }
}
