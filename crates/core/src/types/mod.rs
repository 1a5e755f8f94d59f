//! Core types for ToolLink inventory.
//!
//! This module provides type-safe wrappers for the inventory domain.

pub mod id;
pub mod item;
pub mod status;
pub mod unit;
pub mod warehouse;

pub use id::{ItemId, Sku};
pub use item::{InventoryItem, ItemDraft, QuantityAdjustment, SupplierInfo};
pub use status::{AdjustmentType, ItemStatus, StatusParseError};
pub use unit::{Unit, UnitParseError};
pub use warehouse::{Warehouse, WarehouseFilter, WarehouseParseError};
