//! Inventory item display model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AdjustmentType, ItemId, ItemStatus, Sku, Unit, Warehouse};

/// Supplier contact details attached to an item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupplierInfo {
    /// Supplier name (required on submit).
    pub name: String,
    /// Contact person.
    pub contact: String,
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
    /// Postal address.
    pub address: String,
}

impl SupplierInfo {
    /// Supplier known only by name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// An inventory item as shown in tables and edited in forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Server-assigned identifier.
    pub id: ItemId,
    /// Stock-keeping unit, if the backend has one.
    pub sku: Option<Sku>,
    /// Item name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Category, a member of `warehouse.categories()`.
    pub category: String,
    /// Current stock count.
    pub quantity: u32,
    /// Unit the stock is counted in.
    pub unit: Unit,
    /// Low-stock alert boundary.
    pub threshold: u32,
    /// Upper stock target.
    pub max_stock_level: Option<u32>,
    /// Owning warehouse.
    pub warehouse: Warehouse,
    /// Supplier details.
    pub supplier: SupplierInfo,
    /// Price per unit.
    pub unit_price: Option<Decimal>,
    /// Lifecycle status.
    pub status: ItemStatus,
    /// Date of the last update (or creation).
    pub last_updated: NaiveDate,
}

impl InventoryItem {
    /// Whether stock is at or below the alert threshold.
    ///
    /// Always recomputed; quantities change between fetches.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity <= self.threshold
    }

    /// Value of the stock on hand, when the item has a price.
    ///
    /// `None` when unpriced or when the product does not fit a `Decimal`.
    #[must_use]
    pub fn stock_value(&self) -> Option<Decimal> {
        self.unit_price?.checked_mul(Decimal::from(self.quantity))
    }
}

/// A create or update payload: every editable item field.
///
/// Updates replace the whole record, so the draft always carries all fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub sku: Option<Sku>,
    pub name: String,
    pub description: String,
    pub category: String,
    pub quantity: u32,
    pub unit: Unit,
    pub threshold: u32,
    pub max_stock_level: Option<u32>,
    pub warehouse: Warehouse,
    pub supplier: SupplierInfo,
    pub unit_price: Option<Decimal>,
    pub status: ItemStatus,
}

impl From<&InventoryItem> for ItemDraft {
    fn from(item: &InventoryItem) -> Self {
        Self {
            sku: item.sku.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            unit: item.unit,
            threshold: item.threshold,
            max_stock_level: item.max_stock_level,
            warehouse: item.warehouse,
            supplier: item.supplier.clone(),
            unit_price: item.unit_price,
            status: item.status,
        }
    }
}

/// Body of `PUT /inventory/{id}/quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityAdjustment {
    /// Amount to set, add or subtract.
    pub quantity: u32,
    /// How `quantity` is applied.
    pub adjustment_type: AdjustmentType,
    /// Audit reason.
    pub reason: String,
}

impl QuantityAdjustment {
    /// Stock count after applying this adjustment to `current`.
    ///
    /// Subtraction saturates at zero, matching the backend.
    #[must_use]
    pub const fn apply_to(&self, current: u32) -> u32 {
        match self.adjustment_type {
            AdjustmentType::Set => self.quantity,
            AdjustmentType::Add => current.saturating_add(self.quantity),
            AdjustmentType::Subtract => current.saturating_sub(self.quantity),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A valid item in the metals warehouse.
    pub fn rebar() -> InventoryItem {
        InventoryItem {
            id: ItemId::new("item-1"),
            sku: Some(Sku::new("STE-000001")),
            name: "Rebar Y12".to_string(),
            description: "12mm deformed bar, 12m length".to_string(),
            category: "Steel & Reinforcement".to_string(),
            quantity: 120,
            unit: Unit::Pieces,
            threshold: 50,
            max_stock_level: Some(2000),
            warehouse: Warehouse::Metals,
            supplier: SupplierInfo {
                name: "Kingdom Steel Ltd".to_string(),
                contact: "Amani Otieno".to_string(),
                phone: "+254700000001".to_string(),
                email: "orders@kingdomsteel.example".to_string(),
                address: "Industrial Area, Nairobi".to_string(),
            },
            unit_price: Some(Decimal::new(85_050, 2)),
            status: ItemStatus::Active,
            last_updated: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default(),
        }
    }
}
