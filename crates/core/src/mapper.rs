//! Inventory record mapping between the backend shape and the display model.
//!
//! The backend contract has drifted over time: the same payload may carry
//! `quantity` or `current_stock`, `threshold` or `min_stock_level`, a
//! supplier object or a bare supplier string, a warehouse code or a long
//! warehouse name. Reading is therefore done one field at a time by small
//! `Option`-returning helpers, and [`from_backend`] applies a documented
//! default whenever a helper finds nothing usable:
//!
//! | Field | Looked up in | Default |
//! |-------|--------------|---------|
//! | `id` | `_id`, `id` | empty |
//! | `sku` | `sku` | none |
//! | `name` | `name` | empty |
//! | `description` | `description` | empty |
//! | `warehouse` | `warehouse`, `location` | [`DEFAULT_WAREHOUSE`] |
//! | `category` | `category` | first category of the warehouse |
//! | `quantity` | `quantity`, `current_stock` | 0 |
//! | `unit` | `unit` | [`Unit::Pieces`] |
//! | `threshold` | `threshold`, `min_stock_level` | 0 |
//! | `max_stock_level` | `max_stock_level` | none |
//! | `supplier` | `supplierInfo`, `supplier_info`, `supplier` | all fields empty |
//! | `unit_price` | `unit_price`, `unitPrice`, `price` | none |
//! | `status` | `status`, `is_active` | [`ItemStatus::Active`] |
//! | `last_updated` | `updatedAt`, `updated_at`, `createdAt`, `created_at` | `now` |
//!
//! Negative or non-numeric counts are treated as absent.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::DEFAULT_WAREHOUSE;
use crate::types::{
    InventoryItem, ItemDraft, ItemId, ItemStatus, Sku, SupplierInfo, Unit, Warehouse,
};

/// Floor for the generated `max_stock_level`.
pub const MIN_DEFAULT_MAX_STOCK: u32 = 1000;

/// Multiplier applied to the quantity when deriving `max_stock_level`.
pub const MAX_STOCK_MULTIPLIER: u32 = 10;

/// An item in the shape the backend accepts on create and update.
///
/// The backend schema has more fields than the form exposes; all of them
/// are populated here so server-side validation never sees gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendItem {
    pub name: String,
    pub description: String,
    pub sku: Sku,
    pub category: String,
    pub quantity: u32,
    /// Mirror of `quantity`.
    pub current_stock: u32,
    pub unit: Unit,
    pub threshold: u32,
    /// Mirror of `threshold`.
    pub min_stock_level: u32,
    pub max_stock_level: u32,
    pub warehouse: Warehouse,
    /// Mirror of `warehouse`.
    pub location: Warehouse,
    #[serde(rename = "supplierInfo")]
    pub supplier_info: SupplierInfo,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub unit_price: Option<Decimal>,
    pub status: ItemStatus,
}

/// Map a backend record into the display model.
///
/// Never fails: anything absent or malformed, including a `null` or
/// non-object `raw`, degrades to the defaults listed in the module docs.
#[must_use]
pub fn from_backend(raw: &Value, now: DateTime<Utc>) -> InventoryItem {
    let warehouse = warehouse(raw).unwrap_or(DEFAULT_WAREHOUSE);
    let category = text(raw, &["category"])
        .unwrap_or_else(|| warehouse.default_category().to_owned());

    InventoryItem {
        id: text(raw, &["_id", "id"]).map(ItemId::new).unwrap_or_default(),
        sku: text(raw, &["sku"]).map(Sku::new),
        name: text(raw, &["name"]).unwrap_or_default(),
        description: text(raw, &["description"]).unwrap_or_default(),
        category,
        quantity: count(raw, &["quantity", "current_stock"]).unwrap_or(0),
        unit: unit(raw).unwrap_or_default(),
        threshold: count(raw, &["threshold", "min_stock_level"]).unwrap_or(0),
        max_stock_level: count(raw, &["max_stock_level"]),
        warehouse,
        supplier: supplier(raw).unwrap_or_default(),
        unit_price: price(raw),
        status: status(raw).unwrap_or_default(),
        last_updated: last_updated(raw).unwrap_or_else(|| now.date_naive()),
    }
}

/// Map a draft into the backend shape, filling every derived field.
#[must_use]
pub fn to_backend(draft: &ItemDraft, now: DateTime<Utc>) -> BackendItem {
    let sku = draft
        .sku
        .clone()
        .filter(|sku| !sku.is_empty())
        .unwrap_or_else(|| Sku::generate(&draft.category, now));

    BackendItem {
        name: draft.name.trim().to_owned(),
        description: draft.description.trim().to_owned(),
        sku,
        category: draft.category.clone(),
        quantity: draft.quantity,
        current_stock: draft.quantity,
        unit: draft.unit,
        threshold: draft.threshold,
        min_stock_level: draft.threshold,
        max_stock_level: draft
            .max_stock_level
            .unwrap_or_else(|| default_max_stock(draft.quantity)),
        warehouse: draft.warehouse,
        location: draft.warehouse,
        supplier_info: draft.supplier.clone(),
        unit_price: draft.unit_price,
        status: draft.status,
    }
}

/// `max(quantity * 10, 1000)`, saturating.
#[must_use]
pub const fn default_max_stock(quantity: u32) -> u32 {
    let scaled = quantity.saturating_mul(MAX_STOCK_MULTIPLIER);
    if scaled < MIN_DEFAULT_MAX_STOCK {
        MIN_DEFAULT_MAX_STOCK
    } else {
        scaled
    }
}

// =============================================================================
// Field readers
// =============================================================================

/// First present, non-null value among `keys`.
fn first<'a>(raw: &'a Value, keys: &[&str]) -> impl Iterator<Item = &'a Value> {
    keys.iter()
        .filter_map(move |key| raw.get(*key))
        .filter(|value| !value.is_null())
}

/// First non-blank string (numbers are stringified) among `keys`.
pub fn text(raw: &Value, keys: &[&str]) -> Option<String> {
    first(raw, keys).find_map(|value| match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First usable non-negative count among `keys`.
pub fn count(raw: &Value, keys: &[&str]) -> Option<u32> {
    first(raw, keys).find_map(parse_count)
}

fn parse_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .or_else(|| n.as_f64().and_then(count_from_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(count_from_float))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked first
fn count_from_float(value: f64) -> Option<u32> {
    (0.0..=f64::from(u32::MAX))
        .contains(&value)
        .then(|| value.trunc() as u32)
}

/// Warehouse from `warehouse` or `location`, as a code or long name.
pub fn warehouse(raw: &Value) -> Option<Warehouse> {
    first(raw, &["warehouse", "location"])
        .filter_map(Value::as_str)
        .find_map(Warehouse::parse_lenient)
}

/// Unit of measure, leniently parsed.
pub fn unit(raw: &Value) -> Option<Unit> {
    first(raw, &["unit"])
        .filter_map(Value::as_str)
        .find_map(Unit::parse_lenient)
}

/// Supplier details from an object or a bare name string.
pub fn supplier(raw: &Value) -> Option<SupplierInfo> {
    first(raw, &["supplierInfo", "supplier_info", "supplier"]).find_map(|value| match value {
        Value::String(name) if !name.trim().is_empty() => Some(SupplierInfo::named(name.trim())),
        Value::Object(_) => Some(SupplierInfo {
            name: text(value, &["name"]).unwrap_or_default(),
            contact: text(value, &["contact", "contact_person", "contactPerson"])
                .unwrap_or_default(),
            phone: text(value, &["phone"]).unwrap_or_default(),
            email: text(value, &["email"]).unwrap_or_default(),
            address: text(value, &["address"]).unwrap_or_default(),
        }),
        _ => None,
    })
}

/// Non-negative unit price from a number or numeric string.
pub fn price(raw: &Value) -> Option<Decimal> {
    first(raw, &["unit_price", "unitPrice", "price"])
        .find_map(|value| match value {
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .ok()
                .or_else(|| n.as_f64().and_then(Decimal::from_f64_retain)),
            Value::String(s) => Decimal::from_str(s.trim()).ok(),
            _ => None,
        })
        .filter(|price| !price.is_sign_negative())
}

/// Status string, or `inactive` when only `is_active: false` is present.
pub fn status(raw: &Value) -> Option<ItemStatus> {
    text(raw, &["status"])
        .and_then(|s| s.parse().ok())
        .or_else(|| match raw.get("is_active") {
            Some(Value::Bool(true)) => Some(ItemStatus::Active),
            Some(Value::Bool(false)) => Some(ItemStatus::Inactive),
            _ => None,
        })
}

/// Update date, falling back to creation date.
pub fn last_updated(raw: &Value) -> Option<NaiveDate> {
    first(raw, &["updatedAt", "updated_at", "createdAt", "created_at"]).find_map(parse_date)
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc).date_naive())
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                        .map(|dt| dt.date())
                        .ok()
                })
                .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        }
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        // Extended JSON: {"$date": "..."}
        Value::Object(map) => map.get("$date").and_then(parse_date),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::item::fixtures::rebar;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-15T10:30:00.123Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn round_trip(draft: &ItemDraft) -> InventoryItem {
        let wire = serde_json::to_value(to_backend(draft, now())).unwrap();
        from_backend(&wire, now())
    }

    #[test]
    fn test_quantity_and_threshold_fallbacks() {
        let item = from_backend(&json!({"quantity": 7, "min_stock_level": 10}), now());
        assert_eq!(item.quantity, 7);
        assert_eq!(item.threshold, 10);
        assert!(item.is_low_stock());

        let item = from_backend(&json!({"current_stock": 3, "threshold": 1}), now());
        assert_eq!(item.quantity, 3);
        assert_eq!(item.threshold, 1);
        assert!(!item.is_low_stock());
    }

    #[test]
    fn test_primary_field_wins_over_mirror() {
        let item = from_backend(&json!({"quantity": 5, "current_stock": 9}), now());
        assert_eq!(item.quantity, 5);
    }

    #[test]
    fn test_malformed_counts_fall_through() {
        let item = from_backend(
            &json!({"quantity": "lots", "current_stock": "12", "threshold": -4}),
            now(),
        );
        assert_eq!(item.quantity, 12);
        assert_eq!(item.threshold, 0);

        let item = from_backend(&json!({"quantity": 4.9}), now());
        assert_eq!(item.quantity, 4);
    }

    #[test]
    fn test_totality_on_arbitrary_json() {
        let inputs = [
            Value::Null,
            json!([]),
            json!("just a string"),
            json!(42),
            json!({}),
            json!({"supplierInfo": null, "category": null, "quantity": null}),
            json!({"supplierInfo": [1, 2], "warehouse": 17, "unit": {}, "updatedAt": "yesterday"}),
        ];
        for raw in inputs {
            let item = from_backend(&raw, now());
            assert!(!item.category.is_empty(), "category missing for {raw}");
            assert!(item.warehouse.has_category(&item.category));
            assert_eq!(item.last_updated, now().date_naive());
            assert_eq!(item.status, ItemStatus::Active);
            assert_eq!(item.unit, Unit::Pieces);
        }
    }

    #[test]
    fn test_missing_category_uses_warehouse_default() {
        let item = from_backend(&json!({"warehouse": "WM"}), now());
        assert_eq!(item.category, "Steel & Reinforcement");
    }

    #[test]
    fn test_bare_supplier_string_is_lifted() {
        let item = from_backend(&json!({"supplier": "Acme Cement"}), now());
        assert_eq!(item.supplier, SupplierInfo::named("Acme Cement"));
    }

    #[test]
    fn test_supplier_object_fields() {
        let item = from_backend(
            &json!({"supplier_info": {"name": "Acme", "phone": "0700", "contact_person": "Jo"}}),
            now(),
        );
        assert_eq!(item.supplier.name, "Acme");
        assert_eq!(item.supplier.phone, "0700");
        assert_eq!(item.supplier.contact, "Jo");
        assert_eq!(item.supplier.email, "");
    }

    #[test]
    fn test_legacy_location_name_is_migrated() {
        let item = from_backend(&json!({"location": "Metal Yard"}), now());
        assert_eq!(item.warehouse, Warehouse::Metals);

        let item = from_backend(&json!({"warehouse": "Atlantis", "location": "WP"}), now());
        assert_eq!(item.warehouse, Warehouse::Paint);
    }

    #[test]
    fn test_dates_prefer_update_then_create() {
        let item = from_backend(
            &json!({"createdAt": "2023-01-02T00:00:00Z", "updatedAt": "2024-02-03T23:59:59+00:00"}),
            now(),
        );
        assert_eq!(item.last_updated, NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());

        let item = from_backend(&json!({"created_at": "2023-01-02"}), now());
        assert_eq!(item.last_updated, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());

        let item = from_backend(
            &json!({"updatedAt": {"$date": "2022-05-06T07:08:09.000Z"}}),
            now(),
        );
        assert_eq!(item.last_updated, NaiveDate::from_ymd_opt(2022, 5, 6).unwrap());
    }

    #[test]
    fn test_id_prefers_document_id() {
        let item = from_backend(&json!({"_id": "abc", "id": "def"}), now());
        assert_eq!(item.id.as_str(), "abc");
        let item = from_backend(&json!({"id": 17}), now());
        assert_eq!(item.id.as_str(), "17");
    }

    #[test]
    fn test_status_and_price() {
        let item = from_backend(&json!({"status": "Discontinued", "price": "12.50"}), now());
        assert_eq!(item.status, ItemStatus::Discontinued);
        assert_eq!(item.unit_price, Some(Decimal::new(1250, 2)));

        let item = from_backend(&json!({"is_active": false, "unit_price": -3}), now());
        assert_eq!(item.status, ItemStatus::Inactive);
        assert_eq!(item.unit_price, None);
    }

    #[test]
    fn test_to_backend_generates_sku_and_mirrors() {
        let draft = ItemDraft {
            sku: None,
            quantity: 40,
            threshold: 15,
            max_stock_level: None,
            ..ItemDraft::from(&rebar())
        };
        let wire = to_backend(&draft, now());

        let sku = wire.sku.as_str();
        assert!(sku.starts_with("STE-"), "unexpected sku {sku}");
        let digits = sku.trim_start_matches("STE-");
        assert_eq!(digits.len(), 6);
        assert!(digits.chars().all(|c| c.is_ascii_digit()));

        assert_eq!(wire.current_stock, 40);
        assert_eq!(wire.min_stock_level, 15);
        assert_eq!(wire.max_stock_level, MIN_DEFAULT_MAX_STOCK);
        assert_eq!(wire.location, wire.warehouse);
    }

    #[test]
    fn test_to_backend_keeps_existing_sku_and_max() {
        let draft = ItemDraft::from(&rebar());
        let wire = to_backend(&draft, now());
        assert_eq!(wire.sku.as_str(), "STE-000001");
        assert_eq!(wire.max_stock_level, 2000);
    }

    #[test]
    fn test_to_backend_wire_keys() {
        let wire = serde_json::to_value(to_backend(&ItemDraft::from(&rebar()), now())).unwrap();
        assert_eq!(wire["supplierInfo"]["name"], "Kingdom Steel Ltd");
        assert_eq!(wire["warehouse"], "WM");
        assert_eq!(wire["location"], "WM");
        assert_eq!(wire["unit"], "pieces");
        assert_eq!(wire["status"], "active");
        assert!(wire["unit_price"].is_number());
    }

    #[test]
    fn test_default_max_stock() {
        assert_eq!(default_max_stock(0), 1000);
        assert_eq!(default_max_stock(99), 1000);
        assert_eq!(default_max_stock(100), 1000);
        assert_eq!(default_max_stock(250), 2500);
        assert_eq!(default_max_stock(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_round_trip_preserves_core_fields() {
        let mut item = rebar();
        for (quantity, threshold, status) in [
            (0, 0, ItemStatus::Active),
            (7, 10, ItemStatus::Inactive),
            (u32::MAX, 1, ItemStatus::Discontinued),
        ] {
            item.quantity = quantity;
            item.threshold = threshold;
            item.status = status;
            let draft = ItemDraft::from(&item);
            let back = round_trip(&draft);
            assert_eq!(back.quantity, item.quantity);
            assert_eq!(back.threshold, item.threshold);
            assert_eq!(back.name, item.name);
            assert_eq!(back.category, item.category);
            assert_eq!(back.supplier.name, item.supplier.name);
            assert_eq!(back.status, item.status);
            assert_eq!(back.unit, item.unit);
            assert_eq!(back.warehouse, item.warehouse);
        }
    }
}
