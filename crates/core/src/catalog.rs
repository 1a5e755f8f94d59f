//! Warehouse/category catalog.
//!
//! Static lookup tables compiled into the binary: warehouse code → display
//! name → ordered category list → quick-pick item templates. Nothing here is
//! mutable and nothing here can fail; unknown keys resolve to
//! [`DEFAULT_WAREHOUSE`].

use crate::types::{Unit, Warehouse};

/// Warehouse used whenever a key cannot be resolved.
pub const DEFAULT_WAREHOUSE: Warehouse = Warehouse::Aggregates;

/// A predefined item offered for one-click form population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickItem {
    /// Item name.
    pub name: &'static str,
    /// Category, always valid for `warehouse`.
    pub category: &'static str,
    /// Unit the item is counted in.
    pub unit: Unit,
    /// Owning warehouse.
    pub warehouse: Warehouse,
}

struct WarehouseEntry {
    display_name: &'static str,
    categories: &'static [&'static str],
    quick_items: &'static [QuickItem],
}

const AGGREGATES: WarehouseEntry = WarehouseEntry {
    display_name: "Aggregates & Cement Warehouse",
    categories: &[
        "Fine Sand",
        "Coarse Sand",
        "Gravel & Aggregates",
        "Cement",
        "Bricks & Blocks",
    ],
    quick_items: &[
        QuickItem {
            name: "River Sand",
            category: "Fine Sand",
            unit: Unit::CubicMeters,
            warehouse: Warehouse::Aggregates,
        },
        QuickItem {
            name: "Portland Cement 50kg",
            category: "Cement",
            unit: Unit::Bags,
            warehouse: Warehouse::Aggregates,
        },
        QuickItem {
            name: "Crushed Stone 3/4\"",
            category: "Gravel & Aggregates",
            unit: Unit::Tons,
            warehouse: Warehouse::Aggregates,
        },
        QuickItem {
            name: "Concrete Block 6\"",
            category: "Bricks & Blocks",
            unit: Unit::Pieces,
            warehouse: Warehouse::Aggregates,
        },
    ],
};

const METALS: WarehouseEntry = WarehouseEntry {
    display_name: "Metals Warehouse",
    categories: &[
        "Steel & Reinforcement",
        "Roofing Sheets",
        "Pipes & Fittings",
        "Wire & Mesh",
        "Structural Sections",
    ],
    quick_items: &[
        QuickItem {
            name: "Rebar Y12",
            category: "Steel & Reinforcement",
            unit: Unit::Pieces,
            warehouse: Warehouse::Metals,
        },
        QuickItem {
            name: "Binding Wire",
            category: "Wire & Mesh",
            unit: Unit::Kg,
            warehouse: Warehouse::Metals,
        },
        QuickItem {
            name: "Corrugated Sheet 28G",
            category: "Roofing Sheets",
            unit: Unit::Sheets,
            warehouse: Warehouse::Metals,
        },
    ],
};

const HARDWARE: WarehouseEntry = WarehouseEntry {
    display_name: "Tools & Hardware Warehouse",
    categories: &[
        "Hand Tools",
        "Power Tools",
        "Fasteners",
        "Safety Equipment",
        "Adhesives & Sealants",
    ],
    quick_items: &[
        QuickItem {
            name: "Claw Hammer",
            category: "Hand Tools",
            unit: Unit::Pieces,
            warehouse: Warehouse::Hardware,
        },
        QuickItem {
            name: "Wood Screws 2\"",
            category: "Fasteners",
            unit: Unit::Boxes,
            warehouse: Warehouse::Hardware,
        },
        QuickItem {
            name: "Safety Helmet",
            category: "Safety Equipment",
            unit: Unit::Pieces,
            warehouse: Warehouse::Hardware,
        },
    ],
};

const PAINT: WarehouseEntry = WarehouseEntry {
    display_name: "Paint & Finishes Warehouse",
    categories: &[
        "Paints",
        "Primers & Undercoats",
        "Varnishes & Stains",
        "Brushes & Rollers",
        "Tiles & Grout",
    ],
    quick_items: &[
        QuickItem {
            name: "White Emulsion Paint",
            category: "Paints",
            unit: Unit::Liters,
            warehouse: Warehouse::Paint,
        },
        QuickItem {
            name: "Paint Roller 9\"",
            category: "Brushes & Rollers",
            unit: Unit::Pieces,
            warehouse: Warehouse::Paint,
        },
    ],
};

const ELECTRICAL: WarehouseEntry = WarehouseEntry {
    display_name: "Electrical & Plumbing Warehouse",
    categories: &[
        "Electrical Cables",
        "Switches & Sockets",
        "Lighting",
        "Plumbing Fittings",
        "Water Tanks",
    ],
    quick_items: &[
        QuickItem {
            name: "Twin Cable 2.5mm",
            category: "Electrical Cables",
            unit: Unit::Rolls,
            warehouse: Warehouse::Electrical,
        },
        QuickItem {
            name: "PVC Elbow 1/2\"",
            category: "Plumbing Fittings",
            unit: Unit::Pieces,
            warehouse: Warehouse::Electrical,
        },
    ],
};

impl Warehouse {
    const fn entry(self) -> &'static WarehouseEntry {
        match self {
            Self::Aggregates => &AGGREGATES,
            Self::Metals => &METALS,
            Self::Hardware => &HARDWARE,
            Self::Paint => &PAINT,
            Self::Electrical => &ELECTRICAL,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        self.entry().display_name
    }

    /// Ordered category vocabulary; the first entry is the default.
    #[must_use]
    pub const fn categories(self) -> &'static [&'static str] {
        self.entry().categories
    }

    /// Category selected when a form is (re)derived for this warehouse.
    #[must_use]
    pub fn default_category(self) -> &'static str {
        self.categories().first().copied().unwrap_or_default()
    }

    /// Whether `category` belongs to this warehouse's vocabulary.
    #[must_use]
    pub fn has_category(self, category: &str) -> bool {
        self.categories().contains(&category)
    }

    /// Quick-pick templates stocked in this warehouse.
    #[must_use]
    pub const fn quick_items(self) -> &'static [QuickItem] {
        self.entry().quick_items
    }
}

/// Resolve a key (code or long name) to a warehouse, falling back to
/// [`DEFAULT_WAREHOUSE`].
#[must_use]
pub fn resolve(key: &str) -> Warehouse {
    Warehouse::parse_lenient(key).unwrap_or(DEFAULT_WAREHOUSE)
}

/// Label for a warehouse key; unknown keys get the default warehouse's label.
#[must_use]
pub fn display_name(key: &str) -> &'static str {
    resolve(key).display_name()
}

/// Category list for a warehouse key; unknown keys get the default
/// warehouse's list.
#[must_use]
pub fn categories_for(key: &str) -> &'static [&'static str] {
    resolve(key).categories()
}

/// Inverse of [`display_name`]. Matching ignores case and surrounding
/// whitespace; unmatched names give [`DEFAULT_WAREHOUSE`].
#[must_use]
pub fn key_from_display_name(name: &str) -> Warehouse {
    let needle = name.trim();
    Warehouse::ALL
        .into_iter()
        .find(|w| w.display_name().eq_ignore_ascii_case(needle))
        .unwrap_or(DEFAULT_WAREHOUSE)
}

/// Every quick-pick template across all warehouses.
pub fn all_quick_items() -> impl Iterator<Item = &'static QuickItem> {
    Warehouse::ALL
        .into_iter()
        .flat_map(|w| w.quick_items().iter())
}

/// Find a quick-pick template by name (case-insensitive).
#[must_use]
pub fn find_quick_item(name: &str) -> Option<&'static QuickItem> {
    let needle = name.trim();
    all_quick_items().find(|item| item.name.eq_ignore_ascii_case(needle))
}
