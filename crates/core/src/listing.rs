//! Inventory list filtering, low-stock rows and summary statistics.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mapper;
use crate::types::{InventoryItem, ItemStatus, WarehouseFilter};

/// Category selection for list views.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// The `all` sentinel.
    #[default]
    All,
    /// Exact category name.
    Only(String),
}

impl CategoryFilter {
    /// Parse user input; `all` (any case) or blank selects everything.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Only(s.to_owned())
        }
    }

    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == category,
        }
    }
}

/// Client-side filter applied to a fetched item collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListFilter {
    /// Case-insensitive substring matched against name, id and category.
    pub search: String,
    pub category: CategoryFilter,
    pub warehouse: WarehouseFilter,
}

impl ListFilter {
    /// Whether `item` passes every part of the filter.
    #[must_use]
    pub fn matches(&self, item: &InventoryItem) -> bool {
        self.category.matches(&item.category)
            && self.warehouse.matches(item.warehouse)
            && self.matches_search(item)
    }

    fn matches_search(&self, item: &InventoryItem) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || [item.name.as_str(), item.id.as_str(), item.category.as_str()]
                .iter()
                .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

/// One rendered table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InventoryRow<'a> {
    #[serde(flatten)]
    pub item: &'a InventoryItem,
    /// `quantity <= threshold`, computed when the row is built.
    pub low_stock: bool,
}

/// Apply `filter` and derive the low-stock flag for each surviving item.
#[must_use]
pub fn rows<'a>(items: &'a [InventoryItem], filter: &ListFilter) -> Vec<InventoryRow<'a>> {
    items
        .iter()
        .filter(|item| filter.matches(item))
        .map(|item| InventoryRow {
            item,
            low_stock: item.is_low_stock(),
        })
        .collect()
}

/// Item count for one category, as returned by `GET /inventory/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(rename = "_id")]
    pub category: String,
    pub count: u32,
}

/// Summary statistics for the inventory dashboard.
///
/// The default value (all zero) is what a view shows when the stats call
/// fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStats {
    pub total_items: u32,
    pub active_items: u32,
    pub inactive_items: u32,
    pub low_stock_items: u32,
    pub categories: u32,
    pub category_distribution: Vec<CategoryCount>,
    /// Value of priced stock; only known for locally computed stats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_value: Option<Decimal>,
}

impl InventoryStats {
    /// Read the `data` object of a stats response, defaulting every field.
    #[must_use]
    pub fn from_backend(raw: &Value) -> Self {
        let categories_len = raw
            .get("categories")
            .and_then(Value::as_array)
            .and_then(|c| u32::try_from(c.len()).ok());
        let distribution: Vec<CategoryCount> = raw
            .get("categoryDistribution")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        Some(CategoryCount {
                            category: mapper::text(entry, &["_id", "category"])?,
                            count: mapper::count(entry, &["count"]).unwrap_or(0),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            total_items: mapper::count(raw, &["totalItems"]).unwrap_or(0),
            active_items: mapper::count(raw, &["activeItems"]).unwrap_or(0),
            inactive_items: mapper::count(raw, &["inactiveItems"]).unwrap_or(0),
            low_stock_items: mapper::count(raw, &["lowStockItems"]).unwrap_or(0),
            categories: mapper::count(raw, &["categories"])
                .or(categories_len)
                .unwrap_or(0),
            category_distribution: distribution,
            stock_value: None,
        }
    }

    /// Compute the same statistics locally from a fetched collection.
    #[must_use]
    pub fn summarize(items: &[InventoryItem]) -> Self {
        let mut by_category: BTreeMap<&str, u32> = BTreeMap::new();
        let mut stats = Self::default();
        let mut value = Some(Decimal::ZERO);
        let mut priced = false;

        for item in items {
            stats.total_items = stats.total_items.saturating_add(1);
            match item.status {
                ItemStatus::Active => stats.active_items = stats.active_items.saturating_add(1),
                ItemStatus::Inactive | ItemStatus::Discontinued => {
                    stats.inactive_items = stats.inactive_items.saturating_add(1);
                }
            }
            if item.is_low_stock() {
                stats.low_stock_items = stats.low_stock_items.saturating_add(1);
            }
            *by_category.entry(item.category.as_str()).or_insert(0) += 1;
            if item.unit_price.is_some() {
                priced = true;
                value = value
                    .zip(item.stock_value())
                    .and_then(|(total, item_value)| total.checked_add(item_value));
            }
        }

        stats.categories = u32::try_from(by_category.len()).unwrap_or(u32::MAX);
        stats.category_distribution = by_category
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_owned(),
                count,
            })
            .collect();
        stats.stock_value = value.filter(|_| priced);
        stats
    }
}

/// Ticket identifying one fetch issued by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Monotonic fetch counter that lets a view drop out-of-order responses.
///
/// Each fetch takes a [`Ticket`] before the request is sent. When the
/// response arrives, it is applied only if no newer ticket has been issued
/// since.
#[derive(Debug, Default)]
pub struct Generation {
    latest: u64,
}

impl Generation {
    #[must_use]
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Issue a ticket newer than every ticket issued so far.
    pub const fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Whether `ticket` is still the most recent one.
    #[must_use]
    pub const fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}
