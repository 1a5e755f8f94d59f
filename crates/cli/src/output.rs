//! Terminal rendering for command results.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use serde_json::json;
use toollink_client::Notice;
use toollink_core::listing::InventoryRow;
use toollink_core::{FieldErrors, InventoryItem, InventoryStats, Warehouse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
}

impl Format {
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Table }
    }
}

pub fn rows(format: Format, rows: &[InventoryRow<'_>]) -> Result<(), serde_json::Error> {
    if format == Format::Json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No items found.");
        return Ok(());
    }

    println!(
        "{:<26} {:<11} {:<28} {:<24} {:>8} {:<13} {:<4} {:<12}",
        "ID", "SKU", "NAME", "CATEGORY", "QTY", "UNIT", "WH", "STATUS"
    );
    for row in rows {
        let item = row.item;
        println!(
            "{:<26} {:<11} {:<28} {:<24} {:>8} {:<13} {:<4} {:<12}{}",
            item.id.as_str(),
            item.sku.as_ref().map_or("-", |sku| sku.as_str()),
            truncate(&item.name, 28),
            truncate(&item.category, 24),
            item.quantity,
            item.unit.as_str(),
            item.warehouse.code(),
            item.status.as_str(),
            if row.low_stock { "  LOW" } else { "" }
        );
    }
    println!("{} item(s)", rows.len());
    Ok(())
}

pub fn item(format: Format, item: &InventoryItem) -> Result<(), serde_json::Error> {
    if format == Format::Json {
        let mut value = serde_json::to_value(item)?;
        value["low_stock"] = json!(item.is_low_stock());
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} ({})", item.name, item.id);
    if let Some(sku) = &item.sku {
        println!("  SKU:          {sku}");
    }
    if !item.description.is_empty() {
        println!("  Description:  {}", item.description);
    }
    println!(
        "  Warehouse:    {} ({})",
        item.warehouse.display_name(),
        item.warehouse
    );
    println!("  Category:     {}", item.category);
    println!("  Quantity:     {} {}", item.quantity, item.unit);
    println!(
        "  Threshold:    {}{}",
        item.threshold,
        if item.is_low_stock() { "  (LOW STOCK)" } else { "" }
    );
    if let Some(max) = item.max_stock_level {
        println!("  Max stock:    {max}");
    }
    if let Some(price) = item.unit_price {
        println!("  Unit price:   {price}");
    }
    println!("  Supplier:     {}", item.supplier.name);
    for (label, value) in [
        ("Contact", &item.supplier.contact),
        ("Phone", &item.supplier.phone),
        ("Email", &item.supplier.email),
        ("Address", &item.supplier.address),
    ] {
        if !value.is_empty() {
            println!("    {label:<11} {value}");
        }
    }
    println!("  Status:       {}", item.status);
    println!("  Updated:      {}", item.last_updated);
    Ok(())
}

pub fn stats(format: Format, stats: &InventoryStats) -> Result<(), serde_json::Error> {
    if format == Format::Json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    println!("Total items:     {}", stats.total_items);
    println!("Active:          {}", stats.active_items);
    println!("Inactive:        {}", stats.inactive_items);
    println!("Low stock:       {}", stats.low_stock_items);
    println!("Categories:      {}", stats.categories);
    if let Some(value) = stats.stock_value {
        println!("Stock value:     {value}");
    }
    for entry in &stats.category_distribution {
        println!("  {:<28} {:>6}", entry.category, entry.count);
    }
    Ok(())
}

pub fn catalog(format: Format, only: Option<Warehouse>) -> Result<(), serde_json::Error> {
    let warehouses: Vec<Warehouse> = only.map_or_else(|| Warehouse::ALL.to_vec(), |w| vec![w]);

    if format == Format::Json {
        let value: Vec<_> = warehouses
            .iter()
            .map(|w| {
                json!({
                    "code": w.code(),
                    "name": w.display_name(),
                    "categories": w.categories(),
                    "quickItems": w.quick_items().iter().map(|q| json!({
                        "name": q.name,
                        "category": q.category,
                        "unit": q.unit,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    for warehouse in warehouses {
        println!("{} - {}", warehouse.code(), warehouse.display_name());
        for category in warehouse.categories() {
            println!("    {category}");
        }
        for quick in warehouse.quick_items() {
            println!("    + {} ({}, {})", quick.name, quick.category, quick.unit);
        }
    }
    Ok(())
}

pub fn notice(notice: &Notice) {
    println!("{}", notice.message);
}

pub fn field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("  {field}: {message}");
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}
