//! CLI command implementations.

pub mod items;
pub mod stats;

use clap::Args;
use rust_decimal::Decimal;
use thiserror::Error;
use toollink_client::{ApiError, ClientConfig, InventoryClient, InventoryView, Notice};
use toollink_core::{InventoryForm, ItemStatus, Sku, Warehouse};

/// Errors reported by inventory commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Backend request failed.
    #[error("{notice} ({source})")]
    Api { notice: Notice, source: ApiError },

    /// A view operation reported a failure notice.
    #[error("{0}")]
    Failed(Notice),

    /// No quick-add template with this name.
    #[error("Unknown quick item: {0}. Run `tl-cli catalog` to list templates")]
    UnknownQuickItem(String),

    /// Destructive command run without `--yes`.
    #[error("Refusing to {0} without --yes")]
    NotConfirmed(&'static str),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl From<ApiError> for CommandError {
    fn from(source: ApiError) -> Self {
        Self::Api {
            notice: Notice::from_error(&source),
            source,
        }
    }
}

/// Build the list view over a configured client.
///
/// # Errors
///
/// Returns `ApiError::Http` if the HTTP client cannot be built.
pub fn connect(config: &ClientConfig) -> Result<InventoryView, ApiError> {
    if config.token.is_none() {
        tracing::warn!("No API token configured; the backend will reject requests");
    }
    Ok(InventoryView::new(InventoryClient::new(config)?))
}

/// Item fields accepted by `create` and `update`; unset flags keep the
/// form's current value.
#[derive(Debug, Clone, Default, Args)]
pub struct ItemArgs {
    #[arg(short, long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Warehouse code or name; resets the category when it no longer fits
    #[arg(short, long)]
    pub warehouse: Option<Warehouse>,

    #[arg(short, long)]
    pub category: Option<String>,

    #[arg(short, long, allow_negative_numbers = true)]
    pub quantity: Option<i64>,

    /// Unit, e.g. pieces, kg, bags, cubic_meters
    #[arg(short, long)]
    pub unit: Option<String>,

    /// Low-stock threshold
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<i64>,

    #[arg(long)]
    pub max_stock: Option<u32>,

    /// Supplier name
    #[arg(short, long)]
    pub supplier: Option<String>,

    #[arg(long)]
    pub supplier_contact: Option<String>,

    #[arg(long)]
    pub supplier_phone: Option<String>,

    #[arg(long)]
    pub supplier_email: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<Decimal>,

    #[arg(long)]
    pub status: Option<ItemStatus>,

    #[arg(long)]
    pub sku: Option<Sku>,
}

impl ItemArgs {
    /// Overlay the given flags onto `form`.
    pub fn apply_to(self, form: &mut InventoryForm) {
        // Warehouse first: changing it re-derives the category
        if let Some(warehouse) = self.warehouse {
            form.set_warehouse(warehouse);
        }

        let fields = form.fields_mut();
        if let Some(name) = self.name {
            fields.name = name;
        }
        if let Some(description) = self.description {
            fields.description = description;
        }
        if let Some(category) = self.category {
            fields.category = category;
        }
        if let Some(quantity) = self.quantity {
            fields.quantity = quantity;
        }
        if let Some(unit) = self.unit {
            fields.unit = unit;
        }
        if let Some(threshold) = self.threshold {
            fields.threshold = threshold;
        }
        if self.max_stock.is_some() {
            fields.max_stock_level = self.max_stock;
        }
        if let Some(name) = self.supplier {
            fields.supplier.name = name;
        }
        if let Some(contact) = self.supplier_contact {
            fields.supplier.contact = contact;
        }
        if let Some(phone) = self.supplier_phone {
            fields.supplier.phone = phone;
        }
        if let Some(email) = self.supplier_email {
            fields.supplier.email = email;
        }
        if self.price.is_some() {
            fields.unit_price = self.price;
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if self.sku.is_some() {
            fields.sku = self.sku;
        }
    }
}

#[cfg(test)]
mod tests {
    use toollink_core::FormPhase;

    use super::*;

    #[test]
    fn test_apply_overrides_only_given_fields() {
        let mut form = InventoryForm::new(Warehouse::Aggregates);
        ItemArgs {
            name: Some("River Sand".to_string()),
            quantity: Some(40),
            supplier: Some("Coastal Quarries".to_string()),
            ..ItemArgs::default()
        }
        .apply_to(&mut form);

        let fields = form.fields();
        assert_eq!(fields.name, "River Sand");
        assert_eq!(fields.quantity, 40);
        assert_eq!(fields.supplier.name, "Coastal Quarries");
        assert_eq!(fields.category, "Fine Sand");
        assert_eq!(fields.unit, "pieces");
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_warehouse_applies_before_category() {
        let mut form = InventoryForm::new(Warehouse::Aggregates);
        ItemArgs {
            warehouse: Some(Warehouse::Metals),
            category: Some("Wire & Mesh".to_string()),
            ..ItemArgs::default()
        }
        .apply_to(&mut form);

        assert_eq!(form.warehouse(), Warehouse::Metals);
        assert_eq!(form.fields().category, "Wire & Mesh");
    }

    #[test]
    fn test_api_error_carries_user_notice() {
        let err = CommandError::from(ApiError::Unauthorized("jwt expired".to_string()));
        assert!(err.to_string().contains("sign in"));
        assert!(err.to_string().contains("jwt expired"));
    }
}
