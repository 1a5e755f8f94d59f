//! Item commands: list, show, create, update, delete, adjust.

use toollink_client::{ClientConfig, InventoryView, RefreshOutcome};
use toollink_core::{
    AdjustmentType, CategoryFilter, InventoryForm, ItemId, ListFilter, QuantityAdjustment,
    WarehouseFilter, catalog,
};
use tracing::info;

use super::{CommandError, ItemArgs};
use crate::output::{self, Format};

pub async fn list(
    view: &InventoryView,
    format: Format,
    search: String,
    category: &str,
    warehouse: WarehouseFilter,
    low_stock_only: bool,
) -> Result<(), CommandError> {
    view.set_filter(ListFilter {
        search,
        category: CategoryFilter::parse(category),
        warehouse,
    })
    .await;

    if let RefreshOutcome::Degraded(notice) = view.refresh().await {
        return Err(CommandError::Failed(notice));
    }

    let snapshot = view.snapshot().await;
    let rows: Vec<_> = snapshot
        .rows()
        .into_iter()
        .filter(|row| !low_stock_only || row.low_stock)
        .collect();
    output::rows(format, &rows)?;
    Ok(())
}

pub async fn show(view: &InventoryView, format: Format, id: &ItemId) -> Result<(), CommandError> {
    let item = view.client().get_item(id).await?;
    output::item(format, &item)?;
    Ok(())
}

pub async fn create(
    view: &InventoryView,
    config: &ClientConfig,
    quick: Option<&str>,
    args: ItemArgs,
) -> Result<(), CommandError> {
    let mut form = InventoryForm::new(config.default_warehouse);
    if let Some(name) = quick {
        let template = catalog::find_quick_item(name)
            .ok_or_else(|| CommandError::UnknownQuickItem(name.to_string()))?;
        form.apply_quick_item(template);
    }
    args.apply_to(&mut form);

    submit(view, &mut form).await
}

pub async fn update(view: &InventoryView, id: &ItemId, args: ItemArgs) -> Result<(), CommandError> {
    let item = view.client().get_item(id).await?;
    let mut form = InventoryForm::edit(&item);
    args.apply_to(&mut form);

    submit(view, &mut form).await
}

async fn submit(view: &InventoryView, form: &mut InventoryForm) -> Result<(), CommandError> {
    let notice = view.submit(form).await;
    if notice.is_error() || !form.errors().is_empty() {
        output::field_errors(form.errors());
        return Err(CommandError::Failed(notice));
    }
    output::notice(&notice);
    Ok(())
}

pub async fn delete(
    view: &InventoryView,
    id: &ItemId,
    confirmed: bool,
) -> Result<(), CommandError> {
    if !confirmed {
        return Err(CommandError::NotConfirmed("delete"));
    }

    let notice = view.delete(id).await;
    if notice.is_error() {
        return Err(CommandError::Failed(notice));
    }
    info!(id = %id, "Item deleted");
    output::notice(&notice);
    Ok(())
}

pub async fn adjust(
    view: &InventoryView,
    format: Format,
    id: &ItemId,
    adjustment_type: AdjustmentType,
    quantity: u32,
    reason: String,
) -> Result<(), CommandError> {
    let adjustment = QuantityAdjustment {
        quantity,
        adjustment_type,
        reason,
    };
    let item = view.client().adjust_quantity(id, &adjustment).await?;
    output::item(format, &item)?;
    Ok(())
}
