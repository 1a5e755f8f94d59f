//! Read-only summary commands.

use toollink_client::{InventoryView, ListQuery};
use toollink_core::{InventoryStats, ListFilter, listing};

use super::CommandError;
use crate::output::{self, Format};

pub async fn stats(view: &InventoryView, format: Format, local: bool) -> Result<(), CommandError> {
    let stats = if local {
        let page = view.client().list_items(&ListQuery::default()).await?;
        InventoryStats::summarize(&page.items)
    } else {
        view.client().stats().await?
    };
    output::stats(format, &stats)?;
    Ok(())
}

pub async fn low_stock(view: &InventoryView, format: Format) -> Result<(), CommandError> {
    let items = view.client().low_stock().await?;
    output::rows(format, &listing::rows(&items, &ListFilter::default()))?;
    Ok(())
}
