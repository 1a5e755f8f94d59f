//! Stale-safe inventory list view.
//!
//! Holds the last fetched items and stats plus the user's filter. Each
//! refresh takes a [`Generation`] ticket before it goes out; a response
//! whose ticket has been superseded is dropped, so a slow fetch can never
//! overwrite a newer one.

use std::sync::Arc;

use tokio::sync::RwLock;
use toollink_core::form::{SubmitOutcome, SubmitRequest};
use toollink_core::listing::{self, CategoryFilter, InventoryRow};
use toollink_core::{
    Generation, InventoryForm, InventoryItem, InventoryStats, ItemId, ListFilter, SubmitError,
    WarehouseFilter,
};
use tracing::{debug, instrument, warn};

use crate::client::{InventoryClient, ListQuery};
use crate::notice::Notice;

/// What a refresh did to the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Items and stats were replaced.
    Applied,
    /// At least one fetch failed; the failed part was reset to its empty
    /// default and the notice says why.
    Degraded(Notice),
    /// A newer refresh was issued while this one was in flight; nothing changed.
    Stale,
}

impl RefreshOutcome {
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Degraded(notice) => Some(notice),
            Self::Applied | Self::Stale => None,
        }
    }
}

/// Point-in-time copy of the view state.
#[derive(Debug, Clone, Default)]
pub struct ViewSnapshot {
    pub items: Vec<InventoryItem>,
    pub stats: InventoryStats,
    pub filter: ListFilter,
    pub loading: bool,
}

impl ViewSnapshot {
    /// Filtered rows with a freshly computed low-stock flag.
    #[must_use]
    pub fn rows(&self) -> Vec<InventoryRow<'_>> {
        listing::rows(&self.items, &self.filter)
    }
}

#[derive(Debug, Default)]
struct ViewState {
    generation: Generation,
    snapshot: ViewSnapshot,
}

/// Inventory list and stats, refreshed on demand.
#[derive(Clone, Debug)]
pub struct InventoryView {
    client: InventoryClient,
    state: Arc<RwLock<ViewState>>,
}

impl InventoryView {
    #[must_use]
    pub fn new(client: InventoryClient) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(ViewState::default())),
        }
    }

    #[must_use]
    pub const fn client(&self) -> &InventoryClient {
        &self.client
    }

    /// Fetch items and stats and apply them if no newer refresh started.
    ///
    /// Failures never propagate: the failed part degrades to empty or
    /// all-zero and the returned outcome carries a notice.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = {
            let mut state = self.state.write().await;
            state.snapshot.loading = true;
            state.generation.issue()
        };

        let query = ListQuery::default();
        let (items, stats) = tokio::join!(self.client.list_items(&query), self.client.stats());

        let mut state = self.state.write().await;
        if !state.generation.is_current(ticket) {
            debug!(?ticket, "Discarding stale inventory refresh");
            return RefreshOutcome::Stale;
        }

        let snapshot = &mut state.snapshot;
        snapshot.loading = false;
        let mut notice = None;

        match items {
            Ok(page) => snapshot.items = page.items,
            Err(e) => {
                snapshot.items.clear();
                notice = Some(Notice::from_error(&e));
            }
        }
        match stats {
            Ok(stats) => snapshot.stats = stats,
            Err(e) => {
                snapshot.stats = InventoryStats::default();
                notice.get_or_insert_with(|| Notice::from_error(&e));
            }
        }

        notice.map_or(RefreshOutcome::Applied, RefreshOutcome::Degraded)
    }

    /// Submit `form` through the client and refresh the list on success.
    ///
    /// Invalid input yields a warning listing the fields; a backend failure
    /// leaves the form input in place.
    #[instrument(skip(self, form))]
    pub async fn submit(&self, form: &mut InventoryForm) -> Notice {
        let client = self.client.clone();
        let result = form
            .submit(|request| async move {
                match request {
                    SubmitRequest::Create(draft) => client.create_item(&draft).await.map(drop),
                    SubmitRequest::Update { id, draft } => {
                        client.update_item(&id, &draft).await.map(drop)
                    }
                }
            })
            .await;

        match result {
            Ok(SubmitOutcome::Created) => {
                self.after_change(Notice::success("Item added to inventory"))
                    .await
            }
            Ok(SubmitOutcome::Updated(_)) => {
                self.after_change(Notice::success("Item updated")).await
            }
            Err(SubmitError::Invalid(errors)) => {
                Notice::warning(format!("Please correct the highlighted fields: {errors}"))
            }
            Err(SubmitError::InFlight) => Notice::info("A submission is already in progress"),
            Err(SubmitError::Rejected(e)) => Notice::from_error(&e),
        }
    }

    /// Delete an item and refresh the list on success.
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn delete(&self, id: &ItemId) -> Notice {
        match self.client.delete_item(id).await {
            Ok(()) => self.after_change(Notice::success("Item deleted")).await,
            Err(e) => Notice::from_error(&e),
        }
    }

    async fn after_change(&self, notice: Notice) -> Notice {
        if let RefreshOutcome::Degraded(refresh) = self.refresh().await {
            warn!(notice = %refresh, "Refresh after change failed");
        }
        notice
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.state.read().await.snapshot.clone()
    }

    pub async fn set_filter(&self, filter: ListFilter) {
        self.state.write().await.snapshot.filter = filter;
    }

    pub async fn set_search(&self, search: impl Into<String>) {
        self.state.write().await.snapshot.filter.search = search.into();
    }

    pub async fn set_category(&self, category: CategoryFilter) {
        self.state.write().await.snapshot.filter.category = category;
    }

    pub async fn set_warehouse(&self, warehouse: WarehouseFilter) {
        self.state.write().await.snapshot.filter.warehouse = warehouse;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::notice::{GENERIC_MESSAGE, NoticeLevel};

    #[test]
    fn test_refresh_outcome_notice() {
        assert!(RefreshOutcome::Applied.notice().is_none());
        assert!(RefreshOutcome::Stale.notice().is_none());

        let degraded = RefreshOutcome::Degraded(Notice::from_error(&ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        }));
        let notice = degraded.notice();
        assert_eq!(notice.map(|n| n.level), Some(NoticeLevel::Error));
        assert_eq!(notice.map(|n| n.message.as_str()), Some(GENERIC_MESSAGE));
    }

    #[test]
    fn test_empty_snapshot_has_no_rows() {
        let snapshot = ViewSnapshot::default();
        assert!(snapshot.rows().is_empty());
        assert_eq!(snapshot.stats, InventoryStats::default());
        assert!(!snapshot.loading);
    }
}
