//! Integration tests for the list view: refresh, degradation, stale
//! responses and form submission.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;
use toollink_client::{ClientConfig, InventoryClient, InventoryView, NoticeLevel, RefreshOutcome};
use toollink_core::{
    CategoryFilter, FormField, FormPhase, InventoryForm, InventoryStats, ItemId, ListFilter,
    Warehouse, WarehouseFilter,
};
use toollink_integration_tests::MockBackend;

fn seed(backend: &MockBackend) {
    backend.insert(json!({
        "_id": "a1", "name": "River Sand", "category": "Fine Sand", "location": "W1",
        "quantity": 40, "threshold": 10, "unit": "tons", "supplier": "Athi Quarries",
    }));
    backend.insert(json!({
        "_id": "a2", "name": "Crushed Stone 3/4\"", "category": "Gravel & Aggregates",
        "warehouse": "W1", "quantity": 5, "threshold": 20, "unit": "tons",
    }));
    backend.insert(json!({
        "_id": "m1", "name": "Rebar Y12", "category": "Steel & Reinforcement",
        "location": "Metal Yard", "current_stock": 120, "min_stock_level": 50,
        "supplierInfo": {"name": "Kingdom Steel Ltd"},
    }));
}

#[tokio::test]
async fn test_refresh_applies_items_and_stats() {
    let backend = MockBackend::start().await;
    seed(&backend);
    let view = backend.view();

    assert_eq!(view.refresh().await, RefreshOutcome::Applied);

    let snapshot = view.snapshot().await;
    assert!(!snapshot.loading);
    assert_eq!(snapshot.items.len(), 3);
    assert_eq!(snapshot.stats.total_items, 3);
    assert_eq!(snapshot.stats.low_stock_items, 1);

    let low: Vec<_> = snapshot
        .rows()
        .into_iter()
        .filter(|row| row.low_stock)
        .map(|row| row.item.id.as_str().to_string())
        .collect();
    assert_eq!(low, ["a2"]);
}

#[tokio::test]
async fn test_filter_narrows_rows_without_refetch() {
    let backend = MockBackend::start().await;
    seed(&backend);
    let view = backend.view();
    view.refresh().await;
    let requests = backend.requests().len();

    view.set_warehouse(WarehouseFilter::Only(Warehouse::Aggregates)).await;
    assert_eq!(view.snapshot().await.rows().len(), 2);

    view.set_category(CategoryFilter::parse("Fine Sand")).await;
    let snapshot = view.snapshot().await;
    let rows = snapshot.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item.name, "River Sand");

    view.set_filter(ListFilter::default()).await;
    view.set_search("REBAR").await;
    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.rows().len(), 1);
    assert_eq!(snapshot.rows()[0].item.warehouse, Warehouse::Metals);

    assert_eq!(backend.requests().len(), requests);
}

#[tokio::test]
async fn test_stats_failure_keeps_items() {
    let backend = MockBackend::start().await;
    seed(&backend);
    backend.fail_stats(StatusCode::INTERNAL_SERVER_ERROR);
    let view = backend.view();

    let outcome = view.refresh().await;
    let notice = outcome.notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.items.len(), 3);
    assert_eq!(snapshot.stats, InventoryStats::default());
}

#[tokio::test]
async fn test_list_failure_clears_items() {
    let backend = MockBackend::start().await;
    seed(&backend);
    let view = backend.view();
    view.refresh().await;
    assert_eq!(view.snapshot().await.items.len(), 3);

    backend.fail_list(StatusCode::SERVICE_UNAVAILABLE);
    let outcome = view.refresh().await;
    assert!(matches!(outcome, RefreshOutcome::Degraded(_)));

    let snapshot = view.snapshot().await;
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.stats.total_items, 3);
}

#[tokio::test]
async fn test_unauthorized_refresh_asks_to_sign_in() {
    let backend = MockBackend::start().await;
    seed(&backend);
    backend.require_token();
    let client = InventoryClient::new(&ClientConfig::new(backend.base_url.clone())).unwrap();
    let view = InventoryView::new(client);

    let outcome = view.refresh().await;
    let notice = outcome.notice().unwrap();
    assert_eq!(notice.message, "Your session has expired. Please sign in again.");

    let snapshot = view.snapshot().await;
    assert!(snapshot.items.is_empty());
    assert_eq!(snapshot.stats, InventoryStats::default());
}

#[tokio::test]
async fn test_stale_refresh_is_discarded() {
    let backend = MockBackend::start().await;
    seed(&backend);
    let view = backend.view();

    backend.delay_next_list(Duration::from_millis(300));
    let slow = tokio::spawn({
        let view = view.clone();
        async move { view.refresh().await }
    });
    backend.wait_for_requests(2).await;

    backend.replace_all(vec![json!({
        "_id": "n1", "name": "Binding Wire", "category": "Wire & Mesh",
        "warehouse": "WM", "quantity": 12, "threshold": 4,
    })]);
    assert_eq!(view.refresh().await, RefreshOutcome::Applied);
    assert_eq!(slow.await.unwrap(), RefreshOutcome::Stale);

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].id, ItemId::new("n1"));
    assert_eq!(snapshot.stats.total_items, 1);
}

#[tokio::test]
async fn test_submit_create_resets_form_and_lists_item() {
    let backend = MockBackend::start().await;
    let view = backend.view();

    let mut form = InventoryForm::new(Warehouse::Aggregates);
    let fields = form.fields_mut();
    fields.name = "Ballast".to_string();
    fields.category = "Gravel & Aggregates".to_string();
    fields.quantity = 18;
    fields.threshold = 5;
    fields.unit = "tons".to_string();
    fields.supplier.name = "Athi Quarries".to_string();

    let notice = view.submit(&mut form).await;
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Item added to inventory");
    assert_eq!(form.phase(), FormPhase::Idle);
    assert!(form.fields().name.is_empty());

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].name, "Ballast");
    assert_eq!(snapshot.items[0].warehouse, Warehouse::Aggregates);
}

#[tokio::test]
async fn test_invalid_submit_sends_nothing() {
    let backend = MockBackend::start().await;
    let view = backend.view();

    let mut form = InventoryForm::new(Warehouse::Aggregates);
    form.fields_mut().quantity = -4;

    let notice = view.submit(&mut form).await;
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert_eq!(form.phase(), FormPhase::ValidationFailed);
    assert!(form.errors().contains(FormField::Name));
    assert!(form.errors().contains(FormField::Quantity));
    assert!(backend.requests().iter().all(|r| r.method != "POST"));
}

#[tokio::test]
async fn test_rejected_submit_keeps_input() {
    let backend = MockBackend::start().await;
    backend.insert(json!({"_id": "a1", "name": "River Sand", "sku": "FIN-000001"}));
    let view = backend.view();

    let mut form = InventoryForm::new(Warehouse::Aggregates);
    let fields = form.fields_mut();
    fields.sku = Some("FIN-000001".into());
    fields.name = "River Sand (washed)".to_string();
    fields.supplier.name = "Athi Quarries".to_string();

    let notice = view.submit(&mut form).await;
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Item with this SKU already exists");
    assert_eq!(form.fields().name, "River Sand (washed)");
    assert_ne!(form.phase(), FormPhase::Submitting);
}

#[tokio::test]
async fn test_submit_update_closes_form() {
    let backend = MockBackend::start().await;
    seed(&backend);
    let view = backend.view();
    view.refresh().await;

    let item = view.client().get_item(&ItemId::new("m1")).await.unwrap();
    let mut form = InventoryForm::edit(&item);
    form.fields_mut().quantity = 60;

    let notice = view.submit(&mut form).await;
    assert_eq!(notice.message, "Item updated");
    assert_eq!(form.phase(), FormPhase::Closed);

    let request = backend
        .requests()
        .into_iter()
        .find(|r| r.method == "PUT")
        .unwrap();
    assert_eq!(request.path, "/api/inventory/m1");

    let snapshot = view.snapshot().await;
    let updated = snapshot.items.iter().find(|i| i.id.as_str() == "m1").unwrap();
    assert_eq!(updated.quantity, 60);
}

#[tokio::test]
async fn test_delete_refreshes_view() {
    let backend = MockBackend::start().await;
    seed(&backend);
    let view = backend.view();
    view.refresh().await;

    let notice = view.delete(&ItemId::new("a2")).await;
    assert_eq!(notice.message, "Item deleted");

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.items.len(), 2);
    assert!(snapshot.items.iter().all(|i| i.id.as_str() != "a2"));

    let notice = view.delete(&ItemId::new("a2")).await;
    assert_eq!(notice.level, NoticeLevel::Error);
}
