//! Integration test support for ToolLink.
//!
//! [`MockBackend`] is an in-process `axum` server that speaks the
//! `/inventory` REST contract. Tests point a real
//! [`toollink_client::InventoryClient`] at it and then inspect what the
//! backend received.
//!
//! ```rust,ignore
//! let backend = MockBackend::start().await;
//! backend.insert(json!({"_id": "a1", "name": "River Sand", "quantity": 40}));
//! let client = backend.client();
//! let page = client.list_items(&ListQuery::default()).await.unwrap();
//! assert_eq!(page.items.len(), 1);
//! ```

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use toollink_client::{ClientConfig, InventoryClient, InventoryView};
use url::Url;

/// Token the mock accepts when auth is enforced.
pub const TEST_TOKEN: &str = "tk_test_Q7v2mL9x";

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct Inner {
    items: Vec<Value>,
    next_id: u32,
    requests: Vec<RecordedRequest>,
    bodies: Vec<Value>,
    require_token: bool,
    list_status: Option<StatusCode>,
    stats_status: Option<StatusCode>,
    list_delays: VecDeque<Duration>,
}

/// Shared state behind the mock routes.
#[derive(Clone, Default)]
pub struct MockState {
    inner: Arc<Mutex<Inner>>,
}

impl MockState {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("mock state poisoned")
    }
}

/// Running mock backend.
pub struct MockBackend {
    pub base_url: Url,
    state: MockState,
}

impl MockBackend {
    /// Bind to an ephemeral port and serve the inventory routes.
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve mock") });

        Self {
            base_url: Url::parse(&format!("http://{addr}/api")).expect("mock url"),
            state,
        }
    }

    /// Client configuration pointing at this backend with [`TEST_TOKEN`].
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone()).with_token(TEST_TOKEN)
    }

    #[must_use]
    pub fn client(&self) -> InventoryClient {
        InventoryClient::new(&self.config()).expect("client")
    }

    #[must_use]
    pub fn view(&self) -> InventoryView {
        InventoryView::new(self.client())
    }

    /// Store a backend-shaped record; `_id` is assigned when absent.
    pub fn insert(&self, mut record: Value) -> String {
        let mut inner = self.state.lock();
        if record.get("_id").is_none() {
            inner.next_id += 1;
            record["_id"] = json!(format!("item-{}", inner.next_id));
        }
        let id = record["_id"].as_str().unwrap_or_default().to_string();
        inner.items.push(record);
        id
    }

    pub fn replace_all(&self, records: Vec<Value>) {
        self.state.lock().items = records;
    }

    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        self.state.lock().items.clone()
    }

    /// Reject requests without `Authorization: Bearer TEST_TOKEN`.
    pub fn require_token(&self) {
        self.state.lock().require_token = true;
    }

    /// Answer `GET /inventory` with `status` from now on.
    pub fn fail_list(&self, status: StatusCode) {
        self.state.lock().list_status = Some(status);
    }

    /// Answer `GET /inventory/stats` with `status` from now on.
    pub fn fail_stats(&self, status: StatusCode) {
        self.state.lock().stats_status = Some(status);
    }

    /// Delay the next `GET /inventory` by `delay`. The response still
    /// carries the records as they were when the request arrived.
    pub fn delay_next_list(&self, delay: Duration) {
        self.state.lock().list_delays.push_back(delay);
    }

    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// JSON bodies received by `POST` and `PUT` routes, in order.
    #[must_use]
    pub fn bodies(&self) -> Vec<Value> {
        self.state.lock().bodies.clone()
    }

    /// Wait until at least `count` requests have arrived.
    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..200 {
            if self.state.lock().requests.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("mock backend never saw {count} requests");
    }
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/inventory", get(list_items).post(create_item))
        .route("/api/inventory/stats", get(stats))
        .route("/api/inventory/low-stock", get(low_stock))
        .route(
            "/api/inventory/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/api/inventory/{id}/quantity", put(adjust_quantity))
        .layer(middleware::from_fn_with_state(state.clone(), record_and_authorize))
        .with_state(state)
}

async fn record_and_authorize(
    State(state): State<MockState>,
    request: Request,
    next: Next,
) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let require_token = {
        let mut inner = state.lock();
        inner.requests.push(RecordedRequest {
            method: request.method().to_string(),
            path: request.uri().path().to_string(),
            query: request.uri().query().map(str::to_string),
            authorization: authorization.clone(),
        });
        inner.require_token
    };

    if require_token && authorization.as_deref() != Some(format!("Bearer {TEST_TOKEN}").as_str()) {
        return failure(StatusCode::UNAUTHORIZED, "Not authorized, token failed");
    }
    next.run(request).await
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

fn count_of(record: &Value, keys: &[&str]) -> i64 {
    keys.iter()
        .find_map(|key| record.get(*key).and_then(Value::as_i64))
        .unwrap_or(0)
}

fn is_low(record: &Value) -> bool {
    count_of(record, &["current_stock", "quantity"])
        <= count_of(record, &["min_stock_level", "threshold"])
}

async fn list_items(
    State(state): State<MockState>,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Response {
    let (status, delay, items) = {
        let mut inner = state.lock();
        (
            inner.list_status,
            inner.list_delays.pop_front(),
            inner.items.clone(),
        )
    };
    if let Some(status) = status {
        return (status, "<html><body>upstream error</body></html>").into_response();
    }
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let items: Vec<Value> = items
        .into_iter()
        .filter(|item| {
            params.get("category").is_none_or(|category| {
                item.get("category").and_then(Value::as_str) == Some(category.as_str())
            })
        })
        .filter(|item| params.get("lowStock").is_none_or(|v| v != "true") || is_low(item))
        .collect();
    let total = items.len();

    Json(json!({
        "success": true,
        "items": items,
        "pagination": {"page": 1, "limit": 100, "total": total, "pages": 1}
    }))
    .into_response()
}

async fn get_item(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let found = state
        .lock()
        .items
        .iter()
        .find(|item| item["_id"] == id.as_str())
        .cloned();
    match found {
        Some(item) => Json(json!({"success": true, "item": item})).into_response(),
        None => failure(StatusCode::NOT_FOUND, "Inventory item not found"),
    }
}

async fn create_item(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let mut inner = state.lock();
    inner.bodies.push(body.clone());

    let sku = body.get("sku").cloned().unwrap_or(Value::Null);
    if !sku.is_null() && inner.items.iter().any(|item| item.get("sku") == Some(&sku)) {
        return Json(json!({"success": false, "message": "Item with this SKU already exists"}))
            .into_response();
    }

    inner.next_id += 1;
    let mut record = body;
    record["_id"] = json!(format!("item-{}", inner.next_id));
    record["createdAt"] = json!("2024-05-02T08:30:00.000Z");
    record["updatedAt"] = json!("2024-05-02T08:30:00.000Z");
    inner.items.push(record.clone());

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": record,
            "action": "created",
            "message": "Inventory item created successfully"
        })),
    )
        .into_response()
}

async fn update_item(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = state.lock();
    inner.bodies.push(body.clone());

    let Some(slot) = inner.items.iter_mut().find(|item| item["_id"] == id.as_str()) else {
        return failure(StatusCode::NOT_FOUND, "Inventory item not found");
    };
    let mut record = body;
    record["_id"] = json!(id);
    record["updatedAt"] = json!("2024-05-03T10:00:00.000Z");
    *slot = record.clone();

    Json(json!({"success": true, "item": record})).into_response()
}

async fn delete_item(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    let mut inner = state.lock();
    let before = inner.items.len();
    inner.items.retain(|item| item["_id"] != id.as_str());
    if inner.items.len() == before {
        return failure(StatusCode::NOT_FOUND, "Inventory item not found");
    }
    Json(json!({"success": true, "message": "Inventory item deleted"})).into_response()
}

async fn adjust_quantity(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut inner = state.lock();
    inner.bodies.push(body.clone());

    let Some(slot) = inner.items.iter_mut().find(|item| item["_id"] == id.as_str()) else {
        return failure(StatusCode::NOT_FOUND, "Inventory item not found");
    };
    let current = count_of(slot, &["current_stock", "quantity"]);
    let amount = body.get("quantity").and_then(Value::as_i64).unwrap_or(0);
    let next = match body.get("adjustment_type").and_then(Value::as_str) {
        Some("add") => current + amount,
        Some("subtract") => (current - amount).max(0),
        Some("set") => amount,
        _ => return failure(StatusCode::BAD_REQUEST, "Invalid adjustment type"),
    };
    slot["quantity"] = json!(next);
    slot["current_stock"] = json!(next);

    Json(json!({"success": true, "item": slot.clone()})).into_response()
}

async fn stats(State(state): State<MockState>) -> Response {
    let inner = state.lock();
    if let Some(status) = inner.stats_status {
        return failure(status, "Failed to fetch inventory stats");
    }

    let mut distribution: Vec<(String, u32)> = Vec::new();
    for item in &inner.items {
        let category = item
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match distribution.iter_mut().find(|(c, _)| *c == category) {
            Some((_, count)) => *count += 1,
            None => distribution.push((category, 1)),
        }
    }
    let active = inner
        .items
        .iter()
        .filter(|item| item.get("status").and_then(Value::as_str).unwrap_or("active") == "active")
        .count();

    Json(json!({
        "success": true,
        "data": {
            "totalItems": inner.items.len(),
            "activeItems": active,
            "inactiveItems": inner.items.len() - active,
            "lowStockItems": inner.items.iter().filter(|item| is_low(item)).count(),
            "categories": distribution.iter().map(|(c, _)| c.clone()).collect::<Vec<_>>(),
            "categoryDistribution": distribution
                .iter()
                .map(|(c, n)| json!({"_id": c, "count": n}))
                .collect::<Vec<_>>(),
        }
    }))
    .into_response()
}

async fn low_stock(State(state): State<MockState>) -> Response {
    let items: Vec<Value> = state
        .lock()
        .items
        .iter()
        .filter(|item| is_low(item))
        .cloned()
        .collect();
    Json(json!({"success": true, "items": items})).into_response()
}
