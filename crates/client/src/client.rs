//! Inventory REST API client.
//!
//! Wraps the `/inventory` endpoints of the ToolLink backend. Every response
//! uses the same envelope (`{ success, ... }`); records inside it are
//! normalized through [`toollink_core::mapper`], so callers only ever see
//! display-form [`InventoryItem`]s.

use std::sync::Arc;

use chrono::Utc;
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use toollink_core::listing::CategoryFilter;
use toollink_core::{
    InventoryItem, InventoryStats, ItemDraft, ItemId, ListFilter, QuantityAdjustment, mapper,
};
use tracing::{debug, instrument};
use url::Url;

use crate::config::{ClientConfig, bearer};
use crate::error::ApiError;

/// Server-side filters for `GET /inventory`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub in_stock: Option<bool>,
    pub low_stock: Option<bool>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    /// Forward the parts of a view filter the backend understands.
    #[must_use]
    pub fn from_filter(filter: &ListFilter) -> Self {
        let search = filter.search.trim();
        Self {
            category: match &filter.category {
                CategoryFilter::All => None,
                CategoryFilter::Only(category) => Some(category.clone()),
            },
            search: (!search.is_empty()).then(|| search.to_string()),
            ..Self::default()
        }
    }

    fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("category", self.category.clone()),
            ("search", self.search.clone()),
            ("inStock", self.in_stock.map(|v| v.to_string())),
            ("lowStock", self.low_stock.map(|v| v.to_string())),
            ("page", self.page.map(|v| v.to_string())),
            ("limit", self.limit.map(|v| v.to_string())),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }

    fn apply_to(&self, url: &mut Url) {
        let pairs = self.pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
    }
}

/// Paging information returned alongside a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub pages: u32,
}

impl Pagination {
    fn from_backend(raw: &Value) -> Option<Self> {
        raw.is_object().then(|| Self {
            page: mapper::count(raw, &["page", "currentPage"]).unwrap_or(1),
            limit: mapper::count(raw, &["limit", "perPage"]).unwrap_or(0),
            total: mapper::count(raw, &["total", "totalItems"]).unwrap_or(0),
            pages: mapper::count(raw, &["pages", "totalPages"]).unwrap_or(0),
        })
    }
}

/// One page of `GET /inventory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPage {
    pub items: Vec<InventoryItem>,
    pub pagination: Option<Pagination>,
}

/// Result of `POST /inventory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedItem {
    pub item: InventoryItem,
    /// What the backend did, e.g. `created`, or `updated` when it merged the
    /// draft into an existing SKU.
    pub action: Option<String>,
    pub message: Option<String>,
}

/// ToolLink inventory API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the token.
///
/// # Authentication
///
/// The bearer token comes from [`ClientConfig`]. Without one, requests go
/// out unauthenticated and the backend's 401 surfaces as
/// [`ApiError::Unauthorized`].
#[derive(Clone)]
pub struct InventoryClient {
    inner: Arc<InventoryClientInner>,
}

struct InventoryClientInner {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl std::fmt::Debug for InventoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl InventoryClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(InventoryClientInner {
                http,
                base_url: config.api_url.clone(),
                token: RwLock::new(config.token.clone()),
            }),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Replace the bearer token used for subsequent requests.
    pub async fn set_token(&self, token: SecretString) {
        *self.inner.token.write().await = Some(token);
    }

    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    pub async fn has_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// `GET /inventory`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure, a non-success status, or
    /// `success: false`.
    #[instrument(skip(self))]
    pub async fn list_items(&self, query: &ListQuery) -> Result<ItemPage, ApiError> {
        let request = self.endpoint(&[]).map(|mut url| {
            query.apply_to(&mut url);
            self.inner.http.get(url)
        });
        let body = self.call("list_items", request).await?;

        Ok(ItemPage {
            items: items_in(&body),
            pagination: body.get("pagination").and_then(Pagination::from_backend),
        })
    }

    /// `GET /inventory/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown id, otherwise as
    /// [`InventoryClient::list_items`].
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn get_item(&self, id: &ItemId) -> Result<InventoryItem, ApiError> {
        let request = self.request(Method::GET, &[item_segment(id)?]);
        let body = self.call("get_item", request).await?;
        item_in(&body)
    }

    /// `POST /inventory` with the draft mapped to the backend shape.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend's message when it
    /// refuses the item, otherwise as [`InventoryClient::list_items`].
    #[instrument(skip(self, draft), fields(name = %draft.name, warehouse = %draft.warehouse))]
    pub async fn create_item(&self, draft: &ItemDraft) -> Result<CreatedItem, ApiError> {
        let payload = mapper::to_backend(draft, Utc::now());
        let request = self
            .request(Method::POST, &[])
            .map(|request| request.json(&payload));
        let body = self.call("create_item", request).await?;

        Ok(CreatedItem {
            item: item_in(&body)?,
            action: mapper::text(&body, &["action"]),
            message: mapper::text(&body, &["message"]),
        })
    }

    /// `PUT /inventory/{id}`, replacing the whole record.
    ///
    /// # Errors
    ///
    /// As [`InventoryClient::create_item`].
    #[instrument(skip(self, id, draft), fields(id = %id))]
    pub async fn update_item(
        &self,
        id: &ItemId,
        draft: &ItemDraft,
    ) -> Result<InventoryItem, ApiError> {
        let payload = mapper::to_backend(draft, Utc::now());
        let request = self
            .request(Method::PUT, &[item_segment(id)?])
            .map(|request| request.json(&payload));
        let body = self.call("update_item", request).await?;
        item_in(&body)
    }

    /// `DELETE /inventory/{id}`.
    ///
    /// # Errors
    ///
    /// As [`InventoryClient::get_item`].
    #[instrument(skip(self, id), fields(id = %id))]
    pub async fn delete_item(&self, id: &ItemId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &[item_segment(id)?]);
        self.call("delete_item", request).await?;
        Ok(())
    }

    /// `GET /inventory/stats`.
    ///
    /// # Errors
    ///
    /// As [`InventoryClient::list_items`]. A malformed `data` object is not
    /// an error; missing figures read as zero.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<InventoryStats, ApiError> {
        let request = self.request(Method::GET, &["stats"]);
        let body = self.call("stats", request).await?;
        Ok(InventoryStats::from_backend(
            body.get("data").unwrap_or(&Value::Null),
        ))
    }

    /// `GET /inventory/low-stock`.
    ///
    /// # Errors
    ///
    /// As [`InventoryClient::list_items`].
    #[instrument(skip(self))]
    pub async fn low_stock(&self) -> Result<Vec<InventoryItem>, ApiError> {
        let request = self.request(Method::GET, &["low-stock"]);
        let body = self.call("low_stock", request).await?;
        Ok(items_in(&body))
    }

    /// `PUT /inventory/{id}/quantity`.
    ///
    /// # Errors
    ///
    /// As [`InventoryClient::get_item`].
    #[instrument(skip(self, id, adjustment), fields(id = %id, kind = %adjustment.adjustment_type))]
    pub async fn adjust_quantity(
        &self,
        id: &ItemId,
        adjustment: &QuantityAdjustment,
    ) -> Result<InventoryItem, ApiError> {
        let request = self
            .request(Method::PUT, &[item_segment(id)?, "quantity"])
            .map(|request| request.json(adjustment));
        let body = self.call("adjust_quantity", request).await?;
        item_in(&body)
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// `{base}/inventory/{segments...}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .push("inventory")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.http.request(method, self.endpoint(segments)?))
    }

    /// Send a request and log its outcome under `operation`.
    async fn call(
        &self,
        operation: &'static str,
        request: Result<RequestBuilder, ApiError>,
    ) -> Result<Value, ApiError> {
        let result = match request {
            Ok(request) => self.execute(request).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(body) => {
                debug!(operation, "Inventory request succeeded");
                Ok(body)
            }
            Err(e) => {
                e.report(operation);
                Err(e)
            }
        }
    }

    /// Attach the token, send, and unwrap the response envelope.
    async fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let token = self.inner.token.read().await.clone();
        let request = match &token {
            Some(token) => request.bearer_auth(bearer(token)),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Error bodies are often HTML from a proxy; fall back to the reason phrase
            let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);
            let message = backend_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            return Err(match status {
                StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
                StatusCode::FORBIDDEN => ApiError::Forbidden(message),
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                _ => ApiError::Status {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        if body.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(ApiError::Rejected(
                backend_message(&body).unwrap_or_else(|| "request was rejected".to_string()),
            ));
        }

        Ok(body)
    }
}

fn item_segment(id: &ItemId) -> Result<&str, ApiError> {
    if id.is_empty() {
        return Err(ApiError::InvalidUrl("item id is empty".to_string()));
    }
    Ok(id.as_str())
}

fn backend_message(body: &Value) -> Option<String> {
    mapper::text(body, &["message", "error"])
}

/// Map the record list under `items` (or `data`).
fn items_in(body: &Value) -> Vec<InventoryItem> {
    let now = Utc::now();
    ["items", "data"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
        .map(|records| {
            records
                .iter()
                .map(|raw| mapper::from_backend(raw, now))
                .collect()
        })
        .unwrap_or_default()
}

/// Map the single record under `item` (or `data`).
fn item_in(body: &Value) -> Result<InventoryItem, ApiError> {
    ["item", "data"]
        .iter()
        .find_map(|key| body.get(*key).filter(|raw| raw.is_object()))
        .map(|raw| mapper::from_backend(raw, Utc::now()))
        .ok_or_else(|| {
            ApiError::Parse(<serde_json::Error as serde::de::Error>::custom(
                "response has no item record",
            ))
        })
}
