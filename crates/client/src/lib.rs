//! ToolLink Client - REST client for the inventory backend.
//!
//! # Modules
//!
//! - [`config`] - Environment-driven configuration
//! - [`client`] - Typed `/inventory` endpoints
//! - [`error`] - Request failures
//! - [`notice`] - User-facing feedback derived from results
//! - [`view`] - List view that drops out-of-order responses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod notice;
pub mod view;

pub use client::{CreatedItem, InventoryClient, ItemPage, ListQuery, Pagination};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use notice::{Notice, NoticeLevel};
pub use view::{InventoryView, RefreshOutcome, ViewSnapshot};
