//! ToolLink Core - inventory domain library.
//!
//! This crate holds everything about ToolLink inventory that does not touch
//! the network:
//! - `toollink-client` - HTTP client and list view built on these types
//! - `toollink-cli` - `tl-cli` command-line tool
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Backend JSON is handled as `serde_json::Value` and normalized by
//! [`mapper`], so every rule here is testable without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, units, statuses, warehouses and item records
//! - [`catalog`] - Warehouse display names, categories and quick-add templates
//! - [`mapper`] - Backend record normalization in both directions
//! - [`form`] - Create/edit form state machine and validation
//! - [`listing`] - List filtering, low-stock rows, statistics, stale-response guard

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod form;
pub mod listing;
pub mod mapper;
pub mod types;

pub use catalog::{DEFAULT_WAREHOUSE, QuickItem};
pub use form::{FieldErrors, FormField, FormMode, FormPhase, InventoryForm, SubmitError};
pub use listing::{CategoryFilter, Generation, InventoryStats, ListFilter, Ticket};
pub use types::*;
