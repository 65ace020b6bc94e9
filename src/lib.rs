//! # repair-desk
//!
//! Repair-order tracking for a device-repair shop.
//!
//! A customer drops a device off, the shop records the intake, repairs it and
//! hands it back. Each [`RepairOrder`](core::RepairOrder) follows one lifecycle:
//!
//! ```text
//! pending ──mark_repaired──▶ repaired ──mark_picked_up──▶ picked_up
//! ```
//!
//! ## Features
//!
//! - **Typed lifecycle**: transitions only move forward and stamp their date once
//! - **Closed update set**: `PUT /orders/{id}` accepts `mark_repaired`,
//!   `mark_picked_up` or `edit_contact_info`, never raw field patches
//! - **Pluggable storage**: in-memory (default) or PostgreSQL (`postgres` feature)
//! - **Bearer auth**: one admin account, HS256 tokens, throttled login
//! - **Client + export**: typed HTTP client with auto-refresh (`client`
//!   feature) and CSV spreadsheet export
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use repair_desk::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_store(Arc::new(InMemoryOrderStore::new()))
//!     .with_admin(AdminAccount::with_password("admin", "secret"))
//!     .with_token_config(TokenConfig::new(secret, 24, "repair-desk"))
//!     .build()?;
//! ```

pub mod auth;
#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod core;
pub mod export;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Clock, ContactUpdate, FixedClock, NewOrder, OrderError, OrderService, OrderStatus,
        OrderStore, OrderUpdate, PickupDetails, RepairDetails, RepairError, RepairOrder,
        RepairResult, SystemClock,
    };

    // === Auth ===
    pub use crate::auth::{AdminAccount, CurrentUser, TokenConfig, TokenService};

    // === Storage ===
    pub use crate::storage::InMemoryOrderStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresOrderStore;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::{AppState, RestExposure, ServerBuilder};

    // === Client ===
    #[cfg(feature = "client")]
    pub use crate::client::{AutoRefresh, ClientError, RepairClient};

    // === External dependencies ===
    pub use chrono::NaiveDate;
    pub use rust_decimal::Decimal;
    pub use std::sync::Arc;
}
