//! HTTP server: shared state, REST routes and the serving loop
//!
//! [`ServerBuilder`] assembles an [`AppState`] from a store, clock, admin
//! account and token settings, and [`RestExposure`] turns it into an axum
//! `Router`.

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::{ServerBuilder, shutdown_signal};
pub use exposure::RestExposure;
pub use host::AppState;
