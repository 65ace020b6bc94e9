//! API exposure
//!
//! The REST exposure consumes an [`AppState`](super::AppState) and produces
//! an axum `Router`.

pub mod rest;

pub use rest::RestExposure;
