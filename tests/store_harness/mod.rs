//! Shared test harness for order store backends
//!
//! Provides record builders and the `order_store_tests!` macro, which runs
//! the full `OrderStore` contract against any backend.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//!
//! order_store_tests!(InMemoryOrderStore::new());
//! ```

#![allow(dead_code)]

use chrono::NaiveDate;
use repair_desk::core::order::NewOrderRecord;

#[macro_use]
pub mod order_store_tests;

pub fn intake_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
}

/// Intake record with a phone contact
pub fn record(client: &str, device: &str) -> NewOrderRecord {
    NewOrderRecord {
        client_name: client.to_string(),
        device: device.to_string(),
        fault_description: None,
        accessories: None,
        phone: Some("555-0100".to_string()),
        email: None,
        intake_date: intake_date(),
    }
}

/// Intake record with every optional field filled
pub fn full_record(client: &str, device: &str, email: &str) -> NewOrderRecord {
    NewOrderRecord {
        client_name: client.to_string(),
        device: device.to_string(),
        fault_description: Some("Does not boot".to_string()),
        accessories: Some("Charger".to_string()),
        phone: Some("555-0199".to_string()),
        email: Some(email.to_string()),
        intake_date: intake_date(),
    }
}
