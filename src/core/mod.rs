//! Core domain: repair orders, their lifecycle and the service enforcing it

pub mod clock;
pub mod error;
pub mod order;
pub mod service;
pub mod store;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{
    AuthError, ConfigError, OrderError, RepairError, RepairResult, StorageError, ValidationError,
};
pub use order::{
    ContactUpdate, NewOrder, NewOrderRecord, OrderPatch, OrderStatus, OrderUpdate, PickupDetails,
    RepairDetails, RepairOrder,
};
pub use service::OrderService;
pub use store::OrderStore;
