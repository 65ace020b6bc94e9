//! Repair order model and its lifecycle
//!
//! A [`RepairOrder`] is created at intake in the [`OrderStatus::Pending`] state
//! and moves forward only: `pending → repaired → picked_up`.
//!
//! Mutations never travel as free-form field maps. The API accepts the closed
//! [`OrderUpdate`] set, and the store receives a typed [`OrderPatch`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a repair order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Device received, waiting for repair
    Pending,
    /// Repair finished, waiting for pickup
    Repaired,
    /// Device handed back to the customer (terminal)
    PickedUp,
}

impl OrderStatus {
    /// Wire name of the status, also used for storage and search
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Repaired => "repaired",
            OrderStatus::PickedUp => "picked_up",
        }
    }

    /// The only state this one may advance to
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Repaired),
            OrderStatus::Repaired => Some(OrderStatus::PickedUp),
            OrderStatus::PickedUp => None,
        }
    }

    /// Whether `self → to` is a legal transition
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        self.next() == Some(to)
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" | "pendiente" => Ok(OrderStatus::Pending),
            "repaired" | "reparado" => Ok(OrderStatus::Repaired),
            "picked_up" | "retirado" => Ok(OrderStatus::PickedUp),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

/// A single repair intake record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairOrder {
    pub id: u64,
    pub client_name: String,
    pub device: String,
    pub fault_description: Option<String>,
    pub accessories: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: OrderStatus,
    pub estimated_cost: Option<Decimal>,
    pub technical_note: Option<String>,
    pub intake_date: NaiveDate,
    pub repaired_date: Option<NaiveDate>,
    pub pickup_date: Option<NaiveDate>,
    pub picked_up_by: Option<String>,
    pub same_owner_pickup: bool,
    pub created_at: DateTime<Utc>,
}

impl RepairOrder {
    /// Build the stored form of a freshly validated intake
    pub fn from_record(id: u64, record: NewOrderRecord) -> Self {
        Self {
            id,
            client_name: record.client_name,
            device: record.device,
            fault_description: record.fault_description,
            accessories: record.accessories,
            phone: record.phone,
            email: record.email,
            status: OrderStatus::Pending,
            estimated_cost: None,
            technical_note: None,
            intake_date: record.intake_date,
            repaired_date: None,
            pickup_date: None,
            picked_up_by: None,
            same_owner_pickup: false,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive substring match over the searchable columns
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        let hit = |value: &str| value.to_lowercase().contains(needle);

        hit(&self.client_name)
            || hit(&self.device)
            || self.phone.as_deref().is_some_and(hit)
            || self.email.as_deref().is_some_and(hit)
            || hit(self.status.as_str())
            || self.technical_note.as_deref().is_some_and(hit)
    }

    pub fn has_contact(&self) -> bool {
        self.phone.is_some() || self.email.is_some()
    }
}

/// Intake payload as received from a caller
///
/// Every field is optional at the type level so that missing fields surface
/// as validation errors rather than parse failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrder {
    pub client_name: Option<String>,
    pub device: Option<String>,
    pub fault_description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub accessories: Option<String>,
}

impl NewOrder {
    pub fn new(client_name: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            client_name: Some(client_name.into()),
            device: Some(device.into()),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_fault(mut self, fault: impl Into<String>) -> Self {
        self.fault_description = Some(fault.into());
        self
    }

    pub fn with_accessories(mut self, accessories: impl Into<String>) -> Self {
        self.accessories = Some(accessories.into());
        self
    }
}

/// Validated intake handed to a store for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderRecord {
    pub client_name: String,
    pub device: String,
    pub fault_description: Option<String>,
    pub accessories: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub intake_date: NaiveDate,
}

/// Input of the `pending → repaired` transition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepairDetails {
    pub estimated_cost: Option<Decimal>,
    pub technical_note: Option<String>,
}

impl RepairDetails {
    pub fn new(estimated_cost: Decimal, technical_note: impl Into<String>) -> Self {
        Self {
            estimated_cost: Some(estimated_cost),
            technical_note: Some(technical_note.into()),
        }
    }
}

/// Input of the `repaired → picked_up` transition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PickupDetails {
    #[serde(default)]
    pub same_owner_pickup: bool,
    pub picked_up_by: Option<String>,
}

impl PickupDetails {
    /// The customer who dropped the device off collects it
    pub fn same_owner() -> Self {
        Self {
            same_owner_pickup: true,
            picked_up_by: None,
        }
    }

    /// Someone else collects the device on the customer's behalf
    pub fn by(name: impl Into<String>) -> Self {
        Self {
            same_owner_pickup: false,
            picked_up_by: Some(name.into()),
        }
    }
}

/// Correction of contact and intake details
///
/// An absent field is left unchanged; `null` or an empty string clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactUpdate {
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub email: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub accessories: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub fault_description: Option<Option<String>>,
}

/// Keep a present key as `Some`, even when its value is `null`
///
/// Absent keys fall back to `None` through `#[serde(default)]`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// The closed set of mutations accepted on an existing order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrderUpdate {
    MarkRepaired(RepairDetails),
    MarkPickedUp(PickupDetails),
    EditContactInfo(ContactUpdate),
}

/// Typed partial update applied by a store
///
/// Outer `None` leaves a column untouched; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub status: Option<OrderStatus>,
    pub estimated_cost: Option<Decimal>,
    pub technical_note: Option<String>,
    pub repaired_date: Option<NaiveDate>,
    pub pickup_date: Option<NaiveDate>,
    pub picked_up_by: Option<Option<String>>,
    pub same_owner_pickup: Option<bool>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub accessories: Option<Option<String>>,
    pub fault_description: Option<Option<String>>,
}

impl OrderPatch {
    pub fn repaired(estimated_cost: Decimal, technical_note: String, date: NaiveDate) -> Self {
        Self {
            status: Some(OrderStatus::Repaired),
            estimated_cost: Some(estimated_cost),
            technical_note: Some(technical_note),
            repaired_date: Some(date),
            ..Self::default()
        }
    }

    pub fn picked_up(picked_up_by: Option<String>, same_owner_pickup: bool, date: NaiveDate) -> Self {
        Self {
            status: Some(OrderStatus::PickedUp),
            pickup_date: Some(date),
            picked_up_by: Some(picked_up_by),
            same_owner_pickup: Some(same_owner_pickup),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, order: &mut RepairOrder) {
        if let Some(status) = self.status {
            order.status = status;
        }
        if let Some(cost) = self.estimated_cost {
            order.estimated_cost = Some(cost);
        }
        if let Some(note) = &self.technical_note {
            order.technical_note = Some(note.clone());
        }
        if let Some(date) = self.repaired_date {
            order.repaired_date = Some(date);
        }
        if let Some(date) = self.pickup_date {
            order.pickup_date = Some(date);
        }
        if let Some(by) = &self.picked_up_by {
            order.picked_up_by = by.clone();
        }
        if let Some(same_owner) = self.same_owner_pickup {
            order.same_owner_pickup = same_owner;
        }
        if let Some(phone) = &self.phone {
            order.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            order.email = email.clone();
        }
        if let Some(accessories) = &self.accessories {
            order.accessories = accessories.clone();
        }
        if let Some(fault) = &self.fault_description {
            order.fault_description = fault.clone();
        }
    }
}
