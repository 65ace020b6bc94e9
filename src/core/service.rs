//! Order service: intake, lifecycle transitions and lookups
//!
//! The service is the only writer of repair orders. It validates input,
//! enforces the `pending → repaired → picked_up` lifecycle and stamps
//! transition dates from its [`Clock`] before handing a typed
//! [`OrderPatch`] to the store.
//!
//! Checks run in a fixed order: input validation, then existence, then
//! lifecycle state. Nothing is written unless all three pass.

use crate::core::clock::Clock;
use crate::core::error::{OrderError, RepairError, RepairResult};
use crate::core::order::{
    ContactUpdate, NewOrder, NewOrderRecord, OrderPatch, OrderStatus, OrderUpdate, PickupDetails,
    RepairDetails, RepairOrder,
};
use crate::core::store::OrderStore;
use crate::core::validation::{FieldValidator, clean_text, clean_update};
use std::sync::Arc;

const CONTACT_REQUIRED: &str = "a phone number or an email address is required";

#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
    clock: Arc<dyn Clock>,
}

impl OrderService {
    pub fn new(store: Arc<dyn OrderStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Arc<dyn OrderStore> {
        &self.store
    }

    /// Register a device at intake
    pub async fn create_order(&self, input: NewOrder) -> RepairResult<RepairOrder> {
        let mut validator = FieldValidator::new();
        let client_name = validator.required_text("client_name", input.client_name);
        let device = validator.required_text("device", input.device);
        let phone = clean_text(input.phone);
        let email = clean_text(input.email);
        validator.check(phone.is_some() || email.is_some(), "phone", CONTACT_REQUIRED);
        validator.finish()?;

        let (Some(client_name), Some(device)) = (client_name, device) else {
            return Err(RepairError::Internal("validated fields missing".to_string()));
        };

        let record = NewOrderRecord {
            client_name,
            device,
            fault_description: clean_text(input.fault_description),
            accessories: clean_text(input.accessories),
            phone,
            email,
            intake_date: self.clock.today(),
        };

        let order = self.store.create(record).await?;
        tracing::info!(order_id = order.id, "order created");
        Ok(order)
    }

    /// Record the repair: `pending → repaired`
    pub async fn mark_repaired(&self, id: u64, details: RepairDetails) -> RepairResult<RepairOrder> {
        let mut validator = FieldValidator::new();
        let cost = validator.money("estimated_cost", details.estimated_cost);
        let note = validator.required_text("technical_note", details.technical_note);
        validator.finish()?;

        let (Some(cost), Some(note)) = (cost, note) else {
            return Err(RepairError::Internal("validated fields missing".to_string()));
        };

        self.require_status(id, OrderStatus::Repaired).await?;

        let patch = OrderPatch::repaired(cost, note, self.clock.today());
        let order = self.store.update(id, patch).await?;
        tracing::info!(order_id = id, cost = %cost, "order marked repaired");
        Ok(order)
    }

    /// Hand the device back: `repaired → picked_up`
    ///
    /// With `same_owner_pickup` the collector name is dropped even if supplied.
    pub async fn mark_picked_up(&self, id: u64, details: PickupDetails) -> RepairResult<RepairOrder> {
        let mut validator = FieldValidator::new();
        let picked_up_by = if details.same_owner_pickup {
            None
        } else {
            validator.required_text("picked_up_by", details.picked_up_by)
        };
        validator.finish()?;

        self.require_status(id, OrderStatus::PickedUp).await?;

        let patch = OrderPatch::picked_up(picked_up_by, details.same_owner_pickup, self.clock.today());
        let order = self.store.update(id, patch).await?;
        tracing::info!(
            order_id = id,
            same_owner = details.same_owner_pickup,
            "order picked up"
        );
        Ok(order)
    }

    /// Correct contact and intake details, in any state
    ///
    /// Absent fields stay as they are; an empty string clears a field. The
    /// order must keep a phone or an email.
    pub async fn edit_contact_info(
        &self,
        id: u64,
        update: ContactUpdate,
    ) -> RepairResult<RepairOrder> {
        let patch = OrderPatch {
            phone: clean_update(update.phone),
            email: clean_update(update.email),
            accessories: clean_update(update.accessories),
            fault_description: clean_update(update.fault_description),
            ..OrderPatch::default()
        };

        let current = self.get_order(id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut preview = current;
        patch.apply_to(&mut preview);
        if !preview.has_contact() {
            return Err(RepairError::field("phone", CONTACT_REQUIRED));
        }

        let order = self.store.update(id, patch).await?;
        tracing::info!(order_id = id, "order contact info edited");
        Ok(order)
    }

    /// Dispatch one of the accepted mutations
    pub async fn apply_update(&self, id: u64, update: OrderUpdate) -> RepairResult<RepairOrder> {
        match update {
            OrderUpdate::MarkRepaired(details) => self.mark_repaired(id, details).await,
            OrderUpdate::MarkPickedUp(details) => self.mark_picked_up(id, details).await,
            OrderUpdate::EditContactInfo(update) => self.edit_contact_info(id, update).await,
        }
    }

    /// Hard-delete an order in any state
    pub async fn delete_order(&self, id: u64) -> RepairResult<u64> {
        let deleted = self.store.delete(id).await?;
        tracing::info!(order_id = id, "order deleted");
        Ok(deleted)
    }

    pub async fn get_order(&self, id: u64) -> RepairResult<RepairOrder> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| RepairError::not_found(id))
    }

    /// Every order, newest first
    pub async fn list_orders(&self) -> RepairResult<Vec<RepairOrder>> {
        self.store.list().await
    }

    /// Search orders; a blank term returns the full listing
    pub async fn search(&self, term: &str) -> RepairResult<Vec<RepairOrder>> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_orders().await;
        }
        self.store.search(term).await
    }

    async fn require_status(&self, id: u64, to: OrderStatus) -> RepairResult<RepairOrder> {
        let order = self.get_order(id).await?;
        if !order.status.can_transition_to(to) {
            tracing::debug!(order_id = id, from = %order.status, to = %to, "transition refused");
            return Err(OrderError::InvalidTransition {
                id,
                from: order.status,
                to,
            }
            .into());
        }
        Ok(order)
    }
}
