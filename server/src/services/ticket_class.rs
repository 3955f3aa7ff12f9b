use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::models::{NewTicketClass, TicketClass, TicketClassChanges, TicketClassFilter};
use crate::store::{InventoryStore, StoreTx};
use crate::utils::error::{InventoryError, InventoryResult};

/// Administrative setup of ticket classes. Capacity counters are never touched here.
pub struct TicketClassService<S: InventoryStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: InventoryStore> TicketClassService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub async fn create(&self, input: NewTicketClass) -> InventoryResult<TicketClass> {
        input.validate()?;
        let tc = input.into_ticket_class(self.clock.now());
        self.store.insert_ticket_class(&tc).await?;

        info!(
            ticket_class_id = %tc.id,
            event_id = %tc.event_id,
            name = %tc.name,
            total = tc.total,
            "Created ticket class"
        );
        Ok(tc)
    }

    /// Applies `changes` under the row lock, so a shrinking `total` is checked against
    /// counters no concurrent claim can move.
    pub async fn update(&self, id: Uuid, changes: TicketClassChanges) -> InventoryResult<TicketClass> {
        changes.validate()?;

        let mut tx = self.store.begin().await?;
        let mut tc = tx
            .lock_ticket_class(id)
            .await?
            .ok_or_else(|| InventoryError::not_found("ticket class", id))?;
        changes.apply(&mut tc, self.clock.now())?;
        tx.update_ticket_class(&tc).await?;
        tx.commit().await?;

        info!(ticket_class_id = %id, total = tc.total, status = tc.status.as_str(), "Updated ticket class");
        Ok(tc)
    }

    pub async fn get(&self, id: Uuid) -> InventoryResult<TicketClass> {
        self.store
            .ticket_class(id)
            .await?
            .ok_or_else(|| InventoryError::not_found("ticket class", id))
    }

    pub async fn list(&self, filter: &TicketClassFilter) -> InventoryResult<Vec<TicketClass>> {
        self.store.ticket_classes(filter).await
    }

    /// Deleting a missing class is a no-op. Classes still referenced by reservations
    /// cannot be deleted.
    pub async fn delete(&self, id: Uuid) -> InventoryResult<()> {
        if self.store.delete_ticket_class(id).await? {
            info!(ticket_class_id = %id, "Deleted ticket class");
        } else {
            warn!(ticket_class_id = %id, "Ticket class to delete was not found");
        }
        Ok(())
    }
}
