//! Read-only capacity queries.
//!
//! Both answers are snapshots taken outside any transaction. A `true` from
//! [`AvailabilityService::check_availability`] is not a hold: a reserve issued right
//! after it can still fail with `InsufficientStock`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::models::{ReserveItem, TicketClassFilter};
use crate::services::ledger;
use crate::store::InventoryStore;
use crate::utils::error::{InventoryError, InventoryResult};

pub struct AvailabilityService<S: InventoryStore> {
    store: Arc<S>,
}

impl<S: InventoryStore> AvailabilityService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn available_count(&self, ticket_class_id: Uuid) -> InventoryResult<i32> {
        ledger::available_count(self.store.as_ref(), ticket_class_id).await
    }

    /// `true` only if every listed class exists and currently has enough left.
    pub async fn check_availability(&self, items: &[ReserveItem]) -> InventoryResult<bool> {
        let mut wanted: BTreeMap<Uuid, i32> = BTreeMap::new();
        for item in items {
            if item.qty <= 0 {
                return Err(InventoryError::Validation(format!(
                    "qty for ticket class '{}' must be positive",
                    item.ticket_class_id
                )));
            }
            let qty = wanted.entry(item.ticket_class_id).or_insert(0);
            match qty.checked_add(item.qty) {
                Some(sum) => *qty = sum,
                None => {
                    debug!(
                        ticket_class_id = %item.ticket_class_id,
                        "Requested quantity exceeds any capacity"
                    );
                    return Ok(false);
                }
            }
        }
        if wanted.is_empty() {
            return Ok(true);
        }

        let filter = TicketClassFilter {
            event_id: None,
            ids: wanted.keys().copied().collect(),
        };
        let found = self.store.ticket_classes(&filter).await?;
        if found.len() != wanted.len() {
            debug!(
                requested = wanted.len(),
                found = found.len(),
                "Availability check references unknown ticket classes"
            );
            return Ok(false);
        }

        for tc in &found {
            let requested = wanted.get(&tc.id).copied().unwrap_or(0);
            if tc.available() < requested {
                debug!(
                    ticket_class_id = %tc.id,
                    available = tc.available(),
                    requested,
                    "Availability check short"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }
}
