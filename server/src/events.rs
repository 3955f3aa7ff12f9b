//! Extension point for telling other systems about committed inventory changes.
//!
//! Events are published after the unit of work commits. A failed publish is logged and
//! never rolls back inventory state. Only a tracing-backed publisher ships here; a broker
//! integration plugs in by implementing [`EventPublisher`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryEvent {
    Reserved {
        order_id: Uuid,
        reservation_ids: Vec<Uuid>,
        quantities: BTreeMap<Uuid, i32>,
        expires_at: DateTime<Utc>,
    },
    Confirmed {
        order_id: Uuid,
        reservation_ids: Vec<Uuid>,
        quantities: BTreeMap<Uuid, i32>,
        confirmed_at: DateTime<Utc>,
    },
    Released {
        order_id: Uuid,
        reservation_ids: Vec<Uuid>,
        quantities: BTreeMap<Uuid, i32>,
        released_at: DateTime<Utc>,
    },
    Expired {
        reservation_ids: Vec<Uuid>,
        quantities: BTreeMap<Uuid, i32>,
        expired_at: DateTime<Utc>,
    },
}

impl InventoryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            InventoryEvent::Reserved { .. } => "reservation.reserved",
            InventoryEvent::Confirmed { .. } => "reservation.confirmed",
            InventoryEvent::Released { .. } => "reservation.cancelled",
            InventoryEvent::Expired { .. } => "reservation.expired",
        }
    }

    pub fn reservation_ids(&self) -> &[Uuid] {
        match self {
            InventoryEvent::Reserved {
                reservation_ids, ..
            }
            | InventoryEvent::Confirmed {
                reservation_ids, ..
            }
            | InventoryEvent::Released {
                reservation_ids, ..
            }
            | InventoryEvent::Expired {
                reservation_ids, ..
            } => reservation_ids,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to publish {event}: {reason}")]
pub struct PublishError {
    pub event: &'static str,
    pub reason: String,
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &InventoryEvent) -> Result<(), PublishError>;
}

/// Writes each event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingPublisher;

#[async_trait]
impl EventPublisher for TracingPublisher {
    async fn publish(&self, event: &InventoryEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event).map_err(|e| PublishError {
            event: event.name(),
            reason: e.to_string(),
        })?;
        info!(
            event = event.name(),
            reservations = event.reservation_ids().len(),
            %payload,
            "Inventory event"
        );
        Ok(())
    }
}
