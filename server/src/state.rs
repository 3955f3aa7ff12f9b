use std::sync::Arc;

use crate::clock::Clock;
use crate::events::EventPublisher;
use crate::services::{AvailabilityService, ReservationEngine, TicketClassService};
use crate::store::InventoryStore;

/// Shared handler state. Services are reference-counted so cloning per request is cheap.
pub struct AppState<S: InventoryStore> {
    pub ticket_classes: Arc<TicketClassService<S>>,
    pub reservations: Arc<ReservationEngine<S>>,
    pub availability: Arc<AvailabilityService<S>>,
}

impl<S: InventoryStore> AppState<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            ticket_classes: Arc::new(
                TicketClassService::new(store.clone()).with_clock(clock.clone()),
            ),
            reservations: Arc::new(
                ReservationEngine::new(store.clone())
                    .with_clock(clock)
                    .with_publisher(publisher),
            ),
            availability: Arc::new(AvailabilityService::new(store)),
        }
    }
}

impl<S: InventoryStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            ticket_classes: self.ticket_classes.clone(),
            reservations: self.reservations.clone(),
            availability: self.availability.clone(),
        }
    }
}
