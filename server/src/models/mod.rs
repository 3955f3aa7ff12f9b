pub mod reservation;
pub mod ticket_class;

pub use reservation::{NewReservation, Reservation, ReservationStatus, ReserveItem};
pub use ticket_class::{
    NewTicketClass, TicketClass, TicketClassChanges, TicketClassFilter, TicketClassStatus,
};

/// A stored enum column held a value this build does not know.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} status '{value}'")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}
