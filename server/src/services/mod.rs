pub mod availability;
pub mod ledger;
pub mod reservation;
pub mod ticket_class;

pub use availability::AvailabilityService;
pub use reservation::ReservationEngine;
pub use ticket_class::TicketClassService;
