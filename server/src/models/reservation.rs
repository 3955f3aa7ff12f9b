use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::UnknownStatus;

/// Hold lifecycle. `Active` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Active,
    Confirmed,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Active => "ACTIVE",
            ReservationStatus::Confirmed => "CONFIRMED",
            ReservationStatus::Cancelled => "CANCELLED",
            ReservationStatus::Expired => "EXPIRED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReservationStatus::Active)
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        *self == ReservationStatus::Active && next.is_terminal()
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "ACTIVE" => Ok(ReservationStatus::Active),
            "CONFIRMED" => Ok(ReservationStatus::Confirmed),
            "CANCELLED" => Ok(ReservationStatus::Cancelled),
            "EXPIRED" => Ok(ReservationStatus::Expired),
            _ => Err(UnknownStatus {
                kind: "reservation",
                value,
            }),
        }
    }
}

/// One ticket-class line of an order's hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub order_id: Uuid,
    pub ticket_class_id: Uuid,
    pub qty: i32,
    pub expires_at: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub order_id: Uuid,
    pub ticket_class_id: Uuid,
    pub qty: i32,
    pub expires_at: DateTime<Utc>,
}

impl NewReservation {
    pub fn into_reservation(self, now: DateTime<Utc>) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            order_id: self.order_id,
            ticket_class_id: self.ticket_class_id,
            qty: self.qty,
            expires_at: self.expires_at,
            status: ReservationStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveItem {
    pub ticket_class_id: Uuid,
    pub qty: i32,
}

impl ReserveItem {
    pub fn new(ticket_class_id: Uuid, qty: i32) -> Self {
        Self {
            ticket_class_id,
            qty,
        }
    }
}
