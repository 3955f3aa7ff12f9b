//! Storage collaborator for the inventory core.
//!
//! The core assumes a relational store with row-level pessimistic locks and atomic
//! conditional updates. [`InventoryStore`] is that seam: reads and administrative writes
//! run directly against it, everything that touches capacity runs inside a [`StoreTx`].
//!
//! Two lock modes are exposed as separate primitives:
//!
//! - blocking exclusive locks ([`StoreTx::lock_ticket_class`],
//!   [`StoreTx::lock_order_reservations`]) for claim, confirm and release, which must wait
//!   rather than fail fast;
//! - a non-blocking skip lock ([`StoreTx::lock_expired_reservations`]) for the expiry
//!   sweep, so overlapping sweeps never wait on each other or process a row twice.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Reservation, ReservationStatus, TicketClass, TicketClassFilter};
use crate::utils::error::InventoryResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait InventoryStore: Send + Sync + 'static {
    type Tx: StoreTx;

    /// Starts a unit of work. Dropping the transaction without committing rolls it back.
    async fn begin(&self) -> InventoryResult<Self::Tx>;

    async fn insert_ticket_class(&self, tc: &TicketClass) -> InventoryResult<()>;

    async fn ticket_class(&self, id: Uuid) -> InventoryResult<Option<TicketClass>>;

    async fn ticket_classes(&self, filter: &TicketClassFilter) -> InventoryResult<Vec<TicketClass>>;

    /// Returns `false` when no row existed. Fails with `InvalidState` while reservations
    /// still reference the class.
    async fn delete_ticket_class(&self, id: Uuid) -> InventoryResult<bool>;

    async fn order_reservations(&self, order_id: Uuid) -> InventoryResult<Vec<Reservation>>;
}

#[async_trait]
pub trait StoreTx: Send {
    /// `SELECT ... FOR UPDATE` on one ticket class.
    async fn lock_ticket_class(&mut self, id: Uuid) -> InventoryResult<Option<TicketClass>>;

    /// Writes the administrative fields of a locked class. Counters are never written here.
    async fn update_ticket_class(&mut self, tc: &TicketClass) -> InventoryResult<()>;

    /// `reserved += qty` guarded by `reserved + sold + qty <= total`, as one statement.
    /// Returns whether the guard held.
    async fn claim_capacity(&mut self, id: Uuid, qty: i32) -> InventoryResult<bool>;

    /// `reserved = max(0, reserved - qty)`. Returns whether the class exists.
    async fn release_capacity(&mut self, id: Uuid, qty: i32) -> InventoryResult<bool>;

    /// `reserved -= qty, sold += qty` guarded by `reserved >= qty`.
    /// Returns whether the guard held.
    async fn settle_capacity(&mut self, id: Uuid, qty: i32) -> InventoryResult<bool>;

    /// Fails with `AlreadyExists` if the order already holds this ticket class.
    async fn insert_reservation(&mut self, reservation: &Reservation) -> InventoryResult<()>;

    /// Blocking lock on every row of an order, in id order.
    async fn lock_order_reservations(&mut self, order_id: Uuid) -> InventoryResult<Vec<Reservation>>;

    /// Active rows with `expires_at < now`, oldest first, skipping rows locked elsewhere.
    async fn lock_expired_reservations(
        &mut self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> InventoryResult<Vec<Reservation>>;

    /// Moves `Active` rows to `status`. Rows no longer active are left alone and not counted.
    async fn mark_reservations(
        &mut self,
        ids: &[Uuid],
        status: ReservationStatus,
        now: DateTime<Utc>,
    ) -> InventoryResult<u64>;

    async fn delete_order_reservations(&mut self, order_id: Uuid) -> InventoryResult<u64>;

    async fn commit(self) -> InventoryResult<()>;
}
