//! Capacity ledger: the only code that changes `reserved` and `sold`.
//!
//! Every mutation is a single conditional update inside the caller's transaction, so a
//! claim is durable exactly when the enclosing unit of work commits.

use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::models::TicketClass;
use crate::store::{InventoryStore, StoreTx};
use crate::utils::error::{InventoryError, InventoryResult};

/// Claims `qty` on a ticket class, failing with `InsufficientStock` when
/// `reserved + sold + qty` would exceed `total`.
///
/// `locked` is the row as read under the caller's lock. A request larger than its
/// available count is refused without touching the store.
pub async fn claim<T>(tx: &mut T, locked: &TicketClass, qty: i32) -> InventoryResult<()>
where
    T: StoreTx + ?Sized,
{
    if qty > locked.available() || !tx.claim_capacity(locked.id, qty).await? {
        warn!(
            ticket_class_id = %locked.id,
            available = locked.available(),
            requested = qty,
            "Insufficient stock"
        );
        return Err(InventoryError::InsufficientStock {
            ticket_class_id: locked.id,
            requested: qty,
            available: locked.available(),
        });
    }
    debug!(ticket_class_id = %locked.id, qty, "Claimed capacity");
    Ok(())
}

/// Returns `qty` to available capacity. `reserved` is floored at zero.
pub async fn release<T>(tx: &mut T, ticket_class_id: Uuid, qty: i32) -> InventoryResult<()>
where
    T: StoreTx + ?Sized,
{
    if !tx.release_capacity(ticket_class_id, qty).await? {
        return Err(InventoryError::not_found("ticket class", ticket_class_id));
    }
    debug!(%ticket_class_id, qty, "Released capacity");
    Ok(())
}

/// Moves `qty` from reserved to sold. A failed `reserved >= qty` guard means the
/// counters drifted from the reservation rows and is reported as `InvalidState`.
pub async fn settle<T>(tx: &mut T, ticket_class_id: Uuid, qty: i32) -> InventoryResult<()>
where
    T: StoreTx + ?Sized,
{
    if !tx.settle_capacity(ticket_class_id, qty).await? {
        error!(
            %ticket_class_id,
            needed = qty,
            "Reserved count is below the quantity being settled"
        );
        return Err(InventoryError::InvalidState(format!(
            "ticket class '{ticket_class_id}' has fewer than {qty} reserved tickets"
        )));
    }
    debug!(%ticket_class_id, qty, "Settled capacity");
    Ok(())
}

/// `total - reserved - sold`, read outside any transaction.
pub async fn available_count<S>(store: &S, ticket_class_id: Uuid) -> InventoryResult<i32>
where
    S: InventoryStore + ?Sized,
{
    store
        .ticket_class(ticket_class_id)
        .await?
        .map(|tc| tc.available())
        .ok_or_else(|| InventoryError::not_found("ticket class", ticket_class_id))
}
