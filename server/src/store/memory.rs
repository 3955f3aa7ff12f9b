use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{InventoryStore, StoreTx};
use crate::models::{Reservation, ReservationStatus, TicketClass, TicketClassFilter};
use crate::utils::error::{InventoryError, InventoryResult};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    ticket_classes: HashMap<Uuid, TicketClass>,
    reservations: HashMap<Uuid, Reservation>,
}

impl MemoryState {
    fn check_unique_name(&self, tc: &TicketClass) -> InventoryResult<()> {
        let taken = self
            .ticket_classes
            .values()
            .any(|other| other.id != tc.id && other.event_id == tc.event_id && other.name == tc.name);
        if taken {
            return Err(InventoryError::AlreadyExists(
                "ticket_classes_event_id_name_key".to_string(),
            ));
        }
        Ok(())
    }
}

/// In-process store with the same contract as [`super::PgStore`].
///
/// A transaction holds the whole store for its lifetime, so units of work are fully
/// serialised. Uncommitted changes are undone when the transaction is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> InventoryResult<MemoryTx> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let snapshot = guard.clone();
        Ok(MemoryTx {
            guard,
            snapshot: Some(snapshot),
        })
    }

    async fn insert_ticket_class(&self, tc: &TicketClass) -> InventoryResult<()> {
        let mut state = self.state.lock().await;
        state.check_unique_name(tc)?;
        state.ticket_classes.insert(tc.id, tc.clone());
        Ok(())
    }

    async fn ticket_class(&self, id: Uuid) -> InventoryResult<Option<TicketClass>> {
        Ok(self.state.lock().await.ticket_classes.get(&id).cloned())
    }

    async fn ticket_classes(&self, filter: &TicketClassFilter) -> InventoryResult<Vec<TicketClass>> {
        let state = self.state.lock().await;
        let mut tcs: Vec<TicketClass> = state
            .ticket_classes
            .values()
            .filter(|tc| filter.matches(tc))
            .cloned()
            .collect();
        tcs.sort_by_key(|tc| (tc.created_at, tc.id));
        Ok(tcs)
    }

    async fn delete_ticket_class(&self, id: Uuid) -> InventoryResult<bool> {
        let mut state = self.state.lock().await;
        if state.reservations.values().any(|r| r.ticket_class_id == id) {
            return Err(InventoryError::InvalidState(
                "row is still referenced by reservations".to_string(),
            ));
        }
        Ok(state.ticket_classes.remove(&id).is_some())
    }

    async fn order_reservations(&self, order_id: Uuid) -> InventoryResult<Vec<Reservation>> {
        let state = self.state.lock().await;
        let mut rows: Vec<Reservation> = state
            .reservations
            .values()
            .filter(|r| r.order_id == order_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        Ok(rows)
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    snapshot: Option<MemoryState>,
}

impl MemoryTx {
    fn class_mut(&mut self, id: Uuid) -> Option<&mut TicketClass> {
        self.guard.ticket_classes.get_mut(&id)
    }
}

impl Drop for MemoryTx {
    fn drop(&mut self) {
        // rollback
        if let Some(snapshot) = self.snapshot.take() {
            *self.guard = snapshot;
        }
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_ticket_class(&mut self, id: Uuid) -> InventoryResult<Option<TicketClass>> {
        Ok(self.guard.ticket_classes.get(&id).cloned())
    }

    async fn update_ticket_class(&mut self, tc: &TicketClass) -> InventoryResult<()> {
        self.guard.check_unique_name(tc)?;
        let Some(current) = self.class_mut(tc.id) else {
            return Err(InventoryError::not_found("ticket class", tc.id));
        };
        if current.reserved + current.sold > tc.total {
            return Err(InventoryError::InvalidState(format!(
                "ticket class '{}' cannot be updated to total {}",
                tc.id, tc.total
            )));
        }
        current.name = tc.name.clone();
        current.price = tc.price;
        current.currency = tc.currency.clone();
        current.total = tc.total;
        current.sale_start_at = tc.sale_start_at;
        current.sale_end_at = tc.sale_end_at;
        current.status = tc.status;
        current.updated_at = tc.updated_at;
        Ok(())
    }

    async fn claim_capacity(&mut self, id: Uuid, qty: i32) -> InventoryResult<bool> {
        match self.class_mut(id) {
            Some(tc) if tc.total - tc.reserved - tc.sold >= qty => {
                tc.reserved += qty;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_capacity(&mut self, id: Uuid, qty: i32) -> InventoryResult<bool> {
        match self.class_mut(id) {
            Some(tc) => {
                tc.reserved = (tc.reserved - qty).max(0);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn settle_capacity(&mut self, id: Uuid, qty: i32) -> InventoryResult<bool> {
        match self.class_mut(id) {
            Some(tc) if tc.reserved >= qty => {
                tc.reserved -= qty;
                tc.sold += qty;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_reservation(&mut self, reservation: &Reservation) -> InventoryResult<()> {
        if !self
            .guard
            .ticket_classes
            .contains_key(&reservation.ticket_class_id)
        {
            return Err(InventoryError::not_found(
                "ticket class",
                reservation.ticket_class_id,
            ));
        }
        let duplicate = self.guard.reservations.values().any(|r| {
            r.order_id == reservation.order_id && r.ticket_class_id == reservation.ticket_class_id
        });
        if duplicate {
            return Err(InventoryError::AlreadyExists(
                "reservations_order_id_ticket_class_id_key".to_string(),
            ));
        }
        self.guard
            .reservations
            .insert(reservation.id, reservation.clone());
        Ok(())
    }

    async fn lock_order_reservations(&mut self, order_id: Uuid) -> InventoryResult<Vec<Reservation>> {
        let mut rows: Vec<Reservation> = self
            .guard
            .reservations
            .values()
            .filter(|r| r.order_id == order_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn lock_expired_reservations(
        &mut self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> InventoryResult<Vec<Reservation>> {
        let mut rows: Vec<Reservation> = self
            .guard
            .reservations
            .values()
            .filter(|r| r.status == ReservationStatus::Active && r.expires_at < now)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.expires_at, r.id));
        rows.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(rows)
    }

    async fn mark_reservations(
        &mut self,
        ids: &[Uuid],
        status: ReservationStatus,
        now: DateTime<Utc>,
    ) -> InventoryResult<u64> {
        let mut updated = 0;
        for id in ids {
            if let Some(r) = self.guard.reservations.get_mut(id) {
                if r.status.can_transition_to(status) {
                    r.status = status;
                    r.updated_at = now;
                    updated += 1;
                }
            }
        }
        Ok(updated)
    }

    async fn delete_order_reservations(&mut self, order_id: Uuid) -> InventoryResult<u64> {
        let before = self.guard.reservations.len();
        self.guard.reservations.retain(|_, r| r.order_id != order_id);
        Ok((before - self.guard.reservations.len()) as u64)
    }

    async fn commit(mut self) -> InventoryResult<()> {
        self.snapshot = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewReservation, NewTicketClass};
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn ticket_class(total: i32) -> TicketClass {
        NewTicketClass {
            event_id: Uuid::new_v4(),
            name: "General Admission".to_string(),
            price: Decimal::new(5_000, 2),
            currency: "EUR".to_string(),
            total,
            sale_start_at: None,
            sale_end_at: None,
        }
        .into_ticket_class(Utc::now())
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let store = MemoryStore::new();
        let tc = ticket_class(10);
        store.insert_ticket_class(&tc).await.unwrap();

        {
            let mut tx = store.begin().await.unwrap();
            assert!(tx.claim_capacity(tc.id, 4).await.unwrap());
        }

        let after = store.ticket_class(tc.id).await.unwrap().unwrap();
        assert_eq!(after.reserved, 0);

        let mut tx = store.begin().await.unwrap();
        assert!(tx.claim_capacity(tc.id, 4).await.unwrap());
        tx.commit().await.unwrap();

        let after = store.ticket_class(tc.id).await.unwrap().unwrap();
        assert_eq!(after.reserved, 4);
    }

    #[tokio::test]
    async fn test_capacity_guards() {
        let store = MemoryStore::new();
        let tc = ticket_class(5);
        store.insert_ticket_class(&tc).await.unwrap();

        let mut tx = store.begin().await.unwrap();
        assert!(tx.claim_capacity(tc.id, 5).await.unwrap());
        assert!(!tx.claim_capacity(tc.id, 1).await.unwrap());
        assert!(!tx.settle_capacity(tc.id, 6).await.unwrap());
        assert!(tx.settle_capacity(tc.id, 2).await.unwrap());
        assert!(tx.release_capacity(tc.id, 100).await.unwrap());
        assert!(!tx.release_capacity(Uuid::new_v4(), 1).await.unwrap());
        tx.commit().await.unwrap();

        let after = store.ticket_class(tc.id).await.unwrap().unwrap();
        assert_eq!((after.reserved, after.sold), (0, 2));
    }

    #[tokio::test]
    async fn test_reservation_uniqueness_and_restrict_on_delete() {
        let store = MemoryStore::new();
        let tc = ticket_class(5);
        store.insert_ticket_class(&tc).await.unwrap();
        let order_id = Uuid::new_v4();
        let new = NewReservation {
            order_id,
            ticket_class_id: tc.id,
            qty: 1,
            expires_at: Utc::now() + Duration::minutes(10),
        };

        let mut tx = store.begin().await.unwrap();
        tx.insert_reservation(&new.clone().into_reservation(Utc::now()))
            .await
            .unwrap();
        let err = tx
            .insert_reservation(&new.into_reservation(Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::AlreadyExists(_)));
        tx.commit().await.unwrap();

        let err = store.delete_ticket_class(tc.id).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_expired_scan_is_oldest_first_and_bounded() {
        let store = MemoryStore::new();
        let tc = ticket_class(10);
        store.insert_ticket_class(&tc).await.unwrap();
        let now = Utc::now();

        let mut tx = store.begin().await.unwrap();
        for minutes in [3, 1, 2] {
            let r = NewReservation {
                order_id: Uuid::new_v4(),
                ticket_class_id: tc.id,
                qty: 1,
                expires_at: now - Duration::minutes(minutes),
            }
            .into_reservation(now);
            tx.insert_reservation(&r).await.unwrap();
        }

        let rows = tx.lock_expired_reservations(now, 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].expires_at, now - Duration::minutes(3));
        assert_eq!(rows[1].expires_at, now - Duration::minutes(2));
    }
}
