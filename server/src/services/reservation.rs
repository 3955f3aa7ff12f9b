//! Reservation lifecycle engine.
//!
//! Every operation is one unit of work: the status guard ("must be ACTIVE") and the
//! capacity mutation commit together or not at all. Multi-item reserves run all items in
//! a single transaction, in ascending ticket-class order, so a failure on any item leaves
//! no hold behind and concurrent multi-item reserves lock rows in a consistent order.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::events::{EventPublisher, InventoryEvent, TracingPublisher};
use crate::models::{NewReservation, Reservation, ReservationStatus, ReserveItem};
use crate::services::ledger;
use crate::store::{InventoryStore, StoreTx};
use crate::utils::error::{InventoryError, InventoryResult};

pub const DEFAULT_EXPIRY_BATCH_SIZE: i64 = 500;
pub const MAX_EXPIRY_BATCH_SIZE: i64 = 1000;

pub struct ReservationEngine<S: InventoryStore> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    publisher: Arc<dyn EventPublisher>,
}

impl<S: InventoryStore> ReservationEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            publisher: Arc::new(TracingPublisher),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Holds every item for `order_id` until `expires_at`, or nothing at all.
    ///
    /// Duplicate ticket classes in `items` are merged into one line.
    pub async fn reserve(
        &self,
        order_id: Uuid,
        items: &[ReserveItem],
        expires_at: DateTime<Utc>,
    ) -> InventoryResult<Vec<Reservation>> {
        let now = self.clock.now();
        let quantities = merge_items(order_id, items)?;
        if expires_at <= now {
            return Err(InventoryError::Validation(
                "expires_at must be in the future".into(),
            ));
        }

        let created = self
            .reserve_tx(order_id, &quantities, expires_at, now)
            .await
            .map_err(|e| report("reserve", Some(order_id), e))?;

        info!(
            %order_id,
            reservations = created.len(),
            total_qty = quantities.values().sum::<i32>(),
            %expires_at,
            "Reserved order"
        );
        self.publish(InventoryEvent::Reserved {
            order_id,
            reservation_ids: created.iter().map(|r| r.id).collect(),
            quantities,
            expires_at,
        })
        .await;

        Ok(created)
    }

    async fn reserve_tx(
        &self,
        order_id: Uuid,
        quantities: &BTreeMap<Uuid, i32>,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> InventoryResult<Vec<Reservation>> {
        let mut tx = self.store.begin().await?;
        let mut created = Vec::with_capacity(quantities.len());

        for (&ticket_class_id, &qty) in quantities {
            let tc = tx
                .lock_ticket_class(ticket_class_id)
                .await?
                .ok_or_else(|| InventoryError::not_found("ticket class", ticket_class_id))?;
            if !tc.is_on_sale(now) {
                return Err(InventoryError::Validation(format!(
                    "ticket class '{ticket_class_id}' is not on sale"
                )));
            }

            ledger::claim(&mut tx, &tc, qty).await?;

            let reservation = NewReservation {
                order_id,
                ticket_class_id,
                qty,
                expires_at,
            }
            .into_reservation(now);
            tx.insert_reservation(&reservation).await?;
            debug!(%order_id, %ticket_class_id, qty, reservation_id = %reservation.id, "Created reservation");
            created.push(reservation);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Converts every hold of the order into a sale.
    pub async fn confirm(&self, order_id: Uuid) -> InventoryResult<Vec<Reservation>> {
        let now = self.clock.now();
        let (rows, quantities) = self
            .resolve_order(order_id, ReservationStatus::Confirmed, now)
            .await
            .map_err(|e| report("confirm", Some(order_id), e))?;

        info!(%order_id, reservations = rows.len(), "Confirmed order");
        self.publish(InventoryEvent::Confirmed {
            order_id,
            reservation_ids: rows.iter().map(|r| r.id).collect(),
            quantities,
            confirmed_at: now,
        })
        .await;

        Ok(rows)
    }

    /// Abandons every hold of the order, returning its capacity.
    pub async fn release(&self, order_id: Uuid) -> InventoryResult<Vec<Reservation>> {
        let now = self.clock.now();
        let (rows, quantities) = self
            .resolve_order(order_id, ReservationStatus::Cancelled, now)
            .await
            .map_err(|e| report("release", Some(order_id), e))?;

        info!(
            %order_id,
            reservations = rows.len(),
            total_qty = quantities.values().sum::<i32>(),
            "Released order"
        );
        self.publish(InventoryEvent::Released {
            order_id,
            reservation_ids: rows.iter().map(|r| r.id).collect(),
            quantities,
            released_at: now,
        })
        .await;

        Ok(rows)
    }

    /// Shared body of confirm and release: lock the order, check every row, move the
    /// capacity per ticket class, then flip the rows.
    async fn resolve_order(
        &self,
        order_id: Uuid,
        target: ReservationStatus,
        now: DateTime<Utc>,
    ) -> InventoryResult<(Vec<Reservation>, BTreeMap<Uuid, i32>)> {
        let mut tx = self.store.begin().await?;
        let mut rows = tx.lock_order_reservations(order_id).await?;
        if rows.is_empty() {
            return Err(InventoryError::not_found("order", order_id));
        }

        for r in &rows {
            if !r.status.can_transition_to(target) {
                return Err(InventoryError::InvalidState(format!(
                    "reservation '{}' is {}",
                    r.id, r.status
                )));
            }
            if target == ReservationStatus::Confirmed && r.is_past_deadline(now) {
                return Err(InventoryError::InvalidState(format!(
                    "reservation '{}' expired at {}",
                    r.id, r.expires_at
                )));
            }
        }

        let quantities = quantities_by_class(&rows);
        for (&ticket_class_id, &qty) in &quantities {
            match target {
                ReservationStatus::Confirmed => ledger::settle(&mut tx, ticket_class_id, qty).await?,
                _ => ledger::release(&mut tx, ticket_class_id, qty).await?,
            }
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        transition(&mut tx, &ids, target, now).await?;
        tx.commit().await?;

        for r in &mut rows {
            r.status = target;
            r.updated_at = now;
        }
        Ok((rows, quantities))
    }

    /// Expires up to `batch_size` overdue holds, oldest first, and returns how many.
    ///
    /// Rows locked by a concurrent sweep are skipped rather than waited on. Sizes outside
    /// `1..=1000` fall back to 500.
    pub async fn batch_expire_reservations(&self, batch_size: i64) -> InventoryResult<usize> {
        let limit = clamp_batch_size(batch_size);
        let now = self.clock.now();

        let expired = self
            .expire_tx(limit, now)
            .await
            .map_err(|e| report("batch_expire", None, e))?;

        let Some((ids, quantities)) = expired else {
            debug!("No expired reservations found");
            return Ok(0);
        };

        info!(
            expired = ids.len(),
            ticket_classes = quantities.len(),
            "Expired reservations"
        );
        let count = ids.len();
        self.publish(InventoryEvent::Expired {
            reservation_ids: ids,
            quantities,
            expired_at: now,
        })
        .await;

        Ok(count)
    }

    async fn expire_tx(
        &self,
        limit: i64,
        now: DateTime<Utc>,
    ) -> InventoryResult<Option<(Vec<Uuid>, BTreeMap<Uuid, i32>)>> {
        let mut tx = self.store.begin().await?;
        let rows = tx.lock_expired_reservations(now, limit).await?;
        if rows.is_empty() {
            return Ok(None);
        }
        debug!(
            found = rows.len(),
            oldest = %rows[0].expires_at,
            "Locked expired reservations"
        );

        let quantities = quantities_by_class(&rows);
        for (&ticket_class_id, &qty) in &quantities {
            ledger::release(&mut tx, ticket_class_id, qty).await?;
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        transition(&mut tx, &ids, ReservationStatus::Expired, now).await?;
        tx.commit().await?;

        Ok(Some((ids, quantities)))
    }

    pub async fn reservations_for_order(&self, order_id: Uuid) -> InventoryResult<Vec<Reservation>> {
        let rows = self.store.order_reservations(order_id).await?;
        if rows.is_empty() {
            return Err(InventoryError::not_found("order", order_id));
        }
        Ok(rows)
    }

    /// Administrative delete of an order's rows. Live holds must be released first.
    pub async fn purge_order(&self, order_id: Uuid) -> InventoryResult<u64> {
        let purged = self
            .purge_tx(order_id)
            .await
            .map_err(|e| report("purge", Some(order_id), e))?;
        info!(%order_id, purged, "Purged order reservations");
        Ok(purged)
    }

    async fn purge_tx(&self, order_id: Uuid) -> InventoryResult<u64> {
        let mut tx = self.store.begin().await?;
        let rows = tx.lock_order_reservations(order_id).await?;
        if rows.is_empty() {
            return Err(InventoryError::not_found("order", order_id));
        }
        if let Some(active) = rows.iter().find(|r| r.status == ReservationStatus::Active) {
            return Err(InventoryError::InvalidState(format!(
                "reservation '{}' is still ACTIVE",
                active.id
            )));
        }
        let purged = tx.delete_order_reservations(order_id).await?;
        tx.commit().await?;
        Ok(purged)
    }

    async fn publish(&self, event: InventoryEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            error!(error = %e, event = event.name(), "Failed to publish inventory event");
        }
    }
}

pub fn clamp_batch_size(batch_size: i64) -> i64 {
    if (1..=MAX_EXPIRY_BATCH_SIZE).contains(&batch_size) {
        batch_size
    } else {
        DEFAULT_EXPIRY_BATCH_SIZE
    }
}

/// Validates a reserve request and folds it into per-class quantities.
fn merge_items(order_id: Uuid, items: &[ReserveItem]) -> InventoryResult<BTreeMap<Uuid, i32>> {
    if order_id.is_nil() {
        return Err(InventoryError::Validation("order_id is required".into()));
    }
    if items.is_empty() {
        return Err(InventoryError::Validation("items must not be empty".into()));
    }

    let mut quantities = BTreeMap::new();
    for item in items {
        if item.ticket_class_id.is_nil() {
            return Err(InventoryError::Validation(
                "ticket_class_id is required".into(),
            ));
        }
        if item.qty <= 0 {
            return Err(InventoryError::Validation(format!(
                "qty for ticket class '{}' must be positive",
                item.ticket_class_id
            )));
        }
        let qty = quantities.entry(item.ticket_class_id).or_insert(0i32);
        *qty = qty
            .checked_add(item.qty)
            .ok_or_else(|| InventoryError::Validation("qty is too large".into()))?;
    }
    Ok(quantities)
}

fn quantities_by_class(rows: &[Reservation]) -> BTreeMap<Uuid, i32> {
    let mut quantities = BTreeMap::new();
    for r in rows {
        *quantities.entry(r.ticket_class_id).or_insert(0) += r.qty;
    }
    quantities
}

async fn transition<T>(
    tx: &mut T,
    ids: &[Uuid],
    status: ReservationStatus,
    now: DateTime<Utc>,
) -> InventoryResult<()>
where
    T: StoreTx + ?Sized,
{
    let updated = tx.mark_reservations(ids, status, now).await?;
    if updated != ids.len() as u64 {
        return Err(InventoryError::InvalidState(format!(
            "expected to mark {} reservations {status}, marked {updated}",
            ids.len()
        )));
    }
    Ok(())
}

fn report(op: &'static str, order_id: Option<Uuid>, err: InventoryError) -> InventoryError {
    if err.is_business_outcome() {
        warn!(op, order_id = ?order_id, error = %err, "Reservation operation rejected");
    } else {
        error!(op, order_id = ?order_id, error = ?err, "Reservation operation failed");
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::{NewTicketClass, TicketClass, TicketClassStatus};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::Duration;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    use crate::events::PublishError;

    #[derive(Default)]
    struct RecordingPublisher {
        events: Mutex<Vec<InventoryEvent>>,
    }

    impl RecordingPublisher {
        fn names(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().iter().map(|e| e.name()).collect()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: &InventoryEvent) -> Result<(), PublishError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    struct Fixture {
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        publisher: Arc<RecordingPublisher>,
        engine: ReservationEngine<MemoryStore>,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let clock = Arc::new(ManualClock::new(Utc::now()));
            let publisher = Arc::new(RecordingPublisher::default());
            let engine = ReservationEngine::new(Arc::clone(&store))
                .with_clock(clock.clone())
                .with_publisher(publisher.clone());
            Self {
                store,
                clock,
                publisher,
                engine,
            }
        }

        async fn ticket_class(&self, name: &str, total: i32) -> TicketClass {
            let tc = NewTicketClass {
                event_id: Uuid::new_v4(),
                name: name.to_string(),
                price: Decimal::new(4_200, 2),
                currency: "USD".to_string(),
                total,
                sale_start_at: None,
                sale_end_at: None,
            }
            .into_ticket_class(self.clock.now());
            self.store.insert_ticket_class(&tc).await.unwrap();
            tc
        }

        async fn counters(&self, id: Uuid) -> (i32, i32) {
            let tc = self.store.ticket_class(id).await.unwrap().unwrap();
            (tc.reserved, tc.sold)
        }

        fn deadline(&self) -> DateTime<Utc> {
            self.clock.now() + Duration::minutes(15)
        }
    }

    #[tokio::test]
    async fn test_reserve_rejects_malformed_requests() {
        let fx = Fixture::new();
        let tc = fx.ticket_class("GA", 10).await;
        let order = Uuid::new_v4();

        let err = fx.engine.reserve(order, &[], fx.deadline()).await.unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));

        let err = fx
            .engine
            .reserve(order, &[ReserveItem::new(tc.id, 0)], fx.deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));

        let err = fx
            .engine
            .reserve(order, &[ReserveItem::new(tc.id, 1)], fx.clock.now())
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));

        let err = fx
            .engine
            .reserve(order, &[ReserveItem::new(Uuid::new_v4(), 1)], fx.deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(_)));

        assert_eq!(fx.counters(tc.id).await, (0, 0));
    }

    #[tokio::test]
    async fn test_sold_out_then_release_frees_capacity() {
        let fx = Fixture::new();
        let tc = fx.ticket_class("GA", 10).await;
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        fx.engine
            .reserve(a, &[ReserveItem::new(tc.id, 10)], fx.deadline())
            .await
            .unwrap();
        let err = fx
            .engine
            .reserve(b, &[ReserveItem::new(tc.id, 1)], fx.deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::InsufficientStock { available: 0, .. }));

        fx.engine.release(a).await.unwrap();
        assert_eq!(fx.counters(tc.id).await, (0, 0));

        fx.engine
            .reserve(b, &[ReserveItem::new(tc.id, 1)], fx.deadline())
            .await
            .unwrap();
        assert_eq!(fx.counters(tc.id).await, (1, 0));
    }

    #[tokio::test]
    async fn test_multi_item_failure_leaves_no_partial_hold() {
        let fx = Fixture::new();
        let tc1 = fx.ticket_class("Floor", 10).await;
        let tc2 = fx.ticket_class("Box", 5).await;
        let order = Uuid::new_v4();

        let err = fx
            .engine
            .reserve(
                order,
                &[ReserveItem::new(tc1.id, 3), ReserveItem::new(tc2.id, 999_999)],
                fx.deadline(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::InsufficientStock { .. }));

        assert_eq!(fx.counters(tc1.id).await, (0, 0));
        assert_eq!(fx.counters(tc2.id).await, (0, 0));
        assert!(matches!(
            fx.engine.reservations_for_order(order).await,
            Err(InventoryError::NotFound(_))
        ));
        assert!(fx.publisher.names().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_items_are_merged_and_repeat_holds_rejected() {
        let fx = Fixture::new();
        let tc = fx.ticket_class("GA", 10).await;
        let order = Uuid::new_v4();

        let rows = fx
            .engine
            .reserve(
                order,
                &[ReserveItem::new(tc.id, 2), ReserveItem::new(tc.id, 3)],
                fx.deadline(),
            )
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].qty, 5);

        let err = fx
            .engine
            .reserve(order, &[ReserveItem::new(tc.id, 1)], fx.deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::AlreadyExists(_)));
        assert_eq!(fx.counters(tc.id).await, (5, 0));
    }

    #[tokio::test]
    async fn test_reserve_requires_class_on_sale() {
        let fx = Fixture::new();
        let mut tc = fx.ticket_class("Presale", 10).await;
        tc.status = TicketClassStatus::Inactive;
        let mut tx = fx.store.begin().await.unwrap();
        tx.update_ticket_class(&tc).await.unwrap();
        tx.commit().await.unwrap();

        let err = fx
            .engine
            .reserve(Uuid::new_v4(), &[ReserveItem::new(tc.id, 1)], fx.deadline())
            .await
            .unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
    }

    #[tokio::test]
    async fn test_confirm_twice_settles_once() {
        let fx = Fixture::new();
        let tc = fx.ticket_class("GA", 10).await;
        let order = Uuid::new_v4();
        fx.engine
            .reserve(order, &[ReserveItem::new(tc.id, 4)], fx.deadline())
            .await
            .unwrap();

        let rows = fx.engine.confirm(order).await.unwrap();
        assert!(rows.iter().all(|r| r.status == ReservationStatus::Confirmed));
        assert_eq!(fx.counters(tc.id).await, (0, 4));

        let err = fx.engine.confirm(order).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidState(_)));
        assert_eq!(fx.counters(tc.id).await, (0, 4));

        let err = fx.engine.release(order).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidState(_)));
        assert_eq!(fx.counters(tc.id).await, (0, 4));

        assert_eq!(
            fx.publisher.names(),
            vec!["reservation.reserved", "reservation.confirmed"]
        );
    }

    #[tokio::test]
    async fn test_confirm_past_deadline_is_rejected_whole() {
        let fx = Fixture::new();
        let tc1 = fx.ticket_class("Floor", 10).await;
        let tc2 = fx.ticket_class("Box", 10).await;
        let order = Uuid::new_v4();
        fx.engine
            .reserve(
                order,
                &[ReserveItem::new(tc1.id, 2), ReserveItem::new(tc2.id, 1)],
                fx.deadline(),
            )
            .await
            .unwrap();

        fx.clock.advance(Duration::minutes(16));
        let err = fx.engine.confirm(order).await.unwrap_err();
        assert!(matches!(err, InventoryError::InvalidState(_)));
        assert_eq!(fx.counters(tc1.id).await, (2, 0));
        assert_eq!(fx.counters(tc2.id).await, (1, 0));

        let rows = fx.engine.reservations_for_order(order).await.unwrap();
        assert!(rows.iter().all(|r| r.status == ReservationStatus::Active));
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let fx = Fixture::new();
        let order = Uuid::new_v4();
        assert!(matches!(
            fx.engine.confirm(order).await,
            Err(InventoryError::NotFound(_))
        ));
        assert!(matches!(
            fx.engine.release(order).await,
            Err(InventoryError::NotFound(_))
        ));
        assert!(matches!(
            fx.engine.purge_order(order).await,
            Err(InventoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_expiry_releases_once() {
        let fx = Fixture::new();
        let tc = fx.ticket_class("GA", 10).await;
        let order = Uuid::new_v4();
        fx.engine
            .reserve(order, &[ReserveItem::new(tc.id, 3)], fx.deadline())
            .await
            .unwrap();

        assert_eq!(fx.engine.batch_expire_reservations(100).await.unwrap(), 0);

        fx.clock.advance(Duration::minutes(20));
        assert_eq!(fx.engine.batch_expire_reservations(100).await.unwrap(), 1);
        assert_eq!(fx.counters(tc.id).await, (0, 0));

        assert_eq!(fx.engine.batch_expire_reservations(100).await.unwrap(), 0);
        assert_eq!(fx.counters(tc.id).await, (0, 0));

        let rows = fx.engine.reservations_for_order(order).await.unwrap();
        assert_eq!(rows[0].status, ReservationStatus::Expired);
        assert!(matches!(
            fx.engine.release(order).await,
            Err(InventoryError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_batch_expiry_is_bounded_and_oldest_first() {
        let fx = Fixture::new();
        let tc = fx.ticket_class("GA", 10).await;
        let base = fx.clock.now();
        let mut orders = Vec::new();
        for minutes in 1..=3 {
            let order = Uuid::new_v4();
            fx.engine
                .reserve(
                    order,
                    &[ReserveItem::new(tc.id, 2)],
                    base + Duration::minutes(minutes),
                )
                .await
                .unwrap();
            orders.push(order);
        }

        fx.clock.advance(Duration::minutes(10));
        assert_eq!(fx.engine.batch_expire_reservations(2).await.unwrap(), 2);
        assert_eq!(fx.counters(tc.id).await, (2, 0));

        let newest = fx.engine.reservations_for_order(orders[2]).await.unwrap();
        assert_eq!(newest[0].status, ReservationStatus::Active);

        assert_eq!(fx.engine.batch_expire_reservations(2).await.unwrap(), 1);
        assert_eq!(fx.counters(tc.id).await, (0, 0));
    }

    #[tokio::test]
    async fn test_purge_requires_resolved_order() {
        let fx = Fixture::new();
        let tc = fx.ticket_class("GA", 10).await;
        let order = Uuid::new_v4();
        fx.engine
            .reserve(order, &[ReserveItem::new(tc.id, 1)], fx.deadline())
            .await
            .unwrap();

        assert!(matches!(
            fx.engine.purge_order(order).await,
            Err(InventoryError::InvalidState(_))
        ));

        fx.engine.release(order).await.unwrap();
        assert_eq!(fx.engine.purge_order(order).await.unwrap(), 1);
        assert!(fx.store.order_reservations(order).await.unwrap().is_empty());
    }

    #[test]
    fn test_batch_size_clamp() {
        assert_eq!(clamp_batch_size(100), 100);
        assert_eq!(clamp_batch_size(1000), 1000);
        assert_eq!(clamp_batch_size(0), DEFAULT_EXPIRY_BATCH_SIZE);
        assert_eq!(clamp_batch_size(-5), DEFAULT_EXPIRY_BATCH_SIZE);
        assert_eq!(clamp_batch_size(5000), DEFAULT_EXPIRY_BATCH_SIZE);
    }
}
