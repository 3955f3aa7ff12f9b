use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use super::{InventoryStore, StoreTx};
use crate::config::DatabaseConfig;
use crate::models::{Reservation, ReservationStatus, TicketClass, TicketClassFilter};
use crate::utils::error::{InventoryError, InventoryResult};

const TICKET_CLASS_COLUMNS: &str = "id, event_id, name, price, currency, total, reserved, sold, \
     sale_start_at, sale_end_at, status, created_at, updated_at";

const RESERVATION_COLUMNS: &str =
    "id, order_id, ticket_class_id, qty, expires_at, status, created_at, updated_at";

/// Postgres-backed store. Row locks and conditional updates are delegated to the database.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.url)
            .await?;

        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!().run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl InventoryStore for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> InventoryResult<PgTx> {
        let tx = self.pool.begin().await?;
        Ok(PgTx { tx })
    }

    async fn insert_ticket_class(&self, tc: &TicketClass) -> InventoryResult<()> {
        sqlx::query(
            "INSERT INTO ticket_classes \
             (id, event_id, name, price, currency, total, reserved, sold, \
              sale_start_at, sale_end_at, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(tc.id)
        .bind(tc.event_id)
        .bind(&tc.name)
        .bind(tc.price)
        .bind(&tc.currency)
        .bind(tc.total)
        .bind(tc.reserved)
        .bind(tc.sold)
        .bind(tc.sale_start_at)
        .bind(tc.sale_end_at)
        .bind(tc.status.as_str())
        .bind(tc.created_at)
        .bind(tc.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn ticket_class(&self, id: Uuid) -> InventoryResult<Option<TicketClass>> {
        let sql = format!("SELECT {TICKET_CLASS_COLUMNS} FROM ticket_classes WHERE id = $1");
        let tc = sqlx::query_as::<_, TicketClass>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(tc)
    }

    async fn ticket_classes(&self, filter: &TicketClassFilter) -> InventoryResult<Vec<TicketClass>> {
        let sql = format!(
            "SELECT {TICKET_CLASS_COLUMNS} FROM ticket_classes \
             WHERE ($1::uuid IS NULL OR event_id = $1) \
               AND (cardinality($2::uuid[]) = 0 OR id = ANY($2)) \
             ORDER BY created_at, id"
        );
        let tcs = sqlx::query_as::<_, TicketClass>(&sql)
            .bind(filter.event_id)
            .bind(&filter.ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(tcs)
    }

    async fn delete_ticket_class(&self, id: Uuid) -> InventoryResult<bool> {
        let result = sqlx::query("DELETE FROM ticket_classes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn order_reservations(&self, order_id: Uuid) -> InventoryResult<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE order_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, Reservation>(&sql)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
    async fn lock_ticket_class(&mut self, id: Uuid) -> InventoryResult<Option<TicketClass>> {
        let sql =
            format!("SELECT {TICKET_CLASS_COLUMNS} FROM ticket_classes WHERE id = $1 FOR UPDATE");
        let tc = sqlx::query_as::<_, TicketClass>(&sql)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(tc)
    }

    async fn update_ticket_class(&mut self, tc: &TicketClass) -> InventoryResult<()> {
        let result = sqlx::query(
            "UPDATE ticket_classes \
             SET name = $2, price = $3, currency = $4, total = $5, \
                 sale_start_at = $6, sale_end_at = $7, status = $8, updated_at = $9 \
             WHERE id = $1 AND reserved + sold <= $5",
        )
        .bind(tc.id)
        .bind(&tc.name)
        .bind(tc.price)
        .bind(&tc.currency)
        .bind(tc.total)
        .bind(tc.sale_start_at)
        .bind(tc.sale_end_at)
        .bind(tc.status.as_str())
        .bind(tc.updated_at)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(InventoryError::InvalidState(format!(
                "ticket class '{}' cannot be updated to total {}",
                tc.id, tc.total
            )));
        }

        Ok(())
    }

    async fn claim_capacity(&mut self, id: Uuid, qty: i32) -> InventoryResult<bool> {
        let result = sqlx::query(
            "UPDATE ticket_classes \
             SET reserved = reserved + $2, updated_at = now() \
             WHERE id = $1 AND total - reserved - sold >= $2",
        )
        .bind(id)
        .bind(qty)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release_capacity(&mut self, id: Uuid, qty: i32) -> InventoryResult<bool> {
        let result = sqlx::query(
            "UPDATE ticket_classes \
             SET reserved = GREATEST(0, reserved - $2), updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(qty)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn settle_capacity(&mut self, id: Uuid, qty: i32) -> InventoryResult<bool> {
        let result = sqlx::query(
            "UPDATE ticket_classes \
             SET reserved = GREATEST(0, reserved - $2), sold = sold + $2, updated_at = now() \
             WHERE id = $1 AND reserved >= $2",
        )
        .bind(id)
        .bind(qty)
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn insert_reservation(&mut self, reservation: &Reservation) -> InventoryResult<()> {
        sqlx::query(
            "INSERT INTO reservations \
             (id, order_id, ticket_class_id, qty, expires_at, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(reservation.id)
        .bind(reservation.order_id)
        .bind(reservation.ticket_class_id)
        .bind(reservation.qty)
        .bind(reservation.expires_at)
        .bind(reservation.status.as_str())
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn lock_order_reservations(&mut self, order_id: Uuid) -> InventoryResult<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE order_id = $1 ORDER BY id FOR UPDATE"
        );
        let rows = sqlx::query_as::<_, Reservation>(&sql)
            .bind(order_id)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows)
    }

    async fn lock_expired_reservations(
        &mut self,
        now: DateTime<Utc>,
        limit: i64,
    ) -> InventoryResult<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations \
             WHERE status = $1 AND expires_at < $2 \
             ORDER BY expires_at \
             LIMIT $3 \
             FOR UPDATE SKIP LOCKED"
        );
        let rows = sqlx::query_as::<_, Reservation>(&sql)
            .bind(ReservationStatus::Active.as_str())
            .bind(now)
            .bind(limit)
            .fetch_all(&mut *self.tx)
            .await?;

        Ok(rows)
    }

    async fn mark_reservations(
        &mut self,
        ids: &[Uuid],
        status: ReservationStatus,
        now: DateTime<Utc>,
    ) -> InventoryResult<u64> {
        let result = sqlx::query(
            "UPDATE reservations SET status = $1, updated_at = $2 \
             WHERE id = ANY($3) AND status = $4",
        )
        .bind(status.as_str())
        .bind(now)
        .bind(ids)
        .bind(ReservationStatus::Active.as_str())
        .execute(&mut *self.tx)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_order_reservations(&mut self, order_id: Uuid) -> InventoryResult<u64> {
        let result = sqlx::query("DELETE FROM reservations WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected())
    }

    async fn commit(self) -> InventoryResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
