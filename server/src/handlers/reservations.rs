use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ReserveItem;
use crate::state::AppState;
use crate::store::InventoryStore;
use crate::utils::error::InventoryError;
use crate::utils::response::{created, success};

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ItemRequest {
    pub ticket_class_id: Uuid,
    #[serde(alias = "qty")]
    pub quantity: i32,
}

impl From<ItemRequest> for ReserveItem {
    fn from(item: ItemRequest) -> Self {
        ReserveItem::new(item.ticket_class_id, item.quantity)
    }
}

#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub order_id: Uuid,
    pub items: Vec<ItemRequest>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PurgePayload {
    pub order_id: Uuid,
    pub deleted: u64,
}

pub async fn reserve<S: InventoryStore>(
    State(state): State<AppState<S>>,
    body: Result<Json<ReserveRequest>, JsonRejection>,
) -> Result<Response, InventoryError> {
    let Json(request) = body?;
    let items: Vec<ReserveItem> = request.items.into_iter().map(Into::into).collect();
    let held = state
        .reservations
        .reserve(request.order_id, &items, request.expires_at)
        .await?;
    Ok(created(held, "Tickets reserved"))
}

pub async fn confirm_order<S: InventoryStore>(
    State(state): State<AppState<S>>,
    Path(order_id): Path<Uuid>,
) -> Result<Response, InventoryError> {
    let confirmed = state.reservations.confirm(order_id).await?;
    Ok(success(confirmed, "Reservations confirmed"))
}

pub async fn release_order<S: InventoryStore>(
    State(state): State<AppState<S>>,
    Path(order_id): Path<Uuid>,
) -> Result<Response, InventoryError> {
    let released = state.reservations.release(order_id).await?;
    Ok(success(released, "Reservations released"))
}

pub async fn list_order_reservations<S: InventoryStore>(
    State(state): State<AppState<S>>,
    Path(order_id): Path<Uuid>,
) -> Result<Response, InventoryError> {
    let rows = state.reservations.reservations_for_order(order_id).await?;
    Ok(success(rows, "Reservations retrieved"))
}

pub async fn purge_order<S: InventoryStore>(
    State(state): State<AppState<S>>,
    Path(order_id): Path<Uuid>,
) -> Result<Response, InventoryError> {
    let deleted = state.reservations.purge_order(order_id).await?;
    Ok(success(
        PurgePayload { order_id, deleted },
        "Reservations deleted",
    ))
}
