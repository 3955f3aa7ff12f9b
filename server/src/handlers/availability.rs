use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::reservations::ItemRequest;
use crate::models::ReserveItem;
use crate::state::AppState;
use crate::store::InventoryStore;
use crate::utils::error::InventoryError;
use crate::utils::response::success;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub items: Vec<ItemRequest>,
}

#[derive(Debug, Serialize)]
pub struct CheckPayload {
    pub available: bool,
}

pub async fn check_availability<S: InventoryStore>(
    State(state): State<AppState<S>>,
    body: Result<Json<CheckRequest>, JsonRejection>,
) -> Result<Response, InventoryError> {
    let Json(request) = body?;
    if request.items.is_empty() {
        return Err(InventoryError::Validation("items must not be empty".into()));
    }

    let items: Vec<ReserveItem> = request.items.into_iter().map(Into::into).collect();
    let available = state.availability.check_availability(&items).await?;
    Ok(success(CheckPayload { available }, "Availability checked"))
}
