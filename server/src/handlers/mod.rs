use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::utils::error::InventoryError;
use crate::utils::response::success;

pub mod availability;
pub mod reservations;
pub mod ticket_classes;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "inventory-api",
    };

    success(payload, "Health check successful").into_response()
}

impl From<JsonRejection> for InventoryError {
    fn from(rejection: JsonRejection) -> Self {
        InventoryError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for InventoryError {
    fn from(rejection: QueryRejection) -> Self {
        InventoryError::Validation(rejection.body_text())
    }
}
