use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};
use uuid::Uuid;

use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error(
        "Insufficient stock for ticket class {ticket_class_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        ticket_class_id: Uuid,
        requested: i32,
        available: i32,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error")]
    Database(#[source] sqlx::Error),

    #[error("Internal server error")]
    Internal(String),
}

pub type InventoryResult<T> = Result<T, InventoryError>;

impl From<sqlx::Error> for InventoryError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                let constraint = db.constraint().unwrap_or("unique constraint").to_string();
                return InventoryError::AlreadyExists(constraint);
            }
            if db.is_foreign_key_violation() {
                return InventoryError::InvalidState(
                    "row is still referenced by reservations".to_string(),
                );
            }
        }
        InventoryError::Database(e)
    }
}

impl InventoryError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        InventoryError::NotFound(format!("{what} '{id}' was not found"))
    }

    /// Expected outcomes callers must handle; everything else is an incident.
    pub fn is_business_outcome(&self) -> bool {
        !matches!(
            self,
            InventoryError::Database(_) | InventoryError::Internal(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            InventoryError::Validation(_) => StatusCode::BAD_REQUEST,
            InventoryError::NotFound(_) => StatusCode::NOT_FOUND,
            InventoryError::InsufficientStock { .. } => StatusCode::CONFLICT,
            InventoryError::InvalidState(_) => StatusCode::CONFLICT,
            InventoryError::AlreadyExists(_) => StatusCode::CONFLICT,
            InventoryError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            InventoryError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            InventoryError::Validation(_) => "VALIDATION_ERROR",
            InventoryError::NotFound(_) => "NOT_FOUND",
            InventoryError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            InventoryError::InvalidState(_) => "INVALID_STATE",
            InventoryError::AlreadyExists(_) => "ALREADY_EXISTS",
            InventoryError::Database(_) => "DATABASE_ERROR",
            InventoryError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    fn log(&self) {
        match self {
            InventoryError::Database(e) => {
                error!(error = ?e, "Database error");
            }
            InventoryError::Internal(msg) => {
                error!(error = ?self, message = %msg, "Internal error");
            }
            _ => {
                warn!(code = self.code(), message = %self, "Request rejected");
            }
        }
    }
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Only expose high-level message to the client
        let (public_message, details) = match &self {
            InventoryError::Validation(msg)
            | InventoryError::NotFound(msg)
            | InventoryError::InvalidState(msg)
            | InventoryError::AlreadyExists(msg) => (msg.clone(), None),
            InventoryError::InsufficientStock {
                ticket_class_id,
                requested,
                available,
            } => (
                "Insufficient stock".to_string(),
                Some(json!({
                    "ticket_class_id": ticket_class_id,
                    "requested": requested,
                    "available": available,
                })),
            ),
            InventoryError::Database(_) => ("A database error occurred".to_string(), None),
            InventoryError::Internal(_) => ("An internal error occurred".to_string(), None),
        };

        error_response(code, public_message, details, status)
    }
}
