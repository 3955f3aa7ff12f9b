use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{NewTicketClass, TicketClassChanges, TicketClassFilter};
use crate::state::AppState;
use crate::store::InventoryStore;
use crate::utils::error::{InventoryError, InventoryResult};
use crate::utils::response::{created, empty_success, success};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub event_id: Option<Uuid>,
    /// Comma-separated ticket class ids.
    pub ids: Option<String>,
}

impl ListQuery {
    fn into_filter(self) -> InventoryResult<TicketClassFilter> {
        let ids = match self.ids.as_deref() {
            None => Vec::new(),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    Uuid::parse_str(s).map_err(|_| {
                        InventoryError::Validation(format!("'{s}' is not a valid ticket class id"))
                    })
                })
                .collect::<InventoryResult<Vec<_>>>()?,
        };

        if self.event_id.is_none() && ids.is_empty() {
            return Err(InventoryError::Validation(
                "either event_id or ids is required".into(),
            ));
        }

        Ok(TicketClassFilter {
            event_id: self.event_id,
            ids,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AvailabilityPayload {
    pub ticket_class_id: Uuid,
    pub available: i32,
}

pub async fn create_ticket_class<S: InventoryStore>(
    State(state): State<AppState<S>>,
    body: Result<Json<NewTicketClass>, JsonRejection>,
) -> Result<Response, InventoryError> {
    let Json(input) = body?;
    let tc = state.ticket_classes.create(input).await?;
    Ok(created(tc, "Ticket class created"))
}

pub async fn list_ticket_classes<S: InventoryStore>(
    State(state): State<AppState<S>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, InventoryError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let tcs = state.ticket_classes.list(&filter).await?;
    Ok(success(tcs, "Ticket classes retrieved"))
}

pub async fn get_ticket_class<S: InventoryStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> Result<Response, InventoryError> {
    let tc = state.ticket_classes.get(id).await?;
    Ok(success(tc, "Ticket class retrieved"))
}

pub async fn update_ticket_class<S: InventoryStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
    body: Result<Json<TicketClassChanges>, JsonRejection>,
) -> Result<Response, InventoryError> {
    let Json(changes) = body?;
    let tc = state.ticket_classes.update(id, changes).await?;
    Ok(success(tc, "Ticket class updated"))
}

pub async fn delete_ticket_class<S: InventoryStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> Result<Response, InventoryError> {
    state.ticket_classes.delete(id).await?;
    Ok(empty_success("Ticket class deleted"))
}

pub async fn get_availability<S: InventoryStore>(
    State(state): State<AppState<S>>,
    Path(id): Path<Uuid>,
) -> Result<Response, InventoryError> {
    let available = state.availability.available_count(id).await?;
    let payload = AvailabilityPayload {
        ticket_class_id: id,
        available,
    };
    Ok(success(payload, "Availability retrieved"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_requires_a_filter() {
        let query = ListQuery {
            event_id: None,
            ids: Some(" , ".into()),
        };
        assert!(matches!(
            query.into_filter(),
            Err(InventoryError::Validation(_))
        ));
    }

    #[test]
    fn test_list_query_parses_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let query = ListQuery {
            event_id: None,
            ids: Some(format!("{a}, {b}")),
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.ids, vec![a, b]);

        let bad = ListQuery {
            event_id: None,
            ids: Some("not-a-uuid".into()),
        };
        assert!(bad.into_filter().is_err());
    }
}
