use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, security_headers, ServerConfig};
use crate::handlers::availability::check_availability;
use crate::handlers::health_check;
use crate::handlers::reservations::{
    confirm_order, list_order_reservations, purge_order, release_order, reserve,
};
use crate::handlers::ticket_classes::{
    create_ticket_class, delete_ticket_class, get_availability, get_ticket_class,
    list_ticket_classes, update_ticket_class,
};
use crate::state::AppState;
use crate::store::InventoryStore;

pub fn create_routes<S: InventoryStore>(state: AppState<S>, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_check))
        .route(
            "/ticket-classes",
            post(create_ticket_class::<S>).get(list_ticket_classes::<S>),
        )
        .route(
            "/ticket-classes/:id",
            get(get_ticket_class::<S>)
                .patch(update_ticket_class::<S>)
                .delete(delete_ticket_class::<S>),
        )
        .route("/ticket-classes/:id/availability", get(get_availability::<S>))
        .route("/availability/check", post(check_availability::<S>))
        .route("/reservations", post(reserve::<S>))
        .route(
            "/orders/:order_id/reservations",
            get(list_order_reservations::<S>).delete(purge_order::<S>),
        )
        .route("/orders/:order_id/confirm", post(confirm_order::<S>))
        .route("/orders/:order_id/release", post(release_order::<S>))
        .with_state(state);

    for layer in security_headers(config.production) {
        router = router.layer(layer);
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(create_cors_layer(config.cors_allowed_origins.as_deref())),
    )
}
