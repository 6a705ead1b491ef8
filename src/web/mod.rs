pub mod handlers;
pub mod views;

use crate::events::store::EventStore;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EventStore>,
}

pub fn router(store: EventStore) -> Router {
    let state = AppState {
        store: Arc::new(store),
    };

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/", get(handlers::list_events))
        .route("/food-events", get(handlers::list_food_events))
        .route("/stats", get(handlers::get_stats))
        .route("/calendar", get(handlers::calendar_page))
        .route("/events", get(handlers::calendar_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, store: EventStore) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;

    info!("Serving {} on http://{}", store.path().display(), listener.local_addr()?);
    info!("Available routes: / (all events), /food-events, /stats, /calendar, /events");

    axum::serve(listener, router(store)).await
}
