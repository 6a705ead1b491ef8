use super::{views, AppState};
use crate::events::calendar::{calendar_entries, CalendarEntry};
use crate::events::model::{EventRecord, FoodStatus};
use crate::events::stats::EventStats;
use crate::events::store::EventStore;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::Json;
use chrono::{Datelike, Local};
use tracing::{error, info, warn};

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn list_events(State(state): State<AppState>) -> Html<String> {
    let events = load_events(&state.store).await;
    let food_count = count_food(&events);

    info!("Displaying {} events, {} with free food", events.len(), food_count);

    Html(views::events_page(&events, food_count, false))
}

pub async fn list_food_events(State(state): State<AppState>) -> Html<String> {
    let events: Vec<EventRecord> = load_events(&state.store)
        .await
        .into_iter()
        .filter(|event| event.food == FoodStatus::Food)
        .collect();

    info!("Displaying {} events with free food", events.len());

    Html(views::events_page(&events, events.len(), true))
}

pub async fn get_stats(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    let events = load_events(&state.store).await;

    if events.is_empty() {
        return Err((StatusCode::NOT_FOUND, "No events found"));
    }

    Ok(Html(views::stats_page(&EventStats::from_events(&events))))
}

pub async fn calendar_page() -> Html<&'static str> {
    Html(views::CALENDAR_PAGE)
}

/// Event feed for the calendar page, dated in the current year
pub async fn calendar_feed(State(state): State<AppState>) -> Json<Vec<CalendarEntry>> {
    let events = load_events(&state.store).await;

    Json(calendar_entries(&events, Local::now().year()))
}

async fn load_events(store: &EventStore) -> Vec<EventRecord> {
    match store.load().await {
        Ok(envelope) => {
            if envelope.results.is_empty() {
                warn!("No events found to display");
            }
            envelope.results
        }
        Err(err) => {
            error!("Error loading events: {err}");
            Vec::new()
        }
    }
}

fn count_food(events: &[EventRecord]) -> usize {
    events
        .iter()
        .filter(|event| event.food == FoodStatus::Food)
        .count()
}
