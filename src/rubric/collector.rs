use super::api::{APIError, RubricAPI};
use super::dto::SearchQuery;
use crate::events::model::{Envelope, FoodStatus};
use crate::events::store::{EventStore, StoreError};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Api(#[from] APIError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fetches the current listings and replaces the events file with them.
///
/// Food statuses already in the file are kept for listings that are still there, so
/// collecting again doesn't undo an enrichment run. Returns the number of events saved.
#[instrument(skip_all, fields(path = %store.path().display()))]
pub async fn collect(
    api: &RubricAPI,
    query: &SearchQuery,
    store: &EventStore,
) -> Result<usize, CollectError> {
    let mut envelope = api.get_events(query).await?;

    match store.load().await {
        Ok(previous) => {
            let carried = carry_over_food_status(&previous, &mut envelope);
            info!("Kept the food status of {} events", carried);
        }
        Err(StoreError::NotFound(_)) => info!("No previous events file"),
        Err(err) => warn!("Ignoring previous events file: {err}"),
    }

    envelope.results.iter().for_each(|event| {
        info!(
            "Got event '{}' on {} {} by {} ({})",
            event.title().unwrap_or("No title"),
            event.month().unwrap_or("no month"),
            event.day().map(|day| day.to_string()).unwrap_or_default(),
            event.society_name().unwrap_or("no society"),
            event.info().unwrap_or("no price")
        )
    });

    store.save(&envelope).await?;

    Ok(envelope.results.len())
}

/// Copies classified statuses onto unclassified listings with the same destination
pub fn carry_over_food_status(previous: &Envelope, fresh: &mut Envelope) -> usize {
    let known: HashMap<&str, FoodStatus> = previous
        .results
        .iter()
        .filter(|event| event.food.is_classified())
        .filter_map(|event| Some((event.destination()?, event.food)))
        .collect();

    let mut carried = 0;

    for event in fresh.results.iter_mut().filter(|event| event.food.is_unclassified()) {
        if let Some(status) = event.destination().and_then(|destination| known.get(destination)) {
            event.food = *status;
            carried += 1;
        }
    }

    carried
}
