use super::model::{Envelope, EnvelopeError, FoodStatus};
use crate::classifier::Classifier;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

pub const BACKUP_SUFFIX: &str = ".backup";

const PROGRESS_INTERVAL: usize = 10;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("events file {0} not found")]
    NotFound(PathBuf),
    #[error("failed reading events file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("events file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: EnvelopeError,
    },
    #[error("failed writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Counts of a single enrichment run.
///
/// `classified` includes the `defaulted` events; already classified events and `results`
/// entries that aren't event objects are only in `skipped`.
/// `with_food` counts every event that ends the run with food, skipped ones included.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UpdateSummary {
    pub total: usize,
    pub classified: usize,
    pub skipped: usize,
    pub defaulted: usize,
    pub with_food: usize,
}

impl UpdateSummary {
    pub fn processed(&self) -> usize {
        self.classified + self.skipped
    }

    pub fn without_food(&self) -> usize {
        self.processed() - self.with_food
    }
}

/// The events file, read whole and written whole
#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        let mut backup: OsString = self.path.clone().into_os_string();
        backup.push(BACKUP_SUFFIX);

        backup.into()
    }

    pub async fn load(&self) -> Result<Envelope, StoreError> {
        let (_, envelope) = self.read().await?;

        Ok(envelope)
    }

    /// Replaces the file with the given envelope, without a backup
    pub async fn save(&self, envelope: &Envelope) -> Result<(), StoreError> {
        self.write(&self.path, &self.encode(envelope)?).await?;

        info!("Saved {} events to {}", envelope.results.len(), self.path.display());
        Ok(())
    }

    /**
    Classifies every event that has no food status yet and writes the file back.

    A missing or malformed file is logged and leaves nothing processed.
    The previous content is copied to the backup path before the file is replaced in a single write.
    Only a failure to write is returned as an error.
    */
    #[instrument(skip_all, fields(path = %self.path.display(), strategy = %classifier.strategy()))]
    pub async fn update(&self, classifier: &Classifier) -> Result<UpdateSummary, StoreError> {
        info!("Starting food detection");

        let (original, mut envelope) = match self.read().await {
            Ok(read) => read,
            Err(err) => {
                error!("Nothing to process: {err}");
                return Ok(UpdateSummary::default());
            }
        };

        let invalid = envelope.invalid_entries().len();
        let total = envelope.results.len() + invalid;
        if total == 0 {
            warn!("No events to process");
            return Ok(UpdateSummary::default());
        }

        info!("Loaded {} events", total);

        let mut summary = UpdateSummary {
            total,
            skipped: invalid,
            ..Default::default()
        };

        for (index, entry) in envelope.invalid_entries() {
            warn!("Entry {} is not an event object ({entry}), leaving it as-is", index + 1);
        }

        for (index, event) in envelope.results.iter_mut().enumerate() {
            let position = index + 1;
            let title = event.title().unwrap_or("Unknown").to_string();

            if event.food.is_classified() {
                debug!("Event {position} already processed, skipping");
                summary.skipped += 1;
            } else {
                event.food = match classifier.classify(event).await {
                    Ok(has_food) => {
                        if has_food {
                            info!("Event {position}/{total}: '{title}' - HAS FOOD");
                        } else {
                            debug!("Event {position}/{total}: '{title}' - no food");
                        }

                        FoodStatus::from_bool(has_food)
                    }
                    Err(err) => {
                        error!("Error processing event {position} ('{title}'): {err}, defaulting to no food");
                        summary.defaulted += 1;

                        FoodStatus::NoFood
                    }
                };
                summary.classified += 1;

                if summary.processed() % PROGRESS_INTERVAL == 0 {
                    info!("Processed {}/{} events...", summary.processed(), total);
                }
            }

            if event.food == FoodStatus::Food {
                summary.with_food += 1;
            }
        }

        let updated = self.encode(&envelope)?;

        let backup_path = self.backup_path();
        self.write(&backup_path, &original).await?;
        info!("Created backup at {}", backup_path.display());

        self.write(&self.path, &updated).await?;
        info!("Saved {} events to {}", total, self.path.display());

        info!(
            "Food detection complete! Total: {}, with food: {}, without food: {}, defaulted: {}",
            summary.total,
            summary.with_food,
            summary.without_food(),
            summary.defaulted
        );

        Ok(summary)
    }

    async fn read(&self) -> Result<(Vec<u8>, Envelope), StoreError> {
        let bytes = fs::read(&self.path).await.map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Read {
                path: self.path.clone(),
                source: err,
            },
        })?;

        let envelope = Envelope::from_slice(&bytes).map_err(|err| StoreError::Malformed {
            path: self.path.clone(),
            source: err,
        })?;

        Ok((bytes, envelope))
    }

    /// Two-space indented, non-ASCII left unescaped
    fn encode(&self, envelope: &Envelope) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec_pretty(envelope).map_err(|err| StoreError::Write {
            path: self.path.clone(),
            source: err.into(),
        })
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        fs::write(path, contents)
            .await
            .map_err(|err| StoreError::Write {
                path: path.to_path_buf(),
                source: err,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_append_backup_suffix_to_full_file_name() {
        let store = EventStore::new("data/event_data.json");

        assert_eq!(store.backup_path(), PathBuf::from("data/event_data.json.backup"));
    }

    #[test_log::test]
    fn should_count_skipped_events_as_processed() {
        let summary = UpdateSummary {
            total: 5,
            classified: 3,
            skipped: 2,
            defaulted: 1,
            with_food: 2,
        };

        assert_eq!(summary.processed(), 5);
        assert_eq!(summary.without_food(), 3);
    }
}
