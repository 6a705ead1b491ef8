pub mod dto;
pub mod keyword;
pub mod llm;
pub mod page;

use crate::config::model::{ClassifierConfig, ConfigError, FoodStrategy};
use crate::events::model::EventRecord;
use keyword::KeywordClassifier;
use llm::LlmClassifier;
use page::EventPageClient;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("response had no answer")]
    EmptyResponse,
}

/// Decides whether an event offers free food, with the strategy picked by config
#[derive(Debug, Clone)]
pub enum Classifier {
    Keyword(KeywordClassifier),
    Llm(LlmClassifier),
}

impl Classifier {
    pub fn from_config(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        match config.strategy {
            FoodStrategy::Keyword => {
                let pages = config.fetch_event_pages.then(EventPageClient::default);

                Ok(Classifier::Keyword(KeywordClassifier::new(pages)))
            }
            FoodStrategy::Llm => {
                let llm = config.llm.as_ref().ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

                Ok(Classifier::Llm(LlmClassifier::new(llm)))
            }
        }
    }

    pub fn strategy(&self) -> FoodStrategy {
        match self {
            Classifier::Keyword(_) => FoodStrategy::Keyword,
            Classifier::Llm(_) => FoodStrategy::Llm,
        }
    }

    #[instrument(skip_all, fields(title = event.title().unwrap_or_default()))]
    pub async fn classify(&self, event: &EventRecord) -> Result<bool, ClassificationError> {
        match self {
            Classifier::Keyword(keyword) => keyword.classify_event(event).await,
            Classifier::Llm(llm) => Ok(llm.classify_event(event).await),
        }
    }
}
