use super::dto::{SearchDetails, SearchQuery};
use crate::events::model::{Envelope, EnvelopeError, RUBRIC_SITE_URL};
use lazy_static::lazy_static;
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info, instrument};

const RUBRIC_API_URL: &str = "https://api.hellorubric.com/";
const SEARCH_ENDPOINT: &str = "getUnifiedSearch";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36";

lazy_static! {
    static ref REST_CLIENT: Client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_default();
}

pub struct RubricAPI {
    url: String,
}

impl Default for RubricAPI {
    fn default() -> Self {
        Self::new(RUBRIC_API_URL)
    }
}

impl RubricAPI {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    /**
    Returns the raw search response, listings in ascending date order.
    Everything besides `results` is kept as the envelope's metadata.
    */
    #[instrument(skip(self))]
    pub async fn get_events(&self, query: &SearchQuery) -> Result<Envelope, APIError> {
        info!("Getting up to {} events", query.limit);

        let details = serde_json::to_string(&SearchDetails::from(query))
            .map_err(|err| APIError::InvalidRequest(err.to_string()))?;

        let response = REST_CLIENT
            .post(&self.url)
            .header("origin", RUBRIC_SITE_URL)
            .header("referer", format!("{}/", RUBRIC_SITE_URL))
            .form(&[("details", details.as_str()), ("endpoint", SEARCH_ENDPOINT)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        match Envelope::from_slice(response.as_bytes()) {
            Ok(envelope) => {
                info!("Found {} events", envelope.results.len());
                Ok(envelope)
            }
            Err(err) => {
                error!("Response parse failed: {:?}. Raw response: {}", err, response);
                Err(APIError::InvalidResponse(err))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum APIError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("could not build request: {0}")]
    InvalidRequest(String),
    #[error("invalid response: {0}")]
    InvalidResponse(#[source] EnvelopeError),
}
