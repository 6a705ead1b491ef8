use super::ClassificationError;
use crate::events::model::RUBRIC_SITE_URL;
use itertools::Itertools;
use lazy_static::lazy_static;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

const DESCRIPTION_SELECTOR: &str = "#eventName2";

lazy_static! {
    static ref DESCRIPTION: Selector =
        Selector::parse(DESCRIPTION_SELECTOR).expect("Failed to create description selector");
}

/// Reads event descriptions from the public Rubric event pages
#[derive(Debug, Clone)]
pub struct EventPageClient {
    client: Client,
    base_url: String,
}

impl Default for EventPageClient {
    fn default() -> Self {
        Self::new(RUBRIC_SITE_URL)
    }
}

impl EventPageClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_description(
        &self,
        destination: &str,
    ) -> Result<Option<String>, ClassificationError> {
        let page_html = self
            .client
            .get(format!("{}{}", self.base_url, destination))
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let description = extract_description(&page_html);

        if description.is_none() {
            debug!("No description element on page");
        }

        Ok(description)
    }
}

/// Text of the description element, with whitespace collapsed
pub fn extract_description(page_html: &str) -> Option<String> {
    let document = Html::parse_document(page_html);

    document
        .select(&DESCRIPTION)
        .next()
        .map(|element| element.text().flat_map(str::split_whitespace).join(" "))
}
