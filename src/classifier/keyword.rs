use super::page::EventPageClient;
use super::ClassificationError;
use crate::events::model::EventRecord;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

pub const FOOD_KEYWORDS: [&str; 6] = [
    "free food",
    "pizza",
    "bbq",
    "snacks",
    "refreshments",
    "food provided",
];

lazy_static! {
    static ref FOOD_KEYWORD_REGEX: Regex = Regex::new(
        &FOOD_KEYWORDS.iter().map(|keyword| regex::escape(keyword)).join("|")
    )
    .expect("Failed to create food keyword regex");
}

/// Matches a fixed list of food phrases against the event's description.
///
/// When page lookups are enabled and a listing has no description, the text is
/// read from the event page instead.
#[derive(Debug, Clone, Default)]
pub struct KeywordClassifier {
    pages: Option<EventPageClient>,
}

impl KeywordClassifier {
    pub fn new(pages: Option<EventPageClient>) -> Self {
        Self { pages }
    }

    pub fn classify(&self, text: &str) -> bool {
        FOOD_KEYWORD_REGEX.is_match(&text.to_lowercase())
    }

    pub async fn classify_event(&self, event: &EventRecord) -> Result<bool, ClassificationError> {
        let text = self.event_text(event).await?;

        Ok(self.classify(&text))
    }

    async fn event_text(&self, event: &EventRecord) -> Result<String, ClassificationError> {
        if let Some(description) = event.description() {
            return Ok(voca_rs::strip::strip_tags(description));
        }

        if let (Some(pages), Some(destination)) = (&self.pages, event.destination()) {
            if let Some(description) = pages.get_description(destination).await? {
                return Ok(description);
            }
        }

        debug!("No description available, using the listing summary");

        Ok(event.summary_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test_log::test]
    fn should_find_food_keyword_regardless_of_case() {
        assert!(KeywordClassifier::default().classify("Free Pizza provided"));
        assert!(KeywordClassifier::default().classify("End of semester BBQ"));
        assert!(KeywordClassifier::default().classify("light REFRESHMENTS after the talk"));
    }

    #[test_log::test]
    fn should_not_match_text_without_food_keywords() {
        assert!(!KeywordClassifier::default().classify("study session"));
        assert!(!KeywordClassifier::default().classify(""));
    }

    #[test_log::test(tokio::test)]
    async fn should_classify_description_without_html_tags() {
        let event: EventRecord = serde_json::from_value(json!({
            "title": "Welcome drinks",
            "description": "<p>Snacks <b>and</b> music</p>"
        }))
        .unwrap();

        assert!(KeywordClassifier::default().classify_event(&event).await.unwrap());
    }

    #[test_log::test(tokio::test)]
    async fn should_fall_back_to_listing_summary_without_description() {
        let event: EventRecord = serde_json::from_value(json!({
            "title": "Pizza and Pitches",
            "destination": "/event/pitches"
        }))
        .unwrap();

        assert!(KeywordClassifier::default().classify_event(&event).await.unwrap());
    }
}
