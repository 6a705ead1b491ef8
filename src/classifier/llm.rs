use super::dto::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use super::ClassificationError;
use crate::config::model::LlmConfig;
use crate::events::model::EventRecord;
use reqwest::Client;
use std::time::Duration;
use tracing::{error, instrument, warn};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that determines if events offer food or drinks. Answer only 'true' or 'false'.";
const MAX_EVENT_TEXT_CHARS: usize = 200;
const MAX_ANSWER_TOKENS: u32 = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Asks a chat completion service whether an event offers food.
///
/// Never fails: service errors and unexpected answers are logged and read as "no food".
#[derive(Debug, Clone)]
pub struct LlmClassifier {
    client: Client,
    api_key: String,
    model: String,
    completions_url: String,
}

impl LlmClassifier {
    pub fn new(config: &LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                warn!("Failed building HTTP client ({err}), using the default one");
                Client::new()
            });

        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            completions_url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
        }
    }

    pub async fn classify_event(&self, event: &EventRecord) -> bool {
        self.classify(&event.summary_text()).await
    }

    #[instrument(skip(self))]
    pub async fn classify(&self, text: &str) -> bool {
        let text = text.trim();

        if text.is_empty() {
            warn!("Empty event text, defaulting to no food");
            return false;
        }

        match self.ask(&build_prompt(text)).await {
            Ok(answer) => parse_answer(&answer),
            Err(err) => {
                error!("Error calling classification service: {err}");
                false
            }
        }
    }

    async fn ask(&self, prompt: &str) -> Result<String, ClassificationError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_ANSWER_TOKENS,
            temperature: 0.0,
        };

        self.client
            .post(&self.completions_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatCompletionResponse>()
            .await?
            .into_answer()
            .ok_or(ClassificationError::EmptyResponse)
    }
}

pub fn build_prompt(event_text: &str) -> String {
    let event_text: String = event_text.chars().take(MAX_EVENT_TEXT_CHARS).collect();

    format!(
        "Does this event offer free food or drinks to attendees? Event: {}. Answer only 'true' or 'false'.",
        event_text
    )
}

/// Only a literal `true` counts, anything unexpected is "no food"
pub fn parse_answer(answer: &str) -> bool {
    match answer.trim().to_lowercase().as_str() {
        "true" => true,
        "false" => false,
        unexpected => {
            warn!("Unexpected classification answer: '{unexpected}', defaulting to no food");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_accept_true_regardless_of_case_and_whitespace() {
        assert!(parse_answer("TRUE"));
        assert!(parse_answer("  True\n"));
    }

    #[test_log::test]
    fn should_read_anything_but_true_as_no_food() {
        assert!(!parse_answer("false"));
        assert!(!parse_answer("maybe"));
        assert!(!parse_answer("true."));
        assert!(!parse_answer(""));
    }

    #[test_log::test]
    fn should_truncate_event_text_in_prompt() {
        let prompt = build_prompt(&"á".repeat(300));

        assert_eq!(prompt.matches('á').count(), 200);
        assert!(prompt.starts_with("Does this event offer free food or drinks to attendees? Event: "));
        assert!(prompt.ends_with(". Answer only 'true' or 'false'."));
    }

    #[test_log::test(tokio::test)]
    async fn should_not_call_service_for_empty_text() {
        let classifier = LlmClassifier::new(&LlmConfig {
            api_key: "unused".to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
        });

        assert!(!classifier.classify("   ").await);
    }
}
