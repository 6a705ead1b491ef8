use crate::classifier::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::config::model::{ClassifierConfig, Config, ConfigError, FoodStrategy, LlmConfig};
use crate::rubric::dto::SearchQuery;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

const DEFAULT_EVENTS_PATH: &str = "event_data.json";
const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([127, 0, 0, 1], 5000);

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(|name| env::var(name).ok())
}

pub fn load_config_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
    let defaults = SearchQuery::default();

    let llm = lookup("OPENAI_API_KEY")
        .filter(|key| !key.trim().is_empty())
        .map(|api_key| LlmConfig {
            api_key,
            model: load_string_config(&lookup, "OPENAI_MODEL", DEFAULT_MODEL),
            base_url: load_string_config(&lookup, "OPENAI_BASE_URL", DEFAULT_BASE_URL),
        });

    Ok(Config {
        events_path: load_string_config(&lookup, "EVENTS_PATH", DEFAULT_EVENTS_PATH).into(),
        classifier: ClassifierConfig {
            strategy: load_parsed_config(&lookup, "FOOD_STRATEGY", FoodStrategy::Keyword)?,
            fetch_event_pages: load_parsed_config(&lookup, "FETCH_EVENT_PAGES", false)?,
            llm,
        },
        search: SearchQuery {
            limit: load_parsed_config(&lookup, "RUBRIC_LIMIT", defaults.limit)?,
            university_id: load_string_config(
                &lookup,
                "RUBRIC_UNIVERSITY_ID",
                &defaults.university_id,
            ),
            state: load_string_config(&lookup, "RUBRIC_STATE", &defaults.state),
            country_code: load_string_config(&lookup, "RUBRIC_COUNTRY", &defaults.country_code),
        },
        bind_addr: load_parsed_config(
            &lookup,
            "BIND_ADDR",
            DEFAULT_BIND_ADDR.into(),
        )?,
    })
}

fn load_string_config(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: &str,
) -> String {
    lookup(name).unwrap_or_else(|| default.to_string())
}

fn load_parsed_config<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
            name,
            reason: format!("'{}' ({})", value, err),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        load_config_from(|name| vars.get(name).cloned())
    }

    #[test_log::test]
    fn should_use_defaults_when_nothing_is_set() {
        let config = load(&[]).unwrap();

        assert_eq!(config.events_path.to_str(), Some("event_data.json"));
        assert_eq!(config.classifier.strategy, FoodStrategy::Keyword);
        assert!(!config.classifier.fetch_event_pages);
        assert!(config.classifier.llm.is_none());
        assert_eq!(config.search.limit, 200);
        assert_eq!(config.search.university_id, "12");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
    }

    #[test_log::test]
    fn should_load_llm_settings_when_api_key_is_set() {
        let config = load(&[
            ("FOOD_STRATEGY", "LLM"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
        ])
        .unwrap();

        assert_eq!(config.classifier.strategy, FoodStrategy::Llm);

        let llm = config.classifier.llm.unwrap();
        assert_eq!(llm.api_key, "sk-test");
        assert_eq!(llm.model, "gpt-4o-mini");
        assert_eq!(llm.base_url, DEFAULT_BASE_URL);
    }

    #[test_log::test]
    fn should_reject_invalid_values() {
        assert!(matches!(
            load(&[("FETCH_EVENT_PAGES", "sometimes")]),
            Err(ConfigError::Invalid { name: "FETCH_EVENT_PAGES", .. })
        ));
        assert!(matches!(
            load(&[("FOOD_STRATEGY", "vibes")]),
            Err(ConfigError::Invalid { name: "FOOD_STRATEGY", .. })
        ));
        assert!(matches!(
            load(&[("RUBRIC_LIMIT", "-1")]),
            Err(ConfigError::Invalid { name: "RUBRIC_LIMIT", .. })
        ));
    }
}
