use crate::rubric::dto::SearchQuery;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub events_path: PathBuf,
    pub classifier: ClassifierConfig,
    pub search: SearchQuery,
    pub bind_addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub strategy: FoodStrategy,
    /// Read descriptions from event pages when a listing has none (keyword strategy only)
    pub fetch_event_pages: bool,
    /// Present when an API key is configured
    pub llm: Option<LlmConfig>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(
    strum::EnumString, strum::IntoStaticStr, strum::Display, Debug, Clone, Copy, PartialEq, Eq,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FoodStrategy {
    Keyword,
    Llm,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid config '{name}': {reason}")]
    Invalid { name: &'static str, reason: String },
}
