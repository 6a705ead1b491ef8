use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

pub const RUBRIC_SITE_URL: &str = "https://campus.hellorubric.com";

const RESULTS_KEY: &str = "results";

/// Enrichment state of a single event.
///
/// Stored in the events file as the `free_food` boolean. Anything other than a
/// boolean (including a missing key) reads as [`FoodStatus::Unclassified`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FoodStatus {
    #[default]
    Unclassified,
    Food,
    NoFood,
}

impl FoodStatus {
    pub fn from_bool(has_food: bool) -> Self {
        if has_food {
            FoodStatus::Food
        } else {
            FoodStatus::NoFood
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FoodStatus::Unclassified => None,
            FoodStatus::Food => Some(true),
            FoodStatus::NoFood => Some(false),
        }
    }

    pub fn is_classified(&self) -> bool {
        !self.is_unclassified()
    }

    pub fn is_unclassified(&self) -> bool {
        *self == FoodStatus::Unclassified
    }
}

impl Serialize for FoodStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_bool() {
            Some(has_food) => serializer.serialize_bool(has_food),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for FoodStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(has_food) => FoodStatus::from_bool(has_food),
            _ => FoodStatus::Unclassified,
        })
    }
}

/// One listing as returned by the Rubric search API.
///
/// Only `free_food` is owned by this crate, every other key is kept as-is so a
/// rewrite doesn't lose data the collector brought in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(
        rename = "free_food",
        default,
        skip_serializing_if = "FoodStatus::is_unclassified"
    )]
    pub food: FoodStatus,
}

impl EventRecord {
    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.str_field("subtitle")
    }

    pub fn society_name(&self) -> Option<&str> {
        self.str_field("societyname")
    }

    /// Price tag, e.g. "Free" or "$5.00"
    pub fn info(&self) -> Option<&str> {
        self.str_field("info")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn month(&self) -> Option<&str> {
        self.str_field("month")
    }

    /// The API is inconsistent and sends the day either as a number or a string
    pub fn day(&self) -> Option<u32> {
        match self.fields.get("day")? {
            Value::Number(day) => day.as_u64().and_then(|day| u32::try_from(day).ok()),
            Value::String(day) => day.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn destination(&self) -> Option<&str> {
        self.str_field("destination")
    }

    pub fn url(&self) -> Option<String> {
        self.destination()
            .map(|destination| format!("{}{}", RUBRIC_SITE_URL, destination))
    }

    pub fn is_free(&self) -> bool {
        self.info()
            .is_some_and(|info| info.to_lowercase().starts_with("free"))
    }

    /// Title, subtitle and society name joined by spaces
    pub fn summary_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title().unwrap_or_default(),
            self.subtitle().unwrap_or_default(),
            self.society_name().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("top level value is not an object")]
    NotAnObject,
    #[error("no 'results' array found")]
    MissingResults,
    #[error("invalid event record: {0}")]
    InvalidRecord(#[source] serde_json::Error),
}

/// Top level object of the events file.
///
/// Keeps every key of the original document in place; `results` is parsed into
/// records and written back at the position it was read from. Entries of `results`
/// that aren't objects are kept untouched, at their original index.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    document: Map<String, Value>,
    pub results: Vec<EventRecord>,
    invalid_entries: Vec<(usize, Value)>,
}

impl Envelope {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        Self::from_value(serde_json::from_slice(bytes)?)
    }

    pub fn from_value(value: Value) -> Result<Self, EnvelopeError> {
        let Value::Object(mut document) = value else {
            return Err(EnvelopeError::NotAnObject);
        };

        let entries = match document.get_mut(RESULTS_KEY).map(Value::take) {
            Some(Value::Array(entries)) => entries,
            _ => return Err(EnvelopeError::MissingResults),
        };

        let mut results = Vec::with_capacity(entries.len());
        let mut invalid_entries = Vec::new();

        for (index, entry) in entries.into_iter().enumerate() {
            match entry {
                Value::Object(_) => {
                    let record =
                        serde_json::from_value(entry).map_err(EnvelopeError::InvalidRecord)?;
                    results.push(record);
                }
                other => invalid_entries.push((index, other)),
            }
        }

        Ok(Self {
            document,
            results,
            invalid_entries,
        })
    }

    /// Metadata keys other than `results`
    pub fn metadata(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.document.iter().filter(|(key, _)| *key != RESULTS_KEY)
    }

    /// Entries of `results` that aren't event objects, with their index in the array
    pub fn invalid_entries(&self) -> &[(usize, Value)] {
        &self.invalid_entries
    }
}

/// `results` as read: records and invalid entries interleaved by their original index
struct ResultsArray<'a>(&'a Envelope);

impl Serialize for ResultsArray<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Envelope {
            results,
            invalid_entries,
            ..
        } = self.0;
        let len = results.len() + invalid_entries.len();
        let mut seq = serializer.serialize_seq(Some(len))?;

        let mut records = results.iter();
        let mut invalid = invalid_entries.iter().peekable();

        for index in 0..len {
            match invalid.next_if(|(invalid_index, _)| *invalid_index == index) {
                Some((_, entry)) => seq.serialize_element(entry)?,
                None => {
                    if let Some(record) = records.next() {
                        seq.serialize_element(record)?;
                    } else if let Some((_, entry)) = invalid.next() {
                        seq.serialize_element(entry)?;
                    }
                }
            }
        }

        seq.end()
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.document.len()))?;

        for (key, value) in &self.document {
            if key == RESULTS_KEY {
                map.serialize_entry(key, &ResultsArray(self))?;
            } else {
                map.serialize_entry(key, value)?;
            }
        }

        map.end()
    }
}
