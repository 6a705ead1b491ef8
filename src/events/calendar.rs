use super::model::EventRecord;
use chrono::{Month, NaiveDate};
use serde::Serialize;
use tracing::warn;

/// Entry in the format FullCalendar expects from an event source
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub title: String,
    pub start: NaiveDate,
    pub url: Option<String>,
    pub extended_props: CalendarProps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarProps {
    pub society: Option<String>,
    pub info: Option<String>,
}

/**
Builds calendar entries for the given year.
Listings only carry a month name and a day, so events whose date can't be built are left out.
*/
pub fn calendar_entries(events: &[EventRecord], year: i32) -> Vec<CalendarEntry> {
    events
        .iter()
        .filter_map(|event| {
            let Some(start) = event_date(event, year) else {
                warn!(
                    "Skipping '{}': invalid date ({:?} {:?})",
                    event.title().unwrap_or_default(),
                    event.month(),
                    event.fields.get("day")
                );
                return None;
            };

            Some(CalendarEntry {
                title: event.title().unwrap_or_default().to_string(),
                start,
                url: event.url(),
                extended_props: CalendarProps {
                    society: event.society_name().map(str::to_string),
                    info: event.info().map(str::to_string),
                },
            })
        })
        .collect()
}

fn event_date(event: &EventRecord, year: i32) -> Option<NaiveDate> {
    let month = event.month()?.trim().parse::<Month>().ok()?;

    NaiveDate::from_ymd_opt(year, month.number_from_month(), event.day()?)
}
