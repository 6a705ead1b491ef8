use super::model::{EventRecord, FoodStatus};
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub total: usize,
    pub with_food: usize,
    pub without_food: usize,
    pub not_analyzed: usize,
    pub free: usize,
    pub paid: usize,
}

impl EventStats {
    pub fn from_events(events: &[EventRecord]) -> Self {
        let mut stats = EventStats {
            total: events.len(),
            ..Default::default()
        };

        for event in events {
            match event.food {
                FoodStatus::Food => stats.with_food += 1,
                FoodStatus::NoFood => stats.without_food += 1,
                FoodStatus::Unclassified => stats.not_analyzed += 1,
            }

            if event.is_free() {
                stats.free += 1;
            }
        }

        stats.paid = stats.total - stats.free;
        stats
    }

    /// Share of events with food, rounded to one decimal place
    pub fn food_percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }

        let percentage = self.with_food as f64 / self.total as f64 * 100.0;

        (percentage * 10.0).round() / 10.0
    }
}
