use crate::events::model::{EventRecord, FoodStatus};
use crate::events::stats::EventStats;
use voca_rs::escape::escape_html;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; }
nav a { margin-right: 1rem; }
.cards { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 1rem; }
.card { border: 1px solid #ddd; border-radius: 8px; padding: 1rem; }
.card h2 { font-size: 1.1rem; margin: 0 0 .5rem; }
.badge { display: inline-block; border-radius: 4px; padding: 0 .4rem; font-size: .85rem; }
.food { background: #d4f7d4; }
.no-food { background: #eee; }
.unknown { background: #fff3c4; }
"#;

pub const CALENDAR_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Campus Events Calendar</title>
  <script src="https://cdn.jsdelivr.net/npm/fullcalendar@6.1.15/index.global.min.js"></script>
  <script>
    document.addEventListener('DOMContentLoaded', function () {
      const calendar = new FullCalendar.Calendar(document.getElementById('calendar'), {
        initialView: 'dayGridMonth',
        events: '/events',
        eventClick: function (info) {
          if (info.event.url) {
            window.open(info.event.url, '_blank');
            info.jsEvent.preventDefault();
          }
        }
      });
      calendar.render();
    });
  </script>
</head>
<body>
  <div id="calendar"></div>
</body>
</html>
"#;

pub fn events_page(events: &[EventRecord], food_count: usize, food_only: bool) -> String {
    let heading = if food_only {
        "Events with Free Food"
    } else {
        "Campus Events"
    };

    let body = if events.is_empty() {
        "<p>No events found.</p>".to_string()
    } else {
        let cards: String = events.iter().map(event_card).collect();
        format!(
            "<p>{} events, {} with free food</p>\n<div class=\"cards\">\n{}</div>",
            events.len(),
            food_count,
            cards
        )
    };

    page(heading, &body)
}

pub fn stats_page(stats: &EventStats) -> String {
    let body = format!(
        r#"<ul>
  <li><strong>Total Events:</strong> {}</li>
  <li><strong>Events with Free Food:</strong> {} ({:.1}%)</li>
  <li><strong>Events without Food:</strong> {}</li>
  <li><strong>Events Not Analyzed:</strong> {}</li>
  <li><strong>Free Events:</strong> {}</li>
  <li><strong>Paid Events:</strong> {}</li>
</ul>
<p><a href="/">&larr; Back to Events</a></p>"#,
        stats.total,
        stats.with_food,
        stats.food_percentage(),
        stats.without_food,
        stats.not_analyzed,
        stats.free,
        stats.paid
    );

    page("Campus Events Statistics", &body)
}

fn event_card(event: &EventRecord) -> String {
    let (badge_class, badge) = match event.food {
        FoodStatus::Food => ("food", "Free food"),
        FoodStatus::NoFood => ("no-food", "No food"),
        FoodStatus::Unclassified => ("unknown", "Not analyzed"),
    };

    let title = escape_html(event.title().unwrap_or("No title"));
    let title = match event.url() {
        Some(url) => format!("<a href=\"{}\">{}</a>", escape_html(&url), title),
        None => title,
    };

    format!(
        r#"<div class="card">
  <h2>{}</h2>
  <p>{} {} &middot; {}</p>
  <p>{}</p>
  <span class="badge {}">{}</span>
</div>
"#,
        title,
        escape_html(event.month().unwrap_or_default()),
        event.day().map(|day| day.to_string()).unwrap_or_default(),
        escape_html(event.society_name().unwrap_or_default()),
        escape_html(event.info().unwrap_or_default()),
        badge_class,
        badge
    )
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>{STYLE}</style>
</head>
<body>
<nav><a href="/">All events</a><a href="/food-events">Free food</a><a href="/stats">Stats</a><a href="/calendar">Calendar</a></nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test_log::test]
    fn should_escape_event_text() {
        let event: EventRecord = serde_json::from_value(json!({
            "title": "<script>alert(1)</script>",
            "free_food": true
        }))
        .unwrap();

        let html = events_page(&[event], 1, false);

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"<span class="badge food">Free food</span>"#));
    }
}
