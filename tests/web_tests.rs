use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use freefood::events::store::EventStore;
use freefood::web::router;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;

fn app_with_events(dir: &TempDir, events: Value) -> Router {
    let path = dir.path().join("event_data.json");
    fs::write(&path, json!({ "results": events }).to_string()).unwrap();

    router(EventStore::new(path))
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn sample_events() -> Value {
    json!([
        {"title": "Pizza Night", "info": "Free", "month": "March", "day": 4, "destination": "/event/pizza", "free_food": true},
        {"title": "Careers Fair", "info": "FREE", "month": "March", "day": "5", "destination": "/event/careers", "free_food": false},
        {"title": "Formal", "info": "$80.00", "month": "Smarch", "day": 6, "destination": "/event/formal"}
    ])
}

#[test_log::test(tokio::test)]
async fn should_list_all_events_with_food_badges() {
    let dir = TempDir::new().unwrap();

    let (status, body) = get(app_with_events(&dir, sample_events()), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Pizza Night"));
    assert!(body.contains("Careers Fair"));
    assert!(body.contains("Formal"));
    assert!(body.contains("3 events, 1 with free food"));
    assert!(body.contains("Not analyzed"));
}

#[test_log::test(tokio::test)]
async fn should_list_only_events_with_food() {
    let dir = TempDir::new().unwrap();

    let (status, body) = get(app_with_events(&dir, sample_events()), "/food-events").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Pizza Night"));
    assert!(!body.contains("Careers Fair"));
    assert!(!body.contains("Formal"));
}

#[test_log::test(tokio::test)]
async fn should_report_statistics() {
    let dir = TempDir::new().unwrap();

    let (status, body) = get(app_with_events(&dir, sample_events()), "/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<strong>Total Events:</strong> 3"));
    assert!(body.contains("<strong>Events with Free Food:</strong> 1 (33.3%)"));
    assert!(body.contains("<strong>Events without Food:</strong> 1"));
    assert!(body.contains("<strong>Events Not Analyzed:</strong> 1"));
    assert!(body.contains("<strong>Free Events:</strong> 2"));
    assert!(body.contains("<strong>Paid Events:</strong> 1"));
}

#[test_log::test(tokio::test)]
async fn should_return_not_found_stats_without_events() {
    let dir = TempDir::new().unwrap();
    let app = router(EventStore::new(dir.path().join("missing.json")));

    let (status, body) = get(app, "/stats").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "No events found");
}

#[test_log::test(tokio::test)]
async fn should_serve_calendar_feed_for_dated_events() {
    let dir = TempDir::new().unwrap();

    let (status, body) = get(app_with_events(&dir, sample_events()), "/events").await;

    assert_eq!(status, StatusCode::OK);

    let feed: Value = serde_json::from_str(&body).unwrap();
    let feed = feed.as_array().unwrap();
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["title"], json!("Pizza Night"));
    assert!(feed[0]["start"].as_str().unwrap().ends_with("-03-04"));
    assert_eq!(
        feed[0]["url"],
        json!("https://campus.hellorubric.com/event/pizza")
    );
    assert_eq!(feed[1]["extendedProps"]["info"], json!("FREE"));
}

#[test_log::test(tokio::test)]
async fn should_render_empty_list_for_missing_file() {
    let dir = TempDir::new().unwrap();
    let app = router(EventStore::new(dir.path().join("missing.json")));

    let (status, body) = get(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No events found."));
}
