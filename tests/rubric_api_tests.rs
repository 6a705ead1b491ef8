use axum::routing::post;
use axum::{Form, Router};
use freefood::events::model::FoodStatus;
use freefood::events::store::EventStore;
use freefood::rubric::api::{APIError, RubricAPI};
use freefood::rubric::collector::collect;
use freefood::rubric::dto::SearchQuery;
use serde_json::{json, Value};
use std::collections::HashMap;
use tempfile::TempDir;
use tokio::net::TcpListener;

async fn search(Form(form): Form<HashMap<String, String>>) -> String {
    let details: Value = serde_json::from_str(&form["details"]).unwrap();

    assert_eq!(form["endpoint"], "getUnifiedSearch");
    assert_eq!(details["desiredType"], json!("events"));

    json!({
        "success": true,
        "limit": details["limit"],
        "results": [
            {"title": "Pizza Night", "month": "March", "day": "4", "destination": "/event/pizza"},
            {"title": "Quiz", "month": "March", "day": "5", "destination": "/event/quiz"}
        ]
    })
    .to_string()
}

async fn start(response: Router) -> RubricAPI {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, response).await.unwrap();
    });

    RubricAPI::new(&format!("http://{}/", addr))
}

#[test_log::test(tokio::test)]
async fn should_get_events_with_metadata() {
    let api = start(Router::new().route("/", post(search))).await;

    let envelope = api
        .get_events(&SearchQuery {
            limit: 5,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(envelope.results.len(), 2);
    assert_eq!(envelope.results[0].title(), Some("Pizza Night"));
    assert_eq!(
        envelope.metadata().collect::<Vec<_>>(),
        vec![
            (&"success".to_string(), &json!(true)),
            (&"limit".to_string(), &json!(5))
        ]
    );
}

#[test_log::test(tokio::test)]
async fn should_reject_response_without_results() {
    let api = start(Router::new().route("/", post(|| async { "<html>blocked</html>" }))).await;

    let result = api.get_events(&SearchQuery::default()).await;

    assert!(matches!(result, Err(APIError::InvalidResponse(_))), "{:?}", result);
}

#[test_log::test(tokio::test)]
async fn should_collect_into_events_file_keeping_food_statuses() {
    let api = start(Router::new().route("/", post(search))).await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("event_data.json");
    std::fs::write(
        &path,
        json!({"results": [{"title": "Pizza Night", "destination": "/event/pizza", "free_food": true}]})
            .to_string(),
    )
    .unwrap();
    let store = EventStore::new(&path);

    let count = collect(&api, &SearchQuery::default(), &store).await.unwrap();

    assert_eq!(count, 2);

    let saved = store.load().await.unwrap();
    assert_eq!(saved.results[0].food, FoodStatus::Food);
    assert_eq!(saved.results[1].food, FoodStatus::Unclassified);
}
