//! Handler tests for the Events domain
//!
//! The router runs against the in-memory store, so these cover request
//! parsing, validation, status codes and the error body without a database.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::ErrorResponse;
use chrono::{Duration, Utc};
use domain_events::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    handlers::router(EventService::new(InMemoryEventRepository::new()))
}

async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn workshop() -> Value {
    json!({
        "title": "Workshop",
        "eventAt": Utc::now() + Duration::days(1),
        "location": "Room 1"
    })
}

async fn create(app: &Router, body: Value) -> EventResponse {
    let response = app
        .clone()
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    json_body(response.into_body()).await
}

#[tokio::test]
async fn test_event_lifecycle_create_get_delete() {
    let app = app();

    let created = create(&app, workshop()).await;
    assert!(created.id > 0);
    assert_eq!(created.title, "Workshop");
    assert_eq!(created.location.as_deref(), Some("Room 1"));

    let uri = format!("/{}", created.id);
    let response = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched: EventResponse = json_body(response.into_body()).await;
    assert_eq!(fetched, created);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &uri))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.status, 400);
    assert_eq!(
        error.details,
        json!(format!("Event not found with id: {}", created.id))
    );
}

#[tokio::test]
async fn test_response_uses_camel_case_and_hides_internal_fields() {
    let app = app();

    let response = app
        .oneshot(json_request("POST", "/", workshop()))
        .await
        .unwrap();
    let body: Value = json_body(response.into_body()).await;

    assert!(body.get("eventAt").is_some());
    assert!(body.get("createdAt").is_some());
    assert!(body.get("deleted").is_none());
    assert!(body.get("updatedAt").is_none());
}

#[tokio::test]
async fn test_create_with_empty_title_is_rejected() {
    let mut body = workshop();
    body["title"] = json!("");

    let response = app()
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.message, "Validation error");
    assert!(error.details.get("title").is_some());
}

#[tokio::test]
async fn test_create_in_the_past_is_rejected() {
    let mut body = workshop();
    body["eventAt"] = json!(Utc::now() - Duration::days(1));

    let response = app()
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(
        error.details["eventAt"][0],
        "EventAt must be now or in the future"
    );
    assert!(error.details.get("event_at").is_none());
}

#[tokio::test]
async fn test_create_without_location_is_rejected() {
    let body = json!({
        "title": "Workshop",
        "eventAt": Utc::now() + Duration::days(1)
    });

    let response = app()
        .oneshot(json_request("POST", "/", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert!(error.details.get("location").is_some());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert_eq!(error.status, 400);
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    for uri in ["/abc", "/0", "/-4"] {
        let response = app().oneshot(empty_request("GET", uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {uri}");
    }
}

#[tokio::test]
async fn test_update_replaces_fields() {
    let app = app();
    let created = create(&app, workshop()).await;

    let update = json!({
        "title": "  Meetup ",
        "description": "Bring a laptop",
        "eventAt": Utc::now() + Duration::days(3),
        "location": "Hall"
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", &format!("/{}", created.id), update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let updated: EventResponse = json_body(response.into_body()).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "Meetup");
    assert_eq!(updated.description.as_deref(), Some("Bring a laptop"));
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_with_invalid_body_keeps_stored_event() {
    let app = app();
    let created = create(&app, workshop()).await;
    let uri = format!("/{}", created.id);

    let update = json!({
        "title": "x".repeat(101),
        "eventAt": Utc::now() + Duration::days(3),
        "location": "Hall"
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, update))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: ErrorResponse = json_body(response.into_body()).await;
    assert!(error.details.get("title").is_some());

    let response = app.oneshot(empty_request("GET", &uri)).await.unwrap();
    let fetched: EventResponse = json_body(response.into_body()).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_update_unknown_event_is_bad_request() {
    let response = app()
        .oneshot(json_request("PUT", "/404", workshop()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_twice_is_bad_request() {
    let app = app();
    let created = create(&app, workshop()).await;
    let uri = format!("/{}", created.id);

    let first = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(first.status(), StatusCode::NO_CONTENT);

    let second = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
    assert_eq!(second.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_restore_brings_event_back() {
    let app = app();
    let created = create(&app, workshop()).await;
    let uri = format!("/{}", created.id);

    app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("POST", &format!("{uri}/restore")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_pages_live_events() {
    let app = app();
    for i in 0..3 {
        let mut body = workshop();
        body["title"] = json!(format!("Event {i}"));
        create(&app, body).await;
    }
    app.clone().oneshot(empty_request("DELETE", "/2")).await.unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/?page=0&size=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let page: EventPage = json_body(response.into_body()).await;
    assert_eq!(page.total_elements, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].title, "Event 0");
    assert!(page.first);
    assert!(!page.last);

    let response = app.clone().oneshot(empty_request("GET", "/")).await.unwrap();
    let page: EventPage = json_body(response.into_body()).await;
    assert_eq!(page.size, 20);
    let titles: Vec<&str> = page.content.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Event 0", "Event 2"]);
}

#[tokio::test]
async fn test_list_rejects_malformed_query() {
    let response = app()
        .oneshot(empty_request("GET", "/?page=-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
