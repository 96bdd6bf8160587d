use super::*;
use crate::api::tests::{BASE, TestApi, test_api};
use crate::stores::test_support::loading_probe;
use crate::transport::MockHttpClient;
use crate::web::MemoryStorage;
use serde_json::json;
use travel_planner_shared::NaiveDate;
use travel_planner_shared::protocol::HttpMethod;

// =========================================================
// 辅助函数
// =========================================================

type TestStore = ItineraryStore<MockHttpClient, MemoryStorage>;

fn itinerary_json(id: &str, destination: &str) -> serde_json::Value {
    json!({
        "id": id,
        "destination": destination,
        "start_date": "2024-03-15",
        "end_date": "2024-03-17",
        "budget": 5000.0,
        "daily_itinerary": [],
        "total_estimated_cost": 1500.0
    })
}

fn create_store() -> TestStore {
    ItineraryStore::new(Arc::new(test_api()))
}

fn api(store: &TestStore) -> &TestApi {
    &store.api
}

fn list_url() -> String {
    format!("{BASE}/itineraries/")
}

fn new_request() -> ItineraryRequest {
    ItineraryRequest {
        destination: "Hangzhou".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 4, 3).unwrap(),
        budget: 3000.0,
        preferences: Vec::new(),
        additional_notes: None,
    }
}

async fn seeded_store(ids: &[&str]) -> TestStore {
    let store = create_store();
    let list: Vec<_> = ids.iter().map(|id| itinerary_json(id, "Beijing")).collect();
    api(&store)
        .transport()
        .mock_response(HttpMethod::Get, &list_url(), 200, json!(list));
    store.fetch_itineraries().await;
    store
}

fn ids(state: &ItineraryState) -> Vec<String> {
    state
        .itineraries
        .iter()
        .map(|i| i.id.clone().unwrap_or_default())
        .collect()
}

// =========================================================
// fetch 测试
// =========================================================

#[tokio::test]
async fn test_fetch_itineraries_populates_list() {
    let store = seeded_store(&["a", "b"]).await;

    let state = store.snapshot();
    assert_eq!(ids(&state), vec!["a", "b"]);
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[tokio::test]
async fn test_loading_true_only_while_request_in_flight() {
    let store = create_store();
    api(&store)
        .transport()
        .mock_response(HttpMethod::Get, &list_url(), 200, json!([]));
    let (probe, seen) = loading_probe(&store.state(), |s: &ItineraryState| s.loading);
    api(&store).transport().on_send(move |_| probe());

    assert!(!store.snapshot().loading);
    store.fetch_itineraries().await;

    assert_eq!(*seen.borrow(), vec![true]);
    assert!(!store.snapshot().loading);
}

#[tokio::test]
async fn test_fetch_failure_is_recorded_not_returned() {
    let store = create_store();
    api(&store).transport().mock_response(
        HttpMethod::Get,
        &list_url(),
        500,
        json!({ "detail": "Error fetching itineraries: db down" }),
    );

    // 读取类动作不返回错误
    store.fetch_itineraries().await;

    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("Error fetching itineraries: db down"));
    assert!(!state.loading);
    assert!(state.itineraries.is_empty());
}

#[tokio::test]
async fn test_error_cleared_by_next_successful_action() {
    let store = create_store();
    api(&store)
        .transport()
        .mock_network_error(HttpMethod::Get, &list_url(), "offline");
    store.fetch_itineraries().await;
    assert!(store.snapshot().error.is_some());

    api(&store).transport().mock_response(
        HttpMethod::Get,
        &format!("{BASE}/itineraries/x"),
        200,
        itinerary_json("x", "Xi'an"),
    );
    store.fetch_itinerary("x").await;

    let state = store.snapshot();
    assert_eq!(state.error, None);
    assert_eq!(state.current_itinerary.unwrap().destination, "Xi'an");
}

// =========================================================
// create / delete 测试
// =========================================================

#[tokio::test]
async fn test_create_prepends_new_itinerary() {
    let store = seeded_store(&["a", "b"]).await;
    api(&store)
        .transport()
        .mock_response(HttpMethod::Post, &list_url(), 201, itinerary_json("c", "Hangzhou"));

    let created = store.create_itinerary(&new_request()).await.unwrap();

    assert!(created.has_id("c"));
    assert_eq!(ids(&store.snapshot()), vec!["c", "a", "b"]);
}

#[tokio::test]
async fn test_create_failure_is_recorded_and_returned() {
    let store = seeded_store(&["a"]).await;
    api(&store).transport().mock_response(
        HttpMethod::Post,
        &list_url(),
        500,
        json!({ "detail": "Error creating itinerary: llm timeout" }),
    );

    let err = store.create_itinerary(&new_request()).await.unwrap_err();

    let state = store.snapshot();
    assert_eq!(state.error, Some(err.to_string()));
    assert!(!state.loading);
    assert_eq!(ids(&state), vec!["a"]);
}

#[tokio::test]
async fn test_create_from_text_prepends_generated_itinerary() {
    let store = seeded_store(&["a"]).await;
    api(&store).transport().mock_response(
        HttpMethod::Post,
        &format!("{BASE}/itineraries/from-text"),
        201,
        json!({
            "itinerary": itinerary_json("t", "Tokyo"),
            "prompt": "Create a detailed 5-day travel itinerary for Tokyo",
            "parsed_request": {
                "destination": "Tokyo",
                "start_date": "2024-07-01",
                "end_date": "2024-07-05",
                "budget": 8000.0,
                "preferences": ["food", "cultural"]
            }
        }),
    );

    let request = ItineraryTextRequest {
        text: "我想带孩子去东京玩 5 天，预算 8000 元".to_string(),
        language: "zh".to_string(),
        start_date: None,
        duration_days: None,
    };
    let generated = store.create_itinerary_from_text(&request).await.unwrap();

    assert_eq!(generated.parsed_request.budget, 8000.0);
    assert_eq!(ids(&store.snapshot()), vec!["t", "a"]);
}

#[tokio::test]
async fn test_delete_removes_only_matching_id() {
    let store = seeded_store(&["a", "b", "c", "d"]).await;
    api(&store)
        .transport()
        .mock_empty(HttpMethod::Delete, &format!("{BASE}/itineraries/b"), 204);

    store.delete_itinerary("b").await.unwrap();

    assert_eq!(ids(&store.snapshot()), vec!["a", "c", "d"]);
}

#[tokio::test]
async fn test_delete_failure_keeps_list() {
    let store = seeded_store(&["a", "b"]).await;
    // 未登记 DELETE 响应，Mock 返回 404

    let err = store.delete_itinerary("b").await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    let state = store.snapshot();
    assert_eq!(ids(&state), vec!["a", "b"]);
    assert_eq!(state.error.as_deref(), Some("Not Found"));
}

#[tokio::test]
async fn test_fetch_budget_status() {
    let store = create_store();
    api(&store).transport().mock_response(
        HttpMethod::Get,
        &format!("{BASE}/itineraries/a/budget-status"),
        200,
        json!({
            "itinerary_id": "a",
            "planned_budget": 5000.0,
            "estimated_cost": 1500.0,
            "actual_spent": 0.0,
            "remaining": 5000.0,
            "spent_percentage": 0.0,
            "expense_breakdown": {}
        }),
    );

    store.fetch_budget_status("a").await;

    assert_eq!(store.snapshot().budget_status.unwrap().planned_budget, 5000.0);
}
