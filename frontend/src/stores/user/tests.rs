use super::*;
use crate::api::tests::{BASE, test_api};
use crate::stores::test_support::loading_probe;
use crate::transport::MockHttpClient;
use crate::web::MemoryStorage;
use serde_json::json;
use travel_planner_shared::HEADER_USER_ID;
use travel_planner_shared::protocol::HttpMethod;

type TestStore = UserStore<MockHttpClient, MemoryStorage>;

fn store_with(entries: &[(&str, &str)]) -> TestStore {
    let api = ApiClient::new(BASE, MockHttpClient::new(), MemoryStorage::with(entries));
    UserStore::new(Arc::new(api))
}

fn login_payload() -> LoginRequest {
    LoginRequest {
        username: "alice".to_string(),
        password: "secret1".to_string(),
    }
}

// =========================================================
// 会话恢复
// =========================================================

#[test]
fn test_hydrate_restores_session_from_storage() {
    let store = store_with(&[(STORAGE_KEY_USER_ID, "u-1"), (STORAGE_KEY_USERNAME, "alice")]);

    assert!(store.hydrate_from_storage());

    let state = store.snapshot();
    assert_eq!(state.profile, Some(UserProfile::new("u-1", "alice")));
    assert_eq!(state.token.as_deref(), Some("u-1"));
    assert_eq!(store.api.credentials().user_id().as_deref(), Some("u-1"));
}

#[test]
fn test_hydrate_is_idempotent() {
    let store = store_with(&[(STORAGE_KEY_USER_ID, "u-1"), (STORAGE_KEY_USERNAME, "alice")]);

    store.hydrate_from_storage();
    let first = store.snapshot();
    store.hydrate_from_storage();

    assert_eq!(store.snapshot(), first);
}

#[test]
fn test_hydrate_requires_both_keys() {
    for entries in [
        vec![(STORAGE_KEY_USER_ID, "u-1")],
        vec![(STORAGE_KEY_USERNAME, "alice")],
        vec![(STORAGE_KEY_USER_ID, ""), (STORAGE_KEY_USERNAME, "alice")],
        vec![],
    ] {
        let store = store_with(&entries);

        assert!(!store.hydrate_from_storage());
        let state = store.snapshot();
        assert_eq!(state.profile, None);
        assert_eq!(state.token, None);
    }
}

#[test]
fn test_hydrate_keeps_existing_session_without_storage() {
    let store = store_with(&[]);
    store.set_session(UserProfile::new("u-9", "bob"), "u-9".to_string());

    assert!(store.hydrate_from_storage());
    assert_eq!(store.snapshot().profile.unwrap().username, "bob");
}

// =========================================================
// 会话写入与清除
// =========================================================

#[test]
fn test_clear_session_wipes_state_and_storage() {
    let store = store_with(&[
        (STORAGE_KEY_USER_ID, "u-1"),
        (STORAGE_KEY_USERNAME, "alice"),
        ("theme", "dark"),
    ]);
    store.hydrate_from_storage();

    store.clear_session();

    assert!(!store.is_authenticated());
    assert_eq!(store.snapshot().token, None);
    let storage = store.api.storage();
    assert_eq!(storage.get(STORAGE_KEY_USER_ID), None);
    assert_eq!(storage.get(STORAGE_KEY_USERNAME), None);
    assert_eq!(storage.len(), 1);
    assert_eq!(store.api.credentials().user_id(), None);
}

#[test]
fn test_set_loading_and_error() {
    let store = store_with(&[]);

    store.set_loading(true);
    store.set_error(Some("用户名或密码错误".to_string()));

    let state = store.snapshot();
    assert!(state.loading);
    assert_eq!(state.error.as_deref(), Some("用户名或密码错误"));
}

// =========================================================
// 登录 / 注册
// =========================================================

#[tokio::test]
async fn test_login_persists_and_sets_session() {
    let store = UserStore::new(Arc::new(test_api()));
    store.api.transport().mock_response(
        HttpMethod::Post,
        &format!("{BASE}/auth/login"),
        200,
        json!({ "user": { "id": "u-42", "username": "alice", "created_at": "2024-03-01T08:00:00" } }),
    );
    let (probe, seen) = loading_probe(&store.state(), |s: &UserState| s.loading);
    store.api.transport().on_send(move |_| probe());

    let profile = store.login(&login_payload()).await.unwrap();

    assert_eq!(profile.id, "u-42");
    assert_eq!(*seen.borrow(), vec![true]);
    let state = store.snapshot();
    assert!(!state.loading);
    assert_eq!(state.token.as_deref(), Some("u-42"));
    assert_eq!(store.api.storage().get(STORAGE_KEY_USER_ID).as_deref(), Some("u-42"));
    assert_eq!(store.api.storage().get(STORAGE_KEY_USERNAME).as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_requests_after_login_carry_user_header() {
    let store = UserStore::new(Arc::new(test_api()));
    store.api.transport().mock_response(
        HttpMethod::Post,
        &format!("{BASE}/auth/login"),
        200,
        json!({ "user": { "id": "u-42", "username": "alice" } }),
    );
    store.login(&login_payload()).await.unwrap();

    store.api.transport().mock_response(
        HttpMethod::Get,
        &format!("{BASE}/itineraries/"),
        200,
        json!([]),
    );
    store.api.itineraries().get_itineraries(20).await.unwrap();

    let req = store.api.transport().last_request().unwrap();
    assert_eq!(req.header(HEADER_USER_ID), Some("u-42"));
}

#[tokio::test]
async fn test_login_failure_recorded_and_returned() {
    let store = UserStore::new(Arc::new(test_api()));
    store.api.transport().mock_response(
        HttpMethod::Post,
        &format!("{BASE}/auth/login"),
        401,
        json!({ "detail": "用户名或密码错误" }),
    );

    let err = store.login(&login_payload()).await.unwrap_err();

    assert_eq!(err.status_code(), Some(401));
    let state = store.snapshot();
    assert_eq!(state.error.as_deref(), Some("用户名或密码错误"));
    assert!(!state.loading);
    assert!(!store.is_authenticated());
    assert_eq!(store.api.storage().len(), 0);
}

#[tokio::test]
async fn test_register_sets_session() {
    let store = UserStore::new(Arc::new(test_api()));
    store.api.transport().mock_response(
        HttpMethod::Post,
        &format!("{BASE}/auth/register"),
        201,
        json!({ "user": { "id": "u-7", "username": "carol" } }),
    );

    store
        .register(&RegisterRequest {
            username: "carol".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(store.snapshot().profile, Some(UserProfile::new("u-7", "carol")));
}
