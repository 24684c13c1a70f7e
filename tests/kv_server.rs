//! Integration tests for the key-value HTTP service.
//!
//! Each test serves the real router on a random local port and talks to it
//! over HTTP.

use koge_lib::server::{build_router, KvState};
use koge_lib::storage::Database;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

const BODY_LIMIT: usize = 10 * 1024 * 1024;

async fn start_server(state: KvState) -> SocketAddr {
    let app = build_router(state, BODY_LIMIT);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    addr
}

async fn start_with_db() -> SocketAddr {
    start_server(KvState::with_database(Database::open_in_memory().unwrap())).await
}

fn data_url(addr: SocketAddr, key: &str) -> String {
    format!("http://{}/api/data/{}", addr, key)
}

// =============================================================================
// Data routes
// =============================================================================

#[tokio::test]
async fn test_absent_key_returns_null() {
    let addr = start_with_db().await;

    let response = reqwest::get(data_url(addr, "kanban_projects")).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_save_then_get_returns_same_value() {
    let addr = start_with_db().await;
    let client = reqwest::Client::new();
    let value = json!([{"id": "p1", "name": "Website", "description": "", "createdAt": 1}]);

    let response = client
        .post(data_url(addr, "kanban_projects"))
        .json(&value)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"success": true}));

    let stored: Value = client
        .get(data_url(addr, "kanban_projects"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored, value);
}

#[tokio::test]
async fn test_last_write_wins() {
    let addr = start_with_db().await;
    let client = reqwest::Client::new();

    for value in [json!({"v": 1}), json!("plain"), json!({"v": 3})] {
        client
            .post(data_url(addr, "kanban_settings"))
            .json(&value)
            .send()
            .await
            .unwrap();
    }

    let stored: Value = reqwest::get(data_url(addr, "kanban_settings"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored, json!({"v": 3}));
}

#[tokio::test]
async fn test_delete_drops_key() {
    let addr = start_with_db().await;
    let client = reqwest::Client::new();

    client
        .post(data_url(addr, "tasks_p1"))
        .json(&json!([]))
        .send()
        .await
        .unwrap();

    let response = client.delete(data_url(addr, "tasks_p1")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"success": true, "message": "Data for tasks_p1 dropped successfully."})
    );

    let stored: Value = reqwest::get(data_url(addr, "tasks_p1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored, Value::Null);
}

#[tokio::test]
async fn test_invalid_json_body_is_rejected() {
    let addr = start_with_db().await;

    let response = reqwest::Client::new()
        .post(data_url(addr, "kanban_projects"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unparsable_row_answers_500() {
    let state = KvState::with_database(Database::open_in_memory().unwrap());
    state
        .database()
        .unwrap()
        .0
        .lock()
        .unwrap()
        .execute_batch("INSERT INTO kv_store (key, value) VALUES ('broken', '{not json')")
        .unwrap();
    let addr = start_server(state).await;

    let response = reqwest::get(data_url(addr, "broken")).await.unwrap();
    assert_eq!(response.status(), 500);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"error": "Internal server error"})
    );
}

#[tokio::test]
async fn test_encoded_key_is_stored_verbatim() {
    let state = KvState::with_database(Database::open_in_memory().unwrap());
    let addr = start_server(state.clone()).await;

    reqwest::Client::new()
        .post(format!("http://{}/api/data/tasks_a%23b%3Fc%2Fd", addr))
        .json(&json!(["b"]))
        .send()
        .await
        .unwrap();

    let db = state.database().unwrap();
    assert_eq!(db.keys().unwrap(), vec!["tasks_a#b?c/d".to_string()]);
    assert_eq!(db.get("tasks_a#b?c/d").unwrap(), Some(json!(["b"])));
}

// =============================================================================
// Initialisation
// =============================================================================

#[tokio::test]
async fn test_uninitialized_store_answers_503_until_ready() {
    let state = KvState::uninitialized();
    let addr = start_server(state.clone()).await;

    let response = reqwest::get(data_url(addr, "kanban_projects")).await.unwrap();
    assert_eq!(response.status(), 503);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"error": "Database not initialized"})
    );

    // health does not depend on the store
    let health: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health, json!({"status": "healthy"}));

    assert!(state.initialize(Database::open_in_memory().unwrap()));
    assert!(!state.initialize(Database::open_in_memory().unwrap()));

    let response = reqwest::get(data_url(addr, "kanban_projects")).await.unwrap();
    assert_eq!(response.status(), 200);
}
