use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use taskpad::error::AppError;
use taskpad::models::Todo;
use taskpad::remote::{CrudHttpClient, StoreConfig, TodoStore};

/// Stand-in for a CrudCrud collection: stores raw JSON documents under `_id`.
#[derive(Clone, Default)]
struct FakeCrud {
    docs: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<Mutex<u32>>,
    /// Bodies received by PUT, kept for inspection.
    puts: Arc<Mutex<Vec<Value>>>,
}

fn router(state: FakeCrud) -> Router {
    Router::new()
        .route("/api/key/todos", get(list).post(create))
        .route("/api/key/todos/{id}", get(fetch).put(replace).delete(remove))
        .with_state(state)
}

async fn list(State(state): State<FakeCrud>) -> Json<Vec<Value>> {
    Json(state.docs.lock().unwrap().clone())
}

async fn fetch(State(state): State<FakeCrud>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    state
        .docs
        .lock()
        .unwrap()
        .iter()
        .find(|d| d["_id"] == id.as_str())
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create(State(state): State<FakeCrud>, Json(mut body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body.get("_id").is_some() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "_id not allowed" })));
    }
    let id = {
        let mut next = state.next_id.lock().unwrap();
        *next += 1;
        format!("doc{}", *next)
    };
    body["_id"] = json!(id);
    state.docs.lock().unwrap().push(body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn replace(State(state): State<FakeCrud>, Path(id): Path<String>, Json(mut body): Json<Value>) -> StatusCode {
    state.puts.lock().unwrap().push(body.clone());
    if body.get("_id").is_some() {
        return StatusCode::BAD_REQUEST;
    }
    let mut docs = state.docs.lock().unwrap();
    match docs.iter_mut().find(|d| d["_id"] == id.as_str()) {
        Some(doc) => {
            body["_id"] = json!(id);
            *doc = body;
            // CrudCrud replies to PUT with an empty 200
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn remove(State(state): State<FakeCrud>, Path(id): Path<String>) -> StatusCode {
    let mut docs = state.docs.lock().unwrap();
    let before = docs.len();
    docs.retain(|d| d["_id"] != id.as_str());
    if docs.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn start_fake(state: FakeCrud) -> CrudHttpClient {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake store");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.ok();
    });

    let config = StoreConfig::new(format!("http://{}/api/key/todos/", addr)).expect("valid url");
    CrudHttpClient::new(config).expect("Failed to create client")
}

#[tokio::test]
async fn test_create_then_list() {
    let client = start_fake(FakeCrud::default()).await;

    assert!(client.list_all().await.unwrap().is_empty());

    let created = client
        .create(&Todo::new("Write report", "draft", "2024-05-01", "2024-05-03"))
        .await
        .expect("create");
    assert_eq!(created.id.as_deref(), Some("doc1"));
    assert_eq!(created.due_by, "2024-05-03");

    let todos = client.list_all().await.expect("list");
    assert_eq!(todos, vec![created]);
}

#[tokio::test]
async fn test_update_sends_body_without_id() {
    let fake = FakeCrud::default();
    let client = start_fake(fake.clone()).await;

    let mut todo = client.create(&Todo::new("Old", "", "", "")).await.unwrap();
    todo.title = "New".to_string();
    client.update(&todo).await.expect("update with empty reply body");

    let puts = fake.puts.lock().unwrap().clone();
    assert_eq!(puts.len(), 1);
    assert!(puts[0].get("_id").is_none());
    assert_eq!(puts[0]["title"], "New");
    assert_eq!(puts[0]["dueBy"], "");

    let fetched = client.get(todo.id.as_deref().unwrap()).await.expect("get");
    assert_eq!(fetched.title, "New");
}

#[tokio::test]
async fn test_update_unsaved_todo_is_refused_locally() {
    let fake = FakeCrud::default();
    let client = start_fake(fake.clone()).await;

    let result = client.update(&Todo::new("Nope", "", "", "")).await;
    assert!(matches!(result, Err(AppError::NotPersisted)));
    assert!(fake.puts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_and_missing_ids() {
    let client = start_fake(FakeCrud::default()).await;

    let todo = client.create(&Todo::new("Temp", "", "", "")).await.unwrap();
    let id = todo.id.unwrap();
    client.remove(&id).await.expect("remove");

    assert!(client.list_all().await.unwrap().is_empty());
    assert!(matches!(client.remove(&id).await, Err(AppError::NotFound)));
    assert!(matches!(client.get(&id).await, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_sentinel_dates_survive_the_wire() {
    let fake = FakeCrud::default();
    fake.docs.lock().unwrap().push(json!({
        "_id": "imported",
        "title": "Imported",
        "notes": "bulk",
        "when": "2024-05-01T",
        "dueBy": "2024-05-02T"
    }));
    let client = start_fake(fake).await;

    let todos = client.list_all().await.unwrap();
    assert_eq!(todos[0].when, "2024-05-01T");
    assert_eq!(todos[0].formatted_due_by(), "2024-05-02");
}

#[tokio::test]
async fn test_unreachable_store_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = StoreConfig::new(format!("http://{}/todos", addr)).unwrap();
    let client = CrudHttpClient::new(config).unwrap();

    assert!(matches!(client.list_all().await, Err(AppError::Http(_))));
}

#[tokio::test]
async fn test_null_field_does_not_hide_the_collection() {
    let fake = FakeCrud::default();
    {
        let mut docs = fake.docs.lock().unwrap();
        docs.push(json!({ "_id": "good", "title": "Fine", "notes": "", "when": "", "dueBy": "" }));
        docs.push(json!({ "_id": "bad", "title": "Half-written", "notes": null, "when": null, "dueBy": 20240501 }));
    }
    let client = start_fake(fake).await;

    let todos = client.list_all().await.expect("list despite null fields");
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[1].title, "Half-written");
    assert_eq!(todos[1].notes, "");
    assert_eq!(todos[1].when, "");
    assert_eq!(todos[1].due_by, "20240501");

    // the odd record can still be removed
    client.remove("bad").await.expect("remove");
    assert_eq!(client.list_all().await.unwrap().len(), 1);
}
