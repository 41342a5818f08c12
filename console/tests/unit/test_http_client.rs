//! HTTP client against an in-process fake backend

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use station_api::models::TaskRequest;
use stationctl::errors::ConsoleError;
use stationctl::http::client::HttpClient;
use stationctl::models::scenario::Scenario;
use tokio::net::TcpListener;
use tokio_test::assert_ok;

type Log = Arc<Mutex<Vec<String>>>;

fn cookie(headers: &HeaderMap) -> String {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string()
}

async fn list(State(log): State<Log>, headers: HeaderMap) -> Json<Value> {
    log.lock().unwrap().push(format!("GET /scenarios {}", cookie(&headers)));
    Json(json!({"scenarios": [
        {"name": "fill", "description": "Fill C1"},
        {"name": "drain"}
    ]}))
}

async fn fetch(Path(name): Path<String>) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if name == "ghost" {
        return Err((StatusCode::NOT_FOUND, Json(json!({"detail": "Scenario not found"}))));
    }
    Ok(Json(json!({
        "description": "Fill C1",
        "initial_conditions": {"operator": "and", "conditionlist": [
            {"type": "less", "measurement": "water_level", "field": "C1", "value": 5}
        ]},
        "tasks": [{"action": "is_on", "target": "P1", "value": 1}]
    })))
}

async fn save(
    State(log): State<Log>,
    Path(name): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let tasks = body["tasks"].as_array().map_or(0, |t| t.len());
    log.lock()
        .unwrap()
        .push(format!("PUT /scenario/{} {} {}", name, cookie(&headers), tasks));
    StatusCode::NO_CONTENT
}

async fn remove(State(log): State<Log>, Path(name): Path<String>) -> StatusCode {
    log.lock().unwrap().push(format!("DELETE /scenario/{}", name));
    StatusCode::OK
}

async fn play(
    State(log): State<Log>,
    Path((station, name)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<StatusCode, (StatusCode, String)> {
    log.lock().unwrap().push(format!("POST /scenario/{}/{} {}", station, name, body));
    match name.as_str() {
        "blocked" => Err((StatusCode::BAD_REQUEST, "preconditions".to_string())),
        "broken" => Err((StatusCode::INTERNAL_SERVER_ERROR, "station offline".to_string())),
        _ => Ok(StatusCode::OK),
    }
}

async fn task(Path(station): Path<String>, Json(body): Json<TaskRequest>) -> StatusCode {
    if station == "testworkstation" && body.target.starts_with('V') {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CONFLICT
    }
}

async fn fake_backend() -> (String, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/scenarios", get(list))
        .route("/scenario/{name}", get(fetch).put(save).delete(remove))
        .route("/scenario/{station}/{name}", post(play))
        .route("/task/{station}", post(task))
        .with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), log)
}

#[tokio::test]
async fn test_list_sends_cookie() {
    let (url, log) = fake_backend().await;
    let client = HttpClient::new(&url, None).unwrap();

    let listings = assert_ok!(client.list_scenarios("sid=abc").await);
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[1].name, "drain");
    assert_eq!(listings[1].description, "");
    assert_eq!(log.lock().unwrap().clone(), vec!["GET /scenarios sid=abc"]);
}

#[tokio::test]
async fn test_get_fills_in_name() {
    let (url, _) = fake_backend().await;
    let client = HttpClient::new(&url, None).unwrap();

    let scenario = assert_ok!(client.get_scenario("fill", "sid=abc").await);
    assert_eq!(scenario.name, "fill");
    assert_eq!(scenario.tasks.len(), 1);
}

#[tokio::test]
async fn test_get_missing_uses_detail_message() {
    let (url, _) = fake_backend().await;
    let client = HttpClient::new(&url, None).unwrap();

    match client.get_scenario("ghost", "").await {
        Err(ConsoleError::RequestError { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Scenario not found");
        }
        other => panic!("unexpected result: {:?}", other.map(|s| s.name)),
    }
}

#[tokio::test]
async fn test_save_puts_document_under_name() {
    let (url, log) = fake_backend().await;
    let client = HttpClient::new(&url, None).unwrap();
    let scenario: Scenario = serde_json::from_value(json!({
        "name": "fill tank",
        "initial_conditions": {"operator": "or", "conditionlist": []},
        "tasks": [
            {"action": "is_on", "target": "P1", "value": 1},
            {"action": "is_on", "target": "P1", "value": 0, "ttl": 30}
        ]
    }))
    .unwrap();

    assert_ok!(client.save_scenario(&scenario, "sid=abc").await);
    assert_eq!(log.lock().unwrap().clone(), vec!["PUT /scenario/fill tank sid=abc 2"]);
}

#[tokio::test]
async fn test_delete_and_play_paths() {
    let (url, log) = fake_backend().await;
    let client = HttpClient::new(&url, None).unwrap();

    assert_ok!(client.delete_scenario("fill", "sid=abc").await);
    assert_ok!(client.play_scenario("testworkstation", "fill", "sid=abc").await);

    assert_eq!(
        log.lock().unwrap().clone(),
        vec!["DELETE /scenario/fill", "POST /scenario/testworkstation/fill {}"]
    );
}

#[tokio::test]
async fn test_play_rejections_keep_status_and_body() {
    let (url, _) = fake_backend().await;
    let client = HttpClient::new(&url, None).unwrap();

    let err = client.play_scenario("testworkstation", "blocked", "").await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(!err.is_auth_rejection());

    let err = client.play_scenario("testworkstation", "broken", "").await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message(), "station offline");
}

#[tokio::test]
async fn test_task_returns_status_code() {
    let (url, _) = fake_backend().await;
    let client = HttpClient::new(&url, None).unwrap();

    let open = TaskRequest {
        action: "is_open".to_string(),
        target: "V3".to_string(),
        value: 1.0,
    };
    assert_eq!(assert_ok!(client.submit_task("testworkstation", &open, "").await), 202);

    let pump = TaskRequest {
        action: "is_on".to_string(),
        target: "P2".to_string(),
        value: 0.0,
    };
    assert_eq!(assert_ok!(client.submit_task("testworkstation", &pump, "").await), 409);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(&format!("http://{}", addr), None).unwrap();
    let err = client.list_scenarios("").await.unwrap_err();
    assert!(matches!(err, ConsoleError::HttpError(_)));
    assert_eq!(err.status(), None);
}
