//! Integration tests for the HTTP collaborator.
//!
//! Each test starts an axum stub of the task service on an ephemeral
//! loopback port and checks the routes, bodies and error mapping the
//! client produces.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::NaiveDate;
use parking_lot::Mutex;
use serde_json::{Value, json};
use taskboard::api::http::HttpCollaborator;
use taskboard::api::{ApiError, Collaborator};
use taskboard::board::{Board, Column};
use taskboard::forms::{FormSettings, SubmitOutcome, TaskForm};
use taskboard::validation::TaskField;
use taskboard_proto::task::{NewTask, TaskId, TaskPatch, TaskPriority, TaskStatus};
use taskboard_proto::user::{NewUser, UserId};
use url::Url;

// ---------------------------------------------------------------------------
// Stub service
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
struct Seen {
    method: Method,
    path: String,
    body: Option<Value>,
}

#[derive(Clone, Default)]
struct Stub {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Stub {
    fn record(&self, method: Method, uri: &Uri, body: Option<Value>) {
        self.seen.lock().push(Seen {
            method,
            path: uri.path().to_string(),
            body,
        });
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }
}

fn stored_task(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "description": format!("tarefa {id}"),
        "name_class": "Compras",
        "priority": "mid",
        "status": status,
        "user": 1,
        "register_date": "2025-03-01",
    })
}

async fn list_tasks(State(stub): State<Stub>, uri: Uri) -> Json<Value> {
    stub.record(Method::GET, &uri, None);
    Json(json!([stored_task(1, "todo"), stored_task(2, "in_progress")]))
}

async fn create_task(State(stub): State<Stub>, uri: Uri, Json(body): Json<Value>) -> Response {
    stub.record(Method::POST, &uri, Some(body.clone()));
    if body["user"] == json!(404) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Usuário não encontrado" })),
        )
            .into_response();
    }
    let mut created = body;
    created["id"] = json!(77);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn get_task(State(stub): State<Stub>, uri: Uri, Path(id): Path<u64>) -> Response {
    stub.record(Method::GET, &uri, None);
    match id {
        1 => Json(stored_task(1, "todo")).into_response(),
        13 => (StatusCode::OK, "<html>gateway</html>").into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Tarefa não encontrada" })),
        )
            .into_response(),
    }
}

async fn update_task(
    State(stub): State<Stub>,
    uri: Uri,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(Method::PATCH, &uri, Some(body.clone()));
    let mut task = stored_task(id, "todo");
    if let (Some(task), Some(patch)) = (task.as_object_mut(), body.as_object()) {
        for (key, value) in patch {
            task.insert(key.clone(), value.clone());
        }
    }
    Json(task)
}

async fn delete_task(State(stub): State<Stub>, uri: Uri) -> StatusCode {
    stub.record(Method::DELETE, &uri, None);
    StatusCode::NO_CONTENT
}

async fn list_users(State(stub): State<Stub>, uri: Uri) -> Json<Value> {
    stub.record(Method::GET, &uri, None);
    Json(json!([{ "id": 1, "name": "Ana Souza", "email": "ana@gmail.com" }]))
}

async fn create_user(State(stub): State<Stub>, uri: Uri, Json(body): Json<Value>) -> Response {
    stub.record(Method::POST, &uri, Some(body.clone()));
    let mut created = body;
    created["id"] = json!(5);
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn start_stub() -> (Stub, HttpCollaborator) {
    let stub = Stub::default();
    let app = Router::new()
        .route("/api/v1/task/", get(list_tasks).post(create_task))
        .route(
            "/api/v1/task/{id}",
            get(get_task).patch(update_task).delete(delete_task),
        )
        .route("/api/v1/user/", get(list_users).post(create_user))
        .with_state(stub.clone());
    let addr = serve(app).await;
    // No trailing slash: the collaborator adds it.
    let url = Url::parse(&format!("http://{addr}/api/v1")).unwrap();
    let api = HttpCollaborator::new(url, Duration::from_secs(5)).unwrap();
    (stub, api)
}

// ===========================================================================
// Routes and bodies
// ===========================================================================

#[tokio::test]
async fn list_endpoints_decode_payloads() {
    let (stub, api) = start_stub().await;

    let tasks = api.list_tasks().await.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[1].status, TaskStatus::InProgress);
    assert_eq!(
        tasks[0].register_date,
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    );

    let users = api.list_users().await.unwrap();
    assert_eq!(users[0].id, UserId::new(1));
    assert_eq!(users[0].name, "Ana Souza");

    let paths: Vec<_> = stub.seen().into_iter().map(|s| s.path).collect();
    assert_eq!(paths, ["/api/v1/task/", "/api/v1/user/"]);
}

#[tokio::test]
async fn create_task_posts_json_body() {
    let (stub, api) = start_stub().await;
    let task = NewTask {
        description: "Comprar toner".to_string(),
        name_class: "Compras".to_string(),
        priority: TaskPriority::High,
        status: TaskStatus::Todo,
        user: UserId::new(1),
        register_date: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
    };

    let created = api.create_task(&task).await.unwrap();
    assert_eq!(created.id, TaskId::new(77));
    assert_eq!(created.priority, TaskPriority::High);

    let seen = stub.seen();
    assert_eq!(seen[0].method, Method::POST);
    assert_eq!(
        seen[0].body,
        Some(json!({
            "description": "Comprar toner",
            "name_class": "Compras",
            "priority": "high",
            "status": "todo",
            "user": 1,
            "register_date": "2025-03-02",
        }))
    );
}

#[tokio::test]
async fn status_patch_sends_only_status() {
    let (stub, api) = start_stub().await;
    let updated = api
        .update_task(TaskId::new(3), &TaskPatch::status(TaskStatus::Done))
        .await
        .unwrap();
    assert_eq!(updated.status, TaskStatus::Done);

    let seen = stub.seen();
    assert_eq!(seen[0].method, Method::PATCH);
    assert_eq!(seen[0].path, "/api/v1/task/3");
    assert_eq!(seen[0].body, Some(json!({ "status": "done" })));
}

#[tokio::test]
async fn delete_accepts_empty_response() {
    let (stub, api) = start_stub().await;
    api.delete_task(TaskId::new(8)).await.unwrap();
    assert_eq!(stub.seen()[0].method, Method::DELETE);
    assert_eq!(stub.seen()[0].path, "/api/v1/task/8");
}

#[tokio::test]
async fn create_user_sends_masked_phone() {
    let (stub, api) = start_stub().await;
    let user = NewUser {
        name: "Maria Silva".to_string(),
        email: "maria@gmail.com".to_string(),
        phone: Some("(21) 93456-7890".to_string()),
    };
    let created = api.create_user(&user).await.unwrap();
    assert_eq!(created.id, UserId::new(5));
    assert_eq!(
        stub.seen()[0].body.as_ref().unwrap()["phone"],
        json!("(21) 93456-7890")
    );
}

// ===========================================================================
// Error mapping
// ===========================================================================

#[tokio::test]
async fn error_detail_is_surfaced() {
    let (_stub, api) = start_stub().await;
    let err = api.get_task(TaskId::new(9)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Rejected {
            status: 404,
            detail: Some("Tarefa não encontrada".to_string()),
        }
    );
}

#[tokio::test]
async fn malformed_success_body_is_decode_error() {
    let (_stub, api) = start_stub().await;
    let err = api.get_task(TaskId::new(13)).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    assert!(!err.is_network());
}

#[tokio::test]
async fn slow_service_times_out_as_network_error() {
    async fn stall() -> StatusCode {
        tokio::time::sleep(Duration::from_secs(5)).await;
        StatusCode::OK
    }
    let addr = serve(Router::new().route("/api/v1/task/", get(stall))).await;
    let url = Url::parse(&format!("http://{addr}/api/v1/")).unwrap();
    let api = HttpCollaborator::new(url, Duration::from_millis(200)).unwrap();

    let err = api.list_tasks().await.unwrap_err();
    assert_eq!(err, ApiError::Network("request timed out".to_string()));
}

// ===========================================================================
// Controllers over HTTP
// ===========================================================================

#[tokio::test]
async fn task_form_rejection_over_http() {
    let (stub, api) = start_stub().await;
    let (mut form, _rx) = TaskForm::new(api, &FormSettings::default());
    form.set_field(TaskField::Description, "Pedir orçamento");
    form.set_field(TaskField::NameClass, "compras");
    form.set_field(TaskField::Priority, "low");
    form.set_field(TaskField::Status, "todo");
    form.set_field(TaskField::User, "404");

    let outcome = form.submit().await.unwrap();
    let SubmitOutcome::Failed(ack) = outcome else {
        panic!("expected a rejected submission");
    };
    assert_eq!(ack.message, "Erro: Usuário não encontrado");
    assert_eq!(form.input().description, "Pedir orçamento");
    assert_eq!(stub.seen().len(), 1);
}

#[tokio::test]
async fn board_drag_over_http() {
    let (stub, api) = start_stub().await;
    let (mut board, _rx) = Board::new(api, 8);
    board.reload().await.unwrap();
    assert_eq!(board.columns().column_of(TaskId::new(2)), Some(Column::InProgress));

    board.drop_task(TaskId::new(1), Column::Done).await.unwrap();
    let routes: Vec<_> = stub
        .seen()
        .into_iter()
        .map(|s| format!("{} {}", s.method, s.path))
        .collect();
    assert_eq!(
        routes,
        ["GET /api/v1/task/", "PATCH /api/v1/task/1", "GET /api/v1/task/"]
    );
}
