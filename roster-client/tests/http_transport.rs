// roster-client/tests/http_transport.rs
// Transport tests against a local axum backend

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use roster_client::{
    ApiResponse, ClientConfig, ClientError, Employee, EmployeeApi, EmployeeDraft, Gender,
    HttpEmployeeApi, TransportErrorKind,
};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Received {
    bodies: Arc<Mutex<Vec<Value>>>,
    content_types: Arc<Mutex<Vec<String>>>,
}

fn employee(id: i64) -> Employee {
    let at = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    Employee {
        id,
        full_name: "Dang Van C".into(),
        email: "c@example.com".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 12, 24).unwrap(),
        gender: Gender::Other,
        phone_number: "0355555555".into(),
        active: true,
        created_at: at,
        updated_at: at,
    }
}

async fn list() -> Json<ApiResponse<Vec<Employee>>> {
    Json(ApiResponse::ok(vec![employee(1), employee(2)]))
}

async fn find(Path(id): Path<i64>) -> (StatusCode, Json<Value>) {
    if id == 1 {
        (StatusCode::OK, Json(json!(ApiResponse::ok(employee(1)))))
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "success": false,
                "data": null,
                "message": format!("Employee not found with id: {id}"),
            })),
        )
    }
}

async fn create(
    State(received): State<Received>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ApiResponse<Employee>>) {
    if let Some(ct) = headers.get("content-type").and_then(|v| v.to_str().ok()) {
        received.content_types.lock().unwrap().push(ct.to_string());
    }
    received.bodies.lock().unwrap().push(body);
    (
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(employee(3), "Employee created successfully")),
    )
}

async fn update(
    State(received): State<Received>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    received.bodies.lock().unwrap().push(body);
    match id {
        // Framework default error document
        5 => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "timestamp": "2024-05-01T10:00:00.000+00:00",
                "status": 400,
                "error": "Bad Request",
                "message": "Phone number must be exactly 10 digits",
                "path": "/api/employees/5",
            })),
        ),
        // Bare failure without any message
        6 => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        // 2xx but the envelope says no
        7 => (
            StatusCode::OK,
            Json(json!({"success": false, "data": null, "message": "Update refused"})),
        ),
        _ => (
            StatusCode::OK,
            Json(json!(ApiResponse::ok_with_message(
                employee(id),
                "Employee updated successfully"
            ))),
        ),
    }
}

async fn remove(Path(_id): Path<i64>) -> Json<ApiResponse<()>> {
    Json(ApiResponse::empty("Employee deleted successfully"))
}

async fn spawn_backend(received: Received) -> String {
    let router = Router::new()
        .route("/api/employees", get(list).post(create))
        .route("/api/employees/{id}", get(find).put(update).delete(remove))
        .with_state(received);
    serve(router).await
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn api(base_url: &str) -> HttpEmployeeApi {
    let config = ClientConfig::new(base_url);
    HttpEmployeeApi::new(config.build_http_client().unwrap())
}

fn update_draft() -> EmployeeDraft {
    EmployeeDraft {
        password: String::new(),
        ..EmployeeDraft::from_employee(&employee(4))
    }
}

#[tokio::test]
async fn test_list_and_get_unwrap_envelope() {
    let base = spawn_backend(Received::default()).await;
    let api = api(&base);

    let all = api.list_all().await.unwrap();
    assert_eq!(all.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);

    let one = api.get_by_id(1).await.unwrap();
    assert_eq!(one, employee(1));
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let base = spawn_backend(Received::default()).await;
    let err = api(&base).get_by_id(7).await.unwrap_err();

    match err {
        ClientError::NotFound { id, detail } => {
            assert_eq!(id, 7);
            assert_eq!(detail, "Employee not found with id: 7");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_sends_json_with_password() {
    let received = Received::default();
    let base = spawn_backend(received.clone()).await;
    let store = ClientConfig::new(&base).build_store().unwrap();

    let draft = EmployeeDraft {
        full_name: "Dang Van C".into(),
        email: "c@example.com".into(),
        date_of_birth: "1988-12-24".into(),
        gender: "OTHER".into(),
        phone_number: "0355555555".into(),
        active: None,
        password: "p@ssw0rd".into(),
    };
    let created = store.create_one(&draft).await.unwrap();
    assert_eq!(created.id, 3);

    let body = received.bodies.lock().unwrap()[0].clone();
    assert_eq!(body["password"], "p@ssw0rd");
    assert_eq!(body["active"], true);
    assert_eq!(body["dateOfBirth"], "1988-12-24");
    assert!(
        received.content_types.lock().unwrap()[0].starts_with("application/json")
    );
}

#[tokio::test]
async fn test_update_body_has_no_email_or_empty_password() {
    let received = Received::default();
    let base = spawn_backend(received.clone()).await;
    let store = ClientConfig::new(&base).build_store().unwrap();

    store.update_one(4, &update_draft()).await.unwrap();

    let body = received.bodies.lock().unwrap()[0].clone();
    let obj = body.as_object().unwrap();
    assert!(!obj.contains_key("password"));
    assert!(!obj.contains_key("email"));
    assert_eq!(obj["fullName"], "Dang Van C");
    assert_eq!(store.cached_one(4).map(|e| e.id), Some(4));
}

#[tokio::test]
async fn test_rejections_carry_backend_message_or_fallback() {
    let base = spawn_backend(Received::default()).await;
    let store = ClientConfig::new(&base).build_store().unwrap();

    let err = store.update_one(5, &update_draft()).await.unwrap_err();
    assert_eq!(err.transport_kind(), Some(TransportErrorKind::Rejected(400)));
    assert_eq!(err.user_message(), "Phone number must be exactly 10 digits");

    let err = store.update_one(6, &update_draft()).await.unwrap_err();
    assert_eq!(err.transport_kind(), Some(TransportErrorKind::Rejected(500)));
    assert_eq!(err.user_message(), "Failed to update employee");

    let err = store.update_one(7, &update_draft()).await.unwrap_err();
    assert_eq!(err.transport_kind(), Some(TransportErrorKind::Rejected(200)));
    assert_eq!(err.user_message(), "Update refused");
}

#[tokio::test]
async fn test_delete_accepts_null_data() {
    let base = spawn_backend(Received::default()).await;
    api(&base).delete(3).await.unwrap();
}

#[tokio::test]
async fn test_unreachable_backend() {
    // Grab a free port, then close it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = api(&format!("http://{addr}")).list_all().await.unwrap_err();
    assert_eq!(err.transport_kind(), Some(TransportErrorKind::NetworkUnreachable));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    async fn slow() -> Json<ApiResponse<Vec<Employee>>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Json(ApiResponse::ok(Vec::new()))
    }
    let base = serve(Router::new().route("/api/employees", get(slow))).await;

    let config = ClientConfig::new(&base).with_timeout(Duration::from_millis(200));
    let api = HttpEmployeeApi::new(config.build_http_client().unwrap());

    let err = api.list_all().await.unwrap_err();
    assert_eq!(err.transport_kind(), Some(TransportErrorKind::Timeout));
}

#[tokio::test]
async fn test_malformed_envelope_is_invalid_response() {
    async fn garbage() -> &'static str {
        "<html>not json</html>"
    }
    let base = serve(Router::new().route("/api/employees", get(garbage))).await;

    let err = api(&base).list_all().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}
