use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use http_body_util::BodyExt;
use registrar::registrar_config::CorsConfig;
use registrar::router::init_router;
use registrar::state::AppState;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub fn setup_test_app(pool: PgPool) -> Router {
    let state = AppState {
        db: pool,
        cors_config: CorsConfig::default(),
    };
    init_router(state)
}

/// Sends one request and returns the status with the body parsed as JSON
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// A lower-case "first last" name, as a client might send it.
pub fn generate_full_name() -> String {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    format!("{} {}", first, last).to_lowercase()
}

#[allow(dead_code)]
pub fn generate_unique_course_title() -> String {
    format!("course {}", &Uuid::new_v4().simple().to_string()[..12])
}

#[allow(dead_code)]
pub fn generate_unique_course_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Creates a student through the API and returns the response body.
#[allow(dead_code)]
pub async fn create_test_student(app: &Router) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/student",
        Some(json!({
            "full_name": generate_full_name(),
            "age": 20,
            "gender": "female",
            "email": generate_unique_email(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

/// Creates a course through the API and returns the response body.
#[allow(dead_code)]
pub async fn create_test_course(app: &Router, title: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/course",
        Some(json!({
            "title": title,
            "code": generate_unique_course_code(),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[allow(dead_code)]
pub async fn enroll(app: &Router, student_id: &str, title: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/api/v1/student/{}/enroll", student_id),
        Some(json!({ "title": title })),
    )
    .await
}
