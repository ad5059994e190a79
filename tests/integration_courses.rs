mod common;

use axum::http::StatusCode;
use common::{
    create_test_course, create_test_student, enroll, generate_unique_course_title, send,
    setup_test_app,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_course_normalizes_fields(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "bio101", "code": "bio", "description": "Cells" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Bio101");
    assert_eq!(body["code"], "BIO");
    assert_eq!(body["description"], "Cells");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_title_collision_after_normalization(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "bio101", "code": "bio" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "BIO101", "code": "bio2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Course with title 'Bio101' already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_code_collision_after_normalization(pool: PgPool) {
    let app = setup_test_app(pool);

    create_test_course(&app, "chem201").await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "chem202", "code": "xyz" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "chem203", "code": "XyZ" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Course with code 'XYZ' already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_course_missing_and_invalid_fields(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "bio101" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "code is required");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "bio101", "code": "waytoolongcode" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "code must be at most 10 characters");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_length_limits_apply_to_normalized_values(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "German", "code": "ßßßßßß" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "code must be at most 10 characters");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": format!("ß{}", "x".repeat(99)), "code": "ger" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title must be at most 100 characters");

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "bio101", "code": "  bio       " })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], "BIO");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_and_list_courses(pool: PgPool) {
    let app = setup_test_app(pool);
    let first = create_test_course(&app, &generate_unique_course_title()).await;
    let second = create_test_course(&app, &generate_unique_course_title()).await;

    let (status, body) = send(&app, "GET", "/api/v1/courses", None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&serde_json::Value> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| &c["title"])
        .collect();
    assert_eq!(titles, vec![&first["title"], &second["title"]]);

    let id = second["id"].as_str().unwrap();
    let (status, body) = send(&app, "GET", &format!("/api/v1/courses/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], second["code"]);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/courses/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_course_with_same_values_succeeds(pool: PgPool) {
    let app = setup_test_app(pool);
    let course = create_test_course(&app, "bio101").await;
    let id = course["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/courses/{}", id),
        Some(json!({ "title": "BIO101", "code": course["code"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Bio101");

    let (status, _) = send(&app, "PUT", &format!("/api/v1/courses/{}", id), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_course_to_taken_title_is_conflict(pool: PgPool) {
    let app = setup_test_app(pool);
    create_test_course(&app, "bio101").await;
    let other = create_test_course(&app, "chem201").await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/courses/{}", other["id"].as_str().unwrap()),
        Some(json!({ "title": "bio101", "description": "renamed" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Course with title 'Bio101' already exists");

    let (_, unchanged) = send(
        &app,
        "GET",
        &format!("/api/v1/courses/{}", other["id"].as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(unchanged["title"], "Chem201");
    assert!(unchanged["description"].is_null());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_course_description_clear_and_keep(pool: PgPool) {
    let app = setup_test_app(pool);
    let (_, course) = send(
        &app,
        "POST",
        "/api/v1/course",
        Some(json!({ "title": "bio101", "code": "bio", "description": "Cells" })),
    )
    .await;
    let uri = format!("/api/v1/courses/{}", course["id"].as_str().unwrap());

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "title": "bio102" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "Cells");

    let (status, body) = send(&app, "PUT", &uri, Some(json!({ "description": "" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["description"].is_null());
    assert_eq!(body["title"], "Bio102");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_course_removes_enrollments(pool: PgPool) {
    let app = setup_test_app(pool);
    let student = create_test_student(&app).await;
    let course = create_test_course(&app, &generate_unique_course_title()).await;
    let student_id = student["id"].as_str().unwrap();
    let course_id = course["id"].as_str().unwrap();

    let (status, _) = enroll(&app, student_id, course["title"].as_str().unwrap()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        send(&app, "DELETE", &format!("/api/v1/courses/{}", course_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["course_id"], course_id);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/students/{}/courses", student_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student is not enrolled in any courses.");

    let (status, _) = send(&app, "DELETE", &format!("/api/v1/courses/{}", course_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
