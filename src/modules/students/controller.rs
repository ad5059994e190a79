use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use registrar_core::{AppError, ErrorResponse};

use crate::modules::students::model::{
    CreateStudentDto, DeleteStudentResponse, Student, StudentWithCourses, UpdateStudentDto,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::{PathId, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/student",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created successfully", body = Student),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 409, description = "Email address already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = dto.normalize()?;
    let student = StudentService::create_student(&state.db, student).await?;

    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students",
    responses(
        (status = 200, description = "All students in creation order", body = Vec<Student>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let students = StudentService::get_students(&state.db).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student with enrolled courses", body = StudentWithCourses),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<StudentWithCourses>, AppError> {
    let student = StudentService::get_student_with_courses(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Student ID")
    ),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated successfully", body = Student),
        (status = 400, description = "Invalid field or malformed id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Email address already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn update_student(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let changes = dto.normalize()?;
    let student = StudentService::update_student(&state.db, id, changes).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student and enrollments deleted", body = DeleteStudentResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<DeleteStudentResponse>, AppError> {
    StudentService::delete_student(&state.db, id).await?;

    Ok(Json(DeleteStudentResponse {
        message: "Student and associated enrollments deleted successfully".to_string(),
        student_id: id,
    }))
}
