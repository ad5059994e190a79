use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use registrar_core::{AppError, ErrorResponse};

use crate::modules::courses::model::{
    Course, CreateCourseDto, DeleteCourseResponse, UpdateCourseDto,
};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::validator::{PathId, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/course",
    request_body = CreateCourseDto,
    responses(
        (status = 201, description = "Course created successfully", body = Course),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 409, description = "Title or code already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let course = dto.normalize()?;
    let course = CourseService::create_course(&state.db, course).await?;

    Ok((StatusCode::CREATED, Json(course)))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    responses(
        (status = 200, description = "All courses in creation order", body = Vec<Course>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::get_courses(&state.db).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::get_course_by_id(&state.db, id).await?;
    Ok(Json(course))
}

#[utoipa::path(
    put,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID")
    ),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated successfully", body = Course),
        (status = 400, description = "Invalid field or malformed id", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Title or code already in use", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    PathId(id): PathId,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let changes = dto.normalize()?;
    let course = CourseService::update_course(&state.db, id, changes).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course and enrollments deleted", body = DeleteCourseResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<DeleteCourseResponse>, AppError> {
    CourseService::delete_course(&state.db, id).await?;

    Ok(Json(DeleteCourseResponse {
        message: "Course and associated enrollments deleted successfully".to_string(),
        course_id: id,
    }))
}
