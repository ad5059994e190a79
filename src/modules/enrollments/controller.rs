use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use tracing::instrument;

use registrar_core::{AppError, ErrorResponse};

use crate::modules::enrollments::model::{
    CourseTitlesQuery, EnrollDto, Enrollment, StudentCoursesResponse, StudentsByCourseResponse,
};
use crate::modules::enrollments::service::EnrollmentService;
use crate::state::AppState;
use crate::validator::{PathId, ValidatedJson};

#[utoipa::path(
    post,
    path = "/api/v1/student/{id}/enroll",
    params(
        ("id" = uuid::Uuid, Path, description = "Student ID")
    ),
    request_body = EnrollDto,
    responses(
        (status = 201, description = "Student enrolled", body = Enrollment),
        (status = 400, description = "Missing title or malformed id", body = ErrorResponse),
        (status = 404, description = "Student or course not found", body = ErrorResponse),
        (status = 409, description = "Student is already enrolled in this course", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn enroll_student(
    State(state): State<AppState>,
    PathId(student_id): PathId,
    ValidatedJson(dto): ValidatedJson<EnrollDto>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let title = dto.normalize()?;
    let enrollment = EnrollmentService::enroll(&state.db, student_id, &title).await?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/courses",
    params(
        ("id" = uuid::Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Courses in enrollment order, or a message when there are none", body = StudentCoursesResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_student_courses(
    State(state): State<AppState>,
    PathId(student_id): PathId,
) -> Result<Json<StudentCoursesResponse>, AppError> {
    let courses = EnrollmentService::list_courses_for_student(&state.db, student_id).await?;
    Ok(Json(courses.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/by-course",
    params(CourseTitlesQuery),
    responses(
        (status = 200, description = "Matching students, or a message when nobody matched", body = StudentsByCourseResponse),
        (status = 400, description = "course_titles is required", body = ErrorResponse),
        (status = 404, description = "A requested course does not exist", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_students_by_course(
    State(state): State<AppState>,
    Query(query): Query<CourseTitlesQuery>,
) -> Result<Json<StudentsByCourseResponse>, AppError> {
    let titles = query.titles()?;
    let matches = EnrollmentService::find_students_by_course_titles(&state.db, &titles).await?;

    Ok(Json(StudentsByCourseResponse::new(matches, &titles)))
}
