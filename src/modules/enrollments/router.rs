use crate::modules::enrollments::controller::{
    enroll_student, get_student_courses, get_students_by_course,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// `/students/by-course` is a static segment, so it takes precedence over
/// the `/students/{id}` routes registered by the students router.
pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/student/{id}/enroll", post(enroll_student))
        .route("/students/{id}/courses", get(get_student_courses))
        .route("/students/by-course", get(get_students_by_course))
}
