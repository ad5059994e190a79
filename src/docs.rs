use utoipa::OpenApi;

use registrar_core::ErrorResponse;

use crate::modules::courses::model::{
    Course, CreateCourseDto, DeleteCourseResponse, UpdateCourseDto,
};
use crate::modules::enrollments::model::{
    EnrollDto, EnrolledCourse, Enrollment, MessageResponse, StudentCourseMatch,
    StudentCoursesResponse, StudentsByCourseResponse,
};
use crate::modules::health::controller::HealthResponse;
use crate::modules::students::model::{
    CreateStudentDto, DeleteStudentResponse, Gender, Student, StudentWithCourses,
    UpdateStudentDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::get_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::enrollments::controller::enroll_student,
        crate::modules::enrollments::controller::get_student_courses,
        crate::modules::enrollments::controller::get_students_by_course,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            Gender,
            Student,
            StudentWithCourses,
            CreateStudentDto,
            UpdateStudentDto,
            DeleteStudentResponse,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            DeleteCourseResponse,
            Enrollment,
            EnrollDto,
            EnrolledCourse,
            StudentCourseMatch,
            MessageResponse,
            StudentCoursesResponse,
            StudentsByCourseResponse,
        )
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Students", description = "Student management endpoints"),
        (name = "Courses", description = "Course management endpoints"),
        (name = "Enrollments", description = "Enrolling students and querying enrollments")
    ),
    info(
        title = "Registrar API",
        version = "0.1.0",
        description = "Student, course and enrollment registry built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/health",
            "/api/v1/student",
            "/api/v1/students",
            "/api/v1/students/{id}",
            "/api/v1/course",
            "/api/v1/courses",
            "/api/v1/courses/{id}",
            "/api/v1/student/{id}/enroll",
            "/api/v1/students/{id}/courses",
            "/api/v1/students/by-course",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
