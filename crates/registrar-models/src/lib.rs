//! # Registrar Models
//!
//! Domain models and DTOs for the Registrar API: database entities,
//! request/response bodies and the normalization that turns a request body
//! into a value the store can persist.
//!
//! # Modules
//!
//! - [`students`]: students and their gender enum
//! - [`courses`]: courses
//! - [`enrollments`]: the student/course join record and derived views
//!
//! # Example
//!
//! ```ignore
//! use registrar_models::students::{CreateStudentDto, Gender};
//!
//! let dto: CreateStudentDto = serde_json::from_str(r#"{"full_name":"ann lee","age":20,"gender":"female"}"#)?;
//! let student = dto.normalize()?;
//! assert_eq!(student.full_name, "Ann Lee");
//! assert_eq!(student.gender, Gender::Female);
//! ```

pub mod courses;
pub mod enrollments;
pub mod students;

pub use courses::{
    Course, CourseChanges, CreateCourseDto, DeleteCourseResponse, NewCourse, UpdateCourseDto,
};

pub use enrollments::{
    CourseTitlesQuery, EnrollDto, EnrolledCourse, Enrollment, MessageResponse,
    StudentCourseMatch, StudentCoursesResponse, StudentsByCourseResponse,
};

pub use students::{
    CreateStudentDto, DeleteStudentResponse, Gender, NewStudent, Student, StudentChanges,
    StudentWithCourses, UpdateStudentDto,
};
