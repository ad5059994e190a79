//! Enrollment models: the student/course join record and the views built on it.

use chrono::{DateTime, Utc};
use registrar_core::AppError;
use registrar_core::normalize::{max_length, non_blank, split_list, title_case};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::courses::{Course, TITLE_MAX_LEN};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EnrollDto {
    #[schema(example = "Bio101", max_length = 100)]
    pub title: Option<String>,
}

impl EnrollDto {
    /// Returns the normalized course title to enroll in.
    pub fn normalize(self) -> Result<String, AppError> {
        self.title
            .as_deref()
            .and_then(non_blank)
            .map(title_case)
            .ok_or_else(|| AppError::missing_field("title"))
            .and_then(|title| max_length("title", title, TITLE_MAX_LEN))
    }
}

/// Course summary nested in a single-student read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EnrolledCourse {
    pub id: Uuid,
    pub title: String,
    pub code: String,
    pub enrolled_at: DateTime<Utc>,
}

/// A student matched by a course-title search.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentCourseMatch {
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    /// Requested titles this student is enrolled in, sorted.
    pub matching_courses: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CourseTitlesQuery {
    /// Comma separated course titles, e.g. `Bio101,Chem201`
    pub course_titles: Option<String>,
}

impl CourseTitlesQuery {
    /// Normalized, de-duplicated titles in request order.
    pub fn titles(&self) -> Result<Vec<String>, AppError> {
        let titles = self
            .course_titles
            .as_deref()
            .map(|raw| split_list(raw, title_case))
            .unwrap_or_default();

        if titles.is_empty() {
            return Err(AppError::missing_field("course_titles"));
        }
        Ok(titles)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Courses of a student, or an explanation when there are none.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StudentCoursesResponse {
    Courses(Vec<Course>),
    NotEnrolled(MessageResponse),
}

impl From<Vec<Course>> for StudentCoursesResponse {
    fn from(courses: Vec<Course>) -> Self {
        if courses.is_empty() {
            Self::NotEnrolled(MessageResponse {
                message: "Student is not enrolled in any courses.".to_string(),
            })
        } else {
            Self::Courses(courses)
        }
    }
}

/// Matches of a course-title search, or an explanation when nobody matched.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StudentsByCourseResponse {
    Students(Vec<StudentCourseMatch>),
    NoMatches(MessageResponse),
}

impl StudentsByCourseResponse {
    pub fn new(matches: Vec<StudentCourseMatch>, titles: &[String]) -> Self {
        if matches.is_empty() {
            Self::NoMatches(MessageResponse {
                message: format!("No students match [{}]", titles.join(", ")),
            })
        } else {
            Self::Students(matches)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_core::ErrorKind;

    #[test]
    fn test_enroll_dto_normalizes_title() {
        let dto = EnrollDto {
            title: Some(" bio101 ".to_string()),
        };
        assert_eq!(dto.normalize().unwrap(), "Bio101");

        let missing = EnrollDto { title: None };
        assert_eq!(missing.normalize().unwrap_err().kind, ErrorKind::MissingField);
    }

    #[test]
    fn test_course_titles_query() {
        let query = CourseTitlesQuery {
            course_titles: Some("bio101, CHEM201 ,bio101".to_string()),
        };
        assert_eq!(
            query.titles().unwrap(),
            vec!["Bio101".to_string(), "Chem201".to_string()]
        );
    }

    #[test]
    fn test_course_titles_query_requires_titles() {
        let absent = CourseTitlesQuery {
            course_titles: None,
        };
        assert_eq!(absent.titles().unwrap_err().kind, ErrorKind::MissingField);

        let blank = CourseTitlesQuery {
            course_titles: Some(" , ".to_string()),
        };
        assert_eq!(blank.titles().unwrap_err().kind, ErrorKind::MissingField);
    }

    #[test]
    fn test_empty_results_become_messages() {
        let json = serde_json::to_value(StudentCoursesResponse::from(Vec::new())).unwrap();
        assert_eq!(json["message"], "Student is not enrolled in any courses.");

        let titles = vec!["Bio101".to_string(), "Chem201".to_string()];
        let json =
            serde_json::to_value(StudentsByCourseResponse::new(Vec::new(), &titles)).unwrap();
        assert_eq!(json["message"], "No students match [Bio101, Chem201]");
    }

    #[test]
    fn test_matches_serialize_as_array() {
        let matches = vec![StudentCourseMatch {
            id: Uuid::new_v4(),
            full_name: "Ann Lee".to_string(),
            email: None,
            matching_courses: vec!["Bio101".to_string()],
        }];
        let titles = vec!["Bio101".to_string()];
        let json = serde_json::to_value(StudentsByCourseResponse::new(matches, &titles)).unwrap();
        assert_eq!(json[0]["matching_courses"][0], "Bio101");
    }
}
