//! Course domain models and DTOs.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use registrar_core::AppError;
use registrar_core::normalize::{max_length, non_blank, title_case, upper_case};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const TITLE_MAX_LEN: usize = 100;
pub const CODE_MAX_LEN: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    #[schema(example = "Bio101")]
    pub title: String,
    #[schema(example = "BIO")]
    pub code: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Length limits apply to the normalized values, see [`CreateCourseDto::normalize`].
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[schema(example = "bio101", max_length = 100)]
    pub title: Option<String>,
    #[schema(example = "bio", max_length = 10)]
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub title: String,
    pub code: String,
    pub description: Option<String>,
}

impl CreateCourseDto {
    pub fn normalize(self) -> Result<NewCourse, AppError> {
        let title = self
            .title
            .as_deref()
            .and_then(non_blank)
            .map(title_case)
            .ok_or_else(|| AppError::missing_field("title"))?;
        let title = max_length("title", title, TITLE_MAX_LEN)?;
        let code = self
            .code
            .as_deref()
            .and_then(non_blank)
            .map(upper_case)
            .ok_or_else(|| AppError::missing_field("code"))?;
        let code = max_length("code", code, CODE_MAX_LEN)?;

        Ok(NewCourse {
            title,
            code,
            description: normalize_description(self.description),
        })
    }
}

/// Partial update. An absent field is kept; a blank `description` clears it.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[schema(max_length = 100)]
    pub title: Option<String>,
    #[schema(max_length = 10)]
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CourseChanges {
    pub title: Option<String>,
    pub code: Option<String>,
    /// `Some(None)` clears the stored description.
    pub description: Option<Option<String>>,
}

impl UpdateCourseDto {
    pub fn normalize(self) -> Result<CourseChanges, AppError> {
        let title = self
            .title
            .as_deref()
            .map(|title| {
                non_blank(title)
                    .map(title_case)
                    .ok_or_else(|| AppError::invalid_field(anyhow!("title must not be blank")))
                    .and_then(|title| max_length("title", title, TITLE_MAX_LEN))
            })
            .transpose()?;
        let code = self
            .code
            .as_deref()
            .map(|code| {
                non_blank(code)
                    .map(upper_case)
                    .ok_or_else(|| AppError::invalid_field(anyhow!("code must not be blank")))
                    .and_then(|code| max_length("code", code, CODE_MAX_LEN))
            })
            .transpose()?;

        Ok(CourseChanges {
            title,
            code,
            description: self.description.map(|d| normalize_description(Some(d))),
        })
    }
}

impl CourseChanges {
    pub fn merge_into(self, existing: Course) -> NewCourse {
        NewCourse {
            title: self.title.unwrap_or(existing.title),
            code: self.code.unwrap_or(existing.code),
            description: self.description.unwrap_or(existing.description),
        }
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .as_deref()
        .and_then(non_blank)
        .map(str::to_string)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteCourseResponse {
    #[schema(example = "Course deleted successfully")]
    pub message: String,
    pub course_id: Uuid,
}
