//! Student domain models and DTOs.
//!
//! Request DTOs keep every field optional so that an absent, `null` or blank
//! value is reported as a missing field by [`CreateStudentDto::normalize`]
//! rather than as a generic deserialization failure. Normalization turns a
//! DTO into a [`NewStudent`] / [`StudentChanges`] whose text is already
//! trimmed and case-folded, ready for the uniqueness checks in the store.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use registrar_core::AppError;
use registrar_core::normalize::{lower_case, max_length, non_blank, title_case};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use crate::enrollments::EnrolledCourse;

pub const FULL_NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match title_case(s).as_str() {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            _ => Err(AppError::invalid_enum(anyhow!(
                "Gender must be Male or Female"
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("Male"),
            Self::Female => f.write_str("Female"),
        }
    }
}

/// A student as stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    #[schema(example = "Ann Lee")]
    pub full_name: String,
    #[schema(example = 20)]
    pub age: i32,
    pub gender: Gender,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A student together with the courses they are enrolled in.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentWithCourses {
    #[serde(flatten)]
    pub student: Student,
    pub courses: Vec<EnrolledCourse>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[schema(example = "ann lee", max_length = 100)]
    pub full_name: Option<String>,
    #[validate(range(min = 1, message = "age must be a positive integer"))]
    #[schema(example = 20)]
    pub age: Option<i32>,
    #[schema(example = "female")]
    pub gender: Option<String>,
    #[schema(max_length = 255)]
    pub email: Option<String>,
}

/// A validated, normalized student ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub full_name: String,
    pub age: i32,
    pub gender: Gender,
    pub email: Option<String>,
}

impl CreateStudentDto {
    pub fn normalize(self) -> Result<NewStudent, AppError> {
        let full_name = self
            .full_name
            .as_deref()
            .and_then(non_blank)
            .map(title_case)
            .ok_or_else(|| AppError::missing_field("full_name"))?;
        let full_name = max_length("full_name", full_name, FULL_NAME_MAX_LEN)?;
        let age = self.age.ok_or_else(|| AppError::missing_field("age"))?;
        let gender = self
            .gender
            .as_deref()
            .and_then(non_blank)
            .ok_or_else(|| AppError::missing_field("gender"))?
            .parse::<Gender>()?;
        let email = self
            .email
            .as_deref()
            .and_then(non_blank)
            .map(normalize_email)
            .transpose()?;

        Ok(NewStudent {
            full_name,
            age,
            gender,
            email,
        })
    }
}

/// Partial update; only supplied fields change.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[schema(max_length = 100)]
    pub full_name: Option<String>,
    #[validate(range(min = 1, message = "age must be a positive integer"))]
    pub age: Option<i32>,
    pub gender: Option<String>,
    #[schema(max_length = 255)]
    pub email: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StudentChanges {
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
}

impl UpdateStudentDto {
    pub fn normalize(self) -> Result<StudentChanges, AppError> {
        let full_name = self
            .full_name
            .as_deref()
            .map(|name| {
                non_blank(name)
                    .map(title_case)
                    .ok_or_else(|| AppError::invalid_field(anyhow!("full_name must not be blank")))
                    .and_then(|name| max_length("full_name", name, FULL_NAME_MAX_LEN))
            })
            .transpose()?;
        let gender = self
            .gender
            .as_deref()
            .map(str::parse::<Gender>)
            .transpose()?;
        let email = self
            .email
            .as_deref()
            .map(|email| {
                non_blank(email)
                    .ok_or_else(|| AppError::invalid_field(anyhow!("email must not be blank")))
                    .and_then(normalize_email)
            })
            .transpose()?;

        Ok(StudentChanges {
            full_name,
            age: self.age,
            gender,
            email,
        })
    }
}

impl StudentChanges {
    /// Applies the supplied fields on top of `existing`.
    pub fn merge_into(self, existing: Student) -> NewStudent {
        NewStudent {
            full_name: self.full_name.unwrap_or(existing.full_name),
            age: self.age.unwrap_or(existing.age),
            gender: self.gender.unwrap_or(existing.gender),
            email: self.email.or(existing.email),
        }
    }
}

fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = max_length("email", lower_case(email), EMAIL_MAX_LEN)?;
    if !email.validate_email() {
        return Err(AppError::invalid_field(anyhow!(
            "email must be a valid email address"
        )));
    }
    Ok(email)
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteStudentResponse {
    #[schema(example = "Student and associated enrollments deleted successfully")]
    pub message: String,
    pub student_id: Uuid,
}
