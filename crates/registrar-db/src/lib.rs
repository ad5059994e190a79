//! # Registrar DB
//!
//! Connection pool setup and classification of constraint violations.
//!
//! Uniqueness and referential integrity are enforced by PostgreSQL, not by
//! read-then-write checks in the services. [`constraint_violation`] turns
//! the resulting `sqlx` error back into something a service can map onto a
//! domain error.
//!
//! # Example
//!
//! ```ignore
//! use registrar_db::{init_db_pool, constraint_violation, Violation};
//!
//! let pool = init_db_pool(&config.database).await?;
//! match sqlx::query("INSERT ...").execute(&pool).await {
//!     Err(e) if constraint_violation(&e) == Some(Violation::Unique("students_email_key")) => { /* ... */ }
//!     other => { /* ... */ }
//! }
//! ```

use registrar_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

pub use sqlx::PgPool;

/// Unique constraint on `students.email`.
pub const STUDENTS_EMAIL_KEY: &str = "students_email_key";
/// Unique constraint on `courses.title`.
pub const COURSES_TITLE_KEY: &str = "courses_title_key";
/// Unique constraint on `courses.code`.
pub const COURSES_CODE_KEY: &str = "courses_code_key";
/// Unique constraint on `(enrollments.student_id, enrollments.course_id)`.
pub const ENROLLMENTS_STUDENT_COURSE_KEY: &str = "enrollments_student_course_key";
pub const ENROLLMENTS_STUDENT_FKEY: &str = "enrollments_student_id_fkey";
pub const ENROLLMENTS_COURSE_FKEY: &str = "enrollments_course_id_fkey";

/// Initializes a PostgreSQL connection pool.
///
/// Acquiring a connection is bounded by `config.acquire_timeout`, so a
/// saturated pool surfaces as an error instead of an indefinitely blocked
/// request.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
}

/// A constraint violation reported by the database, keyed by constraint name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation<'a> {
    Unique(&'a str),
    ForeignKey(&'a str),
}

/// Classifies `err` as a named unique or foreign-key violation.
///
/// Returns `None` for every other error, including violations without a
/// constraint name.
pub fn constraint_violation(err: &sqlx::Error) -> Option<Violation<'_>> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let constraint = db_err.constraint()?;

    if db_err.is_unique_violation() {
        Some(Violation::Unique(constraint))
    } else if db_err.is_foreign_key_violation() {
        Some(Violation::ForeignKey(constraint))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_violations() {
        assert_eq!(constraint_violation(&sqlx::Error::RowNotFound), None);
        assert_eq!(constraint_violation(&sqlx::Error::PoolTimedOut), None);
    }
}
