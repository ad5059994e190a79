use anyhow::anyhow;
use registrar_core::{AppError, ErrorKind};
use registrar_db::{COURSES_CODE_KEY, COURSES_TITLE_KEY, Violation, constraint_violation};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::metrics::{track_course_created, track_db_operation};
use crate::modules::courses::model::{Course, CourseChanges, NewCourse};

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db))]
    pub async fn create_course(db: &PgPool, course: NewCourse) -> Result<Course, AppError> {
        let created = sqlx::query_as::<_, Course>(
            r#"INSERT INTO courses (title, code, description)
               VALUES ($1, $2, $3)
               RETURNING id, title, code, description, created_at, updated_at"#,
        )
        .bind(&course.title)
        .bind(&course.code)
        .bind(&course.description)
        .fetch_one(db)
        .await
        .map_err(|e| map_write_error(e, &course))?;

        track_db_operation("insert_course");
        track_course_created();
        info!(course_id = %created.id, title = %created.title, "Course created");

        Ok(created)
    }

    #[instrument(skip(db))]
    pub async fn get_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"SELECT id, title, code, description, created_at, updated_at
               FROM courses
               ORDER BY created_at, id"#,
        )
        .fetch_all(db)
        .await?;

        track_db_operation("select_courses");
        Ok(courses)
    }

    #[instrument(skip(db))]
    pub async fn get_course_by_id(db: &PgPool, id: Uuid) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"SELECT id, title, code, description, created_at, updated_at
               FROM courses
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(course_not_found)?;

        track_db_operation("select_course");
        Ok(course)
    }

    /// Merges `changes` into the stored course.
    ///
    /// Keeping the course's own title or code is never a conflict: the unique
    /// constraints only fire when another row holds the value.
    #[instrument(skip(db))]
    pub async fn update_course(
        db: &PgPool,
        id: Uuid,
        changes: CourseChanges,
    ) -> Result<Course, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_as::<_, Course>(
            r#"SELECT id, title, code, description, created_at, updated_at
               FROM courses
               WHERE id = $1
               FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(course_not_found)?;

        let merged = changes.merge_into(existing);

        let updated = sqlx::query_as::<_, Course>(
            r#"UPDATE courses
               SET title = $1, code = $2, description = $3, updated_at = NOW()
               WHERE id = $4
               RETURNING id, title, code, description, created_at, updated_at"#,
        )
        .bind(&merged.title)
        .bind(&merged.code)
        .bind(&merged.description)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &merged))?;

        tx.commit().await?;
        track_db_operation("update_course");

        Ok(updated)
    }

    /// Deletes a course and every enrollment that references it.
    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(course_not_found)?;

        sqlx::query("DELETE FROM enrollments WHERE course_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        track_db_operation("delete_course");

        Ok(())
    }
}

fn course_not_found() -> AppError {
    AppError::not_found(anyhow!("Course not found"))
}

fn map_write_error(e: sqlx::Error, course: &NewCourse) -> AppError {
    match constraint_violation(&e) {
        Some(Violation::Unique(COURSES_TITLE_KEY)) => {
            return AppError::conflict(
                ErrorKind::DuplicateTitle,
                anyhow!("Course with title '{}' already exists", course.title),
            );
        }
        Some(Violation::Unique(COURSES_CODE_KEY)) => {
            return AppError::conflict(
                ErrorKind::DuplicateCode,
                anyhow!("Course with code '{}' already exists", course.code),
            );
        }
        _ => {}
    }
    AppError::from(e)
}
