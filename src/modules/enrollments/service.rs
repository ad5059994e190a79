//! Enrollment management: the only place enrollment rows are created.
//!
//! Uniqueness of a (student, course) pair is enforced by the
//! `enrollments_student_course_key` constraint. `enroll` inserts with
//! `ON CONFLICT DO NOTHING`, so when two requests race for the same pair the
//! loser waits for the winner's commit and then observes the conflict,
//! leaving exactly one enrollment.

use anyhow::anyhow;
use registrar_core::{AppError, ErrorKind};
use registrar_db::{Violation, constraint_violation};
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::metrics::{track_db_operation, track_enrollment_created};
use crate::modules::courses::model::Course;
use crate::modules::enrollments::model::{EnrolledCourse, Enrollment, StudentCourseMatch};

pub struct EnrollmentService;

impl EnrollmentService {
    /// Enrolls a student in the course titled `course_title` (already normalized).
    ///
    /// The course and student rows are read `FOR KEY SHARE` inside the same
    /// transaction as the insert, so neither can be deleted between the
    /// existence check and the insert.
    #[instrument(skip(db))]
    pub async fn enroll(
        db: &PgPool,
        student_id: Uuid,
        course_title: &str,
    ) -> Result<Enrollment, AppError> {
        let mut tx = db.begin().await?;

        let course_id =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM courses WHERE title = $1 FOR KEY SHARE")
                .bind(course_title)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| course_not_found(course_title))?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM students WHERE id = $1 FOR KEY SHARE")
            .bind(student_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(student_not_found)?;

        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"INSERT INTO enrollments (student_id, course_id)
               VALUES ($1, $2)
               ON CONFLICT ON CONSTRAINT enrollments_student_course_key DO NOTHING
               RETURNING id, student_id, course_id, created_at, updated_at"#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_enroll_error(e, course_title))?
        .ok_or_else(|| {
            AppError::conflict(
                ErrorKind::AlreadyEnrolled,
                anyhow!("Student is already enrolled in this course."),
            )
        })?;

        tx.commit().await?;
        track_db_operation("insert_enrollment");
        track_enrollment_created();
        info!(enrollment_id = %enrollment.id, "Student enrolled");

        Ok(enrollment)
    }

    /// Courses a student is enrolled in, in enrollment order.
    ///
    /// Fails with `NotFound` when the student does not exist; an existing
    /// student without enrollments yields an empty list.
    #[instrument(skip(db))]
    pub async fn list_courses_for_student(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<Course>, AppError> {
        Self::ensure_student_exists(db, student_id).await?;

        let courses = sqlx::query_as::<_, Course>(
            r#"SELECT c.id, c.title, c.code, c.description, c.created_at, c.updated_at
               FROM enrollments e
               JOIN courses c ON c.id = e.course_id
               WHERE e.student_id = $1
               ORDER BY e.created_at, e.id"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        track_db_operation("select_student_courses");
        Ok(courses)
    }

    /// Course summaries nested in a single-student read. Does not check that
    /// the student exists.
    #[instrument(skip(db))]
    pub async fn get_enrolled_courses(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<EnrolledCourse>, AppError> {
        let courses = sqlx::query_as::<_, EnrolledCourse>(
            r#"SELECT c.id, c.title, c.code, e.created_at AS enrolled_at
               FROM enrollments e
               JOIN courses c ON c.id = e.course_id
               WHERE e.student_id = $1
               ORDER BY e.created_at, e.id"#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    /// Students enrolled in at least one of `titles` (already normalized),
    /// each annotated with the titles they matched.
    ///
    /// Every title must name an existing course; the first unknown one, in
    /// request order, is reported as `NotFound`.
    #[instrument(skip(db))]
    pub async fn find_students_by_course_titles(
        db: &PgPool,
        titles: &[String],
    ) -> Result<Vec<StudentCourseMatch>, AppError> {
        let known: Vec<String> =
            sqlx::query_scalar("SELECT title FROM courses WHERE title = ANY($1)")
                .bind(titles)
                .fetch_all(db)
                .await?;

        if let Some(missing) = titles.iter().find(|title| !known.contains(title)) {
            return Err(course_not_found(missing));
        }

        let matches = sqlx::query_as::<_, StudentCourseMatch>(
            r#"SELECT s.id, s.full_name, s.email,
                      array_agg(c.title::TEXT ORDER BY c.title) AS matching_courses
               FROM students s
               JOIN enrollments e ON e.student_id = s.id
               JOIN courses c ON c.id = e.course_id
               WHERE c.title = ANY($1)
               GROUP BY s.id, s.full_name, s.email, s.created_at
               ORDER BY s.created_at, s.id"#,
        )
        .bind(titles)
        .fetch_all(db)
        .await?;

        track_db_operation("select_students_by_course");
        Ok(matches)
    }

    async fn ensure_student_exists(db: &PgPool, student_id: Uuid) -> Result<(), AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(student_id)
                .fetch_one(db)
                .await?;

        if !exists {
            return Err(student_not_found());
        }
        Ok(())
    }
}

fn student_not_found() -> AppError {
    AppError::not_found(anyhow!("Student not found"))
}

fn course_not_found(title: &str) -> AppError {
    AppError::not_found(anyhow!("Course '{}' not found", title))
}

/// A foreign-key violation here means the student or course vanished after
/// it was read; report it the same way as a failed lookup.
fn map_enroll_error(e: sqlx::Error, course_title: &str) -> AppError {
    match constraint_violation(&e) {
        Some(Violation::ForeignKey(registrar_db::ENROLLMENTS_STUDENT_FKEY)) => {
            return student_not_found();
        }
        Some(Violation::ForeignKey(registrar_db::ENROLLMENTS_COURSE_FKEY)) => {
            return course_not_found(course_title);
        }
        _ => {}
    }
    AppError::from(e)
}
