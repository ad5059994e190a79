use anyhow::anyhow;
use registrar_core::{AppError, ErrorKind};
use registrar_db::{STUDENTS_EMAIL_KEY, Violation, constraint_violation};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::{track_db_operation, track_student_created};
use crate::modules::enrollments::service::EnrollmentService;
use crate::modules::students::model::{NewStudent, Student, StudentChanges, StudentWithCourses};

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn create_student(db: &PgPool, student: NewStudent) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        let created = sqlx::query_as::<_, Student>(
            r#"INSERT INTO students (full_name, age, gender, email)
               VALUES ($1, $2, $3, $4)
               RETURNING id, full_name, age, gender, email, created_at, updated_at"#,
        )
        .bind(&student.full_name)
        .bind(student.age)
        .bind(student.gender)
        .bind(&student.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, student.email.as_deref()))?;

        tx.commit().await?;
        track_db_operation("insert_student");
        track_student_created();

        Ok(created)
    }

    #[instrument(skip(db))]
    pub async fn get_students(db: &PgPool) -> Result<Vec<Student>, AppError> {
        let students = sqlx::query_as::<_, Student>(
            r#"SELECT id, full_name, age, gender, email, created_at, updated_at
               FROM students
               ORDER BY created_at, id"#,
        )
        .fetch_all(db)
        .await?;

        track_db_operation("select_students");
        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_id(db: &PgPool, id: Uuid) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"SELECT id, full_name, age, gender, email, created_at, updated_at
               FROM students
               WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(student_not_found)?;

        track_db_operation("select_student");
        Ok(student)
    }

    /// Student plus the courses they are enrolled in, in enrollment order.
    #[instrument(skip(db))]
    pub async fn get_student_with_courses(
        db: &PgPool,
        id: Uuid,
    ) -> Result<StudentWithCourses, AppError> {
        let student = Self::get_student_by_id(db, id).await?;
        let courses = EnrollmentService::get_enrolled_courses(db, id).await?;

        Ok(StudentWithCourses { student, courses })
    }

    /// Merges `changes` into the stored student.
    ///
    /// The row is locked for the duration of the transaction. Uniqueness of
    /// the email is left to the `students_email_key` constraint, which never
    /// fires for a value the row already holds.
    #[instrument(skip(db))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        changes: StudentChanges,
    ) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_as::<_, Student>(
            r#"SELECT id, full_name, age, gender, email, created_at, updated_at
               FROM students
               WHERE id = $1
               FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(student_not_found)?;

        let merged = changes.merge_into(existing);

        let updated = sqlx::query_as::<_, Student>(
            r#"UPDATE students
               SET full_name = $1, age = $2, gender = $3, email = $4, updated_at = NOW()
               WHERE id = $5
               RETURNING id, full_name, age, gender, email, created_at, updated_at"#,
        )
        .bind(&merged.full_name)
        .bind(merged.age)
        .bind(merged.gender)
        .bind(&merged.email)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, merged.email.as_deref()))?;

        tx.commit().await?;
        track_db_operation("update_student");

        Ok(updated)
    }

    /// Deletes a student together with all of their enrollments.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        // Locking the row first makes a concurrent enroll either finish
        // before us (and get its enrollment removed) or see the student gone.
        sqlx::query_scalar::<_, Uuid>("SELECT id FROM students WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(student_not_found)?;

        sqlx::query("DELETE FROM enrollments WHERE student_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        track_db_operation("delete_student");

        Ok(())
    }
}

fn student_not_found() -> AppError {
    AppError::not_found(anyhow!("Student not found"))
}

fn map_write_error(e: sqlx::Error, email: Option<&str>) -> AppError {
    if let Some(Violation::Unique(STUDENTS_EMAIL_KEY)) = constraint_violation(&e) {
        return AppError::conflict(
            ErrorKind::DuplicateEmail,
            anyhow!("Email address {} already in use", email.unwrap_or_default()),
        );
    }
    AppError::from(e)
}
