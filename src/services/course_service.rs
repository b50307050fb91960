use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::course_dto::CreateCoursePayload;
use crate::error::{Error, Result};
use crate::models::course::Course;

#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_course(
        &self,
        school_id: Uuid,
        payload: CreateCoursePayload,
    ) -> Result<Course> {
        let instructor_id = match payload.instructor_username.as_deref() {
            Some(username) if !username.trim().is_empty() => {
                let id = sqlx::query_scalar::<_, Uuid>(
                    r#"SELECT id FROM accounts WHERE username = $1 AND school_id = $2"#,
                )
                .bind(username.trim().to_lowercase())
                .bind(school_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Instructor not found".to_string()))?;
                Some(id)
            }
            _ => None,
        };

        let code = payload.course_code.trim().to_uppercase();
        if self.course_by_code(school_id, &code).await?.is_some() {
            return Err(Error::Conflict(format!(
                "Course code {} is already in use",
                code
            )));
        }

        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (school_id, course_code, course_title, course_description, instructor_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(school_id)
        .bind(&code)
        .bind(payload.course_title.trim())
        .bind(&payload.course_description)
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(course)
    }

    /// Courses are addressed by their human-readable code, scoped to the
    /// caller's school.
    pub async fn course_by_code(&self, school_id: Uuid, code: &str) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"SELECT * FROM courses WHERE school_id = $1 AND course_code = $2"#,
        )
        .bind(school_id)
        .bind(code.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await?;
        Ok(course)
    }

    pub async fn require_course_by_code(&self, school_id: Uuid, code: &str) -> Result<Course> {
        self.course_by_code(school_id, code)
            .await?
            .ok_or_else(|| Error::NotFound("Course not found".to_string()))
    }

    pub async fn list_courses(&self, school_id: Uuid) -> Result<Vec<Course>> {
        let rows = sqlx::query_as::<_, Course>(
            r#"SELECT * FROM courses WHERE school_id = $1 ORDER BY course_code"#,
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn courses_for_instructor(
        &self,
        school_id: Uuid,
        instructor_id: Uuid,
    ) -> Result<Vec<Course>> {
        let rows = sqlx::query_as::<_, Course>(
            r#"SELECT * FROM courses WHERE school_id = $1 AND instructor_id = $2 ORDER BY course_code"#,
        )
        .bind(school_id)
        .bind(instructor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Dashboard listing: instructors see the courses they teach, everyone
    /// else sees the whole school catalogue.
    pub async fn dashboard(&self, school_id: Uuid, account_id: Uuid) -> Result<(Vec<Course>, bool)> {
        let own = self.courses_for_instructor(school_id, account_id).await?;
        if own.is_empty() {
            Ok((self.list_courses(school_id).await?, false))
        } else {
            Ok((own, true))
        }
    }
}
