use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::admin_dto::{CreateClassroomPayload, CreateSchoolPayload};
use crate::error::{Error, Result};
use crate::models::school::{Classroom, School};

#[derive(Clone)]
pub struct SchoolService {
    pool: PgPool,
}

impl SchoolService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_school(&self, payload: CreateSchoolPayload) -> Result<School> {
        let code = payload.code.trim().to_uppercase();
        if self.school_by_code(&code).await?.is_some() {
            return Err(Error::Conflict(format!(
                "A school with code {} already exists",
                code
            )));
        }
        let school = sqlx::query_as::<_, School>(
            r#"INSERT INTO schools (code, name) VALUES ($1, $2) RETURNING *"#,
        )
        .bind(&code)
        .bind(payload.name.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(school)
    }

    /// School codes are uppercase in paths and storage.
    pub async fn school_by_code(&self, code: &str) -> Result<Option<School>> {
        let school = sqlx::query_as::<_, School>(r#"SELECT * FROM schools WHERE code = $1"#)
            .bind(code.trim().to_uppercase())
            .fetch_optional(&self.pool)
            .await?;
        Ok(school)
    }

    pub async fn require_school_by_code(&self, code: &str) -> Result<School> {
        self.school_by_code(code)
            .await?
            .ok_or_else(|| Error::NotFound("School not found".to_string()))
    }

    pub async fn school_by_id(&self, school_id: Uuid) -> Result<School> {
        let school = sqlx::query_as::<_, School>(r#"SELECT * FROM schools WHERE id = $1"#)
            .bind(school_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("School not found".to_string()))?;
        Ok(school)
    }

    pub async fn list_schools(&self) -> Result<Vec<School>> {
        let rows = sqlx::query_as::<_, School>(r#"SELECT * FROM schools ORDER BY code"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn create_classroom(
        &self,
        school_id: Uuid,
        payload: CreateClassroomPayload,
    ) -> Result<Classroom> {
        let classroom = sqlx::query_as::<_, Classroom>(
            r#"
            INSERT INTO classrooms (school_id, name, grade_level)
            VALUES ($1, $2, $3)
            ON CONFLICT (school_id, name) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(school_id)
        .bind(payload.name.trim())
        .bind(payload.grade_level)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            Error::Conflict("A classroom with this name already exists".to_string())
        })?;
        Ok(classroom)
    }

    pub async fn classrooms_for_school(&self, school_id: Uuid) -> Result<Vec<Classroom>> {
        let rows = sqlx::query_as::<_, Classroom>(
            r#"SELECT * FROM classrooms WHERE school_id = $1 ORDER BY grade_level, name"#,
        )
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
