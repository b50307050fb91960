use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::question_dto::{CreateBackgroundPayload, CreateQuestionPayload, UpdateQuestionPayload};
use crate::error::{Error, Result};
use crate::models::account::Role;
use crate::models::course::Course;
use crate::models::question::{Question, QuestionBackground};

/// Acting author identity, extracted from session claims by the routes.
#[derive(Debug, Clone, Copy)]
pub struct Author {
    pub account_id: Uuid,
    pub school_id: Uuid,
    pub role: Role,
}

/// Ordered option list with the correct option at index 0. Membership of the
/// correct option in the set holds by construction.
pub fn compose_options(correct: &str, distractors: &[String]) -> Result<Vec<String>> {
    let correct = correct.trim();
    if correct.is_empty() {
        return Err(Error::BadRequest("The correct option must not be empty".to_string()));
    }
    let mut options = vec![correct.to_string()];
    for d in distractors {
        let d = d.trim();
        if d.is_empty() {
            continue;
        }
        if d == correct || options.iter().any(|o| o == d) {
            return Err(Error::BadRequest(format!(
                "Duplicate option '{}' in question",
                d
            )));
        }
        options.push(d.to_string());
    }
    if options.len() < 2 {
        return Err(Error::BadRequest(
            "At least one wrong option is required".to_string(),
        ));
    }
    if options.len() > 5 {
        return Err(Error::BadRequest(
            "At most four wrong options are allowed".to_string(),
        ));
    }
    Ok(options)
}

#[derive(Clone)]
pub struct QuestionService {
    pool: PgPool,
}

impl QuestionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn course_for_author(&self, author: Author, course_code: &str) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"SELECT * FROM courses WHERE school_id = $1 AND course_code = $2"#,
        )
        .bind(author.school_id)
        .bind(course_code.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Course not found".to_string()))?;
        self.authorize_author(author, &course)?;
        Ok(course)
    }

    /// Instructors author only the courses assigned to them; Admin authors
    /// anywhere in the school.
    fn authorize_author(&self, author: Author, course: &Course) -> Result<()> {
        if author.role == Role::Admin {
            return Ok(());
        }
        if course.instructor_id == Some(author.account_id) {
            return Ok(());
        }
        Err(Error::Forbidden(
            "You can only set exam questions for your own courses".to_string(),
        ))
    }

    pub async fn create_question(
        &self,
        author: Author,
        payload: CreateQuestionPayload,
    ) -> Result<Question> {
        let course = self.course_for_author(author, &payload.course_code).await?;
        let options = compose_options(&payload.correct_option, &payload.distractors)?;

        if let Some(background_id) = payload.background_id {
            let belongs = sqlx::query_scalar::<_, bool>(
                r#"SELECT EXISTS(SELECT 1 FROM question_backgrounds WHERE id = $1 AND course_id = $2)"#,
            )
            .bind(background_id)
            .bind(course.id)
            .fetch_one(&self.pool)
            .await?;
            if !belongs {
                return Err(Error::NotFound("Question background not found".to_string()));
            }
        }

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (course_id, background_id, prompt, options, class_grade, term, session)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(course.id)
        .bind(payload.background_id)
        .bind(payload.prompt.trim())
        .bind(Json(options))
        .bind(payload.class_grade)
        .bind(&payload.term)
        .bind(&payload.session)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    pub async fn question_by_id(&self, id: i64) -> Result<Question> {
        let question = sqlx::query_as::<_, Question>(r#"SELECT * FROM questions WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;
        Ok(question)
    }

    async fn owned_question(&self, author: Author, id: i64) -> Result<Question> {
        let question = self.question_by_id(id).await?;
        let course = sqlx::query_as::<_, Course>(r#"SELECT * FROM courses WHERE id = $1"#)
            .bind(question.course_id)
            .fetch_one(&self.pool)
            .await?;
        if course.school_id != author.school_id {
            return Err(Error::NotFound("Question not found".to_string()));
        }
        self.authorize_author(author, &course)?;
        Ok(question)
    }

    pub async fn update_question(
        &self,
        author: Author,
        id: i64,
        payload: UpdateQuestionPayload,
    ) -> Result<Question> {
        let existing = self.owned_question(author, id).await?;

        let prompt = payload
            .prompt
            .map(|p| p.trim().to_string())
            .unwrap_or_else(|| existing.prompt.clone());
        let correct = payload
            .correct_option
            .unwrap_or_else(|| existing.options.0[0].clone());
        let distractors = payload
            .distractors
            .unwrap_or_else(|| existing.options.0[1..].to_vec());
        let options = compose_options(&correct, &distractors)?;
        let background_id = payload.background_id.or(existing.background_id);

        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET prompt = $1, options = $2, background_id = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&prompt)
        .bind(Json(options))
        .bind(background_id)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(question)
    }

    pub async fn delete_question(&self, author: Author, id: i64) -> Result<()> {
        self.owned_question(author, id).await?;
        sqlx::query(r#"DELETE FROM questions WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Authoring/report listing: stable id order, options exactly as stored.
    pub async fn list_questions(&self, author: Author, course_code: &str) -> Result<Vec<Question>> {
        let course = self.course_for_author(author, course_code).await?;
        let rows = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE course_id = $1 ORDER BY id"#,
        )
        .bind(course.id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create_background(
        &self,
        author: Author,
        payload: CreateBackgroundPayload,
    ) -> Result<QuestionBackground> {
        let course = self.course_for_author(author, &payload.course_code).await?;
        let background = sqlx::query_as::<_, QuestionBackground>(
            r#"INSERT INTO question_backgrounds (course_id, passage) VALUES ($1, $2) RETURNING *"#,
        )
        .bind(course.id)
        .bind(payload.passage.trim())
        .fetch_one(&self.pool)
        .await?;
        Ok(background)
    }
}
