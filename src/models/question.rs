use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub course_id: Uuid,
    pub background_id: Option<i64>,
    pub prompt: String,
    /// Ordered option list; element 0 is the correct option. Presentation
    /// shuffles a copy, storage order never changes.
    pub options: Json<Vec<String>>,
    pub class_grade: Option<i32>,
    pub term: Option<String>,
    pub session: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn correct_option(&self) -> Option<&str> {
        self.options.0.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionBackground {
    pub id: i64,
    pub course_id: Uuid,
    pub passage: String,
    pub created_at: DateTime<Utc>,
}
