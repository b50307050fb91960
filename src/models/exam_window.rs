use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExamWindow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub term: String,
    pub session: String,
    pub opens_on: NaiveDate,
    pub closes_on: NaiveDate,
    pub duration_minutes: i32,
    pub score_weight: i32,
    pub created_at: DateTime<Utc>,
}

impl ExamWindow {
    pub fn is_open_on(&self, day: NaiveDate) -> bool {
        self.opens_on <= day && day <= self.closes_on
    }
}
