use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Categorical verdict attached to a Score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Remark {
    Pass,
    Fail,
    Retake,
}

impl Remark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Remark::Pass => "Pass",
            Remark::Fail => "Fail",
            Remark::Retake => "Retake",
        }
    }

    pub fn parse(raw: &str) -> Option<Remark> {
        match raw {
            "Pass" => Some(Remark::Pass),
            "Fail" => Some(Remark::Fail),
            "Retake" => Some(Remark::Retake),
            _ => None,
        }
    }
}

/// Attempt slot lifecycle. An `open` row is the placeholder reserved on exam
/// entry; `graded` is the committed outcome.
pub mod attempt_state {
    pub const OPEN: &str = "open";
    pub const GRADED: &str = "graded";
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Score {
    pub id: Uuid,
    pub account_id: Uuid,
    pub course_id: Uuid,
    pub term: String,
    pub session: String,
    /// Integer percentage; raw correct counts are derived, never stored.
    pub score: i32,
    pub remark: String,
    pub state: String,
    pub graded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Score {
    pub fn remark(&self) -> Option<Remark> {
        Remark::parse(&self.remark)
    }

    pub fn is_graded(&self) -> bool {
        self.state == attempt_state::GRADED
    }
}

/// One row per (account, question) for the attempt being graded, capturing
/// the selected and correct answers at grading time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttemptResult {
    pub id: Uuid,
    pub account_id: Uuid,
    pub course_id: Uuid,
    pub question_id: i64,
    pub term: String,
    pub session: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub created_at: DateTime<Utc>,
}

impl AttemptResult {
    pub fn is_correct(&self) -> bool {
        self.selected_answer == self.correct_answer
    }
}
