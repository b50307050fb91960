use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperQuestion {
    pub number: usize,
    pub question_id: i64,
    pub prompt: String,
    /// Shuffled per render; grading compares the submitted string against
    /// the stored correct option, never a position.
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperSection {
    /// Shared passage, rendered once for all questions in the section.
    pub background: Option<String>,
    pub questions: Vec<PaperQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamPaperResponse {
    pub course_code: String,
    pub course_title: String,
    pub term: String,
    pub session: String,
    pub duration_minutes: i32,
    pub total_questions: usize,
    pub sections: Vec<PaperSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitExamRequest {
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitExamResponse {
    pub score_id: uuid::Uuid,
    pub correct_count: usize,
    pub total_questions: usize,
    pub percentage: i32,
    pub remark: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerReview {
    pub prompt: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerdictResponse {
    pub course_title: String,
    pub percentage: i32,
    pub remark: String,
    pub message: String,
    pub answers: Vec<AnswerReview>,
}
