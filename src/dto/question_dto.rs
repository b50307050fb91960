use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    #[validate(length(min = 1, max = 20))]
    pub course_code: String,
    #[validate(length(min = 1, max = 1000))]
    pub prompt: String,
    #[validate(length(min = 1, max = 500))]
    pub correct_option: String,
    /// One required, up to four total.
    #[validate(length(min = 1, max = 4))]
    pub distractors: Vec<String>,
    pub background_id: Option<i64>,
    pub class_grade: Option<i32>,
    pub term: Option<String>,
    pub session: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    #[validate(length(min = 1, max = 1000))]
    pub prompt: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub correct_option: Option<String>,
    #[validate(length(min = 1, max = 4))]
    pub distractors: Option<Vec<String>>,
    pub background_id: Option<i64>,
}

/// Question edit/delete routes address the row by numeric id in the query
/// string.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionIdParam {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseCodeParam {
    pub course_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBackgroundPayload {
    #[validate(length(min = 1, max = 20))]
    pub course_code: String,
    #[validate(length(min = 1))]
    pub passage: String,
}
