use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSchoolPayload {
    #[validate(length(min = 2, max = 20))]
    pub code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClassroomPayload {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(range(min = 1, max = 12))]
    pub grade_level: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignClassroomPayload {
    pub account_id: Uuid,
    pub classroom_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateExamWindowPayload {
    #[validate(length(min = 1, max = 20))]
    pub course_code: String,
    #[validate(length(min = 1, max = 50))]
    pub term: String,
    #[validate(length(min = 1, max = 50))]
    pub session: String,
    pub opens_on: NaiveDate,
    pub closes_on: NaiveDate,
    #[validate(range(min = 1, max = 480))]
    pub duration_minutes: i32,
    #[validate(range(min = 1, max = 100))]
    pub score_weight: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowListParams {
    pub course_code: String,
}
