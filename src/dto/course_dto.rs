use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::course::Course;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCoursePayload {
    #[validate(length(min = 1, max = 20))]
    pub course_code: String,
    #[validate(length(min = 1, max = 200))]
    pub course_title: String,
    pub course_description: Option<String>,
    pub instructor_username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub courses: Vec<Course>,
    pub is_instructor: bool,
}
