use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

pub fn all_digits(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("passcode_not_numeric"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(equal = 6), custom(function = "all_digits"))]
    pub passcode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: uuid::Uuid,
    pub username: String,
    pub surname: String,
    pub first_name: String,
    pub role: String,
    pub school_id: uuid::Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub account: AccountSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub surname: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub role: String,
    #[validate(length(min = 1, max = 20))]
    pub school_code: String,
    /// Only honored on first boot, when the school may not exist yet.
    pub school_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub account_id: uuid::Uuid,
    pub username: String,
    pub role: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EntranceLoginRequest {
    #[validate(length(min = 1, max = 20))]
    pub exam_number: String,
    #[validate(length(equal = 6), custom(function = "all_digits"))]
    pub passcode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EntranceRegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub surname: String,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 20))]
    pub exam_number: String,
    #[validate(email)]
    pub email: Option<String>,
}
