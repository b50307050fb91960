use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub school_id: Uuid,
    pub classroom_id: Option<Uuid>,
    pub surname: String,
    pub first_name: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub passcode_hash: String,
    pub role: String,
    pub email: Option<String>,
    pub exam_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.surname, self.first_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Instructor,
    Student,
    Prospective,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageSchools,
    ManageAccounts,
    ManageClassrooms,
    ManageCourses,
    ManageExamWindows,
    AuthorQuestions,
    TakeExams,
    ViewReports,
    ResetScores,
    ExportScores,
}

const ADMIN_GRANTS: &[Capability] = &[
    Capability::ManageSchools,
    Capability::ManageAccounts,
    Capability::ManageClassrooms,
    Capability::ManageCourses,
    Capability::ManageExamWindows,
    Capability::AuthorQuestions,
    Capability::TakeExams,
    Capability::ViewReports,
    Capability::ResetScores,
    Capability::ExportScores,
];

const INSTRUCTOR_GRANTS: &[Capability] = &[
    Capability::AuthorQuestions,
    Capability::TakeExams,
    Capability::ViewReports,
];

const EXAMINEE_GRANTS: &[Capability] = &[Capability::TakeExams];

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Instructor => "Instructor",
            Role::Student => "Student",
            Role::Prospective => "Prospective",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        match raw {
            "Admin" => Some(Role::Admin),
            "Instructor" => Some(Role::Instructor),
            "Student" => Some(Role::Student),
            "Prospective" => Some(Role::Prospective),
            _ => None,
        }
    }

    /// Explicit permission-set lookup. Admin's set is a superset of every
    /// other role's; there is no implicit role hierarchy anywhere else.
    pub fn grants(&self) -> &'static [Capability] {
        match self {
            Role::Admin => ADMIN_GRANTS,
            Role::Instructor => INSTRUCTOR_GRANTS,
            Role::Student | Role::Prospective => EXAMINEE_GRANTS,
        }
    }

    pub fn can(&self, cap: Capability) -> bool {
        self.grants().contains(&cap)
    }
}
