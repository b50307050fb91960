use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::account::{Account, Role};
use crate::models::school::School;
use crate::utils::credentials::{
    compose_username, entrance_username, generate_passcode, title_case, uniquify_username,
};
use crate::utils::crypto::{hash_passcode, verify_passcode};

const SESSION_HOURS: i64 = 8;

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub surname: String,
    pub first_name: String,
    pub role: Role,
    pub email: Option<String>,
}

/// A freshly created account together with the one-time plaintext passcode.
/// The passcode leaves the process only through the notification boundary.
#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub account: Account,
    pub passcode: String,
}

#[derive(Clone)]
pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn admin_exists(&self) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM accounts WHERE role = 'Admin')"#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn get_by_id(&self, account_id: Uuid) -> Result<Account> {
        let account =
            sqlx::query_as::<_, Account>(r#"SELECT * FROM accounts WHERE id = $1"#)
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Account not found".to_string()))?;
        Ok(account)
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let account =
            sqlx::query_as::<_, Account>(r#"SELECT * FROM accounts WHERE username = $1"#)
                .bind(username.to_lowercase())
                .fetch_optional(&self.pool)
                .await?;
        Ok(account)
    }

    pub async fn register(&self, school: &School, payload: NewAccount) -> Result<RegisteredAccount> {
        let surname = title_case(&payload.surname);
        let first_name = title_case(&payload.first_name);

        let base = compose_username(&first_name, &surname);
        if base.is_empty() {
            return Err(Error::BadRequest("Name must contain letters".to_string()));
        }
        let colliding = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM accounts WHERE username LIKE $1"#,
        )
        .bind(format!("{}%", base))
        .fetch_one(&self.pool)
        .await?;
        let username = uniquify_username(&base, colliding);

        let passcode = generate_passcode();
        let passcode_hash = hash_passcode(&passcode)
            .map_err(|e| Error::Internal(format!("Failed to hash passcode: {}", e)))?;

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (school_id, surname, first_name, username, passcode_hash, role, email)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(school.id)
        .bind(&surname)
        .bind(&first_name)
        .bind(&username)
        .bind(&passcode_hash)
        .bind(payload.role.as_str())
        .bind(&payload.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(RegisteredAccount { account, passcode })
    }

    /// Entrance-exam tier: the candidate's login id is synthesized from the
    /// school code and exam number rather than their name.
    pub async fn register_prospective(
        &self,
        school: &School,
        surname: &str,
        first_name: &str,
        exam_number: &str,
        email: Option<String>,
    ) -> Result<RegisteredAccount> {
        let username = entrance_username(&school.code, exam_number);

        if self.get_by_username(&username).await?.is_some() {
            return Err(Error::Conflict(format!(
                "Exam number {} is already registered for {}",
                exam_number, school.code
            )));
        }

        let passcode = generate_passcode();
        let passcode_hash = hash_passcode(&passcode)
            .map_err(|e| Error::Internal(format!("Failed to hash passcode: {}", e)))?;

        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (school_id, surname, first_name, username, passcode_hash, role, email, exam_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(school.id)
        .bind(title_case(surname))
        .bind(title_case(first_name))
        .bind(&username)
        .bind(&passcode_hash)
        .bind(Role::Prospective.as_str())
        .bind(&email)
        .bind(exam_number.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(RegisteredAccount { account, passcode })
    }

    pub async fn authenticate(&self, username: &str, passcode: &str) -> Result<Account> {
        let account = self
            .get_by_username(username)
            .await?
            .ok_or_else(|| Error::Unauthorized("Incorrect Username. Please try again".to_string()))?;

        let ok = verify_passcode(passcode, &account.passcode_hash)
            .map_err(|e| Error::Internal(format!("Failed to verify passcode: {}", e)))?;
        if !ok {
            return Err(Error::Unauthorized(
                "Wrong Passcode. Please enter the correct Passcode".to_string(),
            ));
        }
        if !account.is_active {
            return Err(Error::Unauthorized(
                "This account has been deactivated".to_string(),
            ));
        }
        Ok(account)
    }

    pub fn issue_token(&self, account: &Account) -> Result<String> {
        let config = crate::config::get_config();
        let exp = (Utc::now() + Duration::hours(SESSION_HOURS)).timestamp() as usize;
        let claims = Claims {
            sub: account.id.to_string(),
            exp,
            role: account.role.clone(),
            school_id: account.school_id.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("Failed to issue session token: {}", e)))
    }

    pub async fn assign_classroom(&self, account_id: Uuid, classroom_id: Uuid) -> Result<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts a
            SET classroom_id = c.id, updated_at = NOW()
            FROM classrooms c
            WHERE a.id = $1 AND c.id = $2 AND c.school_id = a.school_id
            RETURNING a.*
            "#,
        )
        .bind(account_id)
        .bind(classroom_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            Error::NotFound("Account or classroom not found in this school".to_string())
        })?;
        Ok(account)
    }

    /// Class grade used to scope questions; None for accounts outside any
    /// classroom.
    pub async fn class_grade_of(&self, account_id: Uuid) -> Result<Option<i32>> {
        let grade = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT c.grade_level FROM accounts a
            JOIN classrooms c ON a.classroom_id = c.id
            WHERE a.id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(grade)
    }
}
