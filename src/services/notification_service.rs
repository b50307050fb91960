use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::Result;
use crate::models::account::Account;
use crate::models::notification::Notification;

/// Outbox-backed dispatch to the mail gateway. Callers enqueue and move on;
/// delivery, retries, and failures stay inside the worker loop.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
    client: Client,
    target_url: String,
}

impl NotificationService {
    pub fn new(pool: PgPool, target_url: String) -> Self {
        Self {
            pool,
            client: Client::new(),
            target_url,
        }
    }

    pub async fn enqueue(&self, event_type: &str, payload: &JsonValue) -> Result<Notification> {
        let row = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (event_type, payload, target_url, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING *
            "#,
        )
        .bind(event_type)
        .bind(payload)
        .bind(&self.target_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Account-created mail: the only place the plaintext passcode leaves
    /// the process.
    pub async fn enqueue_account_created(
        &self,
        account: &Account,
        passcode: &str,
    ) -> Result<Notification> {
        let payload = json!({
            "event": "account_created",
            "to": account.email,
            "display_name": account.display_name(),
            "username": account.username,
            "passcode": passcode,
        });
        self.enqueue("account_created", &payload).await
    }

    pub async fn deliver_once(&self, notification_id: Uuid) -> Result<()> {
        let row = sqlx::query_as::<_, Notification>(
            r#"SELECT * FROM notifications WHERE id = $1"#,
        )
        .bind(notification_id)
        .fetch_one(&self.pool)
        .await?;

        let secret = crate::config::get_config().mail_gateway_secret.clone();
        let res = self
            .client
            .post(&row.target_url)
            .header("X-Gateway-Secret", secret)
            .json(&row.payload)
            .send()
            .await;
        match res {
            Ok(resp) => {
                let status = resp.status().as_u16() as i32;
                let body = resp.text().await.unwrap_or_default();
                sqlx::query(
                    r#"
                    UPDATE notifications
                    SET http_status = $1,
                        response_body = $2,
                        status = CASE WHEN $1 BETWEEN 200 AND 299 THEN 'success' ELSE 'failed' END,
                        attempts = attempts + 1,
                        updated_at = NOW()
                    WHERE id = $3
                    "#,
                )
                .bind(status)
                .bind(body)
                .bind(row.id)
                .execute(&self.pool)
                .await?;
            }
            Err(err) => {
                sqlx::query(
                    r#"
                    UPDATE notifications
                    SET response_body = $1, status = 'failed', attempts = attempts + 1, updated_at = NOW()
                    WHERE id = $2
                    "#,
                )
                .bind(format!("{}", err))
                .bind(row.id)
                .execute(&self.pool)
                .await?;
            }
        }
        Ok(())
    }

    /// One worker tick: claim the oldest due pending row, deliver, schedule
    /// a backoff retry on failure. Returns whether any work was found.
    pub async fn run_once(&self) -> Result<bool> {
        let row_opt = sqlx::query(
            r#"SELECT id FROM notifications
               WHERE status = 'pending' AND (next_retry_at IS NULL OR next_retry_at <= NOW())
               ORDER BY created_at ASC
               FOR UPDATE SKIP LOCKED
               LIMIT 1"#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row_opt else { return Ok(false) };
        let id: Uuid = row.try_get("id")?;

        let _ = self.deliver_once(id).await;

        let row2 = sqlx::query(
            r#"SELECT attempts, max_attempts, status FROM notifications WHERE id = $1"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        let attempts: i32 = row2.try_get("attempts")?;
        let max_attempts: i32 = row2.try_get("max_attempts")?;
        let status: String = row2.try_get("status")?;

        if status == "failed" && attempts < max_attempts {
            sqlx::query(
                r#"UPDATE notifications
                   SET status = 'pending',
                       next_retry_at = NOW() + make_interval(secs => LEAST(3600, 30 * power(2::float, GREATEST(0, attempts-1))::int))
                   WHERE id = $1"#,
            )
            .bind(id)
            .execute(&self.pool)
            .await?;
        }

        Ok(true)
    }
}
