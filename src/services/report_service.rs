use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::question::Question;
use crate::models::score::attempt_state;

/// One exported line: Score × Account × Course.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ScoreReportRow {
    pub score_id: Uuid,
    pub course_title: String,
    pub account_id: Uuid,
    pub surname: String,
    pub first_name: String,
    pub session: String,
    pub score: i32,
    pub remark: String,
}

pub const EXPORT_HEADER: [&str; 8] = [
    "Score ID",
    "Course",
    "User ID",
    "Surname",
    "First Name",
    "Year",
    "Score",
    "Remark",
];

#[derive(Clone)]
pub struct ReportService {
    pool: PgPool,
}

impl ReportService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn score_rows(&self, school_id: Uuid) -> Result<Vec<ScoreReportRow>> {
        let rows = sqlx::query_as::<_, ScoreReportRow>(
            r#"
            SELECT
                s.id AS score_id,
                c.course_title,
                a.id AS account_id,
                a.surname,
                a.first_name,
                s.session,
                s.score,
                s.remark
            FROM scores s
            JOIN accounts a ON a.id = s.account_id
            JOIN courses c ON c.id = s.course_id
            WHERE c.school_id = $1 AND s.state = $2
            ORDER BY c.course_title, a.surname, a.first_name
            "#,
        )
        .bind(school_id)
        .bind(attempt_state::GRADED)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Fixed-column CSV serialization of the report rows.
    pub fn rows_to_csv(rows: &[ScoreReportRow]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;
        for row in rows {
            writer.write_record([
                row.score_id.to_string(),
                row.course_title.clone(),
                row.account_id.to_string(),
                row.surname.clone(),
                row.first_name.clone(),
                row.session.clone(),
                row.score.to_string(),
                row.remark.clone(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| crate::error::Error::Internal(format!("CSV buffer error: {}", e)))?;
        Ok(bytes)
    }

    /// Write the school's score export under the exports directory and hand
    /// back the file path for streaming.
    pub async fn export_scores_csv(&self, school_id: Uuid) -> Result<PathBuf> {
        let rows = self.score_rows(school_id).await?;
        let bytes = Self::rows_to_csv(&rows)?;

        let exports_dir = crate::config::get_config().exports_dir.clone();
        tokio::fs::create_dir_all(&exports_dir).await?;
        let filename = format!(
            "scores_export_{}.csv",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        let path = PathBuf::from(exports_dir).join(filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Question listing for review screens: stable order, stored option
    /// order (no re-shuffle).
    pub async fn list_questions(&self, course_id: Uuid) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            r#"SELECT * FROM questions WHERE course_id = $1 ORDER BY id"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
