use chrono::{Datelike, NaiveDate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::admin_dto::CreateExamWindowPayload;
use crate::error::{Error, Result};
use crate::models::exam_window::ExamWindow;

/// The term/session scope an attempt is recorded under, plus the window
/// metadata surfaced on the paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePeriod {
    pub term: String,
    pub session: String,
    pub duration_minutes: i32,
    pub score_weight: i32,
}

impl ActivePeriod {
    /// Courses with no exam windows (the single-tenant academy brand) run
    /// year-round under a General term keyed to the calendar year.
    pub fn fallback(today: NaiveDate) -> Self {
        Self {
            term: "General".to_string(),
            session: today.year().to_string(),
            duration_minutes: 60,
            score_weight: 100,
        }
    }
}

/// Pure per-request resolution; no cached global. Windows are expected in
/// `opens_on` order and the earliest one open today wins.
pub fn resolve_active_period(today: NaiveDate, windows: &[ExamWindow]) -> Option<ActivePeriod> {
    windows
        .iter()
        .find(|w| w.is_open_on(today))
        .map(|w| ActivePeriod {
            term: w.term.clone(),
            session: w.session.clone(),
            duration_minutes: w.duration_minutes,
            score_weight: w.score_weight,
        })
}

#[derive(Clone)]
pub struct PeriodService {
    pool: PgPool,
}

impl PeriodService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn windows_for_course(&self, course_id: Uuid) -> Result<Vec<ExamWindow>> {
        let rows = sqlx::query_as::<_, ExamWindow>(
            r#"SELECT * FROM exam_windows WHERE course_id = $1 ORDER BY opens_on, id"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// The period the given course is live under today. A course without
    /// windows falls back; a course whose windows are all closed is not
    /// sittable.
    pub async fn active_period_for(&self, course_id: Uuid, today: NaiveDate) -> Result<ActivePeriod> {
        let windows = self.windows_for_course(course_id).await?;
        if windows.is_empty() {
            return Ok(ActivePeriod::fallback(today));
        }
        resolve_active_period(today, &windows).ok_or_else(|| {
            Error::Forbidden("The exam window for this course is not open today".to_string())
        })
    }

    pub async fn create_window(
        &self,
        course_id: Uuid,
        payload: CreateExamWindowPayload,
    ) -> Result<ExamWindow> {
        if payload.opens_on > payload.closes_on {
            return Err(Error::BadRequest(
                "Exam window must open before it closes".to_string(),
            ));
        }
        let row = sqlx::query_as::<_, ExamWindow>(
            r#"
            INSERT INTO exam_windows (course_id, term, session, opens_on, closes_on, duration_minutes, score_weight)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(course_id)
        .bind(&payload.term)
        .bind(&payload.session)
        .bind(payload.opens_on)
        .bind(payload.closes_on)
        .bind(payload.duration_minutes)
        .bind(payload.score_weight)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
