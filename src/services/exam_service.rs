use std::collections::HashMap;

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::RetakePolicy;
use crate::dto::exam_dto::{
    AnswerReview, ExamPaperResponse, PaperQuestion, PaperSection, SubmitExamRequest,
    VerdictResponse,
};
use crate::error::{Error, Result};
use crate::models::course::Course;
use crate::models::question::Question;
use crate::models::score::{attempt_state, AttemptResult, Remark, Score};
use crate::services::grading_service::{GradingService, NOT_ANSWERED};
use crate::services::period_service::{ActivePeriod, PeriodService};

/// Outcome of an exam entry request: either a freshly assembled paper or a
/// pointer at the verdict page for a terminally passed course.
pub enum ExamEntry {
    Paper(ExamPaperResponse),
    AlreadyPassed { course_code: String },
}

#[derive(Debug, Clone)]
pub struct GradedOutcome {
    pub score_id: Uuid,
    pub correct_count: usize,
    pub total_questions: usize,
    pub percentage: i32,
    pub remark: Remark,
}

/// Uniform shuffle of a presentation copy; storage order is untouched.
pub fn shuffled_options<R: Rng>(options: &[String], rng: &mut R) -> Vec<String> {
    let mut presented = options.to_vec();
    presented.shuffle(rng);
    presented
}

/// Group questions so that all questions sharing a background sit adjacent
/// and the passage appears once per group. Order is stable: groups appear at
/// the position of their first question, standalone runs coalesce.
pub fn build_sections<R: Rng>(
    questions: &[Question],
    backgrounds: &HashMap<i64, String>,
    rng: &mut R,
) -> Vec<PaperSection> {
    let mut keyed: Vec<(Option<i64>, PaperSection)> = Vec::new();

    for q in questions {
        let slot = match q.background_id {
            Some(bid) => keyed.iter().position(|(k, _)| *k == Some(bid)),
            None => match keyed.last() {
                Some((None, _)) => Some(keyed.len() - 1),
                _ => None,
            },
        };
        let idx = match slot {
            Some(i) => i,
            None => {
                keyed.push((
                    q.background_id,
                    PaperSection {
                        background: q.background_id.and_then(|b| backgrounds.get(&b).cloned()),
                        questions: Vec::new(),
                    },
                ));
                keyed.len() - 1
            }
        };
        keyed[idx].1.questions.push(PaperQuestion {
            number: 0,
            question_id: q.id,
            prompt: q.prompt.clone(),
            options: shuffled_options(&q.options.0, rng),
        });
    }

    let mut sections: Vec<PaperSection> = keyed.into_iter().map(|(_, s)| s).collect();
    let mut number = 0;
    for section in &mut sections {
        for question in &mut section.questions {
            number += 1;
            question.number = number;
        }
    }
    sections
}

#[derive(Clone)]
pub struct ExamService {
    pool: PgPool,
    periods: PeriodService,
    retake_policy: RetakePolicy,
}

impl ExamService {
    pub fn new(pool: PgPool, retake_policy: RetakePolicy) -> Self {
        let periods = PeriodService::new(pool.clone());
        Self {
            pool,
            periods,
            retake_policy,
        }
    }

    async fn course_by_code(&self, school_id: Uuid, code: &str) -> Result<Course> {
        sqlx::query_as::<_, Course>(
            r#"SELECT * FROM courses WHERE school_id = $1 AND course_code = $2"#,
        )
        .bind(school_id)
        .bind(code.trim().to_uppercase())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Course not found".to_string()))
    }

    /// Live question set for the attempt tuple, in stable id order.
    async fn questions_for(
        &self,
        course_id: Uuid,
        period: &ActivePeriod,
        class_grade: Option<i32>,
    ) -> Result<Vec<Question>> {
        let rows = sqlx::query_as::<_, Question>(
            r#"
            SELECT * FROM questions
            WHERE course_id = $1
              AND (term IS NULL OR term = $2)
              AND (session IS NULL OR session = $3)
              AND (class_grade IS NULL OR class_grade = $4)
            ORDER BY id
            "#,
        )
        .bind(course_id)
        .bind(&period.term)
        .bind(&period.session)
        .bind(class_grade)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn backgrounds_for(&self, course_id: Uuid) -> Result<HashMap<i64, String>> {
        let rows = sqlx::query_as::<_, (i64, String)>(
            r#"SELECT id, passage FROM question_backgrounds WHERE course_id = $1"#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    async fn score_for(
        &self,
        account_id: Uuid,
        course_id: Uuid,
        period: &ActivePeriod,
    ) -> Result<Option<Score>> {
        let score = sqlx::query_as::<_, Score>(
            r#"SELECT * FROM scores WHERE account_id = $1 AND course_id = $2 AND term = $3 AND session = $4"#,
        )
        .bind(account_id)
        .bind(course_id)
        .bind(&period.term)
        .bind(&period.session)
        .fetch_optional(&self.pool)
        .await?;
        Ok(score)
    }

    /// Retake reset: drop the prior attempt's rows and reopen the slot.
    async fn reset_for_retake(&self, score: &Score) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"DELETE FROM results WHERE account_id = $1 AND course_id = $2 AND term = $3 AND session = $4"#,
        )
        .bind(score.account_id)
        .bind(score.course_id)
        .bind(&score.term)
        .bind(&score.session)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            r#"UPDATE scores SET score = 0, remark = $1, state = $2, graded_at = NULL, updated_at = NOW() WHERE id = $3"#,
        )
        .bind(Remark::Fail.as_str())
        .bind(attempt_state::OPEN)
        .bind(score.id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Exam entry. Reserves the attempt slot with a placeholder score and
    /// assembles the paper with per-render option shuffles. Re-entry while
    /// the slot is open simply re-renders (with fresh shuffles).
    pub async fn open_paper(
        &self,
        account_id: Uuid,
        school_id: Uuid,
        course_code: &str,
        class_grade: Option<i32>,
        today: NaiveDate,
    ) -> Result<ExamEntry> {
        let course = self.course_by_code(school_id, course_code).await?;
        let period = self.periods.active_period_for(course.id, today).await?;

        match self.score_for(account_id, course.id, &period).await? {
            Some(score) if score.is_graded() => match score.remark() {
                Some(Remark::Pass) => {
                    return Ok(ExamEntry::AlreadyPassed {
                        course_code: course.course_code.clone(),
                    });
                }
                Some(Remark::Retake) => self.reset_for_retake(&score).await?,
                _ => {
                    if self.retake_policy == RetakePolicy::AdminReset {
                        return Err(Error::Forbidden(
                            "Your previous attempt was marked Fail. An administrator must reset your score before a retake."
                                .to_string(),
                        ));
                    }
                    self.reset_for_retake(&score).await?;
                }
            },
            Some(_) => {}
            None => {
                // Unique tuple constraint makes concurrent first entries
                // collapse into one placeholder.
                sqlx::query(
                    r#"
                    INSERT INTO scores (account_id, course_id, term, session, score, remark, state)
                    VALUES ($1, $2, $3, $4, 0, $5, $6)
                    ON CONFLICT (account_id, course_id, term, session) DO NOTHING
                    "#,
                )
                .bind(account_id)
                .bind(course.id)
                .bind(&period.term)
                .bind(&period.session)
                .bind(Remark::Fail.as_str())
                .bind(attempt_state::OPEN)
                .execute(&self.pool)
                .await?;
            }
        }

        let questions = self
            .questions_for(course.id, &period, class_grade)
            .await?;
        if questions.is_empty() {
            return Err(Error::NotFound(
                "No questions have been set for this course".to_string(),
            ));
        }
        let backgrounds = self.backgrounds_for(course.id).await?;

        let mut rng = rand::thread_rng();
        let total_questions = questions.len();
        let sections = build_sections(&questions, &backgrounds, &mut rng);

        Ok(ExamEntry::Paper(ExamPaperResponse {
            course_code: course.course_code,
            course_title: course.course_title,
            term: period.term,
            session: period.session,
            duration_minutes: period.duration_minutes,
            total_questions,
            sections,
        }))
    }

    /// Grade-and-commit in a single transaction, serialized per attempt
    /// tuple by a row lock on the score placeholder. The committed score is
    /// recomputed from a full re-read of the persisted result rows.
    pub async fn submit_paper(
        &self,
        account_id: Uuid,
        school_id: Uuid,
        course_code: &str,
        class_grade: Option<i32>,
        today: NaiveDate,
        req: SubmitExamRequest,
    ) -> Result<GradedOutcome> {
        let course = self.course_by_code(school_id, course_code).await?;
        let period = self.periods.active_period_for(course.id, today).await?;
        let questions = self
            .questions_for(course.id, &period, class_grade)
            .await?;
        if questions.is_empty() {
            return Err(Error::NotFound(
                "No questions have been set for this course".to_string(),
            ));
        }

        let mut submitted: HashMap<i64, String> = HashMap::new();
        for answer in req.answers {
            if let Some(selected) = answer.selected {
                let selected = selected.trim();
                if !selected.is_empty() {
                    submitted.insert(answer.question_id, selected.to_string());
                }
            }
        }

        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_as::<_, Score>(
            r#"SELECT * FROM scores WHERE account_id = $1 AND course_id = $2 AND term = $3 AND session = $4 FOR UPDATE"#,
        )
        .bind(account_id)
        .bind(course.id)
        .bind(&period.term)
        .bind(&period.session)
        .fetch_optional(&mut *tx)
        .await?;

        let score = match locked {
            Some(score) => score,
            None => {
                // Submission without a prior entry: reserve the slot now,
                // yielding to a concurrent writer if it got there first.
                let inserted = sqlx::query_as::<_, Score>(
                    r#"
                    INSERT INTO scores (account_id, course_id, term, session, score, remark, state)
                    VALUES ($1, $2, $3, $4, 0, $5, $6)
                    ON CONFLICT (account_id, course_id, term, session) DO NOTHING
                    RETURNING *
                    "#,
                )
                .bind(account_id)
                .bind(course.id)
                .bind(&period.term)
                .bind(&period.session)
                .bind(Remark::Fail.as_str())
                .bind(attempt_state::OPEN)
                .fetch_optional(&mut *tx)
                .await?;
                match inserted {
                    Some(score) => score,
                    None => {
                        sqlx::query_as::<_, Score>(
                            r#"SELECT * FROM scores WHERE account_id = $1 AND course_id = $2 AND term = $3 AND session = $4 FOR UPDATE"#,
                        )
                        .bind(account_id)
                        .bind(course.id)
                        .bind(&period.term)
                        .bind(&period.session)
                        .fetch_one(&mut *tx)
                        .await?
                    }
                }
            }
        };

        if score.is_graded() {
            match score.remark() {
                Some(Remark::Pass) => {
                    return Err(Error::Conflict(
                        "This exam has already been completed".to_string(),
                    ));
                }
                Some(Remark::Retake) => {}
                _ => {
                    if self.retake_policy == RetakePolicy::AdminReset {
                        return Err(Error::Forbidden(
                            "An administrator must reset your score before you can retake this exam."
                                .to_string(),
                        ));
                    }
                }
            }
        }

        // Destructive overwrite: the previous attempt leaves no history.
        sqlx::query(
            r#"DELETE FROM results WHERE account_id = $1 AND course_id = $2 AND term = $3 AND session = $4"#,
        )
        .bind(account_id)
        .bind(course.id)
        .bind(&period.term)
        .bind(&period.session)
        .execute(&mut *tx)
        .await?;

        for question in &questions {
            let selected = submitted
                .get(&question.id)
                .cloned()
                .unwrap_or_else(|| NOT_ANSWERED.to_string());
            let correct = question.correct_option().ok_or_else(|| {
                Error::Internal(format!("Question {} has an empty option set", question.id))
            })?;
            sqlx::query(
                r#"
                INSERT INTO results (account_id, course_id, question_id, term, session, selected_answer, correct_answer)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(account_id)
            .bind(course.id)
            .bind(question.id)
            .bind(&period.term)
            .bind(&period.session)
            .bind(&selected)
            .bind(correct)
            .execute(&mut *tx)
            .await?;
        }

        // Never trust the submission loop: re-read what was persisted.
        let rows = sqlx::query_as::<_, AttemptResult>(
            r#"SELECT * FROM results WHERE account_id = $1 AND course_id = $2 AND term = $3 AND session = $4"#,
        )
        .bind(account_id)
        .bind(course.id)
        .bind(&period.term)
        .bind(&period.session)
        .fetch_all(&mut *tx)
        .await?;

        let (correct_count, total_questions) = GradingService::tally(&rows);
        let percentage = GradingService::percentage(correct_count, total_questions);
        let remark = GradingService::remark_for(correct_count, total_questions);

        sqlx::query(
            r#"UPDATE scores SET score = $1, remark = $2, state = $3, graded_at = NOW(), updated_at = NOW() WHERE id = $4"#,
        )
        .bind(percentage)
        .bind(remark.as_str())
        .bind(attempt_state::GRADED)
        .bind(score.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(GradedOutcome {
            score_id: score.id,
            correct_count,
            total_questions,
            percentage,
            remark,
        })
    }

    /// Read-only verdict view over the graded attempt. Duplicate score rows
    /// (a historical double-write race) resolve to the highest score.
    pub async fn verdict(
        &self,
        account_id: Uuid,
        school_id: Uuid,
        course_code: &str,
    ) -> Result<VerdictResponse> {
        let course = self.course_by_code(school_id, course_code).await?;

        let scores = sqlx::query_as::<_, Score>(
            r#"
            SELECT * FROM scores
            WHERE account_id = $1 AND course_id = $2 AND state = $3
            ORDER BY score DESC, graded_at DESC
            "#,
        )
        .bind(account_id)
        .bind(course.id)
        .bind(attempt_state::GRADED)
        .fetch_all(&self.pool)
        .await?;

        if scores.len() > 1 {
            tracing::warn!(
                account_id = %account_id,
                course_code = %course.course_code,
                rows = scores.len(),
                "duplicate score rows for attempt tuple; favoring the highest"
            );
        }
        let best = scores
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound("Score not found".to_string()))?;

        #[derive(sqlx::FromRow)]
        struct ReviewRow {
            prompt: String,
            selected_answer: String,
            correct_answer: String,
        }

        let rows = sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT q.prompt, r.selected_answer, r.correct_answer
            FROM results r
            JOIN questions q ON q.id = r.question_id
            WHERE r.account_id = $1 AND r.course_id = $2 AND r.term = $3 AND r.session = $4
            ORDER BY r.question_id
            "#,
        )
        .bind(account_id)
        .bind(course.id)
        .bind(&best.term)
        .bind(&best.session)
        .fetch_all(&self.pool)
        .await?;

        let answers = rows
            .into_iter()
            .map(|r| AnswerReview {
                is_correct: r.selected_answer == r.correct_answer,
                prompt: r.prompt,
                selected_answer: r.selected_answer,
                correct_answer: r.correct_answer,
            })
            .collect();

        Ok(VerdictResponse {
            course_title: course.course_title,
            percentage: best.score,
            remark: best.remark.clone(),
            message: GradingService::verdict_message(best.score).to_string(),
            answers,
        })
    }

    /// Admin-only: the sole transition out of a graded verdict. Rewrites the
    /// remark to Retake; the next entry performs the actual reset.
    pub async fn reset_score(&self, score_id: Uuid) -> Result<Score> {
        let score = sqlx::query_as::<_, Score>(
            r#"UPDATE scores SET remark = $1, updated_at = NOW() WHERE id = $2 RETURNING *"#,
        )
        .bind(Remark::Retake.as_str())
        .bind(score_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Score not found".to_string()))?;
        Ok(score)
    }
}
