use crate::models::score::{AttemptResult, Remark};

/// Recorded for any question position the candidate left blank. Can never
/// equal a stored correct option, so it always grades as wrong.
pub const NOT_ANSWERED: &str = "Not answered";

/// Threshold applied when the verdict page classifies a stored percentage.
/// Defined separately from the scoring-time raw-count rule below; the two
/// coincide in the percentage encoding but each check stays explicit.
pub const VERDICT_PASS_PERCENT: i32 = 50;

pub struct GradingService;

impl GradingService {
    /// Raw tally over persisted result rows: (correct, total).
    pub fn tally(rows: &[AttemptResult]) -> (usize, usize) {
        let correct = rows.iter().filter(|r| r.is_correct()).count();
        (correct, rows.len())
    }

    /// Canonical stored unit: rounded integer percentage.
    pub fn percentage(correct: usize, total: usize) -> i32 {
        if total == 0 {
            return 0;
        }
        ((correct as f64 / total as f64) * 100.0).round() as i32
    }

    /// Scoring-time rule: raw correct count at least half the question count
    /// passes.
    pub fn remark_for(correct: usize, total: usize) -> Remark {
        if total > 0 && correct * 2 >= total {
            Remark::Pass
        } else {
            Remark::Fail
        }
    }

    pub fn is_verdict_pass(percentage: i32) -> bool {
        percentage >= VERDICT_PASS_PERCENT
    }

    pub fn verdict_message(percentage: i32) -> &'static str {
        if Self::is_verdict_pass(percentage) {
            "Congratulations! You have passed this course"
        } else {
            "Sorry! You scored below the pass mark for this course and you need to rewrite this exam."
        }
    }
}
