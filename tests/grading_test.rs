use chrono::Utc;
use exam_portal_backend::models::score::{AttemptResult, Remark};
use exam_portal_backend::services::grading_service::{GradingService, NOT_ANSWERED};
use uuid::Uuid;

fn result(selected: &str, correct: &str) -> AttemptResult {
    AttemptResult {
        id: Uuid::new_v4(),
        account_id: Uuid::new_v4(),
        course_id: Uuid::new_v4(),
        question_id: 1,
        term: "General".to_string(),
        session: "2026".to_string(),
        selected_answer: selected.to_string(),
        correct_answer: correct.to_string(),
        created_at: Utc::now(),
    }
}

#[test]
fn three_of_four_with_one_blank_scores_75_and_passes() {
    let rows = vec![
        result("Paris", "Paris"),
        result("4", "4"),
        result("Mercury", "Mercury"),
        result(NOT_ANSWERED, "Jupiter"),
    ];

    let (correct, total) = GradingService::tally(&rows);
    assert_eq!((correct, total), (3, 4));
    assert_eq!(GradingService::percentage(correct, total), 75);
    assert_eq!(GradingService::remark_for(correct, total), Remark::Pass);
}

#[test]
fn blank_answers_always_grade_wrong() {
    let rows = vec![result(NOT_ANSWERED, "Lagos"), result(NOT_ANSWERED, "Abuja")];
    let (correct, total) = GradingService::tally(&rows);
    assert_eq!(correct, 0);
    assert_eq!(total, 2);
    assert_eq!(GradingService::remark_for(correct, total), Remark::Fail);
}

#[test]
fn exactly_half_raw_count_passes() {
    // Scoring-time rule is >= half of the raw question count.
    assert_eq!(GradingService::remark_for(2, 4), Remark::Pass);
    assert_eq!(GradingService::remark_for(1, 3), Remark::Fail);
    assert_eq!(GradingService::remark_for(2, 3), Remark::Pass);
    assert_eq!(GradingService::remark_for(0, 1), Remark::Fail);
}

#[test]
fn percentage_rounds_to_nearest_integer() {
    assert_eq!(GradingService::percentage(1, 3), 33);
    assert_eq!(GradingService::percentage(2, 3), 67);
    assert_eq!(GradingService::percentage(0, 5), 0);
    assert_eq!(GradingService::percentage(5, 5), 100);
}

#[test]
fn empty_result_set_scores_zero_and_fails() {
    let rows: Vec<AttemptResult> = Vec::new();
    let (correct, total) = GradingService::tally(&rows);
    assert_eq!(GradingService::percentage(correct, total), 0);
    assert_eq!(GradingService::remark_for(correct, total), Remark::Fail);
}

#[test]
fn recomputing_from_the_same_rows_is_idempotent() {
    let rows = vec![
        result("A", "A"),
        result("B", "C"),
        result("D", "D"),
    ];
    let first = {
        let (c, t) = GradingService::tally(&rows);
        (GradingService::percentage(c, t), GradingService::remark_for(c, t))
    };
    for _ in 0..10 {
        let (c, t) = GradingService::tally(&rows);
        assert_eq!(
            (GradingService::percentage(c, t), GradingService::remark_for(c, t)),
            first
        );
    }
}

#[test]
fn verdict_threshold_is_fifty_percent_inclusive() {
    // Verdict-time check is defined independently of the raw-count rule.
    assert!(GradingService::is_verdict_pass(50));
    assert!(GradingService::is_verdict_pass(75));
    assert!(!GradingService::is_verdict_pass(49));
    assert!(GradingService::verdict_message(75).starts_with("Congratulations"));
    assert!(GradingService::verdict_message(25).starts_with("Sorry"));
}
