use chrono::{NaiveDate, Utc};
use exam_portal_backend::models::exam_window::ExamWindow;
use exam_portal_backend::services::period_service::{resolve_active_period, ActivePeriod};
use uuid::Uuid;

fn window(term: &str, session: &str, opens: (i32, u32, u32), closes: (i32, u32, u32)) -> ExamWindow {
    ExamWindow {
        id: Uuid::new_v4(),
        course_id: Uuid::new_v4(),
        term: term.to_string(),
        session: session.to_string(),
        opens_on: NaiveDate::from_ymd_opt(opens.0, opens.1, opens.2).unwrap(),
        closes_on: NaiveDate::from_ymd_opt(closes.0, closes.1, closes.2).unwrap(),
        duration_minutes: 45,
        score_weight: 70,
        created_at: Utc::now(),
    }
}

#[test]
fn an_open_window_resolves_to_its_period() {
    let windows = vec![window("First Term", "2026/2027", (2026, 8, 1), (2026, 8, 31))];
    let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

    let period = resolve_active_period(today, &windows).expect("window open");
    assert_eq!(period.term, "First Term");
    assert_eq!(period.session, "2026/2027");
    assert_eq!(period.duration_minutes, 45);
    assert_eq!(period.score_weight, 70);
}

#[test]
fn window_boundaries_are_inclusive() {
    let windows = vec![window("First Term", "2026", (2026, 8, 1), (2026, 8, 31))];
    assert!(resolve_active_period(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(), &windows).is_some());
    assert!(resolve_active_period(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap(), &windows).is_some());
    assert!(resolve_active_period(NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(), &windows).is_none());
    assert!(resolve_active_period(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(), &windows).is_none());
}

#[test]
fn closed_windows_resolve_to_none() {
    let windows = vec![
        window("First Term", "2026", (2026, 1, 10), (2026, 1, 20)),
        window("Second Term", "2026", (2026, 5, 10), (2026, 5, 20)),
    ];
    let today = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
    assert!(resolve_active_period(today, &windows).is_none());
}

#[test]
fn earliest_opening_window_wins_when_windows_overlap() {
    let windows = vec![
        window("First Term", "2026", (2026, 8, 1), (2026, 8, 31)),
        window("Makeup", "2026", (2026, 8, 5), (2026, 9, 5)),
    ];
    let today = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
    let period = resolve_active_period(today, &windows).unwrap();
    assert_eq!(period.term, "First Term");
}

#[test]
fn fallback_period_is_the_general_term_for_the_year() {
    let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
    let period = ActivePeriod::fallback(today);
    assert_eq!(period.term, "General");
    assert_eq!(period.session, "2026");
}
