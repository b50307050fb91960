use exam_portal_backend::services::report_service::{ReportService, ScoreReportRow, EXPORT_HEADER};
use uuid::Uuid;

fn row(surname: &str, first_name: &str, course: &str, score: i32, remark: &str) -> ScoreReportRow {
    ScoreReportRow {
        score_id: Uuid::new_v4(),
        course_title: course.to_string(),
        account_id: Uuid::new_v4(),
        surname: surname.to_string(),
        first_name: first_name.to_string(),
        session: "2026".to_string(),
        score,
        remark: remark.to_string(),
    }
}

#[test]
fn csv_export_has_the_fixed_column_header() {
    let bytes = ReportService::rows_to_csv(&[]).expect("csv");
    let text = String::from_utf8(bytes).expect("utf8");
    assert_eq!(
        text.lines().next().unwrap(),
        EXPORT_HEADER.join(",")
    );
}

#[test]
fn csv_export_writes_one_line_per_score() {
    let rows = vec![
        row("Doe", "John", "Bible Study", 75, "Pass"),
        row("Okafor", "Amara", "Mathematics", 40, "Fail"),
    ];
    let bytes = ReportService::rows_to_csv(&rows).expect("csv");
    let text = String::from_utf8(bytes).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Bible Study"));
    assert!(lines[1].contains("Doe"));
    assert!(lines[1].contains("75"));
    assert!(lines[1].contains("Pass"));
    assert!(lines[2].contains("Mathematics"));
    assert!(lines[2].contains("Fail"));
}

#[test]
fn csv_export_quotes_fields_containing_commas() {
    let rows = vec![row("Doe", "John", "Reading, Writing and Arithmetic", 60, "Pass")];
    let bytes = ReportService::rows_to_csv(&rows).expect("csv");
    let text = String::from_utf8(bytes).expect("utf8");
    assert!(text.contains("\"Reading, Writing and Arithmetic\""));
}
