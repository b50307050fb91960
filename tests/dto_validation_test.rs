use exam_portal_backend::dto::auth_dto::LoginRequest;
use exam_portal_backend::dto::question_dto::CreateQuestionPayload;
use exam_portal_backend::services::question_service::compose_options;
use validator::Validate;

#[test]
fn passcodes_must_be_six_numeric_digits() {
    let ok = LoginRequest {
        username: "jdoe".to_string(),
        passcode: "123456".to_string(),
    };
    assert!(ok.validate().is_ok());

    let short = LoginRequest {
        username: "jdoe".to_string(),
        passcode: "12345".to_string(),
    };
    assert!(short.validate().is_err());

    let alpha = LoginRequest {
        username: "jdoe".to_string(),
        passcode: "12a456".to_string(),
    };
    assert!(alpha.validate().is_err());
}

#[test]
fn questions_require_one_to_four_distractors() {
    let base = CreateQuestionPayload {
        course_code: "BS101".to_string(),
        prompt: "Who led the Israelites out of Egypt?".to_string(),
        correct_option: "Moses".to_string(),
        distractors: vec!["Aaron".to_string()],
        background_id: None,
        class_grade: None,
        term: None,
        session: None,
    };
    assert!(base.validate().is_ok());

    let none = CreateQuestionPayload {
        distractors: vec![],
        ..base.clone()
    };
    assert!(none.validate().is_err());

    let five = CreateQuestionPayload {
        distractors: (1..=5).map(|i| format!("Wrong {}", i)).collect(),
        ..base
    };
    assert!(five.validate().is_err());
}

#[test]
fn option_list_keeps_the_correct_option_at_index_zero() {
    let options = compose_options("Moses", &["Aaron".to_string(), "Joshua".to_string()]).unwrap();
    assert_eq!(options[0], "Moses");
    assert_eq!(options.len(), 3);
}

#[test]
fn blank_distractor_fields_are_dropped() {
    let options = compose_options(
        "Moses",
        &["Aaron".to_string(), "  ".to_string(), "".to_string()],
    )
    .unwrap();
    assert_eq!(options, vec!["Moses".to_string(), "Aaron".to_string()]);
}

#[test]
fn a_distractor_equal_to_the_correct_option_is_rejected() {
    let err = compose_options("Moses", &["Moses".to_string()]);
    assert!(err.is_err());
}

#[test]
fn at_least_one_distractor_must_survive_trimming() {
    let err = compose_options("Moses", &["   ".to_string()]);
    assert!(err.is_err());
}
