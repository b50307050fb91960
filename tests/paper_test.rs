use std::collections::HashMap;

use chrono::Utc;
use exam_portal_backend::models::question::Question;
use exam_portal_backend::services::exam_service::{build_sections, shuffled_options};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sqlx::types::Json;
use uuid::Uuid;

fn question(id: i64, course_id: Uuid, background_id: Option<i64>, options: &[&str]) -> Question {
    Question {
        id,
        course_id,
        background_id,
        prompt: format!("Question {}", id),
        options: Json(options.iter().map(|s| s.to_string()).collect()),
        class_grade: None,
        term: None,
        session: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn shuffle_preserves_the_option_set() {
    let options: Vec<String> = ["Correct", "Wrong A", "Wrong B", "Wrong C"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let presented = shuffled_options(&options, &mut rng);
        assert_eq!(presented.len(), 4);
        assert_eq!(
            presented.iter().filter(|o| o.as_str() == "Correct").count(),
            1
        );
        let mut sorted = presented.clone();
        sorted.sort();
        let mut expected = options.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }
}

#[test]
fn shuffle_never_changes_which_answer_grades_correct() {
    let options: Vec<String> = ["Right", "W1", "W2"].iter().map(|s| s.to_string()).collect();
    let correct = options[0].clone();
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..20 {
        let presented = shuffled_options(&options, &mut rng);
        // Grading compares the submitted string to the stored correct
        // option, so any presented position of "Right" still matches.
        let submitted = presented
            .iter()
            .find(|o| o.as_str() == "Right")
            .expect("correct option present");
        assert_eq!(submitted, &correct);
    }
}

#[test]
fn questions_sharing_a_background_surface_adjacently() {
    let course_id = Uuid::new_v4();
    let questions = vec![
        question(1, course_id, None, &["A", "B"]),
        question(2, course_id, Some(10), &["A", "B"]),
        question(3, course_id, None, &["A", "B"]),
        question(4, course_id, Some(10), &["A", "B"]),
    ];
    let mut backgrounds = HashMap::new();
    backgrounds.insert(10_i64, "Read the passage below.".to_string());

    let mut rng = StdRng::seed_from_u64(3);
    let sections = build_sections(&questions, &backgrounds, &mut rng);

    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0].background, None);
    assert_eq!(sections[0].questions.len(), 1);

    // The shared passage is rendered once, with both of its questions.
    assert_eq!(
        sections[1].background.as_deref(),
        Some("Read the passage below.")
    );
    let grouped_ids: Vec<i64> = sections[1].questions.iter().map(|q| q.question_id).collect();
    assert_eq!(grouped_ids, vec![2, 4]);

    assert_eq!(sections[2].background, None);
    assert_eq!(sections[2].questions[0].question_id, 3);
}

#[test]
fn question_numbering_is_sequential_across_sections() {
    let course_id = Uuid::new_v4();
    let questions = vec![
        question(1, course_id, None, &["A", "B"]),
        question(2, course_id, Some(5), &["A", "B"]),
        question(3, course_id, Some(5), &["A", "B"]),
        question(4, course_id, None, &["A", "B"]),
    ];
    let mut backgrounds = HashMap::new();
    backgrounds.insert(5_i64, "Passage".to_string());

    let mut rng = StdRng::seed_from_u64(1);
    let sections = build_sections(&questions, &backgrounds, &mut rng);

    let numbers: Vec<usize> = sections
        .iter()
        .flat_map(|s| s.questions.iter().map(|q| q.number))
        .collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn standalone_runs_coalesce_into_one_section() {
    let course_id = Uuid::new_v4();
    let questions = vec![
        question(1, course_id, None, &["A", "B"]),
        question(2, course_id, None, &["A", "B"]),
        question(3, course_id, None, &["A", "B"]),
    ];
    let backgrounds = HashMap::new();

    let mut rng = StdRng::seed_from_u64(9);
    let sections = build_sections(&questions, &backgrounds, &mut rng);

    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].questions.len(), 3);
    assert_eq!(sections[0].background, None);
}

#[test]
fn three_distractors_always_render_four_options() {
    let course_id = Uuid::new_v4();
    let q = question(1, course_id, None, &["Correct", "W1", "W2", "W3"]);
    let backgrounds = HashMap::new();
    let mut rng = StdRng::seed_from_u64(21);

    for _ in 0..25 {
        let sections = build_sections(std::slice::from_ref(&q), &backgrounds, &mut rng);
        let rendered = &sections[0].questions[0].options;
        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered.iter().filter(|o| o.as_str() == "Correct").count(), 1);
    }
}
