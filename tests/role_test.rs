use exam_portal_backend::models::account::{Capability, Role};
use exam_portal_backend::models::score::Remark;

#[test]
fn admin_grants_are_a_superset_of_every_other_role() {
    for role in [Role::Instructor, Role::Student, Role::Prospective] {
        for cap in role.grants() {
            assert!(
                Role::Admin.can(*cap),
                "Admin is missing {:?} granted to {:?}",
                cap,
                role
            );
        }
    }
}

#[test]
fn instructors_author_questions_but_cannot_reset_scores() {
    assert!(Role::Instructor.can(Capability::AuthorQuestions));
    assert!(Role::Instructor.can(Capability::TakeExams));
    assert!(!Role::Instructor.can(Capability::ResetScores));
    assert!(!Role::Instructor.can(Capability::ManageAccounts));
}

#[test]
fn examinees_hold_exam_taking_only() {
    for role in [Role::Student, Role::Prospective] {
        assert_eq!(role.grants(), &[Capability::TakeExams]);
        assert!(!role.can(Capability::AuthorQuestions));
        assert!(!role.can(Capability::ViewReports));
    }
}

#[test]
fn role_names_round_trip() {
    for role in [Role::Admin, Role::Instructor, Role::Student, Role::Prospective] {
        assert_eq!(Role::parse(role.as_str()), Some(role));
    }
    assert_eq!(Role::parse("Superuser"), None);
}

#[test]
fn remarks_round_trip() {
    for remark in [Remark::Pass, Remark::Fail, Remark::Retake] {
        assert_eq!(Remark::parse(remark.as_str()), Some(remark));
    }
    assert_eq!(Remark::parse("Maybe"), None);
}
