use exam_portal_backend::utils::credentials::{
    compose_username, entrance_username, generate_passcode, title_case, uniquify_username,
};

#[test]
fn username_is_first_initial_plus_surname_lowercase() {
    assert_eq!(compose_username("John", "Doe"), "jdoe");
    assert_eq!(compose_username("Amara", "Okafor"), "aokafor");
    assert_eq!(compose_username(" grace ", " Bello "), "gbello");
}

#[test]
fn username_strips_non_alphanumeric_characters() {
    assert_eq!(compose_username("Mary-Jane", "O'Connor"), "moconnor");
}

#[test]
fn colliding_usernames_get_a_count_suffix() {
    assert_eq!(uniquify_username("jdoe", 0), "jdoe");
    assert_eq!(uniquify_username("jdoe", 1), "jdoe1");
    assert_eq!(uniquify_username("jdoe", 4), "jdoe4");
}

#[test]
fn title_case_normalizes_names() {
    assert_eq!(title_case("dOE"), "Doe");
    assert_eq!(title_case("  john"), "John");
    assert_eq!(title_case(""), "");
}

#[test]
fn entrance_login_id_embeds_school_code_and_exam_number() {
    assert_eq!(entrance_username("GHS", "0042"), "ghs-s-0042");
    assert_eq!(entrance_username("stm", "17"), "stm-s-17");
}

#[test]
fn passcodes_are_six_numeric_digits() {
    for _ in 0..100 {
        let passcode = generate_passcode();
        assert_eq!(passcode.len(), 6);
        assert!(passcode.chars().all(|c| c.is_ascii_digit()));
        let n: u32 = passcode.parse().expect("numeric passcode");
        assert!((100_000..=999_999).contains(&n));
    }
}
