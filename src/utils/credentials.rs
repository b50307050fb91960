use rand::{thread_rng, Rng};

/// Random 6-digit numeric passcode, delivered out-of-band and stored only
/// hashed.
pub fn generate_passcode() -> String {
    thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn title_case(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Base username: first initial plus surname, lowercase, letters and digits
/// only.
pub fn compose_username(first_name: &str, surname: &str) -> String {
    let initial = first_name.trim().chars().next().map(|c| c.to_string()).unwrap_or_default();
    format!("{}{}", initial, surname.trim())
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Collision suffix: N prior accounts already share the prefix, so this one
/// becomes `baseN`.
pub fn uniquify_username(base: &str, colliding: i64) -> String {
    if colliding > 0 {
        format!("{}{}", base, colliding)
    } else {
        base.to_string()
    }
}

/// Synthetic login id for the entrance-exam tier: `{SCHOOL_CODE}-S-{examNumber}`,
/// normalized lowercase in storage.
pub fn entrance_username(school_code: &str, exam_number: &str) -> String {
    format!("{}-S-{}", school_code.trim(), exam_number.trim()).to_lowercase()
}
