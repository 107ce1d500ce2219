use std::sync::LazyLock;

use regex::Regex;

use crate::models::{UserError, UserProfileInput};

static NRIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[STFGM]\d{7}[A-Z]$").expect("valid NRIC pattern"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn is_valid_nric(nric: &str) -> bool {
    NRIC_PATTERN.is_match(nric)
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && EMAIL_PATTERN.is_match(email)
}

impl UserProfileInput {
    /// Validates identifiers and capitalizes names.
    pub fn normalize(mut self) -> Result<Self, UserError> {
        if !is_valid_nric(&self.nric) {
            return Err(UserError::Validation(format!(
                "NRIC {} does not match the expected format.",
                self.nric
            )));
        }
        if !is_valid_email(&self.email) {
            return Err(UserError::Validation(format!(
                "{} is not a valid email address.",
                self.email
            )));
        }
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(UserError::Validation("Names must not be empty.".to_string()));
        }

        self.first_name = capitalize(&self.first_name);
        self.last_name = capitalize(&self.last_name);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use shared_models::domain::Gender;

    fn profile(nric: &str, email: &str) -> UserProfileInput {
        UserProfileInput {
            nric: nric.to_string(),
            first_name: "jOHN".to_string(),
            last_name: "doe".to_string(),
            email: email.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: Gender::Male,
            health_conditions: None,
        }
    }

    #[test]
    fn capitalize_matches_title_case_of_first_letter() {
        assert_eq!(capitalize("jOHN"), "John");
        assert_eq!(capitalize("tan"), "Tan");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn nric_format() {
        assert!(is_valid_nric("S9999999J"));
        assert!(is_valid_nric("T0123456A"));
        assert!(!is_valid_nric("A9999999J"));
        assert!(!is_valid_nric("S999999J"));
        assert!(!is_valid_nric("s9999999j"));
        // whole-value match only
        assert!(!is_valid_nric("NRIC S9999999J"));
        assert!(!is_valid_nric("S9999999JX"));
    }

    #[test]
    fn normalize_capitalizes_names() {
        let normalized = profile("S9999999J", "john.doe@example.com").normalize().unwrap();
        assert_eq!(normalized.first_name, "John");
        assert_eq!(normalized.last_name, "Doe");
    }

    #[test]
    fn normalize_rejects_bad_identifiers() {
        assert_matches!(profile("X1", "john.doe@example.com").normalize(), Err(UserError::Validation(_)));
        assert_matches!(profile("S9999999J", "not-an-email").normalize(), Err(UserError::Validation(_)));
    }
}
