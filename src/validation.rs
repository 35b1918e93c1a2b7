//! Field rules applied to lead submissions before anything is stored.

use crate::errors::{AppError, FieldError};
use crate::models::LeadCreate;
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_NAME_CHARS: usize = 2;
pub const MAX_NAME_CHARS: usize = 255;
pub const PHONE_DIGITS: usize = 10;

const MAX_EMAIL_LEN: usize = 254;

// RFC 5322 simplified: local@label(.label)+, at least one dot in the domain.
// ASCII only; internationalised addresses (SMTPUTF8, raw IDN) are rejected.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$",
    )
    .expect("email pattern compiles")
});

/// Checks email syntax.
///
/// Rejects empty input, addresses over 254 bytes, dotless domains and
/// leading, trailing or doubled dots in the local part.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || email.len() > MAX_EMAIL_LEN {
        return false;
    }

    EMAIL_REGEX.is_match(email)
}

/// True when `phone` is exactly ten ASCII digits, no separators.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.len() == PHONE_DIGITS && phone.bytes().all(|b| b.is_ascii_digit())
}

fn check_name(field: &str, value: &str, errors: &mut Vec<FieldError>) {
    let chars = value.chars().count();
    if chars < MIN_NAME_CHARS {
        errors.push(FieldError::new(
            field,
            format!("must be at least {} characters", MIN_NAME_CHARS),
        ));
    } else if chars > MAX_NAME_CHARS {
        errors.push(FieldError::new(
            field,
            format!("must be at most {} characters", MAX_NAME_CHARS),
        ));
    }
}

/// Validates a submission, reporting every violated field at once.
pub fn validate_lead(input: &LeadCreate) -> Result<(), AppError> {
    let mut errors = Vec::new();

    check_name("schoolName", &input.school_name, &mut errors);
    check_name("contactName", &input.contact_name, &mut errors);

    if !is_valid_email(&input.email) {
        errors.push(FieldError::new("email", "invalid email address"));
    }

    if !is_valid_phone(&input.phone) {
        errors.push(FieldError::new(
            "phone",
            format!("must be exactly {} digits", PHONE_DIGITS),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}
