//! Issuer email and Chamber of Commerce (KvK) number checks.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::ValueError;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").expect("email regex compiles"));

/// Check that an email address looks like `local@domain.tld`.
pub fn validate_email(email: &str) -> Result<String, ValueError> {
    let trimmed = email.trim();
    if EMAIL.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValueError::new(
            "invalid_email",
            "details_supplier.email",
            format!("The email address '{email}' is not a valid email address."),
        ))
    }
}

/// A KvK number is 8 digits; whitespace and dots are stripped first.
pub fn validate_kvk(kvk: &str) -> Result<String, ValueError> {
    let cleaned: String = kvk
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();
    if cleaned.len() == 8 && cleaned.chars().all(|c| c.is_ascii_digit()) {
        Ok(cleaned)
    } else {
        Err(ValueError::new(
            "invalid_kvk_number",
            "details_supplier.kvk",
            format!(
                "The KvK number '{kvk}' is not valid. A KvK number consists of exactly 8 digits."
            ),
        )
        .with_remedy("Use the 8-digit KvK number, not the BTW number or the branch number."))
    }
}
