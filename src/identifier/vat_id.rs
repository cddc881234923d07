//! Country-keyed VAT identifier format validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::ValueError;

const FIELD: &str = "details_supplier.vat_id";

struct VatPattern {
    country: &'static str,
    regex: Regex,
    shape: &'static str,
}

static VAT_PATTERNS: LazyLock<Vec<VatPattern>> = LazyLock::new(|| {
    [
        ("NL", r"^NL[0-9]{9}B[0-9]{2}$", "NL + 9 digits + B + 2 digits"),
        ("BE", r"^BE[0-1][0-9]{9}$", "BE + 0 or 1 + 9 digits"),
        ("DE", r"^DE[0-9]{9}$", "DE + 9 digits"),
        ("FR", r"^FR[A-Z0-9]{2}[0-9]{9}$", "FR + 2 letters/digits + 9 digits"),
        (
            "GB",
            r"^GB(?:[0-9]{9}|[0-9]{12}|(?:GD|HA)[0-9]{3})$",
            "GB + 9 or 12 digits, or GD/HA + 3 digits",
        ),
        ("IT", r"^IT[0-9]{11}$", "IT + 11 digits"),
        ("ES", r"^ES[A-Z0-9][0-9]{7}[A-Z0-9]$", "ES + letter/digit + 7 digits + letter/digit"),
        ("AT", r"^ATU[0-9]{8}$", "ATU + 8 digits"),
        ("PL", r"^PL[0-9]{10}$", "PL + 10 digits"),
        ("PT", r"^PT[0-9]{9}$", "PT + 9 digits"),
        ("DK", r"^DK[0-9]{8}$", "DK + 8 digits"),
        ("FI", r"^FI[0-9]{8}$", "FI + 8 digits"),
        ("HU", r"^HU[0-9]{8}$", "HU + 8 digits"),
        ("LU", r"^LU[0-9]{8}$", "LU + 8 digits"),
        ("IE", r"^IE[0-9]{7}[A-Z]{1,2}$", "IE + 7 digits + 1 or 2 letters"),
    ]
    .into_iter()
    .map(|(country, pattern, shape)| VatPattern {
        country,
        regex: Regex::new(pattern).expect("VAT pattern compiles"),
        shape,
    })
    .collect()
});

static GENERIC_VAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2}[A-Z0-9]{2,12}$").expect("generic VAT pattern compiles")
});

/// Upper-case and strip whitespace and dots.
pub fn clean_vat_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .flat_map(char::to_uppercase)
        .collect()
}

/// Country codes with a dedicated pattern.
pub fn known_vat_countries() -> impl Iterator<Item = &'static str> {
    VAT_PATTERNS.iter().map(|p| p.country)
}

/// Validate a VAT identifier by format (no network call).
///
/// The two-letter prefix selects a country pattern; unknown prefixes fall
/// back to "2 letters + 2–12 letters/digits". Returns the cleaned
/// identifier on success.
///
/// ```
/// use factuur::identifier::validate_vat_id;
///
/// assert_eq!(validate_vat_id("nl 1234.56789.B01").unwrap(), "NL123456789B01");
/// assert_eq!(validate_vat_id("NL12345678B01").unwrap_err().id, "invalid_dutch_vat_id");
/// ```
pub fn validate_vat_id(raw: &str) -> Result<String, ValueError> {
    let cleaned = clean_vat_id(raw);
    let prefix = cleaned.get(..2).unwrap_or_default();

    if let Some(p) = VAT_PATTERNS.iter().find(|p| p.country == prefix) {
        if p.regex.is_match(&cleaned) {
            return Ok(cleaned);
        }
        if p.country == "NL" {
            return Err(ValueError::new(
                "invalid_dutch_vat_id",
                FIELD,
                format!(
                    "The VAT ID '{cleaned}' is not in the correct format. For Dutch VAT IDs:\n\
                     - Must start with NL\n\
                     - Followed by 9 digits\n\
                     - Followed by B\n\
                     - Ends with 2 digits\n\
                     Example: NL123456789B01"
                ),
            )
            .with_remedy("Copy the BTW number exactly as printed; do not drop or add digits."));
        }
        return Err(ValueError::new(
            format!("invalid_{}_vat_id", p.country.to_lowercase()),
            FIELD,
            format!(
                "The VAT ID '{cleaned}' is not a valid {} VAT ID. Expected: {}.",
                p.country, p.shape
            ),
        )
        .with_remedy(
            "Copy the VAT number exactly as printed, or null if it is not on the invoice.",
        ));
    }

    if GENERIC_VAT.is_match(&cleaned) {
        return Ok(cleaned);
    }

    Err(ValueError::new(
        "invalid_vat_id_format",
        FIELD,
        format!(
            "The VAT ID '{cleaned}' does not appear to be in a valid format. \
             VAT IDs start with two letters followed by 2 to 12 letters or digits."
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_nl() {
        assert_eq!(validate_vat_id("NL123456789B01").unwrap(), "NL123456789B01");
    }

    #[test]
    fn nl_eight_digits() {
        let err = validate_vat_id("NL12345678B01").unwrap_err();
        assert_eq!(err.id, "invalid_dutch_vat_id");
        assert_eq!(err.field, "details_supplier.vat_id");
    }

    #[test]
    fn nl_missing_b() {
        assert!(validate_vat_id("NL123456789A01").is_err());
    }

    #[test]
    fn cleans_dots_spaces_and_case() {
        assert_eq!(validate_vat_id(" nl123456789b01 ").unwrap(), "NL123456789B01");
        assert_eq!(validate_vat_id("BE 0123.456.789").unwrap(), "BE0123456789");
    }

    #[test]
    fn be_leading_digit() {
        let err = validate_vat_id("BE2123456789").unwrap_err();
        assert_eq!(err.id, "invalid_be_vat_id");
        assert!(err.detail.contains("BE + 0 or 1 + 9 digits"));
    }

    #[test]
    fn other_countries() {
        assert!(validate_vat_id("DE123456789").is_ok());
        assert!(validate_vat_id("FRAB123456789").is_ok());
        assert!(validate_vat_id("GB123456789").is_ok());
        assert!(validate_vat_id("GBGD123").is_ok());
        assert!(validate_vat_id("IT12345678901").is_ok());
        assert!(validate_vat_id("ESX1234567X").is_ok());
        assert!(validate_vat_id("ATU12345678").is_ok());
        assert!(validate_vat_id("PL1234567890").is_ok());
        assert!(validate_vat_id("PT123456789").is_ok());
        assert!(validate_vat_id("DK12345678").is_ok());
        assert!(validate_vat_id("FI12345678").is_ok());
        assert!(validate_vat_id("HU12345678").is_ok());
        assert!(validate_vat_id("LU12345678").is_ok());
        assert!(validate_vat_id("IE1234567WA").is_ok());
    }

    #[test]
    fn country_specific_failures() {
        assert_eq!(validate_vat_id("DE12345678").unwrap_err().id, "invalid_de_vat_id");
        assert_eq!(validate_vat_id("AT12345678").unwrap_err().id, "invalid_at_vat_id");
        assert_eq!(validate_vat_id("IE12345678").unwrap_err().id, "invalid_ie_vat_id");
    }

    #[test]
    fn unknown_country_generic_check() {
        assert_eq!(validate_vat_id("SE123456789701").unwrap(), "SE123456789701");
        assert_eq!(validate_vat_id("XX1").unwrap_err().id, "invalid_vat_id_format");
        assert_eq!(validate_vat_id("12345").unwrap_err().id, "invalid_vat_id_format");
    }

    #[test]
    fn non_ascii_prefix_does_not_panic() {
        assert_eq!(validate_vat_id("é12345").unwrap_err().id, "invalid_vat_id_format");
    }

    #[test]
    fn fifteen_countries_covered() {
        assert_eq!(known_vat_countries().count(), 15);
    }
}
