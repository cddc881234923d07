use crate::core::ValueError;

/// Reject IBANs that are known not to belong to the issuer.
///
/// No format verification is done; any other value is accepted unchanged.
/// Comparison ignores whitespace and case.
pub fn check_iban(iban: &str, excluded: &[String]) -> Result<(), ValueError> {
    let target = compact(iban);
    if excluded.iter().any(|e| compact(e) == target) {
        return Err(ValueError::new(
            "incorrect_iban",
            "details_supplier.iban",
            format!(
                "The IBAN you extracted for this supplier was {iban}. This is incorrect, \
                 as it is the IBAN of the recipient, not the supplier. Check the extraction \
                 and provide the issuer's IBAN, or null if it is not on the invoice."
            ),
        )
        .with_remedy("Take the IBAN from the issuer's payment details, not the recipient's."));
    }
    Ok(())
}

fn compact(iban: &str) -> String {
    iban.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RECIPIENT_IBAN;

    fn excluded() -> Vec<String> {
        vec![RECIPIENT_IBAN.to_string()]
    }

    #[test]
    fn recipient_iban_rejected() {
        let err = check_iban("NL85INGB0006814971", &excluded()).unwrap_err();
        assert_eq!(err.id, "incorrect_iban");
    }

    #[test]
    fn recipient_iban_with_spaces_rejected() {
        assert!(check_iban("nl85 ingb 0006 8149 71", &excluded()).is_err());
    }

    #[test]
    fn excluded_entry_compared_compactly() {
        let excluded = vec!["nl91 abna 0417 1643 00".to_string()];
        assert!(check_iban("NL91ABNA0417164300", &excluded).is_err());
        assert!(check_iban("NL91 ABNA 0417 1643 00", &excluded).is_err());
    }

    #[test]
    fn other_iban_accepted() {
        assert!(check_iban("NL91ABNA0417164300", &excluded()).is_ok());
        assert!(check_iban("DE89370400440532013000", &excluded()).is_ok());
    }

    #[test]
    fn malformed_iban_accepted() {
        assert!(check_iban("not an iban", &excluded()).is_ok());
    }
}
