use factuur::citation::*;
use factuur::core::EngineConfig;
use rust_decimal_macros::dec;

const RECEIPT: &str = "\
HORECA GROOTHANDEL
Kassabon 0042        15-06-2024 14:02

2x Kratje pils        2x 17,45    34,90
Statiegeld krat                    3,90
1x Olijfolie 5L                   54,65

Subtotaal excl. BTW               89,55
BTW 9%                             8,05
Totaal €  97,55
Betaald met PIN                   97,55
";

fn config() -> EngineConfig {
    EngineConfig::default()
}

// --- Quote ---

#[test]
fn citation_round_trip() {
    let found = verify_citation("Totaal €  97,55", RECEIPT, dec!(97.55), &config()).unwrap();
    assert_eq!(found.quote, QuoteMatch::Verbatim);
    assert_eq!(found.amount, AmountMatch::Rendering);
}

#[test]
fn multi_line_citation_with_different_spacing() {
    let citation = "BTW 9%   8,05\nTotaal € 97,55";
    assert!(verify_citation(citation, RECEIPT, dec!(97.55), &config()).is_ok());
}

#[test]
fn ocr_noise_accepted_approximately() {
    let found = verify_citation("Betaald met PlN 97,55", RECEIPT, dec!(97.55), &config()).unwrap();
    let QuoteMatch::Approximate { window, ratio } = found.quote else {
        panic!("expected an approximate match");
    };
    assert!(window.starts_with("Betaald met PIN 97,55"));
    assert!(ratio >= 0.8);
}

#[test]
fn paraphrase_rejected_with_closest_match() {
    let err = verify_citation("The total to pay is 97.55 euro", RECEIPT, dec!(97.55), &config())
        .unwrap_err();
    assert_eq!(err.id, "invalid_amount_payable_citation");
    assert!(err.message().contains("The closest match found was: '"));
}

#[test]
fn threshold_is_configurable() {
    let lenient = EngineConfig {
        citation_similarity_threshold: 0.3,
        ..config()
    };
    assert!(verify_citation("The total to pay is 97,55", RECEIPT, dec!(97.55), &lenient).is_ok());
}

// --- Amount ---

#[test]
fn line_total_is_not_the_payable() {
    let citation = "Subtotaal excl. BTW               89,55";
    let err = verify_citation(citation, RECEIPT, dec!(97.55), &config()).unwrap_err();
    assert_eq!(err.id, "amount_payable_mismatch");
    let message = err.message();
    assert!(message.contains("'97.55'"));
    assert!(message.contains("Numbers found in the citation: 89.55."));
}

#[test]
fn citation_without_numbers() {
    let err = verify_citation("HORECA GROOTHANDEL", RECEIPT, dec!(97.55), &config()).unwrap_err();
    assert_eq!(err.id, "amount_payable_not_found");
}

#[test]
fn renderings_cover_common_forms() {
    let patterns = amount_renderings(dec!(1527.00));
    let combined = regex::Regex::new(&patterns.join("|")).unwrap();
    for text in ["1527.00", "1527,00", "1.527,00", "1,527.00", "1 527,00", "1527,-", "1.527,-"] {
        assert!(combined.is_match(text), "{text}");
    }
}

#[test]
fn tokens_normalized() {
    assert_eq!(
        number_tokens("2x 17,45 = 34,90; totaal 1.234,56 of 1,234.56"),
        vec![dec!(2), dec!(17.45), dec!(34.90), dec!(1234.56), dec!(1234.56)]
    );
}

#[test]
fn similarity_matches_reference_values() {
    assert_eq!(similarity_ratio("", ""), 1.0);
    assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
    assert_eq!(similarity_ratio("totaal", "totaal"), 1.0);
}

#[test]
fn whitespace_collapsing() {
    assert_eq!(collapse_whitespace("Totaal €  97,55\n\nPIN"), "Totaal € 97,55 PIN");
}
