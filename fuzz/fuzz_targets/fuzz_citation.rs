#![no_main]

use factuur::citation::verify_citation;
use factuur::core::EngineConfig;
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // First line is the citation, the rest the document.
        let (citation, document) = s.split_once('\n').unwrap_or((s, s));
        let amount = Decimal::new(data.len() as i64 * 101, 2);
        let _ = verify_citation(citation, document, amount, &EngineConfig::default());
    }
});
