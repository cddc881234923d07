#![no_main]

use factuur::citation::{amount_renderings, number_tokens};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for token in number_tokens(s) {
            // Every rendering must be a valid pattern.
            for pattern in amount_renderings(token) {
                assert!(regex::Regex::new(&pattern).is_ok(), "{pattern}");
            }
        }
    }
});
