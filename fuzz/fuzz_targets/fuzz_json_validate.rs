#![no_main]

use factuur::engine::Engine;
use factuur::json::validate_json;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Rejections and parse errors are fine, panics are bugs.
        let _ = validate_json(&Engine::default(), s);
    }
});
