#![no_main]

use libfuzzer_sys::fuzz_target;
use mztab::config::ValidatorConfig;
use mztab::parser::{MzTabParser, NoProgress};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Any byte stream must either be read or fail with a ReadError,
    // never panic past the per-line guard
    let parser = MzTabParser::new(ValidatorConfig::default().with_max_errors(100));
    if let Ok(outcome) = parser.parse_reader(Cursor::new(data), Some(data.len() as u64), &NoProgress) {
        // Rendering must work for every outcome
        if let Some(errors) = outcome.errors() {
            let mut rendered = Vec::new();
            let _ = errors.render(&mut rendered);
        }
    }
});
