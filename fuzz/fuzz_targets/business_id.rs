//! Fuzz target for business ID checks.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use vetted_validation::taiwan::is_valid_business_id;

/// Either raw text or eight digits, to reach the checksum often.
#[derive(Debug, Arbitrary)]
enum FuzzBusinessId {
    Raw(String),
    Digits([u8; 8]),
}

fuzz_target!(|input: FuzzBusinessId| {
    match input {
        FuzzBusinessId::Raw(raw) => {
            if is_valid_business_id(&raw) {
                assert_eq!(raw.len(), 8);
                assert!(raw.bytes().all(|b| b.is_ascii_digit()));
            }
        }
        FuzzBusinessId::Digits(digits) => {
            let id: String = digits.iter().map(|d| char::from(b'0' + d % 10)).collect();
            let _ = is_valid_business_id(&id);
        }
    }
});
