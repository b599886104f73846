//! Fuzz target for national ID checks.
//!
//! Arbitrary strings must never panic, and every accepted value must
//! round-trip through the validator unchanged.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vetted_i18n::Locale;
use vetted_validation::taiwan::{
    NationalIdValidator, detect_national_id_type, is_valid_national_id,
};
use vetted_validation::{Input, ValidationContext, Validator};

fuzz_target!(|data: &str| {
    let valid = is_valid_national_id(data);
    if valid {
        assert!(detect_national_id_type(data).is_some());
    }

    let ctx = ValidationContext::for_locale(Locale::en());
    let validator = NationalIdValidator::default();
    if let Ok(Some(canonical)) = validator.validate_with(&Input::from(data), &ctx) {
        assert!(is_valid_national_id(&canonical));
        assert_eq!(
            validator.validate_with(&Input::from(canonical.as_str()), &ctx),
            Ok(Some(canonical.clone()))
        );
    }
});
