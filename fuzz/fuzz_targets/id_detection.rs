//! Fuzz target for identifier detection.
//!
//! A detected kind must be accepted by a validator restricted to it.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vetted_i18n::Locale;
use vetted_validation::{IdOptions, IdValidator, Input, ValidationContext, Validator, detect_id_type};

fuzz_target!(|data: &str| {
    let Some(kind) = detect_id_type(data) else {
        return;
    };
    if data.trim() != data {
        return;
    }

    let ctx = ValidationContext::for_locale(Locale::en());
    let validator = IdValidator::new(IdOptions::default().kind(kind).case_sensitive(false));
    assert!(validator.validate_with(&Input::from(data), &ctx).is_ok());
});
