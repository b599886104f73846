//! Fuzz target for the landline numbering plan.
//!
//! Tel, fax and mobile checks must agree with the digit normalisation.

#![no_main]

use libfuzzer_sys::fuzz_target;
use vetted_validation::taiwan::{
    find_area_code, is_valid_fax, is_valid_mobile, is_valid_tel, phone_digits,
};

fuzz_target!(|data: &str| {
    let tel = is_valid_tel(data);
    let fax = is_valid_fax(data);
    let mobile = is_valid_mobile(data);

    if fax {
        assert!(tel);
    }
    if tel || mobile {
        let digits = phone_digits(data).expect("accepted numbers reduce to digits");
        assert_eq!(is_valid_tel(&digits), tel);
        assert_eq!(is_valid_mobile(&digits), mobile);
    }
    if tel {
        assert!(find_area_code(&phone_digits(data).unwrap_or_default()).is_some());
    }
});
