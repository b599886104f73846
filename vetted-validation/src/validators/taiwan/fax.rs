// Taiwan fax number validator

use super::tel::{
    check_number, find_area_code, phone_digits, phone_whitelisted, subscriber_matches,
};
use crate::messages::Reporter;
use crate::validators::prepare;
use crate::{
    Casing, Input, MessageOverrides, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationResult, Validator,
};
use serde::Deserialize;

/// Landline number usable for fax; free-phone prefixes are rejected.
pub fn is_valid_fax(value: &str) -> bool {
    phone_digits(value).is_some_and(|digits| {
        find_area_code(&digits)
            .is_some_and(|area| !area.toll_free && subscriber_matches(area, &digits))
    })
}

/// Options of [`FaxValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaxOptions {
    pub required: bool,
    /// Numbers accepted without any other check
    pub whitelist: Vec<String>,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for FaxOptions {
    fn default() -> Self {
        Self {
            required: true,
            whitelist: Vec::new(),
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl FaxOptions {
    setters! {
        required: bool,
        whitelist: Vec<String>,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Fax number validator. The output is digits only.
#[derive(Debug, Clone, Default)]
pub struct FaxValidator {
    options: FaxOptions,
}

impl FaxValidator {
    pub fn new(options: FaxOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FaxOptions {
        &self.options
    }
}

impl Validator for FaxValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "fax"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        if phone_whitelisted(&value, &opts.whitelist) {
            return Ok(Some(phone_digits(&value).unwrap_or(value)));
        }

        check_number(&value, false, &reporter).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vetted_i18n::Locale;

    fn check(validator: &FaxValidator, input: &str) -> ValidationResult<String> {
        validator.validate_with(&Input::from(input), &ValidationContext::for_locale(Locale::en()))
    }

    #[test]
    fn test_landlines() {
        assert!(is_valid_fax("0223456789"));
        assert!(is_valid_fax("07-234-5678"));
        assert!(!is_valid_fax("0213456789"));
    }

    #[test]
    fn test_toll_free_rejected() {
        assert!(!is_valid_fax("0800-012345"));
        let validator = FaxValidator::default();
        assert_eq!(check(&validator, "0800-012345").unwrap_err().code, "areaCode");
    }

    #[test]
    fn test_validator() {
        let validator = FaxValidator::new(FaxOptions::default().whitelist(["0800-000000"]));
        assert_eq!(check(&validator, "(02) 2345 6789"), Ok(Some("0223456789".to_string())));
        assert_eq!(check(&validator, "0800000000"), Ok(Some("0800000000".to_string())));
        assert_eq!(check(&validator, "0800-000000"), Ok(Some("0800000000".to_string())));
        assert_eq!(check(&validator, "02-1345-6789").unwrap_err().code, "format");
        assert_eq!(check(&validator, "fax").unwrap_err().code, "invalid");
    }

    proptest! {
        #[test]
        fn prop_output_revalidates(subscriber in "[2-9][0-9]{6}", sep in "[- ]?") {
            let validator = FaxValidator::default();
            let raw = format!("07{sep}{}{sep}{}", &subscriber[..3], &subscriber[3..]);
            let value = check(&validator, &raw).unwrap().unwrap();
            prop_assert_eq!(&value, &format!("07{subscriber}"));
            prop_assert_eq!(check(&validator, &value), Ok(Some(value.clone())));
        }
    }
}
