// Taiwan mobile number validator

use super::tel::{phone_digits, phone_whitelisted};
use crate::messages::Reporter;
use crate::validators::prepare;
use crate::{
    Casing, Input, MessageOverrides, RuleChain, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationResult, Validator,
};
use serde::Deserialize;

/// `09` followed by eight digits, separators allowed.
pub fn is_valid_mobile(value: &str) -> bool {
    phone_digits(value).is_some_and(|digits| is_mobile_digits(&digits))
}

fn is_mobile_digits(digits: &str) -> bool {
    digits.len() == 10 && digits.starts_with("09")
}

/// Options of [`MobileValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MobileOptions {
    pub required: bool,
    /// Numbers accepted without any other check
    pub whitelist: Vec<String>,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for MobileOptions {
    fn default() -> Self {
        Self {
            required: true,
            whitelist: Vec::new(),
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl MobileOptions {
    setters! {
        required: bool,
        whitelist: Vec<String>,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Mobile number validator. The output is digits only.
#[derive(Debug, Clone, Default)]
pub struct MobileValidator {
    options: MobileOptions,
}

impl MobileValidator {
    pub fn new(options: MobileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MobileOptions {
        &self.options
    }
}

impl Validator for MobileValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "mobile"
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

        let Some(digits) = phone_digits(&value) else {
            return Err(reporter.error("invalid", params![]));
        };

        RuleChain::<str>::new()
            .add("invalid", is_mobile_digits)
            .check(&digits, &reporter)?;

        Ok(Some(digits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetted_i18n::Locale;

    fn check(validator: &MobileValidator, input: &str) -> ValidationResult<String> {
        validator.validate_with(&Input::from(input), &ValidationContext::for_locale(Locale::en()))
    }

    #[test]
    fn test_is_valid_mobile() {
        assert!(is_valid_mobile("0912345678"));
        assert!(is_valid_mobile("0912-345-678"));
        assert!(is_valid_mobile("0912 345 678"));
        assert!(!is_valid_mobile("0812345678"));
        assert!(!is_valid_mobile("091234567"));
        assert!(!is_valid_mobile("+886912345678"));
    }

    #[test]
    fn test_validator() {
        let validator = MobileValidator::default();
        assert_eq!(check(&validator, "0912-345-678"), Ok(Some("0912345678".to_string())));
        assert_eq!(check(&validator, "0812345678").unwrap_err().code, "invalid");
        assert_eq!(check(&validator, "  ").unwrap_err().code, "required");

        let optional = MobileValidator::new(MobileOptions::default().required(false));
        assert_eq!(check(&optional, ""), Ok(None));
    }

    #[test]
    fn test_whitelist() {
        let validator = MobileValidator::new(MobileOptions::default().whitelist(["0800-000-123"]));
        assert_eq!(check(&validator, "0800000123"), Ok(Some("0800000123".to_string())));
        assert_eq!(check(&validator, "0800-000-123"), Ok(Some("0800000123".to_string())));
        assert!(check(&validator, "0800000124").is_err());
    }
}
