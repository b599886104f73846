// Boolean validator

use crate::messages::Reporter;
use crate::pipe::match_boolean;
use crate::{
    Input, MessageOverrides, Transform, ValidationContext, ValidationResult, Validator,
};
use serde::Deserialize;

/// Options of [`BooleanValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BooleanOptions {
    /// Reject empty input (default `true`)
    pub required: bool,
    /// Value used when the input is empty
    pub default_value: Option<bool>,
    /// Require a specific value (terms acceptance)
    pub should_be: Option<bool>,
    /// Inputs read as `true`
    pub truthy_values: Vec<Input>,
    /// Inputs read as `false`
    pub falsy_values: Vec<Input>,
    /// Accept real booleans only
    pub strict: bool,
    /// Applied to string input before matching
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for BooleanOptions {
    fn default() -> Self {
        Self {
            required: true,
            default_value: None,
            should_be: None,
            truthy_values: vec![
                Input::Bool(true),
                Input::from("true"),
                Input::from(1),
                Input::from("1"),
                Input::from("yes"),
                Input::from("on"),
            ],
            falsy_values: vec![
                Input::Bool(false),
                Input::from("false"),
                Input::from(0),
                Input::from("0"),
                Input::from("no"),
                Input::from("off"),
            ],
            strict: false,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl BooleanOptions {
    setters! {
        required: bool,
        default_value: Option<bool>,
        should_be: Option<bool>,
        truthy_values: Vec<Input>,
        falsy_values: Vec<Input>,
        strict: bool,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Reads flags such as `"yes"`, `1` or `true` into a `bool`.
#[derive(Debug, Clone, Default)]
pub struct BooleanValidator {
    options: BooleanOptions,
}

impl BooleanValidator {
    pub fn new(options: BooleanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BooleanOptions {
        &self.options
    }
}

impl Validator for BooleanValidator {
    type Output = bool;

    fn scope(&self) -> &'static str {
        "boolean"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<bool> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);

        let input = match (input, &opts.transform) {
            (Input::Text(text), Some(transform)) => Input::Text(transform.apply(text.clone())),
            _ => input.clone(),
        };

        let blank = matches!(&input, Input::Text(text) if text.trim().is_empty());
        let value = if input.is_empty() || blank {
            match opts.default_value {
                Some(default) => default,
                None if opts.required => return Err(reporter.error("required", params![])),
                None => return Ok(None),
            }
        } else if opts.strict {
            match input {
                Input::Bool(value) => value,
                _ => return Err(reporter.error("invalid", params![])),
            }
        } else {
            match match_boolean(&input, &opts.truthy_values, &opts.falsy_values) {
                Some(value) => value,
                None => return Err(reporter.error("invalid", params![])),
            }
        };

        match opts.should_be {
            Some(true) if !value => Err(reporter.error("shouldBeTrue", params![])),
            Some(false) if value => Err(reporter.error("shouldBeFalse", params![])),
            _ => Ok(Some(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetted_i18n::Locale;

    fn ctx() -> ValidationContext {
        ValidationContext::for_locale(Locale::en())
    }

    fn check(validator: &BooleanValidator, input: impl Into<Input>) -> ValidationResult<bool> {
        validator.validate_with(&input.into(), &ctx())
    }

    #[test]
    fn test_default_tokens() {
        let validator = BooleanValidator::default();
        for truthy in [Input::from(true), Input::from("YES"), Input::from(" on "), Input::from(1)] {
            assert_eq!(check(&validator, truthy), Ok(Some(true)));
        }
        for falsy in [Input::from(false), Input::from("Off"), Input::from("0"), Input::from(0)] {
            assert_eq!(check(&validator, falsy), Ok(Some(false)));
        }
        assert_eq!(check(&validator, "maybe").unwrap_err().code, "invalid");
        assert_eq!(check(&validator, 2).unwrap_err().code, "invalid");
    }

    #[test]
    fn test_required_and_default() {
        let validator = BooleanValidator::default();
        assert_eq!(check(&validator, Input::Null).unwrap_err().code, "required");
        assert_eq!(check(&validator, "  ").unwrap_err().code, "required");

        let optional = BooleanValidator::new(BooleanOptions::default().required(false));
        assert_eq!(check(&optional, Input::Null), Ok(None));

        let defaulted = BooleanValidator::new(BooleanOptions::default().default_value(false));
        assert_eq!(check(&defaulted, ""), Ok(Some(false)));
    }

    #[test]
    fn test_strict_only_accepts_booleans() {
        let validator = BooleanValidator::new(BooleanOptions::default().strict(true));
        assert_eq!(check(&validator, true), Ok(Some(true)));
        assert_eq!(check(&validator, "true").unwrap_err().code, "invalid");
    }

    #[test]
    fn test_should_be() {
        let terms = BooleanValidator::new(BooleanOptions::default().should_be(true));
        assert_eq!(check(&terms, "no").unwrap_err().code, "shouldBeTrue");
        assert_eq!(check(&terms, "yes"), Ok(Some(true)));

        let opt_out = BooleanValidator::new(BooleanOptions::default().should_be(false));
        assert_eq!(check(&opt_out, 1).unwrap_err().code, "shouldBeFalse");
    }

    #[test]
    fn test_custom_tokens_and_transform() {
        let validator = BooleanValidator::new(
            BooleanOptions::default()
                .truthy_values(["y", "是"])
                .falsy_values(["n", "否"])
                .transform(|s| s.replace('!', "")),
        );
        assert_eq!(check(&validator, "是!"), Ok(Some(true)));
        assert_eq!(check(&validator, "N"), Ok(Some(false)));
        assert_eq!(check(&validator, "yes").unwrap_err().code, "invalid");
    }

    #[test]
    fn test_output_revalidates() {
        let validator = BooleanValidator::default();
        let value = check(&validator, "on").unwrap().unwrap();
        assert_eq!(check(&validator, value), Ok(Some(value)));
    }
}
