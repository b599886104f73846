// Taiwan landline numbering plan and telephone validator

use crate::messages::Reporter;
use crate::validators::prepare;
use crate::{
    Casing, Input, MessageOverrides, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationError, ValidationResult, Validator,
};
use serde::Deserialize;

/// One entry of the numbering plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaCode {
    /// Dialing prefix including the trunk `0`
    pub code: &'static str,
    /// Region served
    pub region: &'static str,
    /// Accepted subscriber number lengths
    pub subscriber_lengths: &'static [usize],
    /// Free-phone prefix; subscriber numbers may start with any digit
    pub toll_free: bool,
}

const fn area(code: &'static str, region: &'static str, lengths: &'static [usize]) -> AreaCode {
    AreaCode {
        code,
        region,
        subscriber_lengths: lengths,
        toll_free: false,
    }
}

/// Landline and free-phone prefixes.
pub const AREA_CODES: &[AreaCode] = &[
    area("02", "Taipei, New Taipei, Keelung", &[8]),
    area("03", "Taoyuan, Hsinchu, Yilan, Hualien", &[7]),
    area("037", "Miaoli", &[6]),
    area("04", "Taichung, Changhua", &[7, 8]),
    area("049", "Nantou", &[7]),
    area("05", "Chiayi, Yunlin", &[7]),
    area("06", "Tainan, Penghu", &[7]),
    area("07", "Kaohsiung", &[7]),
    area("08", "Pingtung", &[7]),
    area("082", "Kinmen", &[6]),
    area("0826", "Wuqiu", &[5]),
    area("0836", "Matsu", &[5]),
    area("089", "Taitung", &[6]),
    AreaCode {
        code: "0800",
        region: "Toll-free",
        subscriber_lengths: &[6],
        toll_free: true,
    },
    AreaCode {
        code: "0809",
        region: "Toll-free",
        subscriber_lengths: &[6],
        toll_free: true,
    },
];

/// Digits of a phone number once `-`, spaces and parentheses are removed.
///
/// `None` when anything else remains.
pub fn phone_digits(value: &str) -> Option<String> {
    let digits: String = value
        .chars()
        .filter(|c| !matches!(c, '-' | ' ' | '(' | ')'))
        .collect();
    (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())).then_some(digits)
}

/// Longest area code prefixing `digits`.
pub fn find_area_code(digits: &str) -> Option<&'static AreaCode> {
    AREA_CODES
        .iter()
        .filter(|area| digits.starts_with(area.code))
        .max_by_key(|area| area.code.len())
}

/// Subscriber part fits the area code's length and leading-digit rules.
pub(super) fn subscriber_matches(area: &AreaCode, digits: &str) -> bool {
    let subscriber = &digits[area.code.len()..];
    area.subscriber_lengths.contains(&subscriber.len())
        && (area.toll_free || subscriber.starts_with(|c: char| ('2'..='9').contains(&c)))
}

/// Landline or free-phone number, separators allowed.
pub fn is_valid_tel(value: &str) -> bool {
    phone_digits(value).is_some_and(|digits| {
        find_area_code(&digits).is_some_and(|area| subscriber_matches(area, &digits))
    })
}

/// Entry of `whitelist` equal to `value` once both are reduced to digits.
pub(super) fn phone_whitelisted(value: &str, whitelist: &[String]) -> bool {
    let key = phone_digits(value);
    whitelist
        .iter()
        .any(|entry| entry.trim() == value || (key.is_some() && phone_digits(entry) == key))
}

/// Numbering-plan checks shared with the fax validator.
pub(super) fn check_number(
    value: &str,
    allow_toll_free: bool,
    reporter: &Reporter<'_>,
) -> Result<String, ValidationError> {
    let Some(digits) = phone_digits(value) else {
        return Err(reporter.error("invalid", params![]));
    };
    let area = find_area_code(&digits)
        .filter(|area| allow_toll_free || !area.toll_free)
        .ok_or_else(|| reporter.error("areaCode", params![]))?;
    if !subscriber_matches(area, &digits) {
        return Err(reporter.error(
            "format",
            params!["areaCode" => area.code, "region" => area.region],
        ));
    }
    Ok(digits)
}

/// Options of [`TelValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TelOptions {
    pub required: bool,
    /// Numbers accepted without any other check
    pub whitelist: Vec<String>,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for TelOptions {
    fn default() -> Self {
        Self {
            required: true,
            whitelist: Vec::new(),
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl TelOptions {
    setters! {
        required: bool,
        whitelist: Vec<String>,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Landline validator. The output is digits only.
#[derive(Debug, Clone, Default)]
pub struct TelValidator {
    options: TelOptions,
}

impl TelValidator {
    pub fn new(options: TelOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TelOptions {
        &self.options
    }
}

impl Validator for TelValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "tel"
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

        check_number(&value, true, &reporter).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vetted_i18n::Locale;

    fn check(validator: &TelValidator, input: &str) -> ValidationResult<String> {
        validator.validate_with(&Input::from(input), &ValidationContext::for_locale(Locale::en()))
    }

    fn code(validator: &TelValidator, input: &str) -> &'static str {
        check(validator, input).unwrap_err().code
    }

    #[test]
    fn test_taipei() {
        assert!(is_valid_tel("0223456789"));
        assert!(!is_valid_tel("0213456789"));
        assert!(!is_valid_tel("022345678"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        assert_eq!(find_area_code("037123456").map(|a| a.code), Some("037"));
        assert_eq!(find_area_code("0826123456").map(|a| a.code), Some("0826"));
        assert_eq!(find_area_code("082312345").map(|a| a.code), Some("082"));
        assert_eq!(find_area_code("0800123456").map(|a| a.code), Some("0800"));
        assert_eq!(find_area_code("0912345678").map(|a| a.code), None);
    }

    #[test]
    fn test_area_lengths() {
        assert!(is_valid_tel("0421234567"));
        assert!(is_valid_tel("04-2123-4567"));
        assert!(is_valid_tel("(04)22345678"));
        assert!(is_valid_tel("049-2345678"));
        assert!(is_valid_tel("037-234567"));
        assert!(is_valid_tel("0826-23456"));
        assert!(is_valid_tel("0836-23456"));
        assert!(is_valid_tel("089-234567"));
        assert!(!is_valid_tel("037-2345678"));
    }

    #[test]
    fn test_toll_free() {
        assert!(is_valid_tel("0800-012345"));
        assert!(is_valid_tel("0809 123456"));
        assert!(!is_valid_tel("0800-12345"));
    }

    #[test]
    fn test_validator_codes() {
        let validator = TelValidator::default();
        assert_eq!(check(&validator, " 02-2345-6789 "), Ok(Some("0223456789".to_string())));
        assert_eq!(code(&validator, "02.2345.6789"), "invalid");
        assert_eq!(code(&validator, "0912345678"), "areaCode");
        let error = check(&validator, "02-1345-6789").unwrap_err();
        assert_eq!(error.code, "format");
        assert_eq!(error.param("areaCode"), Some("02"));
        assert_eq!(code(&validator, ""), "required");
    }

    #[test]
    fn test_whitelist_bypasses_plan() {
        let validator = TelValidator::new(TelOptions::default().whitelist(["02-1234-5678", "110"]));
        assert_eq!(check(&validator, "0212345678"), Ok(Some("0212345678".to_string())));
        assert_eq!(check(&validator, "02 1234 5678"), Ok(Some("0212345678".to_string())));
        assert_eq!(check(&validator, "110"), Ok(Some("110".to_string())));
        assert_eq!(code(&validator, "0213456789"), "format");
    }

    proptest! {
        #[test]
        fn prop_output_revalidates(subscriber in "[2-8][0-9]{7}", area in prop::sample::select(vec!["02", "04"]), sep in "[- ]?") {
            let validator = TelValidator::default();
            let raw = format!("({area}){sep}{}{sep}{}", &subscriber[..4], &subscriber[4..]);
            let value = check(&validator, &raw).unwrap().unwrap();
            prop_assert!(value.bytes().all(|b| b.is_ascii_digit()));
            prop_assert_eq!(check(&validator, &value), Ok(Some(value.clone())));
        }
    }
}
