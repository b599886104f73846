// Taiwan national identification number (身分證字號 / 居留證號)

use crate::messages::Reporter;
use crate::validators::prepare;
use crate::{
    Casing, Input, MessageOverrides, RuleChain, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationResult, Validator,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

static CITIZEN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][12]\d{8}$").unwrap());
static NEW_RESIDENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][89]\d{8}$").unwrap());
static OLD_RESIDENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-D]\d{8}$").unwrap());

/// Two-digit code of each leading letter.
const CITY_CODES: [u32; 26] = [
    10, 11, 12, 13, 14, 15, 16, 17, 34, 18, 19, 20, 21, 22, 35, 23, 24, 25, 26, 27, 28, 29, 32,
    30, 31, 33,
];

const WEIGHTS: [u32; 10] = [1, 9, 8, 7, 6, 5, 4, 3, 2, 1];

/// Code of a leading letter (`A` = 10, `I` = 34, `Z` = 33).
pub fn city_code(letter: char) -> Option<u32> {
    letter
        .is_ascii_uppercase()
        .then(|| CITY_CODES[(letter as u8 - b'A') as usize])
}

/// Layout of a national identification number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NationalIdType {
    /// Letter, `1` or `2`, eight digits
    Citizen,
    /// Letter, `8` or `9`, eight digits
    NewResident,
    /// Two letters, eight digits
    OldResident,
}

impl NationalIdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NationalIdType::Citizen => "citizen",
            NationalIdType::NewResident => "newResident",
            NationalIdType::OldResident => "oldResident",
        }
    }

    pub fn is_resident(&self) -> bool {
        !matches!(self, NationalIdType::Citizen)
    }
}

impl fmt::Display for NationalIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layout of `id` by shape alone; the check digit is not verified.
pub fn detect_national_id_type(id: &str) -> Option<NationalIdType> {
    if CITIZEN_REGEX.is_match(id) {
        Some(NationalIdType::Citizen)
    } else if NEW_RESIDENT_REGEX.is_match(id) {
        Some(NationalIdType::NewResident)
    } else if OLD_RESIDENT_REGEX.is_match(id) {
        Some(NationalIdType::OldResident)
    } else {
        None
    }
}

fn digit(b: u8) -> u32 {
    u32::from(b - b'0')
}

/// Verify the check digit of a well-formed id.
///
/// The city code's two digits and the eight body digits are weighted by
/// `1 9 8 7 6 5 4 3 2 1`; the check digit is `(10 - sum % 10) % 10`.
/// For old resident numbers the second letter contributes `(code % 10) * 8`
/// and the following seven digits are weighted `7..1`.
fn checksum_matches(id: &str, kind: NationalIdType) -> bool {
    let bytes = id.as_bytes();
    let Some(city) = city_code(bytes[0] as char) else {
        return false;
    };

    let mut sum = (city / 10) * WEIGHTS[0] + (city % 10) * WEIGHTS[1];
    match kind {
        NationalIdType::Citizen | NationalIdType::NewResident => {
            sum += bytes[1..9]
                .iter()
                .zip(&WEIGHTS[2..])
                .map(|(b, w)| digit(*b) * w)
                .sum::<u32>();
        }
        NationalIdType::OldResident => {
            let Some(second) = city_code(bytes[1] as char) else {
                return false;
            };
            sum += (second % 10) * 8;
            sum += bytes[2..9]
                .iter()
                .zip((1..=7).rev())
                .map(|(b, w)| digit(*b) * w)
                .sum::<u32>();
        }
    }

    (10 - sum % 10) % 10 == digit(bytes[9])
}

/// Citizen id with a valid check digit.
pub fn is_valid_citizen_id(id: &str) -> bool {
    detect_national_id_type(id) == Some(NationalIdType::Citizen)
        && checksum_matches(id, NationalIdType::Citizen)
}

/// New or old resident id with a valid check digit.
pub fn is_valid_resident_id(id: &str) -> bool {
    detect_national_id_type(id)
        .is_some_and(|kind| kind.is_resident() && checksum_matches(id, kind))
}

/// Citizen or resident id with a valid check digit.
pub fn is_valid_national_id(id: &str) -> bool {
    detect_national_id_type(id).is_some_and(|kind| checksum_matches(id, kind))
}

/// Which holders are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NationalIdKind {
    Citizen,
    Resident,
    #[default]
    Both,
}

/// Options of [`NationalIdValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NationalIdOptions {
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: NationalIdKind,
    /// Accept the two-letter resident layout issued before 2021
    pub allow_old_resident: bool,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for NationalIdOptions {
    fn default() -> Self {
        Self {
            required: true,
            kind: NationalIdKind::Both,
            allow_old_resident: true,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl NationalIdOptions {
    setters! {
        required: bool,
        kind: NationalIdKind,
        allow_old_resident: bool,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// National identification number validator. Input is upper-cased.
#[derive(Debug, Clone, Default)]
pub struct NationalIdValidator {
    options: NationalIdOptions,
}

impl NationalIdValidator {
    pub fn new(options: NationalIdOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NationalIdOptions {
        &self.options
    }
}

impl Validator for NationalIdValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "nationalId"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::Upper).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let Some(kind) = detect_national_id_type(&value) else {
            return Err(reporter.error("invalid", params![]));
        };

        RuleChain::<NationalIdType>::new()
            .add_if(opts.kind == NationalIdKind::Citizen, "citizenOnly", params![], |k| {
                !k.is_resident()
            })
            .add_if(opts.kind == NationalIdKind::Resident, "residentOnly", params![], |k| {
                k.is_resident()
            })
            .add_if(!opts.allow_old_resident, "oldResident", params![], |k| {
                *k != NationalIdType::OldResident
            })
            .add("checksum", |k| checksum_matches(&value, *k))
            .check(&kind, &reporter)?;

        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vetted_i18n::Locale;

    fn check(validator: &NationalIdValidator, input: &str) -> ValidationResult<String> {
        validator.validate_with(&Input::from(input), &ValidationContext::for_locale(Locale::en()))
    }

    fn code(validator: &NationalIdValidator, input: &str) -> &'static str {
        check(validator, input).unwrap_err().code
    }

    /// Append the check digit to a nine-character citizen prefix.
    fn with_check_digit(prefix: &str) -> String {
        (0..10)
            .map(|d| format!("{prefix}{d}"))
            .find(|id| is_valid_national_id(id))
            .unwrap()
    }

    #[test]
    fn test_every_letter_has_a_city_code() {
        for letter in 'A'..='Z' {
            let code = city_code(letter).unwrap();
            assert!((10..=35).contains(&code), "{letter} -> {code}");
        }
        assert_eq!(city_code('a'), None);
        assert_eq!(city_code('I'), Some(34));
        assert_eq!(city_code('O'), Some(35));
    }

    #[test]
    fn test_manual_checksum() {
        // A = 10: 1*1 + 0*9 + 1*8 + 2*7 + 3*6 + 4*5 + 5*4 + 6*3 + 7*2 + 8*1 = 121
        assert!(is_valid_citizen_id("A123456789"));
        assert!(!is_valid_citizen_id("A123456788"));
        assert!(!is_valid_resident_id("A123456789"));
    }

    #[test]
    fn test_old_resident_checksum() {
        // A = 10, C = 12: 1 + 0 + 2*8 + (0*7 + 1*6 + 2*5 + 3*4 + 4*3 + 5*2 + 6*1) = 73
        assert!(is_valid_resident_id("AC01234567"));
        assert!(!is_valid_resident_id("AC01234568"));
        assert_eq!(detect_national_id_type("AC01234567"), Some(NationalIdType::OldResident));
    }

    #[test]
    fn test_new_resident() {
        let id = with_check_digit("A80000001");
        assert_eq!(detect_national_id_type(&id), Some(NationalIdType::NewResident));
        assert!(is_valid_resident_id(&id));
    }

    #[test]
    fn test_shapes() {
        assert_eq!(detect_national_id_type("A323456789"), None);
        assert_eq!(detect_national_id_type("AE01234567"), None);
        assert_eq!(detect_national_id_type("A12345678"), None);
        assert_eq!(detect_national_id_type("1123456789"), None);
    }

    #[test]
    fn test_validator_upper_cases() {
        let validator = NationalIdValidator::default();
        assert_eq!(check(&validator, " a123456789 "), Ok(Some("A123456789".to_string())));
        assert_eq!(code(&validator, "A123456788"), "checksum");
        assert_eq!(code(&validator, "A12345"), "invalid");
        assert_eq!(code(&validator, ""), "required");
    }

    #[test]
    fn test_holder_kinds() {
        let citizen = NationalIdValidator::new(
            NationalIdOptions::default().kind(NationalIdKind::Citizen),
        );
        assert_eq!(code(&citizen, "AC01234567"), "citizenOnly");

        let resident = NationalIdValidator::new(
            NationalIdOptions::default().kind(NationalIdKind::Resident),
        );
        assert_eq!(code(&resident, "A123456789"), "residentOnly");
        assert!(check(&resident, "AC01234567").is_ok());

        let new_only = NationalIdValidator::new(
            NationalIdOptions::default().allow_old_resident(false),
        );
        assert_eq!(code(&new_only, "AC01234567"), "oldResident");
    }

    #[test]
    fn test_check_digit_is_unique() {
        for prefix in ["A12345678", "F22222222", "Z19999999"] {
            let valid = (0..10)
                .filter(|d| is_valid_national_id(&format!("{prefix}{d}")))
                .count();
            assert_eq!(valid, 1, "{prefix}");
        }
    }

    proptest! {
        #[test]
        fn prop_output_revalidates(prefix in "[a-z][12][0-9]{7}", pad in " {0,2}") {
            let validator = NationalIdValidator::default();
            let id = with_check_digit(&prefix.to_uppercase());
            let raw = format!("{pad}{}{pad}", id.to_lowercase());
            let value = check(&validator, &raw).unwrap().unwrap();
            prop_assert_eq!(&value, &id);
            prop_assert_eq!(check(&validator, &value), Ok(Some(value.clone())));
        }
    }
}
