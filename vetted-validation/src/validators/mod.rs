// Built-in validators

use crate::messages::Reporter;
use crate::{Input, OptionsError, Prepared, TextPipe, ValidationError};
use regex::Regex;

mod boolean;
mod color;
mod coordinate;
mod credit_card;
mod date;
mod datetime;
mod email;
mod file;
mod id;
mod ip;
mod number;
mod password;
pub mod taiwan;
mod temporal;
mod text;
mod time;
mod url;

pub use boolean::{BooleanOptions, BooleanValidator};
pub use color::{ColorFormat, ColorOptions, ColorValidator, detect_color_format};
pub use coordinate::{CoordinateKind, CoordinateOptions, CoordinateValidator};
pub use credit_card::{CardType, CreditCardOptions, CreditCardValidator, detect_card_type, luhn_check};
pub use date::{DateFormat, DateOptions, DateValidator};
pub use datetime::{DateTimeFormat, DateTimeOptions, DateTimeValidator};
pub use email::{EmailOptions, EmailValidator};
pub use file::{FileOptions, FileValidator, format_size, parse_size};
pub use id::{IdKind, IdOptions, IdValidator, detect_id_type};
pub use ip::{IpOptions, IpValidator, IpVersion};
pub use number::{NumberKind, NumberOptions, NumberValidator};
pub use password::{PasswordOptions, PasswordValidator, Strength, password_strength};
pub use text::{TextOptions, TextValidator};
pub use time::{TimeFormat, TimeOptions, TimeValidator};
pub use self::url::{UrlOptions, UrlValidator};

/// Run string preprocessing and the required check.
///
/// `Ok(None)` is the accepted empty value of an optional field.
pub(crate) fn prepare(
    pipe: TextPipe<'_>,
    input: &Input,
    required: bool,
    reporter: &Reporter<'_>,
) -> Result<Option<String>, ValidationError> {
    match pipe.run(input) {
        Prepared::Value(value) => Ok(Some(value)),
        Prepared::Empty if required => Err(reporter.error("required", params![])),
        Prepared::Empty => Ok(None),
        Prepared::Unsupported => Err(reporter.error("invalid", params![])),
    }
}

/// Compile an optional user pattern.
pub(crate) fn compile(
    option: &'static str,
    pattern: Option<&str>,
) -> Result<Option<Regex>, OptionsError> {
    pattern
        .map(|p| Regex::new(p).map_err(|source| OptionsError::Pattern { option, source }))
        .transpose()
}

/// Length in characters, not bytes.
pub(crate) fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// First entry of `needles` contained in `value`.
pub(crate) fn first_contained<'n>(value: &str, needles: &'n [String]) -> Option<&'n str> {
    needles
        .iter()
        .map(String::as_str)
        .find(|needle| value.contains(needle))
}

/// `domain` equals `rule` or, when allowed, is one of its subdomains.
pub(crate) fn domain_matches(domain: &str, rule: &str, subdomains: bool) -> bool {
    let rule = rule.trim_start_matches('.');
    domain.eq_ignore_ascii_case(rule)
        || (subdomains
            && domain.len() > rule.len()
            && domain.to_ascii_lowercase().ends_with(&format!(".{}", rule.to_ascii_lowercase())))
}

/// Join list values for message parameters.
pub(crate) fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_matches() {
        assert!(domain_matches("example.com", "example.com", false));
        assert!(domain_matches("Mail.Example.com", "example.com", true));
        assert!(!domain_matches("mail.example.com", "example.com", false));
        assert!(!domain_matches("badexample.com", "example.com", true));
    }

    #[test]
    fn test_compile_reports_option() {
        let err = compile("regex", Some("(unclosed")).unwrap_err();
        assert!(err.to_string().contains("regex"));
        assert!(compile("regex", None).unwrap().is_none());
    }

    #[test]
    fn test_first_contained() {
        let needles = vec!["foo".to_string(), "bar".to_string()];
        assert_eq!(first_contained("xbarx", &needles), Some("bar"));
        assert_eq!(first_contained("baz", &needles), None);
    }
}
