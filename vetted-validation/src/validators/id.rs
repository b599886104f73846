// Identifier validator with format auto-detection

use super::{char_len, compile, first_contained, join, prepare};
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, OptionsError, RuleChain, TextPipe, Transform, TrimMode,
    ValidationContext, ValidationResult, Validator,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// Detection order, most specific first.
const ID_PATTERNS: &[(IdKind, &str)] = &[
    (
        IdKind::Uuid,
        r"^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    ),
    (IdKind::ObjectId, r"^[0-9a-f]{24}$"),
    (IdKind::Snowflake, r"^\d{15,19}$"),
    (IdKind::Cuid, r"^c[a-z0-9]{24}$"),
    (IdKind::Ulid, r"^[0-9A-HJKMNP-TV-Z]{26}$"),
    (IdKind::NanoId, r"^[A-Za-z0-9_-]{21}$"),
    (IdKind::Numeric, r"^\d+$"),
    (IdKind::ShortId, r"^[A-Za-z0-9_-]{7,14}$"),
];

fn build_table(case_insensitive: bool) -> Vec<(IdKind, Regex)> {
    ID_PATTERNS
        .iter()
        .map(|(kind, pattern)| {
            // UUIDs are matched case-insensitively in both tables
            let flags = if case_insensitive || *kind == IdKind::Uuid {
                "(?i)"
            } else {
                ""
            };
            (*kind, Regex::new(&format!("{flags}{pattern}")).unwrap())
        })
        .collect()
}

static ID_TABLE: Lazy<Vec<(IdKind, Regex)>> = Lazy::new(|| build_table(false));
static ID_TABLE_INSENSITIVE: Lazy<Vec<(IdKind, Regex)>> = Lazy::new(|| build_table(true));

/// Identifier formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum IdKind {
    /// Any format in the detection table
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "uuid")]
    Uuid,
    /// MongoDB ObjectId
    #[serde(rename = "objectId")]
    ObjectId,
    #[serde(rename = "snowflake")]
    Snowflake,
    #[serde(rename = "cuid")]
    Cuid,
    #[serde(rename = "ulid")]
    Ulid,
    #[serde(rename = "nanoid")]
    NanoId,
    #[serde(rename = "numeric")]
    Numeric,
    #[serde(rename = "shortid")]
    ShortId,
}

impl IdKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdKind::Auto => "auto",
            IdKind::Uuid => "uuid",
            IdKind::ObjectId => "objectId",
            IdKind::Snowflake => "snowflake",
            IdKind::Cuid => "cuid",
            IdKind::Ulid => "ulid",
            IdKind::NanoId => "nanoid",
            IdKind::Numeric => "numeric",
            IdKind::ShortId => "shortid",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn table(case_sensitive: bool) -> &'static [(IdKind, Regex)] {
    if case_sensitive {
        &ID_TABLE
    } else {
        &ID_TABLE_INSENSITIVE
    }
}

/// First format in the detection table that `value` matches.
pub fn detect_id_type(value: &str) -> Option<IdKind> {
    detect_in(table(true), value)
}

fn detect_in(table: &[(IdKind, Regex)], value: &str) -> Option<IdKind> {
    table
        .iter()
        .find(|(_, pattern)| pattern.is_match(value))
        .map(|(kind, _)| *kind)
}

fn matches_kind(table: &[(IdKind, Regex)], kind: IdKind, value: &str) -> bool {
    table
        .iter()
        .any(|(k, pattern)| *k == kind && pattern.is_match(value))
}

/// Options of [`IdValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdOptions {
    pub required: bool,
    #[serde(rename = "type")]
    pub kind: IdKind,
    /// Formats accepted in auto mode; empty accepts all
    pub allowed_kinds: Vec<IdKind>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub case_sensitive: bool,
    pub includes: Option<String>,
    pub excludes: Vec<String>,
    pub regex: Option<String>,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for IdOptions {
    fn default() -> Self {
        Self {
            required: true,
            kind: IdKind::Auto,
            allowed_kinds: Vec::new(),
            min_length: None,
            max_length: None,
            case_sensitive: true,
            includes: None,
            excludes: Vec::new(),
            regex: None,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl IdOptions {
    setters! {
        required: bool,
        kind: IdKind,
        allowed_kinds: Vec<IdKind>,
        min_length: Option<usize>,
        max_length: Option<usize>,
        case_sensitive: bool,
        includes: Option<String>,
        excludes: Vec<String>,
        regex: Option<String>,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Identifier validator.
#[derive(Debug, Clone)]
pub struct IdValidator {
    options: IdOptions,
    regex: Option<Regex>,
}

impl IdValidator {
    pub fn try_new(options: IdOptions) -> Result<Self, OptionsError> {
        let regex = compile("regex", options.regex.as_deref())?;
        Ok(Self { options, regex })
    }

    /// Build the validator; a pattern that does not compile is logged and ignored.
    pub fn new(options: IdOptions) -> Self {
        let regex = compile("regex", options.regex.as_deref()).unwrap_or_else(|err| {
            vetted_log::error!(target: "vetted::validation", "Ignoring id option: {}", err);
            None
        });
        Self { options, regex }
    }

    pub fn options(&self) -> &IdOptions {
        &self.options
    }

    /// Format of `value` under these options, if it is accepted at all.
    pub fn detect(&self, value: &str) -> Option<IdKind> {
        let table = table(self.options.case_sensitive);
        match self.options.kind {
            IdKind::Auto => detect_in(table, value),
            kind => matches_kind(table, kind, value).then_some(kind),
        }
    }
}

impl Default for IdValidator {
    fn default() -> Self {
        Self::new(IdOptions::default())
    }
}

impl Validator for IdValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "id"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let excluded = first_contained(&value, &opts.excludes);
        let expected = match opts.kind {
            IdKind::Auto => join(&opts.allowed_kinds),
            kind => kind.to_string(),
        };
        let detected = self.detect(&value);

        RuleChain::<str>::new()
            .add_if(
                opts.min_length.is_some(),
                "minLength",
                params!["min" => opts.min_length.unwrap_or_default()],
                |v| opts.min_length.is_none_or(|min| char_len(v) >= min),
            )
            .add_if(
                opts.max_length.is_some(),
                "maxLength",
                params!["max" => opts.max_length.unwrap_or_default()],
                |v| opts.max_length.is_none_or(|max| char_len(v) <= max),
            )
            .add_if(self.regex.is_some(), "pattern", params![], |v| {
                self.regex.as_ref().is_none_or(|re| re.is_match(v))
            })
            .add_if(opts.kind == IdKind::Auto, "invalid", params![], |_| {
                detected.is_some()
            })
            .add_with("type", params!["type" => expected], |_| {
                detected.is_some_and(|kind| {
                    opts.kind != IdKind::Auto
                        || opts.allowed_kinds.is_empty()
                        || opts.allowed_kinds.contains(&kind)
                })
            })
            .add_if(
                opts.includes.is_some(),
                "includes",
                params!["includes" => opts.includes.as_deref().unwrap_or_default()],
                |v| opts.includes.as_deref().is_none_or(|s| v.contains(s)),
            )
            .add_if(
                excluded.is_some(),
                "excludes",
                params!["excludes" => excluded.unwrap_or_default()],
                |_| excluded.is_none(),
            )
            .check(&*value, &reporter)?;

        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetted_i18n::Locale;

    const UUID: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn check(validator: &IdValidator, input: &str) -> ValidationResult<String> {
        validator.validate_with(&Input::from(input), &ValidationContext::for_locale(Locale::en()))
    }

    fn code(validator: &IdValidator, input: &str) -> &'static str {
        check(validator, input).unwrap_err().code
    }

    #[test]
    fn test_detection_table() {
        assert_eq!(detect_id_type(UUID), Some(IdKind::Uuid));
        assert_eq!(detect_id_type(&UUID.to_uppercase()), Some(IdKind::Uuid));
        assert_eq!(detect_id_type("507f1f77bcf86cd799439011"), Some(IdKind::ObjectId));
        assert_eq!(detect_id_type("175928847299117063"), Some(IdKind::Snowflake));
        assert_eq!(detect_id_type("cjld2cjxh0000qzrmn831i7rn"), Some(IdKind::Cuid));
        assert_eq!(detect_id_type("01ARZ3NDEKTSV4RRFFQ69G5FAV"), Some(IdKind::Ulid));
        assert_eq!(detect_id_type("V1StGXR8_Z5jdHi6B-myT"), Some(IdKind::NanoId));
        assert_eq!(detect_id_type("12345"), Some(IdKind::Numeric));
        assert_eq!(detect_id_type("PPBqWA9"), Some(IdKind::ShortId));
        assert_eq!(detect_id_type("not an id"), None);
    }

    #[test]
    fn test_uuid_is_never_shortid() {
        assert_ne!(detect_id_type(UUID), Some(IdKind::ShortId));
        let short_only = IdValidator::new(
            IdOptions::default().allowed_kinds([IdKind::ShortId]),
        );
        assert_eq!(code(&short_only, UUID), "type");
    }

    #[test]
    fn test_specific_kind() {
        let validator = IdValidator::new(IdOptions::default().kind(IdKind::ObjectId));
        assert!(check(&validator, "507f1f77bcf86cd799439011").is_ok());
        let error = check(&validator, UUID).unwrap_err();
        assert_eq!(error.code, "type");
        assert_eq!(error.param("type"), Some("objectId"));
        assert_eq!(code(&validator, "507F1F77BCF86CD799439011"), "type");

        let relaxed = IdValidator::new(
            IdOptions::default()
                .kind(IdKind::ObjectId)
                .case_sensitive(false),
        );
        assert!(check(&relaxed, "507F1F77BCF86CD799439011").is_ok());
    }

    #[test]
    fn test_rule_order() {
        let validator = IdValidator::try_new(
            IdOptions::default()
                .min_length(5)
                .max_length(30)
                .regex(r"^[^x]*$")
                .excludes(["0000"]),
        )
        .unwrap();
        assert_eq!(code(&validator, "1234"), "minLength");
        assert_eq!(code(&validator, "1234567890123456789012345678901"), "maxLength");
        assert_eq!(code(&validator, "abcxdef"), "pattern");
        assert_eq!(code(&validator, "not an id"), "invalid");
        assert_eq!(code(&validator, "1000009"), "excludes");
        assert!(check(&validator, "1234567").is_ok());
    }

    #[test]
    fn test_kind_deserializes() {
        let options: IdOptions =
            serde_json::from_str(r#"{"type": "objectId", "allowedKinds": ["uuid", "nanoid"]}"#)
                .unwrap();
        assert_eq!(options.kind, IdKind::ObjectId);
        assert_eq!(options.allowed_kinds, vec![IdKind::Uuid, IdKind::NanoId]);
        assert!(options.required);
    }
}
