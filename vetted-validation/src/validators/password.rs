// Password validator

use super::{char_len, compile, first_contained, prepare};
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, OptionsError, RuleChain, TextPipe, TrimMode,
    ValidationContext, ValidationResult, Validator,
};
use regex::Regex;
use serde::Deserialize;
use std::fmt;

/// Frequently leaked passwords and fragments.
const COMMON_WORDS: &[&str] = &[
    "password", "passw0rd", "123456", "12345678", "qwerty", "abc123", "111111", "admin",
    "letmein", "welcome", "monkey", "dragon", "iloveyou", "football", "baseball", "master",
    "sunshine", "princess", "login", "starwars", "whatever", "trustno1",
];

/// Password strength grade, ordered from weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strength::Weak => "weak",
            Strength::Medium => "medium",
            Strength::Strong => "strong",
            Strength::VeryStrong => "very-strong",
        })
    }
}

/// Grade a password by character classes and length.
///
/// One point per class present (lower, upper, digit, symbol), one for 8+
/// characters and one more for 12+.
pub fn password_strength(password: &str) -> Strength {
    let classes = [
        password.chars().any(|c| c.is_lowercase()),
        password.chars().any(|c| c.is_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(is_special),
    ];
    let len = char_len(password);
    let score = classes.iter().filter(|present| **present).count()
        + usize::from(len >= 8)
        + usize::from(len >= 12);

    match score {
        0..=2 => Strength::Weak,
        3..=4 => Strength::Medium,
        5 => Strength::Strong,
        _ => Strength::VeryStrong,
    }
}

fn is_special(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

/// Three or more identical characters in a row.
fn has_repeating(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

/// Three or more ascending letters or digits in a row (`abc`, `456`).
fn has_sequential(password: &str) -> bool {
    let chars: Vec<char> = password.chars().map(|c| c.to_ascii_lowercase()).collect();
    chars.windows(3).any(|w| {
        let same_class = w.iter().all(|c| c.is_ascii_digit()) || w.iter().all(|c| c.is_ascii_lowercase());
        same_class && w[1] as u32 == w[0] as u32 + 1 && w[2] as u32 == w[1] as u32 + 1
    })
}

fn has_common_word(password: &str) -> bool {
    let lower = password.to_lowercase();
    COMMON_WORDS.iter().any(|word| lower.contains(word))
}

/// Options of [`PasswordValidator`]. Passwords are never trimmed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PasswordOptions {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub special: bool,
    pub no_repeating: bool,
    pub no_sequential: bool,
    pub no_common_words: bool,
    pub min_strength: Option<Strength>,
    pub includes: Option<String>,
    pub excludes: Vec<String>,
    pub regex: Option<String>,
    pub messages: MessageOverrides,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            required: true,
            min_length: None,
            max_length: None,
            uppercase: false,
            lowercase: false,
            digits: false,
            special: false,
            no_repeating: false,
            no_sequential: false,
            no_common_words: false,
            min_strength: None,
            includes: None,
            excludes: Vec::new(),
            regex: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl PasswordOptions {
    /// Required, no other rules.
    pub fn new() -> Self {
        Self::default()
    }

    setters! {
        required: bool,
        min_length: Option<usize>,
        max_length: Option<usize>,
        uppercase: bool,
        lowercase: bool,
        digits: bool,
        special: bool,
        no_repeating: bool,
        no_sequential: bool,
        no_common_words: bool,
        min_strength: Option<Strength>,
        includes: Option<String>,
        excludes: Vec<String>,
        regex: Option<String>,
        messages: MessageOverrides,
    }
}

/// Password policy validator.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    options: PasswordOptions,
    regex: Option<Regex>,
}

impl PasswordValidator {
    pub fn try_new(options: PasswordOptions) -> Result<Self, OptionsError> {
        let regex = compile("regex", options.regex.as_deref())?;
        Ok(Self { options, regex })
    }

    /// Build the validator; a pattern that does not compile is logged and ignored.
    pub fn new(options: PasswordOptions) -> Self {
        let regex = compile("regex", options.regex.as_deref()).unwrap_or_else(|err| {
            vetted_log::error!(target: "vetted::validation", "Ignoring password option: {}", err);
            None
        });
        Self { options, regex }
    }

    pub fn options(&self) -> &PasswordOptions {
        &self.options
    }
}

impl Default for PasswordValidator {
    fn default() -> Self {
        Self::new(PasswordOptions::new())
    }
}

impl Validator for PasswordValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "password"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::None, Casing::None);

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let excluded = first_contained(&value, &opts.excludes);

        RuleChain::<str>::new()
            .add_if(
                opts.min_length.is_some(),
                "min",
                params!["min" => opts.min_length.unwrap_or_default()],
                |v| opts.min_length.is_none_or(|min| char_len(v) >= min),
            )
            .add_if(
                opts.max_length.is_some(),
                "max",
                params!["max" => opts.max_length.unwrap_or_default()],
                |v| opts.max_length.is_none_or(|max| char_len(v) <= max),
            )
            .add_if(opts.uppercase, "uppercase", params![], |v| {
                v.chars().any(char::is_uppercase)
            })
            .add_if(opts.lowercase, "lowercase", params![], |v| {
                v.chars().any(char::is_lowercase)
            })
            .add_if(opts.digits, "digits", params![], |v| {
                v.chars().any(|c| c.is_ascii_digit())
            })
            .add_if(opts.special, "special", params![], |v| v.chars().any(is_special))
            .add_if(opts.no_repeating, "noRepeating", params![], |v| !has_repeating(v))
            .add_if(opts.no_sequential, "noSequential", params![], |v| !has_sequential(v))
            .add_if(opts.no_common_words, "noCommonWords", params![], |v| {
                !has_common_word(v)
            })
            .add_if(
                opts.min_strength.is_some(),
                "minStrength",
                params!["minStrength" => opts.min_strength.unwrap_or(Strength::Weak)],
                |v| opts.min_strength.is_none_or(|min| password_strength(v) >= min),
            )
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
            .add_if(self.regex.is_some(), "invalid", params![], |v| {
                self.regex.as_ref().is_none_or(|re| re.is_match(v))
            })
            .check(&*value, &reporter)?;

        Ok(Some(value))
    }
}
