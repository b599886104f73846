// Preprocessing applied before any predicate runs

use crate::Input;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which whitespace to strip from string input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrimMode {
    #[default]
    Trim,
    TrimStart,
    TrimEnd,
    None,
}

impl TrimMode {
    pub fn apply<'a>(&self, value: &'a str) -> &'a str {
        match self {
            TrimMode::Trim => value.trim(),
            TrimMode::TrimStart => value.trim_start(),
            TrimMode::TrimEnd => value.trim_end(),
            TrimMode::None => value,
        }
    }
}

/// Case normalization of string input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Casing {
    #[default]
    None,
    Upper,
    Lower,
    Title,
}

impl Casing {
    pub fn apply(&self, value: String) -> String {
        match self {
            Casing::None => value,
            Casing::Upper => value.to_uppercase(),
            Casing::Lower => value.to_lowercase(),
            Casing::Title => title_case(&value),
        }
    }
}

/// Upper-case the first letter of every whitespace-separated word, lower-case the rest.
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut word_start = true;
    for c in value.chars() {
        if c.is_whitespace() {
            word_start = true;
            result.push(c);
        } else if word_start {
            result.extend(c.to_uppercase());
            word_start = false;
        } else {
            result.extend(c.to_lowercase());
        }
    }
    result
}

/// Caller-supplied string hook, applied after trimming and casing.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(String) -> String + Send + Sync>);

impl Transform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(String) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: String) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Outcome of string preprocessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    /// Nothing left after defaults and trimming
    Empty,
    /// Normalized value
    Value(String),
    /// The input cannot be read as a string (a file)
    Unsupported,
}

/// String preprocessing in its fixed order: default substitution, trim,
/// casing, transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextPipe<'a> {
    pub trim: TrimMode,
    pub casing: Casing,
    pub transform: Option<&'a Transform>,
    pub default: Option<&'a str>,
}

impl<'a> TextPipe<'a> {
    pub fn new(trim: TrimMode, casing: Casing) -> Self {
        Self {
            trim,
            casing,
            transform: None,
            default: None,
        }
    }

    pub fn transform(mut self, transform: Option<&'a Transform>) -> Self {
        self.transform = transform;
        self
    }

    pub fn default_value(mut self, default: Option<&'a str>) -> Self {
        self.default = default;
        self
    }

    pub fn run(&self, input: &Input) -> Prepared {
        if let Input::File(_) = input {
            return Prepared::Unsupported;
        }

        let raw = match input.to_text().filter(|s| !s.is_empty()) {
            Some(raw) => raw,
            None => match self.default {
                Some(default) => default.to_string(),
                None => return Prepared::Empty,
            },
        };

        let mut value = self.casing.apply(self.trim.apply(&raw).to_string());
        if let Some(transform) = self.transform {
            value = transform.apply(value);
        }

        if value.is_empty() {
            Prepared::Empty
        } else {
            Prepared::Value(value)
        }
    }
}

/// Outcome of numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberInput {
    Empty,
    /// Coerced number; `NaN` when the input was not numeric
    Value(f64),
}

/// Coerce input to a number, optionally stripping thousands separators.
///
/// Non-numeric strings, booleans and files become `NaN` so the caller's
/// predicates report the type error.
pub fn coerce_number(input: &Input, parse_commas: bool) -> NumberInput {
    match input {
        Input::Null => NumberInput::Empty,
        Input::Number(n) => NumberInput::Value(*n),
        Input::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return NumberInput::Empty;
            }
            let cleaned = if parse_commas {
                trimmed.replace(',', "")
            } else {
                trimmed.to_string()
            };
            NumberInput::Value(parse_number(&cleaned))
        }
        Input::Bool(_) | Input::File(_) => NumberInput::Value(f64::NAN),
    }
}

fn parse_number(text: &str) -> f64 {
    let unsigned = text.trim_start_matches(['+', '-']);
    let lowered = unsigned.to_ascii_lowercase();
    if lowered == "infinity" {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if lowered.starts_with("inf") || lowered.starts_with("nan") {
        return f64::NAN;
    }
    text.parse().unwrap_or(f64::NAN)
}

/// Match input against boolean token sets.
///
/// Strings are compared trimmed and case-insensitively.
pub fn match_boolean(input: &Input, truthy: &[Input], falsy: &[Input]) -> Option<bool> {
    if truthy.iter().any(|token| token_eq(input, token)) {
        Some(true)
    } else if falsy.iter().any(|token| token_eq(input, token)) {
        Some(false)
    } else {
        None
    }
}

fn token_eq(input: &Input, token: &Input) -> bool {
    match (input, token) {
        (Input::Text(a), Input::Text(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        (a, b) => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_modes() {
        assert_eq!(TrimMode::Trim.apply("  a  "), "a");
        assert_eq!(TrimMode::TrimStart.apply("  a  "), "a  ");
        assert_eq!(TrimMode::TrimEnd.apply("  a  "), "  a");
        assert_eq!(TrimMode::None.apply("  a  "), "  a  ");
    }

    #[test]
    fn test_casing() {
        assert_eq!(Casing::Upper.apply("abc".into()), "ABC");
        assert_eq!(Casing::Lower.apply("AbC".into()), "abc");
        assert_eq!(Casing::Title.apply("hELLO  wORLD".into()), "Hello  World");
        assert_eq!(Casing::None.apply("MiXeD".into()), "MiXeD");
    }

    #[test]
    fn test_pipe_order() {
        let shout = Transform::new(|s| format!("{}!", s));
        let pipe = TextPipe::new(TrimMode::Trim, Casing::Upper).transform(Some(&shout));

        // The transform sees the trimmed, upper-cased value
        assert_eq!(pipe.run(&Input::from("  hi ")), Prepared::Value("HI!".into()));
    }

    #[test]
    fn test_pipe_defaults_and_empty() {
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None);
        assert_eq!(pipe.run(&Input::Null), Prepared::Empty);
        assert_eq!(pipe.run(&Input::from("")), Prepared::Empty);
        assert_eq!(pipe.run(&Input::from("   ")), Prepared::Empty);

        let pipe = pipe.default_value(Some(" fallback "));
        assert_eq!(pipe.run(&Input::Null), Prepared::Value("fallback".into()));
        assert_eq!(pipe.run(&Input::from("")), Prepared::Value("fallback".into()));
        assert_eq!(pipe.run(&Input::from("x")), Prepared::Value("x".into()));
    }

    #[test]
    fn test_pipe_scalars_and_files() {
        let pipe = TextPipe::default();
        assert_eq!(pipe.run(&Input::from(42)), Prepared::Value("42".into()));
        assert_eq!(pipe.run(&Input::from(true)), Prepared::Value("true".into()));
        assert_eq!(
            pipe.run(&Input::File(crate::FileInfo::new("a.txt", 1, "text/plain"))),
            Prepared::Unsupported
        );
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&Input::from("42"), false), NumberInput::Value(42.0));
        assert_eq!(coerce_number(&Input::from(" 1,234.5 "), true), NumberInput::Value(1234.5));
        assert_eq!(coerce_number(&Input::from(""), false), NumberInput::Empty);
        assert_eq!(coerce_number(&Input::Null, false), NumberInput::Empty);
        assert_eq!(coerce_number(&Input::from("-Infinity"), false), NumberInput::Value(f64::NEG_INFINITY));

        for raw in ["1,234", "abc", "nan", "inf"] {
            match coerce_number(&Input::from(raw), false) {
                NumberInput::Value(n) => assert!(n.is_nan(), "{raw}"),
                NumberInput::Empty => panic!("{raw} should not be empty"),
            }
        }
        match coerce_number(&Input::from(true), false) {
            NumberInput::Value(n) => assert!(n.is_nan()),
            NumberInput::Empty => panic!("booleans are not empty"),
        }
    }

    #[test]
    fn test_match_boolean() {
        let truthy = [Input::from(true), Input::from("yes"), Input::from(1)];
        let falsy = [Input::from(false), Input::from("no"), Input::from(0)];

        assert_eq!(match_boolean(&Input::from(" YES "), &truthy, &falsy), Some(true));
        assert_eq!(match_boolean(&Input::from(0), &truthy, &falsy), Some(false));
        assert_eq!(match_boolean(&Input::from("maybe"), &truthy, &falsy), None);
        assert_eq!(match_boolean(&Input::from("1"), &truthy, &falsy), None);
    }
}
