// Free-text validator

use super::{char_len, compile, first_contained, prepare};
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, OptionsError, RuleChain, TextPipe, Transform, TrimMode,
    ValidationContext, ValidationResult, Validator,
};
use regex::Regex;
use serde::Deserialize;

/// Options of [`TextValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOptions {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub includes: Option<String>,
    pub excludes: Vec<String>,
    /// Pattern the whole value must match
    pub regex: Option<String>,
    /// Reject whitespace-only values when trimming is disabled
    pub not_empty: bool,
    pub trim_mode: TrimMode,
    pub casing: Casing,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub default_value: Option<String>,
    pub messages: MessageOverrides,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            required: true,
            min_length: None,
            max_length: None,
            starts_with: None,
            ends_with: None,
            includes: None,
            excludes: Vec::new(),
            regex: None,
            not_empty: false,
            trim_mode: TrimMode::Trim,
            casing: Casing::None,
            transform: None,
            default_value: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl TextOptions {
    setters! {
        required: bool,
        min_length: Option<usize>,
        max_length: Option<usize>,
        starts_with: Option<String>,
        ends_with: Option<String>,
        includes: Option<String>,
        excludes: Vec<String>,
        regex: Option<String>,
        not_empty: bool,
        trim_mode: TrimMode,
        casing: Casing,
        transform: Transform,
        default_value: Option<String>,
        messages: MessageOverrides,
    }
}

/// General string validator.
#[derive(Debug, Clone)]
pub struct TextValidator {
    options: TextOptions,
    regex: Option<Regex>,
}

impl TextValidator {
    /// Build the validator, compiling the custom pattern.
    pub fn try_new(options: TextOptions) -> Result<Self, OptionsError> {
        if let (Some(min), Some(max)) = (options.min_length, options.max_length) {
            if min > max {
                return Err(OptionsError::Conflict(format!(
                    "minLength {} exceeds maxLength {}",
                    min, max
                )));
            }
        }
        let regex = compile("regex", options.regex.as_deref())?;
        Ok(Self { options, regex })
    }

    /// Build the validator; a pattern that does not compile is logged and ignored.
    pub fn new(options: TextOptions) -> Self {
        let regex = compile("regex", options.regex.as_deref()).unwrap_or_else(|err| {
            vetted_log::error!(target: "vetted::validation", "Ignoring text option: {}", err);
            None
        });
        Self { options, regex }
    }

    pub fn options(&self) -> &TextOptions {
        &self.options
    }
}

impl Default for TextValidator {
    fn default() -> Self {
        Self::new(TextOptions::default())
    }
}

impl Validator for TextValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "text"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(opts.trim_mode, opts.casing)
            .transform(opts.transform.as_ref())
            .default_value(opts.default_value.as_deref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let excluded = first_contained(&value, &opts.excludes);

        RuleChain::<str>::new()
            .add_if(opts.not_empty, "notEmpty", params![], |v| !v.trim().is_empty())
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
            .add_if(
                opts.starts_with.is_some(),
                "startsWith",
                params!["startsWith" => opts.starts_with.as_deref().unwrap_or_default()],
                |v| opts.starts_with.as_deref().is_none_or(|p| v.starts_with(p)),
            )
            .add_if(
                opts.ends_with.is_some(),
                "endsWith",
                params!["endsWith" => opts.ends_with.as_deref().unwrap_or_default()],
                |v| opts.ends_with.as_deref().is_none_or(|s| v.ends_with(s)),
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
            .check(&value, &reporter)?;

        Ok(Some(value))
    }
}
