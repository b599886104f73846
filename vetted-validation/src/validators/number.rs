// Numeric validator

use crate::messages::Reporter;
use crate::pipe::{NumberInput, coerce_number};
use crate::{
    Input, MessageOverrides, RuleChain, Transform, ValidationContext, ValidationResult, Validator,
};
use serde::Deserialize;

/// Accepted number shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NumberKind {
    /// Integers and fractions
    #[default]
    Both,
    /// Whole numbers only
    Integer,
    /// Numbers with a fractional part only
    Float,
}

/// Options of [`NumberValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NumberOptions {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub kind: NumberKind,
    pub positive: bool,
    pub negative: bool,
    pub non_negative: bool,
    pub non_positive: bool,
    pub multiple_of: Option<f64>,
    /// Maximum number of decimal places
    pub precision: Option<u32>,
    /// Reject infinities (default `true`)
    pub finite: bool,
    /// Strip thousands separators from string input
    pub parse_commas: bool,
    pub default_value: Option<f64>,
    /// Applied to string input before coercion
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for NumberOptions {
    fn default() -> Self {
        Self {
            required: true,
            min: None,
            max: None,
            kind: NumberKind::Both,
            positive: false,
            negative: false,
            non_negative: false,
            non_positive: false,
            multiple_of: None,
            precision: None,
            finite: true,
            parse_commas: false,
            default_value: None,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl NumberOptions {
    setters! {
        required: bool,
        min: Option<f64>,
        max: Option<f64>,
        kind: NumberKind,
        positive: bool,
        negative: bool,
        non_negative: bool,
        non_positive: bool,
        multiple_of: Option<f64>,
        precision: Option<u32>,
        finite: bool,
        parse_commas: bool,
        default_value: Option<f64>,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Coerces strings to numbers and checks sign, range and shape.
#[derive(Debug, Clone, Default)]
pub struct NumberValidator {
    options: NumberOptions,
}

impl NumberValidator {
    pub fn new(options: NumberOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NumberOptions {
        &self.options
    }
}

/// Decimal places of the shortest representation.
fn decimals(value: f64) -> u32 {
    let repr = value.to_string();
    match repr.split_once('.') {
        Some((_, fraction)) => fraction.len() as u32,
        None => 0,
    }
}

fn is_multiple(value: f64, step: f64) -> bool {
    if step == 0.0 {
        return false;
    }
    let ratio = value / step;
    (ratio - ratio.round()).abs() < 1e-9
}

impl Validator for NumberValidator {
    type Output = f64;

    fn scope(&self) -> &'static str {
        "number"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<f64> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);

        let input = match (input, &opts.transform) {
            (Input::Text(text), Some(transform)) => Input::Text(transform.apply(text.clone())),
            _ => input.clone(),
        };

        let value = match coerce_number(&input, opts.parse_commas) {
            NumberInput::Value(value) => value,
            NumberInput::Empty => match opts.default_value {
                Some(default) => default,
                None if opts.required => return Err(reporter.error("required", params![])),
                None => return Ok(None),
            },
        };

        RuleChain::<f64>::new()
            .add("invalid", |v| !v.is_nan())
            .add_if(opts.finite, "finite", params![], |v| v.is_finite())
            .add_if(opts.kind == NumberKind::Integer, "integer", params![], |v| {
                v.fract() == 0.0
            })
            .add_if(opts.kind == NumberKind::Float, "float", params![], |v| {
                v.fract() != 0.0
            })
            .add_if(opts.positive, "positive", params![], |v| *v > 0.0)
            .add_if(opts.negative, "negative", params![], |v| *v < 0.0)
            .add_if(opts.non_negative, "nonNegative", params![], |v| *v >= 0.0)
            .add_if(opts.non_positive, "nonPositive", params![], |v| *v <= 0.0)
            .add_if(
                opts.min.is_some(),
                "min",
                params!["min" => opts.min.unwrap_or_default()],
                |v| opts.min.is_none_or(|min| *v >= min),
            )
            .add_if(
                opts.max.is_some(),
                "max",
                params!["max" => opts.max.unwrap_or_default()],
                |v| opts.max.is_none_or(|max| *v <= max),
            )
            .add_if(
                opts.multiple_of.is_some(),
                "multipleOf",
                params!["multipleOf" => opts.multiple_of.unwrap_or_default()],
                |v| opts.multiple_of.is_none_or(|step| is_multiple(*v, step)),
            )
            .add_if(
                opts.precision.is_some(),
                "precision",
                params!["precision" => opts.precision.unwrap_or_default()],
                |v| opts.precision.is_none_or(|p| decimals(*v) <= p),
            )
            .check(&value, &reporter)?;

        Ok(Some(value))
    }
}
