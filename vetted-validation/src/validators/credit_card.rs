// Payment card number validator

use super::{join, prepare};
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, RuleChain, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationResult, Validator,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

static CARD_PATTERNS: Lazy<Vec<(CardType, Regex)>> = Lazy::new(|| {
    [
        (CardType::Visa, r"^4\d{12}(?:\d{3})?(?:\d{3})?$"),
        (
            CardType::Mastercard,
            r"^(?:5[1-5]\d{2}|222[1-9]|22[3-9]\d|2[3-6]\d{2}|27[01]\d|2720)\d{12}$",
        ),
        (CardType::Amex, r"^3[47]\d{13}$"),
        (CardType::Discover, r"^6(?:011|5\d{2})\d{12}$"),
        (CardType::Jcb, r"^(?:2131|1800|35\d{3})\d{11}$"),
        (CardType::Diners, r"^3(?:0[0-5]|[68]\d)\d{11}$"),
        (CardType::UnionPay, r"^62\d{14,17}$"),
    ]
    .into_iter()
    .map(|(card, pattern)| (card, Regex::new(pattern).unwrap()))
    .collect()
});

/// Card networks recognized by [`detect_card_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardType {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Jcb,
    Diners,
    #[serde(rename = "unionpay")]
    UnionPay,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Visa => "visa",
            CardType::Mastercard => "mastercard",
            CardType::Amex => "amex",
            CardType::Discover => "discover",
            CardType::Jcb => "jcb",
            CardType::Diners => "diners",
            CardType::UnionPay => "unionpay",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network of a digits-only card number, by issuer prefix and length.
pub fn detect_card_type(digits: &str) -> Option<CardType> {
    CARD_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(digits))
        .map(|(card, _)| *card)
}

/// Luhn (mod 10) check of a digits-only string.
pub fn luhn_check(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let digit = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();
    sum % 10 == 0
}

/// Options of [`CreditCardValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreditCardOptions {
    pub required: bool,
    /// Accepted networks; empty accepts every recognized network
    pub card_types: Vec<CardType>,
    pub luhn: bool,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for CreditCardOptions {
    fn default() -> Self {
        Self {
            required: true,
            card_types: Vec::new(),
            luhn: true,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl CreditCardOptions {
    setters! {
        required: bool,
        card_types: Vec<CardType>,
        luhn: bool,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Card number validator. Spaces and dashes are ignored; the output is digits only.
#[derive(Debug, Clone, Default)]
pub struct CreditCardValidator {
    options: CreditCardOptions,
}

impl CreditCardValidator {
    pub fn new(options: CreditCardOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CreditCardOptions {
        &self.options
    }
}

impl Validator for CreditCardValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "creditCard"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };
        let digits: String = value.chars().filter(|c| !matches!(c, ' ' | '-')).collect();

        RuleChain::<str>::new()
            .add("invalid", |d| {
                d.bytes().all(|b| b.is_ascii_digit()) && (12..=19).contains(&d.len())
            })
            .add_with(
                "unsupportedCard",
                params!["cardTypes" => join(&opts.card_types)],
                |d| {
                    detect_card_type(d).is_some_and(|card| {
                        opts.card_types.is_empty() || opts.card_types.contains(&card)
                    })
                },
            )
            .add_if(opts.luhn, "luhn", params![], luhn_check)
            .check(&digits, &reporter)?;

        Ok(Some(digits))
    }
}
