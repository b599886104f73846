// Taiwan unified business number (統一編號)

use crate::messages::Reporter;
use crate::validators::prepare;
use crate::{
    Casing, Input, MessageOverrides, RuleChain, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationResult, Validator,
};
use serde::Deserialize;

const WEIGHTS: [u32; 8] = [1, 2, 1, 2, 1, 2, 4, 1];

/// Eight ASCII digits.
fn is_business_id_shape(id: &str) -> bool {
    id.len() == 8 && id.bytes().all(|b| b.is_ascii_digit())
}

/// Weighted digit sum: each product contributes the sum of its digits.
fn weighted_sum(id: &str) -> u32 {
    id.bytes()
        .zip(WEIGHTS)
        .map(|(b, w)| {
            let product = u32::from(b - b'0') * w;
            product / 10 + product % 10
        })
        .sum()
}

fn divisible(sum: u32) -> bool {
    sum % 5 == 0 || sum % 10 == 0
}

/// Verify an eight-digit business number.
///
/// Valid when the weighted sum is a multiple of 5 (numbers issued from
/// 2023) or 10. When the seventh digit is 7 its product `28` may also
/// count as `1`, so `sum + 1` is checked too.
pub fn is_valid_business_id(id: &str) -> bool {
    if !is_business_id_shape(id) {
        return false;
    }
    let sum = weighted_sum(id);
    divisible(sum) || (id.as_bytes()[6] == b'7' && divisible(sum + 1))
}

/// Options of [`BusinessIdValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BusinessIdOptions {
    pub required: bool,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for BusinessIdOptions {
    fn default() -> Self {
        Self {
            required: true,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl BusinessIdOptions {
    setters! {
        required: bool,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Unified business number validator.
#[derive(Debug, Clone, Default)]
pub struct BusinessIdValidator {
    options: BusinessIdOptions,
}

impl BusinessIdValidator {
    pub fn new(options: BusinessIdOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BusinessIdOptions {
        &self.options
    }
}

impl Validator for BusinessIdValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "businessId"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        RuleChain::<str>::new()
            .add("invalid", is_business_id_shape)
            .add("checksum", is_valid_business_id)
            .check(&value, &reporter)?;

        Ok(Some(value))
    }
}
