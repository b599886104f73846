// Geographic coordinate validator

use super::prepare;
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, RuleChain, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationResult, Validator,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?\d+(?:\.(\d+))?$").unwrap());

/// What the input holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateKind {
    Latitude,
    Longitude,
    /// `"lat,lng"`
    #[default]
    Pair,
}

/// A parsed component and the number of decimals it was written with.
#[derive(Debug, Clone, Copy)]
struct Component {
    value: f64,
    decimals: u32,
}

fn component(raw: &str) -> Option<Component> {
    let caps = DECIMAL_REGEX.captures(raw)?;
    let decimals = caps.get(1).map_or(0, |m| m.as_str().len() as u32);
    let value = raw.parse().ok()?;
    Some(Component { value, decimals })
}

#[derive(Debug, Clone, Copy)]
struct Parsed {
    latitude: Option<Component>,
    longitude: Option<Component>,
}

impl Parsed {
    fn components(&self) -> impl Iterator<Item = Component> {
        self.latitude.into_iter().chain(self.longitude)
    }
}

/// Options of [`CoordinateValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoordinateOptions {
    pub required: bool,
    pub kind: CoordinateKind,
    /// Maximum number of decimals per component
    pub precision: Option<u32>,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for CoordinateOptions {
    fn default() -> Self {
        Self {
            required: true,
            kind: CoordinateKind::Pair,
            precision: None,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl CoordinateOptions {
    setters! {
        required: bool,
        kind: CoordinateKind,
        precision: Option<u32>,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Latitude, longitude or `"lat,lng"` validator.
///
/// Pairs are returned as `lat,lng` without whitespace.
#[derive(Debug, Clone, Default)]
pub struct CoordinateValidator {
    options: CoordinateOptions,
}

impl CoordinateValidator {
    pub fn new(options: CoordinateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CoordinateOptions {
        &self.options
    }

    fn parse(&self, value: &str) -> Option<(Parsed, String)> {
        match self.options.kind {
            CoordinateKind::Latitude => component(value).map(|c| {
                let parsed = Parsed {
                    latitude: Some(c),
                    longitude: None,
                };
                (parsed, value.to_string())
            }),
            CoordinateKind::Longitude => component(value).map(|c| {
                let parsed = Parsed {
                    latitude: None,
                    longitude: Some(c),
                };
                (parsed, value.to_string())
            }),
            CoordinateKind::Pair => {
                let (lat, lng) = value.split_once(',')?;
                let (lat, lng) = (lat.trim(), lng.trim());
                let parsed = Parsed {
                    latitude: Some(component(lat)?),
                    longitude: Some(component(lng)?),
                };
                Some((parsed, format!("{lat},{lng}")))
            }
        }
    }
}

impl Validator for CoordinateValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "coordinate"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let Some((parsed, canonical)) = self.parse(&value) else {
            return Err(reporter.error("invalid", params![]));
        };

        RuleChain::<Parsed>::new()
            .add("invalidLatitude", |p| {
                p.latitude.is_none_or(|c| (-90.0..=90.0).contains(&c.value))
            })
            .add("invalidLongitude", |p| {
                p.longitude.is_none_or(|c| (-180.0..=180.0).contains(&c.value))
            })
            .add_if(
                opts.precision.is_some(),
                "precision",
                params!["precision" => opts.precision.unwrap_or_default()],
                |p| {
                    opts.precision
                        .is_none_or(|max| p.components().all(|c| c.decimals <= max))
                },
            )
            .check(&parsed, &reporter)?;

        Ok(Some(canonical))
    }
}
