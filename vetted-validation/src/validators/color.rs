// Color validator

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

static HEX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#[0-9a-fA-F]+$").unwrap());

static RGB_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)$").unwrap()
});

static RGBA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^rgba\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d*\.?\d+)\s*\)$")
        .unwrap()
});

static HSL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^hsl\(\s*(\d{1,3})\s*,\s*(\d{1,3})%\s*,\s*(\d{1,3})%\s*\)$").unwrap()
});

static HSLA_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^hsla\(\s*(\d{1,3})\s*,\s*(\d{1,3})%\s*,\s*(\d{1,3})%\s*,\s*(\d*\.?\d+)\s*\)$")
        .unwrap()
});

/// CSS named colors.
const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue",
    "darkcyan", "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki",
    "darkmagenta", "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon",
    "darkseagreen", "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise",
    "darkviolet", "deeppink", "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick",
    "floralwhite", "forestgreen", "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod",
    "gray", "green", "greenyellow", "grey", "honeydew", "hotpink", "indianred", "indigo",
    "ivory", "khaki", "lavender", "lavenderblush", "lawngreen", "lemonchiffon", "lightblue",
    "lightcoral", "lightcyan", "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey",
    "lightpink", "lightsalmon", "lightseagreen", "lightskyblue", "lightslategray",
    "lightslategrey", "lightsteelblue", "lightyellow", "lime", "limegreen", "linen", "magenta",
    "maroon", "mediumaquamarine", "mediumblue", "mediumorchid", "mediumpurple",
    "mediumseagreen", "mediumslateblue", "mediumspringgreen", "mediumturquoise",
    "mediumvioletred", "midnightblue", "mintcream", "mistyrose", "moccasin", "navajowhite",
    "navy", "oldlace", "olive", "olivedrab", "orange", "orangered", "orchid", "palegoldenrod",
    "palegreen", "paleturquoise", "palevioletred", "papayawhip", "peachpuff", "peru", "pink",
    "plum", "powderblue", "purple", "rebeccapurple", "red", "rosybrown", "royalblue",
    "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell", "sienna", "silver",
    "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen", "steelblue", "tan",
    "teal", "thistle", "tomato", "transparent", "turquoise", "violet", "wheat", "white",
    "whitesmoke", "yellow", "yellowgreen",
];

/// Color notations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    /// `#rgb`
    Hex3,
    /// `#rgba`
    Hex4,
    /// `#rrggbb`
    Hex6,
    /// `#rrggbbaa`
    Hex8,
    Rgb,
    Rgba,
    Hsl,
    Hsla,
    /// CSS color keyword
    Named,
}

impl ColorFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorFormat::Hex3 => "hex3",
            ColorFormat::Hex4 => "hex4",
            ColorFormat::Hex6 => "hex6",
            ColorFormat::Hex8 => "hex8",
            ColorFormat::Rgb => "rgb",
            ColorFormat::Rgba => "rgba",
            ColorFormat::Hsl => "hsl",
            ColorFormat::Hsla => "hsla",
            ColorFormat::Named => "named",
        }
    }

    /// Whether the notation carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(
            self,
            ColorFormat::Hex4 | ColorFormat::Hex8 | ColorFormat::Rgba | ColorFormat::Hsla
        )
    }
}

impl fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn channel(capture: Option<regex::Match<'_>>, max: u32) -> bool {
    capture
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .is_some_and(|v| v <= max)
}

fn alpha(capture: Option<regex::Match<'_>>) -> bool {
    capture
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .is_some_and(|a| (0.0..=1.0).contains(&a))
}

/// Detect the notation of a color string, checking channel ranges.
///
/// Returns `None` for anything that is not a well-formed color.
pub fn detect_color_format(value: &str) -> Option<ColorFormat> {
    let value = value.trim();

    if HEX_REGEX.is_match(value) {
        return match value.len() - 1 {
            3 => Some(ColorFormat::Hex3),
            4 => Some(ColorFormat::Hex4),
            6 => Some(ColorFormat::Hex6),
            8 => Some(ColorFormat::Hex8),
            _ => None,
        };
    }

    if let Some(caps) = RGB_REGEX.captures(value) {
        return (1..=3)
            .all(|i| channel(caps.get(i), 255))
            .then_some(ColorFormat::Rgb);
    }
    if let Some(caps) = RGBA_REGEX.captures(value) {
        return ((1..=3).all(|i| channel(caps.get(i), 255)) && alpha(caps.get(4)))
            .then_some(ColorFormat::Rgba);
    }
    if let Some(caps) = HSL_REGEX.captures(value) {
        return (channel(caps.get(1), 360) && channel(caps.get(2), 100) && channel(caps.get(3), 100))
            .then_some(ColorFormat::Hsl);
    }
    if let Some(caps) = HSLA_REGEX.captures(value) {
        return (channel(caps.get(1), 360)
            && channel(caps.get(2), 100)
            && channel(caps.get(3), 100)
            && alpha(caps.get(4)))
        .then_some(ColorFormat::Hsla);
    }

    let lower = value.to_ascii_lowercase();
    NAMED_COLORS
        .contains(&lower.as_str())
        .then_some(ColorFormat::Named)
}

/// Options of [`ColorValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorOptions {
    pub required: bool,
    /// Accepted notations; empty accepts all
    pub formats: Vec<ColorFormat>,
    pub allow_alpha: bool,
    /// When set, only these colors are accepted
    pub whitelist: Vec<String>,
    pub blacklist: Vec<String>,
    pub casing: Casing,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub default_value: Option<String>,
    pub messages: MessageOverrides,
}

impl Default for ColorOptions {
    fn default() -> Self {
        Self {
            required: true,
            formats: Vec::new(),
            allow_alpha: true,
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            casing: Casing::None,
            transform: None,
            default_value: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl ColorOptions {
    setters! {
        required: bool,
        formats: Vec<ColorFormat>,
        allow_alpha: bool,
        whitelist: Vec<String>,
        blacklist: Vec<String>,
        casing: Casing,
        transform: Transform,
        default_value: Option<String>,
        messages: MessageOverrides,
    }
}

/// Normalized form used for list comparison.
fn color_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// CSS color validator.
#[derive(Debug, Clone, Default)]
pub struct ColorValidator {
    options: ColorOptions,
}

impl ColorValidator {
    pub fn new(options: ColorOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ColorOptions {
        &self.options
    }
}

impl Validator for ColorValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "color"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, opts.casing)
            .transform(opts.transform.as_ref())
            .default_value(opts.default_value.as_deref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let Some(format) = detect_color_format(&value) else {
            return Err(reporter.error("invalid", params![]));
        };

        let key = color_key(&value);
        let listed = |list: &[String]| list.iter().any(|entry| color_key(entry) == key);

        RuleChain::<ColorFormat>::new()
            .add_if(
                !opts.formats.is_empty(),
                "format",
                params!["formats" => join(&opts.formats)],
                |f| opts.formats.contains(f),
            )
            .add_if(!opts.allow_alpha, "alpha", params![], |f| !f.has_alpha())
            .add_if(!opts.whitelist.is_empty(), "notInWhitelist", params![], |_| {
                listed(&opts.whitelist)
            })
            .add_if(!opts.blacklist.is_empty(), "blacklisted", params![], |_| {
                !listed(&opts.blacklist)
            })
            .check(&format, &reporter)?;

        Ok(Some(value))
    }
}
