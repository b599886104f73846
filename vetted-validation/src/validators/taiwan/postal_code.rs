// Taiwan postal code (郵遞區號) validator

use crate::messages::Reporter;
use crate::validators::prepare;
use crate::{
    Casing, Input, MessageOverrides, RuleChain, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationResult, Validator,
};
use serde::Deserialize;
use vetted_i18n::Locale;

/// Three-digit district prefixes by city or county, as inclusive ranges.
const DISTRICTS: &[(&str, &[(u16, u16)])] = &[
    ("Taipei City", &[(100, 100), (103, 106), (108, 108), (110, 112), (114, 116)]),
    ("Keelung City", &[(200, 206)]),
    ("Lienchiang County", &[(209, 212)]),
    (
        "New Taipei City",
        &[
            (207, 208),
            (220, 224),
            (226, 228),
            (231, 239),
            (241, 244),
            (247, 249),
            (251, 253),
        ],
    ),
    ("Yilan County", &[(260, 270), (272, 272)]),
    ("Hsinchu", &[(300, 300), (302, 308), (310, 315)]),
    ("Taoyuan City", &[(320, 320), (324, 328), (330, 330), (333, 338)]),
    ("Miaoli County", &[(350, 354), (356, 358), (360, 369)]),
    (
        "Taichung City",
        &[
            (400, 404),
            (406, 408),
            (411, 414),
            (420, 424),
            (426, 429),
            (432, 439),
        ],
    ),
    ("Changhua County", &[(500, 500), (502, 516), (520, 528), (530, 530)]),
    ("Nantou County", &[(540, 542), (544, 546), (551, 553), (555, 558)]),
    ("Chiayi", &[(600, 600), (602, 608), (611, 616), (621, 625)]),
    ("Yunlin County", &[(630, 638), (640, 640), (643, 643), (646, 649), (651, 655)]),
    (
        "Tainan City",
        &[
            (700, 702),
            (704, 704),
            (708, 727),
            (730, 737),
            (741, 745),
        ],
    ),
    (
        "Kaohsiung City",
        &[
            (800, 807),
            (811, 815),
            (820, 833),
            (840, 840),
            (842, 849),
            (851, 852),
        ],
    ),
    ("South China Sea Islands", &[(817, 817), (819, 819)]),
    ("Penghu County", &[(880, 885)]),
    ("Kinmen County", &[(890, 894), (896, 896)]),
    (
        "Pingtung County",
        &[
            (900, 909),
            (911, 913),
            (920, 929),
            (931, 932),
            (940, 947),
        ],
    ),
    ("Taitung County", &[(950, 959), (961, 966)]),
    ("Hualien County", &[(970, 979), (981, 983)]),
];

/// Suffix ranges that differ from the defaults: prefix, 5-digit range, 6-digit range.
const SUFFIX_OVERRIDES: &[(u16, (u32, u32), (u32, u32))] = &[
    (100, (1, 60), (1, 600)),
    (110, (1, 80), (1, 800)),
    (300, (1, 90), (1, 900)),
    (800, (1, 75), (1, 750)),
];

const DEFAULT_FIVE_DIGIT_SUFFIX: (u32, u32) = (1, 99);
const DEFAULT_SIX_DIGIT_SUFFIX: (u32, u32) = (1, 999);

/// City or county of a three-digit district prefix.
pub fn postal_city(prefix: &str) -> Option<&'static str> {
    let prefix: u16 = prefix.get(..3)?.parse().ok()?;
    DISTRICTS
        .iter()
        .find(|(_, ranges)| {
            ranges
                .iter()
                .any(|(start, end)| (*start..=*end).contains(&prefix))
        })
        .map(|(city, _)| *city)
}

/// Valid suffix range of a prefix for a 5- or 6-digit code.
pub fn suffix_range(prefix: u16, length: usize) -> Option<(u32, u32)> {
    let overrides = SUFFIX_OVERRIDES.iter().find(|(p, _, _)| *p == prefix);
    match length {
        5 => Some(overrides.map_or(DEFAULT_FIVE_DIGIT_SUFFIX, |(_, five, _)| *five)),
        6 => Some(overrides.map_or(DEFAULT_SIX_DIGIT_SUFFIX, |(_, _, six)| *six)),
        _ => None,
    }
}

/// Accepted code lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PostalFormat {
    #[serde(rename = "3")]
    Three,
    /// 3+2, superseded by 3+3 in 2020
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "3+5")]
    ThreeOrFive,
    #[default]
    #[serde(rename = "3+6")]
    ThreeOrSix,
    #[serde(rename = "5+6")]
    FiveOrSix,
    #[serde(rename = "all")]
    All,
}

impl PostalFormat {
    pub fn accepts(&self, length: usize) -> bool {
        match self {
            PostalFormat::Three => length == 3,
            PostalFormat::Five => length == 5,
            PostalFormat::Six => length == 6,
            PostalFormat::ThreeOrFive => matches!(length, 3 | 5),
            PostalFormat::ThreeOrSix => matches!(length, 3 | 6),
            PostalFormat::FiveOrSix => matches!(length, 5 | 6),
            PostalFormat::All => matches!(length, 3 | 5 | 6),
        }
    }

    /// Message code for a length this format does not accept.
    fn rejection(&self, length: usize) -> &'static str {
        match self {
            PostalFormat::Three => "format3Only",
            PostalFormat::Five => "format5Only",
            PostalFormat::Six => "format6Only",
            PostalFormat::ThreeOrSix if length == 5 => "deprecated5Digit",
            _ => "invalidFormat",
        }
    }
}

/// Options of [`PostalCodeValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostalCodeOptions {
    pub required: bool,
    pub format: PostalFormat,
    /// Accept `-` and spaces between the prefix and suffix
    pub allow_dashes: bool,
    /// Prefix must be a known district
    pub strict_validation: bool,
    /// Suffix must fall in the prefix's range
    pub strict_suffix_validation: bool,
    pub allowed_prefixes: Vec<String>,
    pub blocked_prefixes: Vec<String>,
    /// Log a deprecation notice for accepted 5-digit codes
    pub warn_5_digit: bool,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for PostalCodeOptions {
    fn default() -> Self {
        Self {
            required: true,
            format: PostalFormat::ThreeOrSix,
            allow_dashes: true,
            strict_validation: true,
            strict_suffix_validation: false,
            allowed_prefixes: Vec::new(),
            blocked_prefixes: Vec::new(),
            warn_5_digit: true,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl PostalCodeOptions {
    setters! {
        required: bool,
        format: PostalFormat,
        allow_dashes: bool,
        strict_validation: bool,
        strict_suffix_validation: bool,
        allowed_prefixes: Vec<String>,
        blocked_prefixes: Vec<String>,
        warn_5_digit: bool,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// 3-, 5- or 6-digit code with a known district prefix.
pub fn is_valid_postal_code(code: &str) -> bool {
    let options = PostalCodeOptions::default()
        .format(PostalFormat::All)
        .warn_5_digit(false);
    PostalCodeValidator::new(options)
        .validate_with(&Input::from(code), &ValidationContext::for_locale(Locale::en()))
        .is_ok_and(|value| value.is_some())
}

/// A code split into its district prefix and optional suffix.
#[derive(Debug, Clone, Copy)]
struct PostalCode<'a> {
    digits: &'a str,
    prefix: u16,
}

impl PostalCode<'_> {
    fn suffix(&self) -> Option<u32> {
        self.digits.get(3..).filter(|s| !s.is_empty())?.parse().ok()
    }
}

/// Postal code validator. Separators are removed from the output.
#[derive(Debug, Clone, Default)]
pub struct PostalCodeValidator {
    options: PostalCodeOptions,
}

impl PostalCodeValidator {
    pub fn new(options: PostalCodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PostalCodeOptions {
        &self.options
    }
}

impl Validator for PostalCodeValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "postalCode"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let has_separator = value.contains(['-', ' ']);
        let digits: String = value.chars().filter(|c| !matches!(c, '-' | ' ')).collect();
        if (has_separator && !opts.allow_dashes)
            || digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(reporter.error("invalid", params![]));
        }

        let length = digits.len();
        if !matches!(length, 3 | 5 | 6) {
            return Err(reporter.error("invalidFormat", params![]));
        }
        if !opts.format.accepts(length) {
            return Err(reporter.error(opts.format.rejection(length), params![]));
        }

        let code = PostalCode {
            digits: &digits,
            prefix: digits[..3].parse().unwrap_or_default(),
        };
        let prefix_text = &digits[..3];
        let listed = |list: &[String]| list.iter().any(|p| p.trim() == prefix_text);

        RuleChain::<PostalCode<'_>>::new()
            .add_with("invalidRange", params!["prefix" => prefix_text], |c| {
                (100..=999).contains(&c.prefix)
            })
            .add_if(
                opts.strict_validation,
                "invalidPrefix",
                params!["prefix" => prefix_text],
                |c| postal_city(c.digits).is_some(),
            )
            .add_if(
                !opts.allowed_prefixes.is_empty(),
                "invalidPrefix",
                params!["prefix" => prefix_text],
                |_| listed(&opts.allowed_prefixes),
            )
            .add_if(
                !opts.blocked_prefixes.is_empty(),
                "invalidPrefix",
                params!["prefix" => prefix_text],
                |_| !listed(&opts.blocked_prefixes),
            )
            .add_if(
                opts.strict_suffix_validation && length > 3,
                "invalidSuffix",
                params!["prefix" => prefix_text],
                |c| {
                    let range = suffix_range(c.prefix, length);
                    c.suffix()
                        .zip(range)
                        .is_some_and(|(s, (min, max))| (min..=max).contains(&s))
                },
            )
            .check(&code, &reporter)?;

        if length == 5 && opts.warn_5_digit {
            vetted_log::warn!(
                target: "vetted::validation",
                { code = digits },
                "5-digit postal codes are deprecated; use the 6-digit format"
            );
        }

        Ok(Some(digits))
    }
}
