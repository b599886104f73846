// Time-of-day validator

use super::temporal::{ClockRules, parse_bound, parse_clock, whitelisted};
use super::{compile, first_contained, prepare};
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, OptionsError, RuleChain, TextPipe, Transform, TrimMode,
    ValidationContext, ValidationResult, Validator,
};
use chrono::NaiveTime;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::fmt;

static HH_MM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<h>[01]\d|2[0-3]):(?P<m>[0-5]\d)$").unwrap());
static HH_MM_SS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<h>[01]\d|2[0-3]):(?P<m>[0-5]\d):(?P<s>[0-5]\d)$").unwrap()
});
static HH_MM_A: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<h>0[1-9]|1[0-2]):(?P<m>[0-5]\d) ?(?P<a>AM|PM)$").unwrap()
});
static HH_MM_SS_A: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<h>0[1-9]|1[0-2]):(?P<m>[0-5]\d):(?P<s>[0-5]\d) ?(?P<a>AM|PM)$").unwrap()
});
static H_MM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<h>1?\d|2[0-3]):(?P<m>[0-5]\d)$").unwrap());
static H_MM_A: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?P<h>[1-9]|1[0-2]):(?P<m>[0-5]\d) ?(?P<a>AM|PM)$").unwrap()
});

/// Accepted time layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "HH:mm")]
    HourMinute,
    #[serde(rename = "HH:mm:ss")]
    HourMinuteSecond,
    #[serde(rename = "hh:mm A")]
    HourMinute12,
    #[serde(rename = "hh:mm:ss A")]
    HourMinuteSecond12,
    #[serde(rename = "H:mm")]
    LooseHourMinute,
    #[serde(rename = "h:mm A")]
    LooseHourMinute12,
}

impl TimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::HourMinute => "HH:mm",
            TimeFormat::HourMinuteSecond => "HH:mm:ss",
            TimeFormat::HourMinute12 => "hh:mm A",
            TimeFormat::HourMinuteSecond12 => "hh:mm:ss A",
            TimeFormat::LooseHourMinute => "H:mm",
            TimeFormat::LooseHourMinute12 => "h:mm A",
        }
    }

    /// Whether the layout carries an AM/PM marker.
    pub fn is_12_hour(&self) -> bool {
        matches!(
            self,
            TimeFormat::HourMinute12 | TimeFormat::HourMinuteSecond12 | TimeFormat::LooseHourMinute12
        )
    }

    fn regex(&self) -> &'static Regex {
        match self {
            TimeFormat::HourMinute => &HH_MM,
            TimeFormat::HourMinuteSecond => &HH_MM_SS,
            TimeFormat::HourMinute12 => &HH_MM_A,
            TimeFormat::HourMinuteSecond12 => &HH_MM_SS_A,
            TimeFormat::LooseHourMinute => &H_MM,
            TimeFormat::LooseHourMinute12 => &H_MM_A,
        }
    }

    /// Parse `value` strictly in this layout.
    pub fn parse(&self, value: &str) -> Option<NaiveTime> {
        let caps = self.regex().captures(value)?;
        let field = |caps: &Captures<'_>, name: &str| -> Option<u32> {
            caps.name(name).map_or(Some(0), |m| m.as_str().parse().ok())
        };
        let mut hour = field(&caps, "h")?;
        let minute = field(&caps, "m")?;
        let second = field(&caps, "s")?;
        if let Some(meridiem) = caps.name("a") {
            let pm = meridiem.as_str().eq_ignore_ascii_case("PM");
            hour = match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
        }
        NaiveTime::from_hms_opt(hour, minute, second)
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options of [`TimeValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeOptions {
    pub required: bool,
    pub format: TimeFormat,
    /// Earliest time, `HH:mm[:ss]` or in `format`
    pub min: Option<String>,
    /// Latest time, `HH:mm[:ss]` or in `format`
    pub max: Option<String>,
    pub min_hour: Option<u32>,
    pub max_hour: Option<u32>,
    pub allowed_hours: Vec<u32>,
    pub minute_step: Option<u32>,
    pub second_step: Option<u32>,
    pub includes: Option<String>,
    pub excludes: Vec<String>,
    pub regex: Option<String>,
    /// Values accepted without any other check
    pub whitelist: Vec<String>,
    /// Accept whitelisted values only
    pub whitelist_only: bool,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for TimeOptions {
    fn default() -> Self {
        Self {
            required: true,
            format: TimeFormat::default(),
            min: None,
            max: None,
            min_hour: None,
            max_hour: None,
            allowed_hours: Vec::new(),
            minute_step: None,
            second_step: None,
            includes: None,
            excludes: Vec::new(),
            regex: None,
            whitelist: Vec::new(),
            whitelist_only: false,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl TimeOptions {
    setters! {
        required: bool,
        format: TimeFormat,
        min: Option<String>,
        max: Option<String>,
        min_hour: Option<u32>,
        max_hour: Option<u32>,
        allowed_hours: Vec<u32>,
        minute_step: Option<u32>,
        second_step: Option<u32>,
        includes: Option<String>,
        excludes: Vec<String>,
        regex: Option<String>,
        whitelist: Vec<String>,
        whitelist_only: bool,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Time-of-day validator.
#[derive(Debug, Clone)]
pub struct TimeValidator {
    options: TimeOptions,
    regex: Option<Regex>,
    min: Option<NaiveTime>,
    max: Option<NaiveTime>,
}

impl TimeValidator {
    pub fn try_new(options: TimeOptions) -> Result<Self, OptionsError> {
        let format = options.format;
        let parse = |raw: &str| parse_clock(raw).or_else(|| format.parse(raw.trim()));
        let min = parse_bound("min", options.min.as_deref(), &parse)?;
        let max = parse_bound("max", options.max.as_deref(), &parse)?;
        let regex = compile("regex", options.regex.as_deref())?;
        Ok(Self {
            options,
            regex,
            min,
            max,
        })
    }

    /// Build the validator; invalid patterns or bounds are logged and ignored.
    pub fn new(options: TimeOptions) -> Self {
        match Self::try_new(options.clone()) {
            Ok(validator) => validator,
            Err(err) => {
                vetted_log::error!(target: "vetted::validation", "Ignoring time options: {}", err);
                Self {
                    options,
                    regex: None,
                    min: None,
                    max: None,
                }
            }
        }
    }

    pub fn options(&self) -> &TimeOptions {
        &self.options
    }
}

impl Default for TimeValidator {
    fn default() -> Self {
        Self::new(TimeOptions::default())
    }
}

impl Validator for TimeValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "time"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let casing = if opts.format.is_12_hour() {
            Casing::Upper
        } else {
            Casing::None
        };
        let pipe = TextPipe::new(TrimMode::Trim, casing).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        if whitelisted(&value, &opts.whitelist) {
            return Ok(Some(value));
        }
        if opts.whitelist_only {
            return Err(reporter.error("notInWhitelist", params![]));
        }

        let Some(time) = opts.format.parse(&value) else {
            return Err(reporter.error("invalid", params!["format" => opts.format]));
        };

        let excluded = first_contained(&value, &opts.excludes);
        let (min, max) = (self.min, self.max);

        let chain = RuleChain::<NaiveTime>::new()
            .add_if(self.regex.is_some(), "pattern", params![], |_| {
                self.regex.as_ref().is_none_or(|re| re.is_match(&value))
            })
            .add_if(
                opts.includes.is_some(),
                "includes",
                params!["includes" => opts.includes.as_deref().unwrap_or_default()],
                |_| opts.includes.as_deref().is_none_or(|s| value.contains(s)),
            )
            .add_if(
                excluded.is_some(),
                "excludes",
                params!["excludes" => excluded.unwrap_or_default()],
                |_| excluded.is_none(),
            )
            .add_if(
                min.is_some(),
                "min",
                params!["min" => opts.min.as_deref().unwrap_or_default()],
                move |t| min.is_none_or(|min| *t >= min),
            )
            .add_if(
                max.is_some(),
                "max",
                params!["max" => opts.max.as_deref().unwrap_or_default()],
                move |t| max.is_none_or(|max| *t <= max),
            );

        ClockRules {
            min_hour: opts.min_hour,
            max_hour: opts.max_hour,
            allowed_hours: &opts.allowed_hours,
            minute_step: opts.minute_step,
            second_step: opts.second_step,
        }
        .apply(chain, |t| *t)
        .check(&time, &reporter)?;

        Ok(Some(value))
    }
}
