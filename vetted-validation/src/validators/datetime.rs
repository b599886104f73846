// Combined date and time validator

use super::temporal::{ClockRules, DayRules, parse_bound, whitelisted};
use super::{compile, first_contained, prepare};
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, OptionsError, RuleChain, TextPipe, Transform, TrimMode,
    ValidationContext, ValidationResult, Validator,
};
use chrono::{DateTime, Local, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

static ISO_DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T(?:[01]\d|2[0-3]):[0-5]\d(?::[0-5]\d(?:\.\d{1,9})?)?(?:Z|[+-]\d{2}:\d{2})?$").unwrap()
});
static UNIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d{1,12}$").unwrap());

/// Accepted datetime layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DateTimeFormat {
    #[default]
    #[serde(rename = "YYYY-MM-DD HH:mm")]
    YearMonthDayHourMinute,
    #[serde(rename = "YYYY-MM-DD HH:mm:ss")]
    YearMonthDayHourMinuteSecond,
    #[serde(rename = "YYYY/MM/DD HH:mm")]
    SlashYearMonthDayHourMinute,
    #[serde(rename = "DD/MM/YYYY HH:mm")]
    DayMonthYearHourMinute,
    #[serde(rename = "MM/DD/YYYY HH:mm")]
    MonthDayYearHourMinute,
    /// ISO 8601 with optional seconds and offset
    #[serde(rename = "ISO")]
    Iso,
    /// RFC 2822 (`Tue, 1 Jul 2003 10:52:37 +0200`)
    #[serde(rename = "RFC")]
    Rfc,
    /// Seconds since the Unix epoch
    #[serde(rename = "UNIX")]
    Unix,
}

impl DateTimeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateTimeFormat::YearMonthDayHourMinute => "YYYY-MM-DD HH:mm",
            DateTimeFormat::YearMonthDayHourMinuteSecond => "YYYY-MM-DD HH:mm:ss",
            DateTimeFormat::SlashYearMonthDayHourMinute => "YYYY/MM/DD HH:mm",
            DateTimeFormat::DayMonthYearHourMinute => "DD/MM/YYYY HH:mm",
            DateTimeFormat::MonthDayYearHourMinute => "MM/DD/YYYY HH:mm",
            DateTimeFormat::Iso => "ISO",
            DateTimeFormat::Rfc => "RFC",
            DateTimeFormat::Unix => "UNIX",
        }
    }

    /// Parse `value` strictly in this layout.
    ///
    /// Values with an offset are converted to local wall-clock time.
    pub fn parse(&self, value: &str) -> Option<NaiveDateTime> {
        let layout = |shape: &str, pattern: &str| {
            shaped(value, shape)
                .then(|| NaiveDateTime::parse_from_str(value, pattern).ok())
                .flatten()
        };
        match self {
            DateTimeFormat::YearMonthDayHourMinute => layout("dddd-dd-dd dd:dd", "%Y-%m-%d %H:%M"),
            DateTimeFormat::YearMonthDayHourMinuteSecond => {
                layout("dddd-dd-dd dd:dd:dd", "%Y-%m-%d %H:%M:%S")
            }
            DateTimeFormat::SlashYearMonthDayHourMinute => {
                layout("dddd/dd/dd dd:dd", "%Y/%m/%d %H:%M")
            }
            DateTimeFormat::DayMonthYearHourMinute => layout("dd/dd/dddd dd:dd", "%d/%m/%Y %H:%M"),
            DateTimeFormat::MonthDayYearHourMinute => layout("dd/dd/dddd dd:dd", "%m/%d/%Y %H:%M"),
            DateTimeFormat::Iso => parse_iso(value),
            DateTimeFormat::Rfc => DateTime::parse_from_rfc2822(value)
                .ok()
                .map(|dt| dt.with_timezone(&Local).naive_local()),
            DateTimeFormat::Unix => {
                if !UNIX_REGEX.is_match(value) {
                    return None;
                }
                let seconds: i64 = value.parse().ok()?;
                DateTime::from_timestamp(seconds, 0).map(|dt| dt.with_timezone(&Local).naive_local())
            }
        }
    }
}

impl fmt::Display for DateTimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn shaped(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(v, s)| match s {
            b'd' => v.is_ascii_digit(),
            _ => v == s,
        })
}

fn parse_iso(value: &str) -> Option<NaiveDateTime> {
    if !ISO_DATETIME_REGEX.is_match(value) {
        return None;
    }
    let has_offset = value.ends_with('Z') || value[10..].contains(['+', '-']);
    if has_offset {
        let normalized = if value.as_bytes().get(16) == Some(&b':') {
            value.to_string()
        } else {
            format!("{}:00{}", &value[..16], &value[16..])
        };
        return DateTime::parse_from_rfc3339(&normalized)
            .ok()
            .map(|dt| dt.with_timezone(&Local).naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Options of [`DateTimeValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateTimeOptions {
    pub required: bool,
    pub format: DateTimeFormat,
    /// Earliest value, in `format` or `YYYY-MM-DD HH:mm[:ss]`
    pub min: Option<String>,
    /// Latest value, in `format` or `YYYY-MM-DD HH:mm[:ss]`
    pub max: Option<String>,
    pub min_hour: Option<u32>,
    pub max_hour: Option<u32>,
    pub allowed_hours: Vec<u32>,
    pub minute_step: Option<u32>,
    pub must_be_past: bool,
    pub must_be_future: bool,
    pub must_be_today: bool,
    pub must_not_be_today: bool,
    pub weekdays_only: bool,
    pub weekends_only: bool,
    pub includes: Option<String>,
    pub excludes: Vec<String>,
    pub regex: Option<String>,
    /// Values accepted without any other check
    pub whitelist: Vec<String>,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for DateTimeOptions {
    fn default() -> Self {
        Self {
            required: true,
            format: DateTimeFormat::default(),
            min: None,
            max: None,
            min_hour: None,
            max_hour: None,
            allowed_hours: Vec::new(),
            minute_step: None,
            must_be_past: false,
            must_be_future: false,
            must_be_today: false,
            must_not_be_today: false,
            weekdays_only: false,
            weekends_only: false,
            includes: None,
            excludes: Vec::new(),
            regex: None,
            whitelist: Vec::new(),
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl DateTimeOptions {
    setters! {
        required: bool,
        format: DateTimeFormat,
        min: Option<String>,
        max: Option<String>,
        min_hour: Option<u32>,
        max_hour: Option<u32>,
        allowed_hours: Vec<u32>,
        minute_step: Option<u32>,
        must_be_past: bool,
        must_be_future: bool,
        must_be_today: bool,
        must_not_be_today: bool,
        weekdays_only: bool,
        weekends_only: bool,
        includes: Option<String>,
        excludes: Vec<String>,
        regex: Option<String>,
        whitelist: Vec<String>,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Date and time validator.
#[derive(Debug, Clone)]
pub struct DateTimeValidator {
    options: DateTimeOptions,
    regex: Option<Regex>,
    min: Option<NaiveDateTime>,
    max: Option<NaiveDateTime>,
}

impl DateTimeValidator {
    pub fn try_new(options: DateTimeOptions) -> Result<Self, OptionsError> {
        if options.weekdays_only && options.weekends_only {
            return Err(OptionsError::Conflict(
                "weekdaysOnly and weekendsOnly".to_string(),
            ));
        }
        let format = options.format;
        let parse = |raw: &str| {
            let raw = raw.trim();
            format
                .parse(raw)
                .or_else(|| DateTimeFormat::YearMonthDayHourMinuteSecond.parse(raw))
                .or_else(|| DateTimeFormat::YearMonthDayHourMinute.parse(raw))
        };
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
    pub fn new(options: DateTimeOptions) -> Self {
        match Self::try_new(options.clone()) {
            Ok(validator) => validator,
            Err(err) => {
                vetted_log::error!(target: "vetted::validation", "Ignoring datetime options: {}", err);
                Self {
                    options,
                    regex: None,
                    min: None,
                    max: None,
                }
            }
        }
    }

    pub fn options(&self) -> &DateTimeOptions {
        &self.options
    }
}

impl Default for DateTimeValidator {
    fn default() -> Self {
        Self::new(DateTimeOptions::default())
    }
}

impl Validator for DateTimeValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "datetime"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        if whitelisted(&value, &opts.whitelist) {
            return Ok(Some(value));
        }

        let Some(datetime) = opts.format.parse(&value) else {
            return Err(reporter.error("invalid", params!["format" => opts.format]));
        };

        let excluded = first_contained(&value, &opts.excludes);
        let (min, max) = (self.min, self.max);

        let chain = RuleChain::<NaiveDateTime>::new()
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
                move |dt| min.is_none_or(|min| *dt >= min),
            )
            .add_if(
                max.is_some(),
                "max",
                params!["max" => opts.max.as_deref().unwrap_or_default()],
                move |dt| max.is_none_or(|max| *dt <= max),
            );

        let chain = ClockRules {
            min_hour: opts.min_hour,
            max_hour: opts.max_hour,
            allowed_hours: &opts.allowed_hours,
            minute_step: opts.minute_step,
            second_step: None,
        }
        .apply(chain, |dt: &NaiveDateTime| -> NaiveTime { dt.time() });

        DayRules {
            past: opts.must_be_past,
            future: opts.must_be_future,
            today: opts.must_be_today,
            not_today: opts.must_not_be_today,
            weekdays_only: opts.weekdays_only,
            weekends_only: opts.weekends_only,
        }
        .apply(chain, ctx.now(), |dt| dt.date())
        .check(&datetime, &reporter)?;

        Ok(Some(value))
    }
}
