// Calendar date validator

use super::temporal::{DayRules, parse_bound};
use super::{first_contained, prepare};
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, OptionsError, RuleChain, TextPipe, Transform, TrimMode,
    ValidationContext, ValidationResult, Validator,
};
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fmt;

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(?:T(?:[01]\d|2[0-3]):[0-5]\d(?::[0-5]\d(?:\.\d+)?)?(?:Z|[+-]\d{2}:\d{2})?)?$").unwrap()
});

/// Accepted date layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "YYYY-MM-DD")]
    YearMonthDay,
    #[serde(rename = "YYYY/MM/DD")]
    YearMonthDaySlash,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    #[serde(rename = "YYYYMMDD")]
    Compact,
    #[serde(rename = "YYYY-MM")]
    YearMonth,
    /// ISO 8601 date, optionally followed by a time
    #[serde(rename = "ISO")]
    Iso,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "YYYY-MM-DD",
            DateFormat::YearMonthDaySlash => "YYYY/MM/DD",
            DateFormat::DayMonthYear => "DD/MM/YYYY",
            DateFormat::MonthDayYear => "MM/DD/YYYY",
            DateFormat::Compact => "YYYYMMDD",
            DateFormat::YearMonth => "YYYY-MM",
            DateFormat::Iso => "ISO",
        }
    }

    /// Parse `value` strictly in this layout.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        match self {
            DateFormat::YearMonthDay => {
                shaped(value, "dddd-dd-dd").then(|| strict(value, "%Y-%m-%d"))?
            }
            DateFormat::YearMonthDaySlash => {
                shaped(value, "dddd/dd/dd").then(|| strict(value, "%Y/%m/%d"))?
            }
            DateFormat::DayMonthYear => {
                shaped(value, "dd/dd/dddd").then(|| strict(value, "%d/%m/%Y"))?
            }
            DateFormat::MonthDayYear => {
                shaped(value, "dd/dd/dddd").then(|| strict(value, "%m/%d/%Y"))?
            }
            DateFormat::Compact => shaped(value, "dddddddd").then(|| {
                strict(
                    &format!("{}-{}-{}", &value[..4], &value[4..6], &value[6..]),
                    "%Y-%m-%d",
                )
            })?,
            DateFormat::YearMonth => shaped(value, "dddd-dd")
                .then(|| strict(&format!("{}-01", value), "%Y-%m-%d"))?,
            DateFormat::Iso => {
                if !ISO_DATE_REGEX.is_match(value) {
                    return None;
                }
                if value.len() > 10 && (value.ends_with('Z') || value[10..].contains(['+', '-'])) {
                    DateTime::parse_from_rfc3339(&with_seconds(value)).ok()?;
                }
                strict(&value[..10], "%Y-%m-%d")
            }
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `value` has digits where `shape` has `d` and the same separators elsewhere.
fn shaped(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(v, s)| match s {
            b'd' => v.is_ascii_digit(),
            _ => v == s,
        })
}

fn strict(value: &str, pattern: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, pattern).ok()
}

/// RFC 3339 requires seconds; ISO 8601 allows `THH:mm`.
fn with_seconds(value: &str) -> String {
    let time = &value[11..];
    if time.len() >= 5 && time.as_bytes().get(5) != Some(&b':') {
        format!("{}:00{}", &value[..16], &value[16..])
    } else {
        value.to_string()
    }
}

/// Options of [`DateValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateOptions {
    pub required: bool,
    pub format: DateFormat,
    /// Earliest accepted date, in `format` or `YYYY-MM-DD`
    pub min: Option<String>,
    /// Latest accepted date, in `format` or `YYYY-MM-DD`
    pub max: Option<String>,
    pub includes: Option<String>,
    pub excludes: Vec<String>,
    pub must_be_past: bool,
    pub must_be_future: bool,
    pub must_be_today: bool,
    pub must_not_be_today: bool,
    pub weekdays_only: bool,
    pub weekends_only: bool,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for DateOptions {
    fn default() -> Self {
        Self {
            required: true,
            format: DateFormat::default(),
            min: None,
            max: None,
            includes: None,
            excludes: Vec::new(),
            must_be_past: false,
            must_be_future: false,
            must_be_today: false,
            must_not_be_today: false,
            weekdays_only: false,
            weekends_only: false,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl DateOptions {
    setters! {
        required: bool,
        format: DateFormat,
        min: Option<String>,
        max: Option<String>,
        includes: Option<String>,
        excludes: Vec<String>,
        must_be_past: bool,
        must_be_future: bool,
        must_be_today: bool,
        must_not_be_today: bool,
        weekdays_only: bool,
        weekends_only: bool,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Calendar date validator.
#[derive(Debug, Clone)]
pub struct DateValidator {
    options: DateOptions,
    min: Option<NaiveDate>,
    max: Option<NaiveDate>,
}

impl DateValidator {
    pub fn try_new(options: DateOptions) -> Result<Self, OptionsError> {
        if options.weekdays_only && options.weekends_only {
            return Err(OptionsError::Conflict(
                "weekdaysOnly and weekendsOnly".to_string(),
            ));
        }
        let format = options.format;
        let parse = |raw: &str| {
            let raw = raw.trim();
            format.parse(raw).or_else(|| DateFormat::YearMonthDay.parse(raw))
        };
        let min = parse_bound("min", options.min.as_deref(), &parse)?;
        let max = parse_bound("max", options.max.as_deref(), &parse)?;
        Ok(Self { options, min, max })
    }

    /// Build the validator; bounds that do not parse are logged and ignored.
    pub fn new(options: DateOptions) -> Self {
        match Self::try_new(options.clone()) {
            Ok(validator) => validator,
            Err(err) => {
                vetted_log::error!(target: "vetted::validation", "Ignoring date bounds: {}", err);
                Self {
                    options,
                    min: None,
                    max: None,
                }
            }
        }
    }

    pub fn options(&self) -> &DateOptions {
        &self.options
    }
}

impl Default for DateValidator {
    fn default() -> Self {
        Self::new(DateOptions::default())
    }
}

impl Validator for DateValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "date"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let Some(date) = opts.format.parse(&value) else {
            return Err(reporter.error("invalid", params!["format" => opts.format]));
        };

        let excluded = first_contained(&value, &opts.excludes);
        let (min, max) = (self.min, self.max);
        let min_text = opts.min.as_deref().unwrap_or_default();
        let max_text = opts.max.as_deref().unwrap_or_default();

        let chain = RuleChain::<NaiveDate>::new()
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
            .add_if(min.is_some(), "min", params!["min" => min_text], move |d| {
                min.is_none_or(|min| *d >= min)
            })
            .add_if(max.is_some(), "max", params!["max" => max_text], move |d| {
                max.is_none_or(|max| *d <= max)
            });

        DayRules {
            past: opts.must_be_past,
            future: opts.must_be_future,
            today: opts.must_be_today,
            not_today: opts.must_not_be_today,
            weekdays_only: opts.weekdays_only,
            weekends_only: opts.weekends_only,
        }
        .apply(chain, ctx.now().date(), |d| *d)
        .check(&date, &reporter)?;

        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vetted_i18n::Locale;

    fn ctx() -> ValidationContext {
        let now = NaiveDate::from_ymd_opt(2024, 6, 5)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        ValidationContext::for_locale(Locale::en()).with_now(now)
    }

    fn check(validator: &DateValidator, input: &str) -> ValidationResult<String> {
        validator.validate_with(&Input::from(input), &ctx())
    }

    fn code(validator: &DateValidator, input: &str) -> &'static str {
        check(validator, input).unwrap_err().code
    }

    #[test]
    fn test_formats() {
        let cases = [
            (DateFormat::YearMonthDay, "2024-02-29", "2024-2-29"),
            (DateFormat::YearMonthDaySlash, "2024/02/29", "2024-02-29"),
            (DateFormat::DayMonthYear, "29/02/2024", "02/29/2024"),
            (DateFormat::MonthDayYear, "02/29/2024", "29/02/2024"),
            (DateFormat::Compact, "20240229", "2024022"),
            (DateFormat::YearMonth, "2024-02", "2024-13"),
            (DateFormat::Iso, "2024-02-29T08:30:00Z", "2024-02-29T25:00"),
        ];
        for (format, good, bad) in cases {
            assert_eq!(format.parse(good), NaiveDate::from_ymd_opt(2024, 2, if format == DateFormat::YearMonth { 1 } else { 29 }), "{format} {good}");
            assert_eq!(format.parse(bad), None, "{format} {bad}");
        }
        assert!(DateFormat::Iso.parse("2024-02-29T08:30+08:00").is_some());
        assert!(DateFormat::Iso.parse("2024-02-29").is_some());
    }

    #[test]
    fn test_impossible_dates() {
        let validator = DateValidator::default();
        let error = check(&validator, "2023-02-29").unwrap_err();
        assert_eq!(error.code, "invalid");
        assert_eq!(error.param("format"), Some("YYYY-MM-DD"));
        assert_eq!(check(&validator, " 2024-02-29 "), Ok(Some("2024-02-29".to_string())));
    }

    #[test]
    fn test_bounds() {
        let validator = DateValidator::try_new(
            DateOptions::default()
                .format(DateFormat::DayMonthYear)
                .min("01/01/2024")
                .max("2024-12-31"),
        )
        .unwrap();
        let error = check(&validator, "31/12/2023").unwrap_err();
        assert_eq!(error.code, "min");
        assert_eq!(error.param("min"), Some("01/01/2024"));
        assert_eq!(code(&validator, "01/01/2025"), "max");
        assert!(check(&validator, "15/06/2024").is_ok());

        assert!(matches!(
            DateValidator::try_new(DateOptions::default().min("soon")),
            Err(OptionsError::InvalidValue { option: "min", .. })
        ));
    }

    #[test]
    fn test_relative_checks_use_context_clock() {
        let past = DateValidator::new(DateOptions::default().must_be_past(true));
        assert!(check(&past, "2024-06-04").is_ok());
        assert_eq!(code(&past, "2024-06-05"), "past");

        let future = DateValidator::new(DateOptions::default().must_be_future(true));
        assert_eq!(code(&future, "2024-06-05"), "future");

        let today = DateValidator::new(DateOptions::default().must_be_today(true));
        assert!(check(&today, "2024-06-05").is_ok());
        assert_eq!(code(&today, "2024-06-06"), "today");

        let not_today = DateValidator::new(DateOptions::default().must_not_be_today(true));
        assert_eq!(code(&not_today, "2024-06-05"), "notToday");
    }

    #[test]
    fn test_weekdays_and_weekends() {
        let weekdays = DateValidator::new(DateOptions::default().weekdays_only(true));
        assert_eq!(code(&weekdays, "2024-06-08"), "weekday");
        assert!(check(&weekdays, "2024-06-07").is_ok());

        let weekends = DateValidator::new(DateOptions::default().weekends_only(true));
        assert_eq!(code(&weekends, "2024-06-07"), "weekend");

        assert!(DateValidator::try_new(
            DateOptions::default().weekdays_only(true).weekends_only(true)
        )
        .is_err());
    }

    #[test]
    fn test_content_before_bounds() {
        let validator = DateValidator::new(
            DateOptions::default()
                .includes("2024")
                .excludes(["-13"])
                .max("2000-01-01"),
        );
        assert_eq!(code(&validator, "2023-05-01"), "includes");
        assert_eq!(code(&validator, "2024-05-01"), "max");
    }
}
