// Rules shared by the date, time and datetime validators

use crate::{OptionsError, RuleChain};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};

pub(crate) fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Parse a 24-hour bound written as `HH:mm` or `HH:mm:ss`.
pub(crate) fn parse_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Parse an optional min/max option, reporting values that do not parse.
pub(crate) fn parse_bound<T>(
    option: &'static str,
    value: Option<&str>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>, OptionsError> {
    value
        .map(|raw| {
            parse(raw).ok_or_else(|| OptionsError::InvalidValue {
                option,
                value: raw.to_string(),
            })
        })
        .transpose()
}

/// Case-insensitive whitelist membership.
pub(crate) fn whitelisted(value: &str, whitelist: &[String]) -> bool {
    whitelist
        .iter()
        .any(|entry| entry.trim().eq_ignore_ascii_case(value))
}

/// Hour and step constraints on the time of day.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClockRules<'a> {
    pub min_hour: Option<u32>,
    pub max_hour: Option<u32>,
    pub allowed_hours: &'a [u32],
    pub minute_step: Option<u32>,
    pub second_step: Option<u32>,
}

impl<'a> ClockRules<'a> {
    /// Append `minHour`, `maxHour`, `hour`, `minuteStep` and `secondStep`.
    pub fn apply<T: 'a>(
        self,
        chain: RuleChain<'a, T>,
        time_of: fn(&T) -> NaiveTime,
    ) -> RuleChain<'a, T> {
        let min_hour = self.min_hour;
        let max_hour = self.max_hour;
        let allowed = self.allowed_hours;
        let minute_step = self.minute_step.filter(|step| *step > 0);
        let second_step = self.second_step.filter(|step| *step > 0);

        chain
            .add_if(
                min_hour.is_some(),
                "minHour",
                params!["minHour" => min_hour.unwrap_or_default()],
                move |v| min_hour.is_none_or(|h| time_of(v).hour() >= h),
            )
            .add_if(
                max_hour.is_some(),
                "maxHour",
                params!["maxHour" => max_hour.unwrap_or_default()],
                move |v| max_hour.is_none_or(|h| time_of(v).hour() <= h),
            )
            .add_if(
                !allowed.is_empty(),
                "hour",
                params!["hours" => super::join(allowed)],
                move |v| allowed.contains(&time_of(v).hour()),
            )
            .add_if(
                minute_step.is_some(),
                "minuteStep",
                params!["step" => minute_step.unwrap_or_default()],
                move |v| minute_step.is_none_or(|step| time_of(v).minute() % step == 0),
            )
            .add_if(
                second_step.is_some(),
                "secondStep",
                params!["step" => second_step.unwrap_or_default()],
                move |v| second_step.is_none_or(|step| time_of(v).second() % step == 0),
            )
    }
}

/// Checks relative to the current day.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct DayRules {
    pub past: bool,
    pub future: bool,
    pub today: bool,
    pub not_today: bool,
    pub weekdays_only: bool,
    pub weekends_only: bool,
}

impl DayRules {
    /// Append `past`, `future`, `today`, `notToday`, `weekday` and `weekend`.
    ///
    /// `now` is compared against the whole value; day checks use `day_of`.
    pub fn apply<'a, T: PartialOrd + Copy + 'a>(
        self,
        chain: RuleChain<'a, T>,
        now: T,
        day_of: fn(&T) -> NaiveDate,
    ) -> RuleChain<'a, T> {
        let today = day_of(&now);
        chain
            .add_if(self.past, "past", params![], move |v| *v < now)
            .add_if(self.future, "future", params![], move |v| *v > now)
            .add_if(self.today, "today", params![], move |v| day_of(v) == today)
            .add_if(self.not_today, "notToday", params![], move |v| day_of(v) != today)
            .add_if(self.weekdays_only, "weekday", params![], move |v| {
                !is_weekend(day_of(v))
            })
            .add_if(self.weekends_only, "weekend", params![], move |v| {
                is_weekend(day_of(v))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_clock(" 23:59:58 "), NaiveTime::from_hms_opt(23, 59, 58));
        assert_eq!(parse_clock("24:00"), None);
    }

    #[test]
    fn test_parse_bound() {
        assert_eq!(parse_bound("min", Some("10:00"), parse_clock).unwrap(), NaiveTime::from_hms_opt(10, 0, 0));
        assert!(parse_bound("min", None, parse_clock).unwrap().is_none());
        assert!(matches!(
            parse_bound("max", Some("noon"), parse_clock),
            Err(OptionsError::InvalidValue { option: "max", .. })
        ));
    }

    #[test]
    fn test_weekend() {
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert!(is_weekend(saturday));
        assert!(!is_weekend(monday));
    }

    #[test]
    fn test_clock_rules() {
        let chain = ClockRules {
            min_hour: Some(9),
            max_hour: Some(17),
            allowed_hours: &[],
            minute_step: Some(15),
            second_step: None,
        }
        .apply(RuleChain::<NaiveTime>::new(), |t| *t);

        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(chain.first_failure(&at(8, 0)).map(|(c, _)| c), Some("minHour"));
        assert_eq!(chain.first_failure(&at(18, 0)).map(|(c, _)| c), Some("maxHour"));
        assert_eq!(chain.first_failure(&at(10, 20)).map(|(c, _)| c), Some("minuteStep"));
        assert!(chain.first_failure(&at(10, 45)).is_none());
    }

    #[test]
    fn test_day_rules() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let chain = DayRules {
            past: true,
            weekdays_only: true,
            ..DayRules::default()
        }
        .apply(RuleChain::<NaiveDate>::new(), today, |d| *d);

        let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
        assert_eq!(chain.first_failure(&day(5)).map(|(c, _)| c), Some("past"));
        assert_eq!(chain.first_failure(&day(2)).map(|(c, _)| c), Some("weekday"));
        assert!(chain.first_failure(&day(4)).is_none());
    }
}
