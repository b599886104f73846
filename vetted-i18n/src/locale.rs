//! Locale tags
//!
//! Parsing and matching of the BCP 47 subset used to key message catalogs.

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a locale (language + optional script and region).
///
/// # Examples
///
/// ```
/// use vetted_i18n::Locale;
/// use std::str::FromStr;
///
/// let en = Locale::new("en", None::<&str>);
/// let zh_tw = Locale::from_str("zh_tw").unwrap();
/// assert_eq!(zh_tw.tag(), "zh-TW");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    /// Language code (ISO 639-1, e.g. "en", "zh")
    pub language: String,
    /// Optional region code (ISO 3166-1, e.g. "TW", "US")
    pub region: Option<String>,
    /// Optional script (e.g. "Hant")
    pub script: Option<String>,
}

impl Locale {
    /// Create a new locale.
    pub fn new(language: impl Into<String>, region: Option<impl Into<String>>) -> Self {
        Self {
            language: language.into().to_lowercase(),
            region: region.map(|r| r.into().to_uppercase()),
            script: None,
        }
    }

    /// Parse from a BCP 47 tag (`en`, `zh-TW`, `zh-Hant-TW`, `zh_tw`).
    pub fn parse(tag: &str) -> Result<Self> {
        let parts: Vec<&str> = tag.trim().split(['-', '_']).collect();

        let language = parts[0].to_lowercase();
        if language.len() < 2
            || language.len() > 3
            || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(I18nError::InvalidLocale(tag.to_string()));
        }

        let mut script = None;
        let mut region = None;

        for part in parts.iter().skip(1) {
            if part.len() == 4 && part.chars().all(|c| c.is_ascii_alphabetic()) {
                script = Some(title_case(part));
            } else if part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()) {
                region = Some(part.to_uppercase());
            } else if part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()) {
                region = Some(part.to_string());
            } else {
                return Err(I18nError::InvalidLocale(tag.to_string()));
            }
        }

        Ok(Self {
            language,
            script,
            region,
        })
    }

    /// Get the language tag (e.g. "zh-TW").
    pub fn tag(&self) -> String {
        let mut tag = self.language.clone();
        if let Some(ref script) = self.script {
            tag.push('-');
            tag.push_str(script);
        }
        if let Some(ref region) = self.region {
            tag.push('-');
            tag.push_str(region);
        }
        tag
    }

    /// Same locale without region.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: self.script.clone(),
            region: None,
        }
    }

    /// Same locale without script (`zh-Hant-TW` -> `zh-TW`).
    pub fn without_script(&self) -> Self {
        Self {
            language: self.language.clone(),
            script: None,
            region: self.region.clone(),
        }
    }

    /// Calculate match score (higher is better).
    ///
    /// - 100: exact match
    /// - 50: language + region
    /// - 25: language + script
    /// - 10: language only
    /// - 0: different language
    pub fn match_score(&self, other: &Locale) -> u32 {
        if self.language != other.language {
            return 0;
        }
        if self == other {
            return 100;
        }

        let mut score = 10;
        if self.region.is_some() && self.region == other.region {
            score += 40;
        }
        if self.script.is_some() && self.script == other.script {
            score += 15;
        }
        score
    }

    /// English.
    pub fn en() -> Self {
        Self::new("en", None::<&str>)
    }

    /// Traditional Chinese as used in Taiwan.
    pub fn zh_tw() -> Self {
        Self::new("zh", Some("TW"))
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Locale::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = I18nError;

    fn try_from(value: String) -> Result<Self> {
        Locale::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag()
    }
}

/// Find the best matching locale using scores.
pub fn best_match<'a>(requested: &Locale, available: &'a [Locale]) -> Option<&'a Locale> {
    available
        .iter()
        .map(|locale| (locale, locale.match_score(requested)))
        .filter(|(_, score)| *score > 0)
        .fold(None, |best: Option<(&Locale, u32)>, (locale, score)| match best {
            Some((_, best_score)) if best_score >= score => best,
            _ => Some((locale, score)),
        })
        .map(|(locale, _)| locale)
}
