// Validation traits and the input model

use crate::{ValidationError, ValidationResult};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use vetted_i18n::Locale;

/// Metadata of an uploaded file. The content itself is never inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// File name including extension
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Declared MIME type (`image/png`)
    #[serde(default, alias = "type")]
    pub mime_type: String,
}

impl FileInfo {
    /// Create file metadata.
    pub fn new(name: impl Into<String>, size: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
        }
    }

    /// Lower-cased extension without the dot, if any.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

/// A raw value handed to a validator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Input {
    /// Absent value
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    File(FileInfo),
}

impl Input {
    /// `Null` or the empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Input::Null => true,
            Input::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// String form of scalar inputs; `None` for `Null` and files.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Input::Text(s) => Some(s.clone()),
            Input::Number(n) => Some(n.to_string()),
            Input::Bool(b) => Some(b.to_string()),
            Input::Null | Input::File(_) => None,
        }
    }

    /// Borrow the text of a `Text` input.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Input::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Input::Text(value.to_string())
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Input::Text(value)
    }
}

impl From<&String> for Input {
    fn from(value: &String) -> Self {
        Input::Text(value.clone())
    }
}

impl From<bool> for Input {
    fn from(value: bool) -> Self {
        Input::Bool(value)
    }
}

impl From<f64> for Input {
    fn from(value: f64) -> Self {
        Input::Number(value)
    }
}

impl From<i32> for Input {
    fn from(value: i32) -> Self {
        Input::Number(f64::from(value))
    }
}

impl From<i64> for Input {
    fn from(value: i64) -> Self {
        Input::Number(value as f64)
    }
}

impl From<u32> for Input {
    fn from(value: u32) -> Self {
        Input::Number(f64::from(value))
    }
}

impl From<FileInfo> for Input {
    fn from(value: FileInfo) -> Self {
        Input::File(value)
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(value: Option<T>) -> Self {
        value.map_or(Input::Null, Into::into)
    }
}

/// Per-call settings: the locale messages are resolved in and the clock
/// used by relative date checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationContext {
    /// Locale for error messages
    pub locale: Locale,
    /// Fixed "now"; the local clock is read when unset
    pub now: Option<NaiveDateTime>,
}

impl ValidationContext {
    /// Context following the calling thread's current locale.
    pub fn current() -> Self {
        Self {
            locale: vetted_i18n::get_locale(),
            now: None,
        }
    }

    /// Context for an explicit locale.
    pub fn for_locale(locale: Locale) -> Self {
        Self { locale, now: None }
    }

    /// Pin the clock.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    /// The pinned clock or the local time.
    pub fn now(&self) -> NaiveDateTime {
        self.now.unwrap_or_else(|| Local::now().naive_local())
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::current()
    }
}

/// A reusable, configured validator.
///
/// `validate` resolves messages in the calling thread's current locale;
/// `validate_with` takes the locale (and clock) explicitly.
pub trait Validator: Send + Sync {
    /// Canonical value produced on success
    type Output;

    /// Message namespace of the validator (`"email"`)
    fn scope(&self) -> &'static str;

    /// Validate with an explicit context.
    fn validate_with(&self, input: &Input, ctx: &ValidationContext)
    -> ValidationResult<Self::Output>;

    /// Validate in the current locale.
    fn validate<I: Into<Input>>(&self, input: I) -> ValidationResult<Self::Output>
    where
        Self: Sized,
    {
        self.validate_with(&input.into(), &ValidationContext::current())
    }

    /// Whether the input is accepted.
    fn is_valid<I: Into<Input>>(&self, input: I) -> bool
    where
        Self: Sized,
    {
        self.validate(input).is_ok()
    }
}

/// Object-safe view of a validator whose output converts back into an [`Input`].
pub(crate) trait ErasedValidator: Send + Sync {
    fn validate_erased(
        &self,
        input: &Input,
        ctx: &ValidationContext,
    ) -> Result<Input, ValidationError>;
}

impl<V> ErasedValidator for V
where
    V: Validator,
    V::Output: Into<Input>,
{
    fn validate_erased(
        &self,
        input: &Input,
        ctx: &ValidationContext,
    ) -> Result<Input, ValidationError> {
        self.validate_with(input, ctx).map(Input::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_conversions() {
        assert_eq!(Input::from("a"), Input::Text("a".to_string()));
        assert_eq!(Input::from(3), Input::Number(3.0));
        assert_eq!(Input::from(None::<String>), Input::Null);
        assert_eq!(Input::from(Some(true)), Input::Bool(true));
    }

    #[test]
    fn test_input_text_form() {
        assert_eq!(Input::Number(5.0).to_text().as_deref(), Some("5"));
        assert_eq!(Input::Number(1.25).to_text().as_deref(), Some("1.25"));
        assert_eq!(Input::Bool(false).to_text().as_deref(), Some("false"));
        assert_eq!(Input::Null.to_text(), None);
        assert!(Input::Text(String::new()).is_empty());
        assert!(!Input::Text(" ".to_string()).is_empty());
    }

    #[test]
    fn test_input_deserialize_untagged() {
        let input: Input = serde_json::from_str(r#"{"name":"a.png","size":10,"type":"image/png"}"#).unwrap();
        assert_eq!(input, Input::File(FileInfo::new("a.png", 10, "image/png")));

        let input: Input = serde_json::from_str("null").unwrap();
        assert_eq!(input, Input::Null);
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(FileInfo::new("photo.JPG", 1, "image/jpeg").extension().as_deref(), Some("jpg"));
        assert_eq!(FileInfo::new("archive.tar.gz", 1, "").extension().as_deref(), Some("gz"));
        assert_eq!(FileInfo::new(".bashrc", 1, "").extension(), None);
        assert_eq!(FileInfo::new("README", 1, "").extension(), None);
    }

    #[test]
    fn test_context_clock() {
        let now = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap();
        let ctx = ValidationContext::for_locale(Locale::en()).with_now(now);
        assert_eq!(ctx.now(), now);
    }
}
