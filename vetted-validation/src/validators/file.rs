// Uploaded file metadata validator

use super::{compile, join};
use crate::messages::Reporter;
use crate::{
    FileInfo, Input, MessageOverrides, OptionsError, RuleChain, ValidationContext,
    ValidationResult, Validator,
};
use regex::Regex;
use serde::{Deserialize, Deserializer};

/// Common size constants
pub mod sizes {
    pub const KB: u64 = 1024;
    pub const MB: u64 = 1024 * KB;
    pub const GB: u64 = 1024 * MB;
}

/// Human-readable size (`"1.50 MB"`).
pub fn format_size(bytes: u64) -> String {
    if bytes >= sizes::GB {
        format!("{:.2} GB", bytes as f64 / sizes::GB as f64)
    } else if bytes >= sizes::MB {
        format!("{:.2} MB", bytes as f64 / sizes::MB as f64)
    } else if bytes >= sizes::KB {
        format!("{:.2} KB", bytes as f64 / sizes::KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Parse a size such as `"5mb"`, `"512kb"`, `"1.5g"` or `"1024"` into bytes.
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim().to_lowercase();

    if let Ok(bytes) = s.parse::<u64>() {
        return Some(bytes);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("gb") {
        (n, sizes::GB)
    } else if let Some(n) = s.strip_suffix("mb") {
        (n, sizes::MB)
    } else if let Some(n) = s.strip_suffix("kb") {
        (n, sizes::KB)
    } else if let Some(n) = s.strip_suffix('g') {
        (n, sizes::GB)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, sizes::MB)
    } else if let Some(n) = s.strip_suffix('k') {
        (n, sizes::KB)
    } else if let Some(n) = s.strip_suffix('b') {
        (n, 1)
    } else {
        return None;
    };

    let num: f64 = num_str.trim().parse().ok()?;
    (num.is_finite() && num >= 0.0).then(|| (num * multiplier as f64) as u64)
}

/// Sizes in options may be byte counts or strings like `"5mb"`.
fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Size {
        Bytes(u64),
        Text(String),
    }

    match Option::<Size>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Size::Bytes(bytes)) => Ok(Some(bytes)),
        Some(Size::Text(text)) => parse_size(&text)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid size: {text}"))),
    }
}

/// `mime` matches `pattern`, which may end in `/*`.
fn mime_matches(mime: &str, pattern: &str) -> bool {
    let mime = mime.trim().to_ascii_lowercase();
    let pattern = pattern.trim().to_ascii_lowercase();
    if pattern == "*" || pattern == "*/*" {
        return true;
    }
    match pattern.strip_suffix("/*") {
        Some(group) => mime.split_once('/').is_some_and(|(kind, _)| kind == group),
        None => mime == pattern,
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Options of [`FileValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileOptions {
    pub required: bool,
    #[serde(deserialize_with = "deserialize_size")]
    pub max_size: Option<u64>,
    #[serde(deserialize_with = "deserialize_size")]
    pub min_size: Option<u64>,
    /// Accepted MIME types; `image/*` accepts a whole group
    pub accept: Vec<String>,
    /// Accepted extensions, with or without the dot
    pub extensions: Vec<String>,
    pub blocked_extensions: Vec<String>,
    /// Pattern the file name must match
    pub name_pattern: Option<String>,
    pub messages: MessageOverrides,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            required: true,
            max_size: None,
            min_size: None,
            accept: Vec::new(),
            extensions: Vec::new(),
            blocked_extensions: Vec::new(),
            name_pattern: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl FileOptions {
    setters! {
        required: bool,
        max_size: Option<u64>,
        min_size: Option<u64>,
        accept: Vec<String>,
        extensions: Vec<String>,
        blocked_extensions: Vec<String>,
        name_pattern: Option<String>,
        messages: MessageOverrides,
    }
}

/// File validator. Only name, size and declared MIME type are inspected.
#[derive(Debug, Clone)]
pub struct FileValidator {
    options: FileOptions,
    name_pattern: Option<Regex>,
}

impl FileValidator {
    pub fn try_new(options: FileOptions) -> Result<Self, OptionsError> {
        if let (Some(min), Some(max)) = (options.min_size, options.max_size) {
            if min > max {
                return Err(OptionsError::Conflict(format!(
                    "minSize {min} exceeds maxSize {max}"
                )));
            }
        }
        let name_pattern = compile("namePattern", options.name_pattern.as_deref())?;
        Ok(Self {
            options,
            name_pattern,
        })
    }

    /// Build the validator; a pattern that does not compile is logged and ignored.
    pub fn new(options: FileOptions) -> Self {
        let name_pattern =
            compile("namePattern", options.name_pattern.as_deref()).unwrap_or_else(|err| {
                vetted_log::error!(target: "vetted::validation", "Ignoring file option: {}", err);
                None
            });
        Self {
            options,
            name_pattern,
        }
    }

    pub fn options(&self) -> &FileOptions {
        &self.options
    }
}

impl Default for FileValidator {
    fn default() -> Self {
        Self::new(FileOptions::default())
    }
}

impl Validator for FileValidator {
    type Output = FileInfo;

    fn scope(&self) -> &'static str {
        "file"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<FileInfo> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);

        let file = match input {
            Input::Null => {
                return if opts.required {
                    Err(reporter.error("required", params![]))
                } else {
                    Ok(None)
                };
            }
            Input::File(file) => file,
            _ => return Err(reporter.error("invalid", params![])),
        };

        let extension = file.extension().unwrap_or_default();
        let accepted: Vec<String> = opts.extensions.iter().map(|e| normalize_extension(e)).collect();
        let blocked: Vec<String> = opts
            .blocked_extensions
            .iter()
            .map(|e| normalize_extension(e))
            .collect();

        RuleChain::<FileInfo>::new()
            .add_if(
                opts.min_size.is_some(),
                "minSize",
                params!["min" => format_size(opts.min_size.unwrap_or_default())],
                |f| opts.min_size.is_none_or(|min| f.size >= min),
            )
            .add_if(
                opts.max_size.is_some(),
                "maxSize",
                params!["max" => format_size(opts.max_size.unwrap_or_default())],
                |f| opts.max_size.is_none_or(|max| f.size <= max),
            )
            .add_if(
                !opts.accept.is_empty(),
                "type",
                params!["accept" => opts.accept.join(", ")],
                |f| opts.accept.iter().any(|pattern| mime_matches(&f.mime_type, pattern)),
            )
            .add_if(
                !accepted.is_empty(),
                "extension",
                params!["extensions" => join(&accepted)],
                |_| accepted.contains(&extension),
            )
            .add_if(
                !blocked.is_empty(),
                "blockedExtension",
                params!["extension" => &extension],
                |_| !blocked.contains(&extension),
            )
            .add_if(self.name_pattern.is_some(), "name", params![], |f| {
                self.name_pattern.as_ref().is_none_or(|re| re.is_match(&f.name))
            })
            .check(file, &reporter)?;

        Ok(Some(file.clone()))
    }
}
