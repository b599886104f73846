//! Message Translation System
//!
//! Locale-keyed bundles of dotted-key message templates with `${name}`
//! placeholder interpolation.

use crate::locale::best_match;
use crate::{I18nError, Locale, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// A bundle of message templates for a single locale.
///
/// Nested JSON objects are flattened into dotted keys, so
/// `{"email": {"invalid": "..."}}` is looked up as `email.invalid`.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    messages: HashMap<String, String>,
}

impl MessageBundle {
    /// Create a new empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a (possibly nested) JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(root) = data else {
            return Err(I18nError::ParseError(
                "message file must contain a JSON object".to_string(),
            ));
        };

        let mut bundle = Self::new();
        for (key, value) in root {
            bundle.flatten(key, value)?;
        }
        Ok(bundle)
    }

    fn flatten(&mut self, prefix: String, value: serde_json::Value) -> Result<()> {
        match value {
            serde_json::Value::String(s) => {
                self.messages.insert(prefix, s);
            }
            serde_json::Value::Object(obj) => {
                for (key, nested) in obj {
                    self.flatten(format!("{}.{}", prefix, key), nested)?;
                }
            }
            other => {
                return Err(I18nError::ParseError(format!(
                    "message '{}' must be a string or object, found {}",
                    prefix, other
                )));
            }
        }
        Ok(())
    }

    /// Add a message.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    /// Copy every message of `other` into this bundle, overwriting duplicates.
    pub fn merge(&mut self, other: MessageBundle) {
        self.messages.extend(other.messages);
    }

    /// Get a message template.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(|s| s.as_str())
    }

    /// Check if bundle has a message.
    pub fn has(&self, key: &str) -> bool {
        self.messages.contains_key(key)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the bundle has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Get all message keys.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.messages.keys()
    }
}

/// Collection of message bundles for multiple locales.
#[derive(Debug, Default)]
pub struct Messages {
    bundles: HashMap<String, MessageBundle>,
    locales: Vec<Locale>,
}

impl Messages {
    /// Create a new messages collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bundle for a locale, merging into an existing one.
    pub fn add_bundle(&mut self, locale: &Locale, bundle: MessageBundle) {
        let tag = locale.tag();
        match self.bundles.get_mut(&tag) {
            Some(existing) => existing.merge(bundle),
            None => {
                self.bundles.insert(tag, bundle);
                self.locales.push(locale.clone());
            }
        }
    }

    /// Locales that have a bundle, in registration order.
    pub fn locales(&self) -> &[Locale] {
        &self.locales
    }

    /// Get the bundle for a locale.
    ///
    /// Tries the exact tag, the tag without script, the language only, and
    /// finally the best scoring registered locale of the same language.
    pub fn get_bundle(&self, locale: &Locale) -> Option<&MessageBundle> {
        let candidates = [
            locale.tag(),
            locale.without_script().tag(),
            locale.language_only().tag(),
        ];
        for tag in &candidates {
            if let Some(bundle) = self.bundles.get(tag) {
                return Some(bundle);
            }
        }

        best_match(locale, &self.locales).and_then(|found| self.bundles.get(&found.tag()))
    }

    /// Load every `<tag>.json` file of a directory.
    ///
    /// Expected structure:
    /// - `locales/en.json`
    /// - `locales/zh-TW.json`
    pub fn load_from_dir(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();

        if !dir.exists() {
            return Err(I18nError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Directory not found: {:?}", dir),
            )));
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().is_some_and(|ext| ext == "json") {
                let stem = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .ok_or_else(|| I18nError::ParseError("Invalid filename".to_string()))?;

                let locale = Locale::parse(stem)?;
                let content = fs::read_to_string(&path)?;
                let bundle = MessageBundle::from_json(&content)?;
                vetted_log::debug!(
                    target: "vetted::i18n",
                    { locale = locale, messages = bundle.len() },
                    "Loaded message file {}",
                    path.display()
                );

                self.add_bundle(&locale, bundle);
            }
        }

        Ok(())
    }
}

/// Thread-safe message catalog.
///
/// A key missing from the requested locale resolves through the optional
/// fallback locale and otherwise to the key itself; lookups never fail.
pub struct I18n {
    messages: Arc<RwLock<Messages>>,
    fallback_locale: Option<Locale>,
}

impl I18n {
    /// Create an empty catalog without fallback locale.
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Messages::new())),
            fallback_locale: None,
        }
    }

    /// Set the fallback locale.
    pub fn with_fallback(mut self, locale: Locale) -> Self {
        self.fallback_locale = Some(locale);
        self
    }

    /// Load messages from a directory.
    pub fn load_from_dir(self, dir: impl AsRef<Path>) -> Result<Self> {
        self.messages.write().load_from_dir(dir)?;
        Ok(self)
    }

    /// Add a message bundle (merged into an existing bundle of the same locale).
    pub fn add_bundle(&self, locale: &Locale, bundle: MessageBundle) {
        self.messages.write().add_bundle(locale, bundle);
    }

    /// Locales known to this catalog.
    pub fn locales(&self) -> Vec<Locale> {
        self.messages.read().locales().to_vec()
    }

    /// Look up a raw template.
    pub fn template(&self, key: &str, locale: &Locale) -> Option<String> {
        let messages = self.messages.read();

        if let Some(msg) = messages.get_bundle(locale).and_then(|b| b.get(key)) {
            return Some(msg.to_string());
        }

        self.fallback_locale
            .as_ref()
            .and_then(|fallback| messages.get_bundle(fallback))
            .and_then(|b| b.get(key))
            .map(|msg| msg.to_string())
    }

    /// Translate a message key, returning the key itself when missing.
    pub fn t(&self, key: &str, locale: &Locale) -> String {
        self.template(key, locale)
            .unwrap_or_else(|| key.to_string())
    }

    /// Translate with `${name}` arguments.
    pub fn t_args(&self, key: &str, locale: &Locale, args: &[(&str, &str)]) -> String {
        match self.template(key, locale) {
            Some(template) => interpolate(&template, args),
            None => key.to_string(),
        }
    }

    /// Check if a message exists for the locale (fallback excluded).
    pub fn has(&self, key: &str, locale: &Locale) -> bool {
        self.messages
            .read()
            .get_bundle(locale)
            .is_some_and(|b| b.has(key))
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for I18n {
    fn clone(&self) -> Self {
        Self {
            messages: Arc::clone(&self.messages),
            fallback_locale: self.fallback_locale.clone(),
        }
    }
}

/// Substitute `${name}` placeholders.
///
/// Placeholders without a matching argument become empty strings; an
/// unterminated `${` is copied verbatim.
///
/// ```
/// use vetted_i18n::interpolate;
///
/// assert_eq!(interpolate("at least ${min} chars", &[("min", "8")]), "at least 8 chars");
/// assert_eq!(interpolate("hello ${name}!", &[]), "hello !");
/// ```
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = after[..end].trim();
                if let Some((_, value)) = args.iter().find(|(arg, _)| *arg == name) {
                    result.push_str(value);
                }
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_i18n() -> I18n {
        let i18n = I18n::new();

        let mut en = MessageBundle::new();
        en.add("email.invalid", "Invalid email");
        en.add("text.min", "Must be at least ${min} characters");
        i18n.add_bundle(&Locale::en(), en);

        let mut zh = MessageBundle::new();
        zh.add("email.invalid", "電子郵件格式錯誤");
        i18n.add_bundle(&Locale::zh_tw(), zh);

        i18n
    }

    #[test]
    fn test_simple_translation() {
        let i18n = create_test_i18n();

        assert_eq!(i18n.t("email.invalid", &Locale::en()), "Invalid email");
        assert_eq!(i18n.t("email.invalid", &Locale::zh_tw()), "電子郵件格式錯誤");
    }

    #[test]
    fn test_translation_with_args() {
        let i18n = create_test_i18n();

        let msg = i18n.t_args("text.min", &Locale::en(), &[("min", "3")]);
        assert_eq!(msg, "Must be at least 3 characters");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let i18n = create_test_i18n();

        assert_eq!(i18n.t("text.min", &Locale::zh_tw()), "text.min");
        assert_eq!(i18n.t_args("unknown.key", &Locale::en(), &[("a", "b")]), "unknown.key");
    }

    #[test]
    fn test_fallback_locale() {
        let i18n = create_test_i18n().with_fallback(Locale::en());
        assert_eq!(
            i18n.t("text.min", &Locale::zh_tw()),
            "Must be at least ${min} characters"
        );
    }

    #[test]
    fn test_regional_and_script_variants_resolve() {
        let i18n = create_test_i18n();

        let en_us = Locale::parse("en-US").unwrap();
        assert_eq!(i18n.t("email.invalid", &en_us), "Invalid email");

        let hant = Locale::parse("zh-Hant-TW").unwrap();
        assert_eq!(i18n.t("email.invalid", &hant), "電子郵件格式錯誤");
    }

    #[test]
    fn test_message_bundle_from_nested_json() {
        let json = r#"{
            "email": {
                "invalid": "Invalid email",
                "domain": { "blacklist": "Domain ${domain} is not allowed" }
            },
            "required": "Required"
        }"#;

        let bundle = MessageBundle::from_json(json).unwrap();

        assert_eq!(bundle.get("email.invalid"), Some("Invalid email"));
        assert_eq!(
            bundle.get("email.domain.blacklist"),
            Some("Domain ${domain} is not allowed")
        );
        assert_eq!(bundle.get("required"), Some("Required"));
        assert_eq!(bundle.len(), 3);
    }

    #[test]
    fn test_message_bundle_rejects_non_string_leaf() {
        assert!(MessageBundle::from_json(r#"{"a": 1}"#).is_err());
        assert!(MessageBundle::from_json(r#"["a"]"#).is_err());
    }

    #[test]
    fn test_add_bundle_merges() {
        let i18n = create_test_i18n();
        let mut extra = MessageBundle::new();
        extra.add("email.invalid", "Bad email");
        extra.add("email.required", "Email required");
        i18n.add_bundle(&Locale::en(), extra);

        assert_eq!(i18n.t("email.invalid", &Locale::en()), "Bad email");
        assert_eq!(i18n.t("text.min", &Locale::en()), "Must be at least ${min} characters");
        assert_eq!(i18n.locales(), vec![Locale::en(), Locale::zh_tw()]);
    }

    #[test]
    fn test_interpolate_edge_cases() {
        assert_eq!(interpolate("no placeholders", &[("a", "b")]), "no placeholders");
        assert_eq!(interpolate("${a}${b}", &[("a", "1"), ("b", "2")]), "12");
        assert_eq!(interpolate("${ a }", &[("a", "x")]), "x");
        assert_eq!(interpolate("broken ${a", &[("a", "x")]), "broken ${a");
        assert_eq!(interpolate("{a} stays", &[("a", "x")]), "{a} stays");
    }
}
