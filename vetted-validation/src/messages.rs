// Message resolution for validation errors

use crate::{Params, ValidationContext, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vetted_i18n::{Locale, interpolate};

/// Per-validator message templates that take precedence over the catalog.
///
/// Keyed by locale tag, then by message code:
///
/// ```json
/// { "en": { "businessOnly": "Company addresses only" } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageOverrides {
    templates: HashMap<String, HashMap<String, String>>,
}

impl MessageOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the template of `code` in `locale`.
    pub fn set(&mut self, locale: &str, code: &str, template: impl Into<String>) {
        let tag = Locale::parse(locale)
            .map(|l| l.tag())
            .unwrap_or_else(|_| locale.to_string());
        self.templates
            .entry(tag)
            .or_default()
            .insert(code.to_string(), template.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, locale: &str, code: &str, template: impl Into<String>) -> Self {
        self.set(locale, code, template);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template for `code`, trying the exact locale then its language alone.
    pub fn get(&self, locale: &Locale, code: &str) -> Option<&str> {
        [locale.tag(), locale.without_script().tag(), locale.language_only().tag()]
            .iter()
            .filter_map(|tag| self.templates.get(tag))
            .find_map(|codes| codes.get(code))
            .map(String::as_str)
    }
}

/// Builds errors for one validator call.
///
/// Resolution order: the validator's override, the catalog entry
/// `{scope}.{code}` in the context locale, the dotted key itself.
#[derive(Debug, Clone, Copy)]
pub struct Reporter<'a> {
    scope: &'static str,
    ctx: &'a ValidationContext,
    overrides: &'a MessageOverrides,
}

impl<'a> Reporter<'a> {
    pub fn new(
        scope: &'static str,
        ctx: &'a ValidationContext,
        overrides: &'a MessageOverrides,
    ) -> Self {
        Self {
            scope,
            ctx,
            overrides,
        }
    }

    pub fn scope(&self) -> &'static str {
        self.scope
    }

    pub fn context(&self) -> &'a ValidationContext {
        self.ctx
    }

    /// Resolve the message of `code` and wrap it in an error.
    pub fn error(&self, code: &'static str, params: Params) -> ValidationError {
        let args: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let message = match self.overrides.get(&self.ctx.locale, code) {
            Some(template) => interpolate(template, &args),
            None => vetted_i18n::t_in(
                &self.ctx.locale,
                &format!("{}.{}", self.scope, code),
                &args,
            ),
        };

        vetted_log::trace!(
            target: "vetted::validation",
            { scope = self.scope, code = code, locale = self.ctx.locale },
            "Predicate failed"
        );

        ValidationError::new(self.scope, code, message).with_params(params)
    }
}
