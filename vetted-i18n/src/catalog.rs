//! Built-in catalog and current-locale selection
//!
//! The process-wide catalog is seeded with the bundled `en` and `zh-TW`
//! messages. The *current* locale is kept per thread: `set_locale` on one
//! thread never changes the language of errors produced on another. Callers
//! that need a specific locale for a single call should pass it explicitly
//! instead of switching the current one.

use crate::{I18n, Locale, MessageBundle, Result, interpolate};
use once_cell::sync::Lazy;
use std::cell::RefCell;

const EN_MESSAGES: &str = include_str!("../locales/en.json");
const ZH_TW_MESSAGES: &str = include_str!("../locales/zh-TW.json");

/// Environment variable selecting the initial locale of every thread.
pub const LOCALE_ENV: &str = "VETTED_LOCALE";

static CATALOG: Lazy<I18n> = Lazy::new(|| {
    let catalog = I18n::new();
    for (locale, source) in [(Locale::en(), EN_MESSAGES), (Locale::zh_tw(), ZH_TW_MESSAGES)] {
        match MessageBundle::from_json(source) {
            Ok(bundle) => catalog.add_bundle(&locale, bundle),
            Err(err) => {
                vetted_log::error!(target: "vetted::i18n", "Built-in {} messages are malformed: {}", locale, err)
            }
        }
    }
    catalog
});

static DEFAULT_LOCALE: Lazy<Locale> = Lazy::new(|| {
    match std::env::var(LOCALE_ENV) {
        Ok(tag) => Locale::parse(&tag).unwrap_or_else(|err| {
            vetted_log::warn!(target: "vetted::i18n", "Ignoring {}: {}", LOCALE_ENV, err);
            Locale::zh_tw()
        }),
        Err(_) => Locale::zh_tw(),
    }
});

thread_local! {
    static CURRENT_LOCALE: RefCell<Option<Locale>> = const { RefCell::new(None) };
}

/// The process-wide message catalog.
pub fn catalog() -> &'static I18n {
    &CATALOG
}

/// Locale used by threads that never called [`set_locale`].
///
/// `zh-TW` unless overridden through `VETTED_LOCALE`.
pub fn default_locale() -> Locale {
    DEFAULT_LOCALE.clone()
}

/// Set the current locale of the calling thread.
pub fn set_locale(tag: &str) -> Result<()> {
    let locale = Locale::parse(tag)?;
    vetted_log::debug!(target: "vetted::i18n", { locale = locale }, "Locale switched");
    CURRENT_LOCALE.with(|current| *current.borrow_mut() = Some(locale));
    Ok(())
}

/// Current locale of the calling thread.
pub fn get_locale() -> Locale {
    CURRENT_LOCALE.with(|current| current.borrow().clone().unwrap_or_else(default_locale))
}

/// Forget the thread's explicit locale so it follows [`default_locale`] again.
pub fn reset_locale() {
    CURRENT_LOCALE.with(|current| *current.borrow_mut() = None);
}

/// Register additional messages, merged into the catalog.
pub fn register_bundle(locale: &Locale, bundle: MessageBundle) {
    catalog().add_bundle(locale, bundle);
}

/// Translate `key` for the current locale with `${name}` arguments.
///
/// Returns the key itself when no template exists.
pub fn t(key: &str, args: &[(&str, &str)]) -> String {
    t_in(&get_locale(), key, args)
}

/// Translate `key` for an explicit locale.
pub fn t_in(locale: &Locale, key: &str, args: &[(&str, &str)]) -> String {
    match catalog().template(key, locale) {
        Some(template) => interpolate(&template, args),
        None => key.to_string(),
    }
}
