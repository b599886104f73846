//! Locale-keyed validation messages
//!
//! - **Message catalog**: nested JSON bundles flattened to dotted keys
//! - **Interpolation**: `${name}` placeholders, missing arguments become empty
//! - **Current locale**: per-thread selection with an environment default
//!
//! # Quick Start
//!
//! ```rust
//! use vetted_i18n::{Locale, set_locale, t, t_in};
//!
//! set_locale("en").unwrap();
//! let msg = t("text.min", &[("min", "3")]);
//! assert!(msg.contains('3'));
//!
//! // Unknown keys resolve to themselves
//! assert_eq!(t_in(&Locale::zh_tw(), "no.such.key", &[]), "no.such.key");
//! ```

mod catalog;
mod error;
mod locale;
mod messages;

pub use catalog::{
    LOCALE_ENV, catalog, default_locale, get_locale, register_bundle, reset_locale, set_locale,
    t, t_in,
};
pub use error::I18nError;
pub use locale::{Locale, best_match};
pub use messages::{I18n, MessageBundle, Messages, interpolate};

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{I18n, I18nError, Locale, MessageBundle, Result, get_locale, set_locale, t};
}
