//! Parameterized validators with locale-aware messages
//!
//! Every validator follows the same pipeline: preprocess the raw input
//! (default value, trim, casing, custom transform), run an ordered chain of
//! predicates, and either return the canonical value or the first failure.
//!
//! # Examples
//!
//! ## Single value
//!
//! ```
//! use vetted_i18n::Locale;
//! use vetted_validation::{EmailOptions, EmailValidator, ValidationContext, Validator};
//!
//! let validator = EmailValidator::new(EmailOptions::default().business_only(true));
//! let ctx = ValidationContext::for_locale(Locale::en());
//!
//! let value = validator.validate_with(&"  Jane@Acme.io ".into(), &ctx).unwrap();
//! assert_eq!(value.as_deref(), Some("jane@acme.io"));
//!
//! let error = validator.validate_with(&"jane@gmail.com".into(), &ctx).unwrap_err();
//! assert_eq!(error.code, "businessOnly");
//! ```
//!
//! ## Optional values
//!
//! ```
//! use vetted_validation::{TextOptions, TextValidator, Validator};
//!
//! let validator = TextValidator::new(TextOptions::default().required(false));
//! assert_eq!(validator.validate("   ").unwrap(), None);
//! ```
//!
//! ## Taiwan identifiers
//!
//! ```
//! use vetted_validation::taiwan::{is_valid_business_id, is_valid_national_id};
//!
//! assert!(is_valid_national_id("A123456789"));
//! assert!(is_valid_business_id("04595257"));
//! ```
//!
//! ## Several fields
//!
//! ```
//! use std::collections::HashMap;
//! use vetted_validation::{Input, NumberOptions, NumberValidator, TextValidator, ValidationBuilder};
//!
//! let form = ValidationBuilder::new()
//!     .field("name", TextValidator::default())
//!     .field("age", NumberValidator::new(NumberOptions::default().min(18.0)));
//!
//! let mut data = HashMap::new();
//! data.insert("name".to_string(), Input::from("Ada"));
//! data.insert("age".to_string(), Input::from(12));
//!
//! let errors = form.validate(&data).unwrap_err();
//! assert_eq!(errors.get("age").map(|e| e.code), Some("min"));
//! ```

/// Build message parameters: `params!["min" => 3, "max" => 10]`.
macro_rules! params {
    () => {
        Vec::new()
    };
    ($($key:literal => $value:expr),+ $(,)?) => {
        vec![$(($key, $value.to_string())),+]
    };
}

/// Fluent setters for options structs.
macro_rules! setters {
    () => {};
    ($(#[$meta:meta])* transform: Transform $(, $($rest:tt)*)?) => {
        $(#[$meta])*
        pub fn transform<F>(mut self, transform: F) -> Self
        where
            F: Fn(String) -> String + Send + Sync + 'static,
        {
            self.transform = Some($crate::Transform::new(transform));
            self
        }
        setters!($($($rest)*)?);
    };
    ($(#[$meta:meta])* messages: MessageOverrides $(, $($rest:tt)*)?) => {
        /// Override the message of `code` in `locale`
        pub fn message(mut self, locale: &str, code: &str, template: impl Into<String>) -> Self {
            self.messages.set(locale, code, template);
            self
        }
        setters!($($($rest)*)?);
    };
    ($(#[$meta:meta])* $name:ident: Option<String> $(, $($rest:tt)*)?) => {
        $(#[$meta])*
        pub fn $name(mut self, value: impl Into<String>) -> Self {
            self.$name = Some(value.into());
            self
        }
        setters!($($($rest)*)?);
    };
    ($(#[$meta:meta])* $name:ident: Option<$ty:ty> $(, $($rest:tt)*)?) => {
        $(#[$meta])*
        pub fn $name(mut self, value: $ty) -> Self {
            self.$name = Some(value);
            self
        }
        setters!($($($rest)*)?);
    };
    ($(#[$meta:meta])* $name:ident: Vec<$ty:ty> $(, $($rest:tt)*)?) => {
        $(#[$meta])*
        pub fn $name<I, S>(mut self, values: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<$ty>,
        {
            self.$name = values.into_iter().map(Into::into).collect();
            self
        }
        setters!($($($rest)*)?);
    };
    ($(#[$meta:meta])* $name:ident: $ty:ty $(, $($rest:tt)*)?) => {
        $(#[$meta])*
        pub fn $name(mut self, value: $ty) -> Self {
            self.$name = value;
            self
        }
        setters!($($($rest)*)?);
    };
}

mod errors;
mod messages;
mod pipe;
mod rules;
mod traits;
pub mod validators;

pub use errors::*;
pub use messages::*;
pub use pipe::*;
pub use rules::*;
pub use traits::*;
pub use validators::*;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Input, MessageOverrides, ValidationBuilder, ValidationContext, ValidationError,
        ValidationErrors, ValidationResult, Validator,
    };
}
