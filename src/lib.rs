// Vetted - Parameterized input validators with locale-aware messages
//
// This library bundles the validators, the message catalog they report
// through, and the logger they share.

// Re-export the message catalog
pub use vetted_i18n as i18n;
pub use vetted_i18n::{Locale, get_locale, set_locale, t};

// Re-export logging
pub use vetted_log as log;

// Re-export validators
#[cfg(feature = "validation")]
pub use vetted_validation as validation;

#[cfg(feature = "validation")]
pub use vetted_validation::taiwan;

// Prelude for common imports
pub mod prelude {
    pub use vetted_i18n::{Locale, get_locale, set_locale};

    #[cfg(feature = "validation")]
    pub use vetted_validation::{
        BooleanOptions, BooleanValidator, ColorOptions, ColorValidator, CoordinateOptions,
        CoordinateValidator, CreditCardOptions, CreditCardValidator, DateOptions, DateTimeOptions,
        DateTimeValidator, DateValidator, EmailOptions, EmailValidator, FileInfo, FileOptions,
        FileValidator, IdOptions, IdValidator, Input, IpOptions, IpValidator, MessageOverrides,
        NumberOptions, NumberValidator, PasswordOptions, PasswordValidator, TextOptions,
        TextValidator, TimeOptions, TimeValidator, UrlOptions, UrlValidator, ValidationBuilder,
        ValidationContext, ValidationError, ValidationErrors, ValidationResult, Validator,
    };

    #[cfg(feature = "validation")]
    pub use vetted_validation::taiwan::{
        BusinessIdOptions, BusinessIdValidator, FaxOptions, FaxValidator, MobileOptions,
        MobileValidator, NationalIdOptions, NationalIdValidator, PostalCodeOptions,
        PostalCodeValidator, TelOptions, TelValidator,
    };
}
