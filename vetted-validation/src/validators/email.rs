// Email validator

use super::{char_len, domain_matches, first_contained, join, prepare};
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, RuleChain, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationResult, Validator,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$").unwrap()
});

/// Consumer mailbox providers rejected by `business_only`.
const FREE_PROVIDERS: &[&str] = &[
    "gmail.com",
    "googlemail.com",
    "yahoo.com",
    "yahoo.com.tw",
    "ymail.com",
    "hotmail.com",
    "hotmail.com.tw",
    "outlook.com",
    "live.com",
    "msn.com",
    "aol.com",
    "icloud.com",
    "me.com",
    "mac.com",
    "protonmail.com",
    "proton.me",
    "gmx.com",
    "mail.com",
    "yandex.com",
    "zoho.com",
    "qq.com",
    "163.com",
    "126.com",
    "pchome.com.tw",
    "msa.hinet.net",
];

/// Throwaway mailbox services rejected by `no_disposable`.
const DISPOSABLE_PROVIDERS: &[&str] = &[
    "10minutemail.com",
    "mailinator.com",
    "guerrillamail.com",
    "sharklasers.com",
    "tempmail.com",
    "temp-mail.org",
    "throwawaymail.com",
    "yopmail.com",
    "trashmail.com",
    "getnada.com",
    "maildrop.cc",
    "dispostable.com",
    "fakeinbox.com",
    "mintemail.com",
    "mohmal.com",
];

/// Options of [`EmailValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailOptions {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub includes: Option<String>,
    pub excludes: Vec<String>,
    /// Accepted domains; empty accepts any
    pub domains: Vec<String>,
    /// Let subdomains of `domains` and `domain_blacklist` match (default `true`)
    pub allow_subdomains: bool,
    pub domain_blacklist: Vec<String>,
    /// Reject consumer providers such as gmail.com
    pub business_only: bool,
    /// Reject throwaway providers
    pub no_disposable: bool,
    /// Lower-case the address (default `true`)
    pub lowercase: bool,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for EmailOptions {
    fn default() -> Self {
        Self {
            required: true,
            min_length: None,
            max_length: None,
            includes: None,
            excludes: Vec::new(),
            domains: Vec::new(),
            allow_subdomains: true,
            domain_blacklist: Vec::new(),
            business_only: false,
            no_disposable: false,
            lowercase: true,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl EmailOptions {
    setters! {
        required: bool,
        min_length: Option<usize>,
        max_length: Option<usize>,
        includes: Option<String>,
        excludes: Vec<String>,
        domains: Vec<String>,
        allow_subdomains: bool,
        domain_blacklist: Vec<String>,
        business_only: bool,
        no_disposable: bool,
        lowercase: bool,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// Email address validator with domain policies.
#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
    options: EmailOptions,
}

impl EmailValidator {
    pub fn new(options: EmailOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &EmailOptions {
        &self.options
    }
}

fn domain_of(address: &str) -> &str {
    address.rsplit_once('@').map_or("", |(_, domain)| domain)
}

fn listed(domain: &str, list: &[&str]) -> bool {
    list.iter().any(|entry| domain_matches(domain, entry, true))
}

impl Validator for EmailValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "email"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let casing = if opts.lowercase {
            Casing::Lower
        } else {
            Casing::None
        };
        let pipe = TextPipe::new(TrimMode::Trim, casing).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let domain = domain_of(&value);
        let excluded = first_contained(&value, &opts.excludes);
        let blacklisted = opts
            .domain_blacklist
            .iter()
            .any(|rule| domain_matches(domain, rule, opts.allow_subdomains));

        RuleChain::<str>::new()
            .add("invalid", |v| EMAIL_REGEX.is_match(v))
            .add_if(
                opts.min_length.is_some(),
                "minLength",
                params!["min" => opts.min_length.unwrap_or_default()],
                |v| opts.min_length.is_none_or(|min| char_len(v) >= min),
            )
            .add_if(
                opts.max_length.is_some(),
                "maxLength",
                params!["max" => opts.max_length.unwrap_or_default()],
                |v| opts.max_length.is_none_or(|max| char_len(v) <= max),
            )
            .add_if(
                opts.includes.is_some(),
                "includes",
                params!["includes" => opts.includes.as_deref().unwrap_or_default()],
                |v| opts.includes.as_deref().is_none_or(|s| v.contains(s)),
            )
            .add_if(
                excluded.is_some(),
                "excludes",
                params!["excludes" => excluded.unwrap_or_default()],
                |_| excluded.is_none(),
            )
            .add_if(
                !opts.domains.is_empty(),
                "domain",
                params!["domain" => join(&opts.domains)],
                |_| {
                    opts.domains
                        .iter()
                        .any(|rule| domain_matches(domain, rule, opts.allow_subdomains))
                },
            )
            .add_if(
                opts.business_only,
                "businessOnly",
                params!["domain" => domain],
                |_| !listed(domain, FREE_PROVIDERS),
            )
            .add_if(
                blacklisted,
                "domainBlacklist",
                params!["domain" => domain],
                |_| !blacklisted,
            )
            .add_if(
                opts.no_disposable,
                "noDisposable",
                params!["domain" => domain],
                |_| !listed(domain, DISPOSABLE_PROVIDERS),
            )
            .check(&*value, &reporter)?;

        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vetted_i18n::Locale;

    fn check(validator: &EmailValidator, input: &str) -> ValidationResult<String> {
        validator.validate_with(&Input::from(input), &ValidationContext::for_locale(Locale::en()))
    }

    fn code(validator: &EmailValidator, input: &str) -> &'static str {
        check(validator, input).unwrap_err().code
    }

    #[test]
    fn test_basic_format() {
        let validator = EmailValidator::default();
        assert_eq!(check(&validator, " User@Example.COM "), Ok(Some("user@example.com".into())));
        assert!(check(&validator, "test.user+tag@domain.co.uk").is_ok());
        for bad in ["invalid-email", "@example.com", "user@", "user@localhost", "a b@c.com"] {
            assert_eq!(code(&validator, bad), "invalid", "{bad}");
        }
        assert_eq!(code(&validator, ""), "required");
    }

    #[test]
    fn test_keep_case() {
        let validator = EmailValidator::new(EmailOptions::default().lowercase(false));
        assert_eq!(check(&validator, "Ada@Example.com"), Ok(Some("Ada@Example.com".into())));
    }

    #[test]
    fn test_business_only_rejects_free_provider() {
        let validator = EmailValidator::new(EmailOptions::default().business_only(true));
        let error = check(&validator, "user@gmail.com").unwrap_err();
        assert_eq!(error.code, "businessOnly");
        assert_eq!(error.param("domain"), Some("gmail.com"));
        assert!(check(&validator, "user@acme.com.tw").is_ok());
    }

    #[test]
    fn test_business_only_runs_before_blacklist() {
        let validator = EmailValidator::new(
            EmailOptions::default()
                .business_only(true)
                .domain_blacklist(["gmail.com"])
                .no_disposable(true),
        );
        assert_eq!(code(&validator, "user@gmail.com"), "businessOnly");
    }

    #[test]
    fn test_blacklist_then_disposable() {
        let validator = EmailValidator::new(
            EmailOptions::default()
                .domain_blacklist(["mailinator.com"])
                .no_disposable(true),
        );
        assert_eq!(code(&validator, "x@mailinator.com"), "domainBlacklist");
        assert_eq!(code(&validator, "x@yopmail.com"), "noDisposable");
        assert_eq!(code(&validator, "x@eu.mailinator.com"), "domainBlacklist");
    }

    #[test]
    fn test_allowed_domains() {
        let validator = EmailValidator::new(EmailOptions::default().domains(["example.com"]));
        assert!(check(&validator, "a@example.com").is_ok());
        assert!(check(&validator, "a@mail.example.com").is_ok());
        assert_eq!(code(&validator, "a@other.com"), "domain");

        let exact = EmailValidator::new(
            EmailOptions::default()
                .domains(["example.com"])
                .allow_subdomains(false),
        );
        assert_eq!(code(&exact, "a@mail.example.com"), "domain");
    }

    #[test]
    fn test_length_and_content_order() {
        let validator = EmailValidator::new(
            EmailOptions::default()
                .min_length(10)
                .max_length(20)
                .includes("team")
                .excludes(["test"]),
        );
        assert_eq!(code(&validator, "a@b.io"), "minLength");
        assert_eq!(code(&validator, "someone.very.long@example.com"), "maxLength");
        assert_eq!(code(&validator, "ops@example.com"), "includes");
        assert_eq!(code(&validator, "testteam@acme.io"), "excludes");
        assert!(check(&validator, "team@acme.io").is_ok());
    }

    #[test]
    fn test_override_message() {
        let validator = EmailValidator::new(
            EmailOptions::default()
                .business_only(true)
                .message("en", "businessOnly", "No ${domain} please"),
        );
        assert_eq!(check(&validator, "a@gmail.com").unwrap_err().message, "No gmail.com please");
    }

    proptest! {
        #[test]
        fn prop_output_revalidates(local in "[a-zA-Z0-9._%+-]{1,20}", host in "[a-zA-Z]{1,10}", tld in "[a-zA-Z]{2,4}") {
            let validator = EmailValidator::default();
            let raw = format!("  {}@{}.{} ", local, host, tld);
            if let Ok(Some(value)) = check(&validator, &raw) {
                prop_assert_eq!(check(&validator, &value), Ok(Some(value.clone())));
                prop_assert_eq!(check(&validator, raw.trim()), Ok(Some(value)));
            }
        }
    }
}
