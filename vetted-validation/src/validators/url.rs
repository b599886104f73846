// URL validator

use super::{char_len, domain_matches, first_contained, join, prepare};
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, RuleChain, TextPipe, Transform, TrimMode, ValidationContext,
    ValidationResult, Validator,
};
use ::url::{Host, Url};
use serde::Deserialize;

/// Options of [`UrlValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UrlOptions {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub includes: Option<String>,
    pub excludes: Vec<String>,
    /// Accepted schemes, without the colon
    pub protocols: Vec<String>,
    /// Accepted hosts; subdomains of an entry are accepted too
    pub allowed_domains: Vec<String>,
    pub blocked_domains: Vec<String>,
    pub allowed_ports: Vec<u16>,
    pub blocked_ports: Vec<u16>,
    pub path_starts_with: Option<String>,
    pub path_ends_with: Option<String>,
    pub must_have_query: bool,
    pub must_not_have_query: bool,
    pub must_have_fragment: bool,
    pub must_not_have_fragment: bool,
    pub allow_localhost: bool,
    pub block_localhost: bool,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for UrlOptions {
    fn default() -> Self {
        Self {
            required: true,
            min_length: None,
            max_length: None,
            includes: None,
            excludes: Vec::new(),
            protocols: vec!["http".to_string(), "https".to_string()],
            allowed_domains: Vec::new(),
            blocked_domains: Vec::new(),
            allowed_ports: Vec::new(),
            blocked_ports: Vec::new(),
            path_starts_with: None,
            path_ends_with: None,
            must_have_query: false,
            must_not_have_query: false,
            must_have_fragment: false,
            must_not_have_fragment: false,
            allow_localhost: true,
            block_localhost: false,
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl UrlOptions {
    setters! {
        required: bool,
        min_length: Option<usize>,
        max_length: Option<usize>,
        includes: Option<String>,
        excludes: Vec<String>,
        protocols: Vec<String>,
        allowed_domains: Vec<String>,
        blocked_domains: Vec<String>,
        allowed_ports: Vec<u16>,
        blocked_ports: Vec<u16>,
        path_starts_with: Option<String>,
        path_ends_with: Option<String>,
        must_have_query: bool,
        must_not_have_query: bool,
        must_have_fragment: bool,
        must_not_have_fragment: bool,
        allow_localhost: bool,
        block_localhost: bool,
        transform: Transform,
        messages: MessageOverrides,
    }
}

fn is_localhost(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => {
            domain.eq_ignore_ascii_case("localhost")
                || domain.to_ascii_lowercase().ends_with(".localhost")
        }
        Some(Host::Ipv4(addr)) => addr.is_loopback(),
        Some(Host::Ipv6(addr)) => addr.is_loopback(),
        None => false,
    }
}

/// Absolute URL validator, parsed with the `url` crate.
///
/// The trimmed input is returned unchanged; parsing only drives the checks.
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
    options: UrlOptions,
}

impl UrlValidator {
    pub fn new(options: UrlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &UrlOptions {
        &self.options
    }
}

impl Validator for UrlValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "url"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::None).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let parsed = match Url::parse(&value) {
            Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => url,
            _ => return Err(reporter.error("invalid", params![])),
        };

        let host = parsed.host_str().unwrap_or_default().trim_end_matches('.');
        let port = parsed.port_or_known_default();
        let path = parsed.path();
        let excluded = first_contained(&value, &opts.excludes);
        let blocked_domain = opts
            .blocked_domains
            .iter()
            .find(|rule| domain_matches(host, rule, true));
        let localhost = is_localhost(&parsed);

        RuleChain::<Url>::new()
            .add_if(
                opts.min_length.is_some(),
                "minLength",
                params!["min" => opts.min_length.unwrap_or_default()],
                |_| opts.min_length.is_none_or(|min| char_len(&value) >= min),
            )
            .add_if(
                opts.max_length.is_some(),
                "maxLength",
                params!["max" => opts.max_length.unwrap_or_default()],
                |_| opts.max_length.is_none_or(|max| char_len(&value) <= max),
            )
            .add_if(
                opts.includes.is_some(),
                "includes",
                params!["includes" => opts.includes.as_deref().unwrap_or_default()],
                |_| opts.includes.as_deref().is_none_or(|s| value.contains(s)),
            )
            .add_if(
                excluded.is_some(),
                "excludes",
                params!["excludes" => excluded.unwrap_or_default()],
                |_| excluded.is_none(),
            )
            .add_if(
                !opts.protocols.is_empty(),
                "protocol",
                params!["protocols" => opts.protocols.join(", ")],
                |url| {
                    opts.protocols
                        .iter()
                        .any(|p| p.trim_end_matches(':').eq_ignore_ascii_case(url.scheme()))
                },
            )
            .add_if(
                !opts.allowed_domains.is_empty(),
                "domain",
                params!["domain" => host],
                |_| {
                    opts.allowed_domains
                        .iter()
                        .any(|rule| domain_matches(host, rule, true))
                },
            )
            .add_if(
                blocked_domain.is_some(),
                "domainBlacklist",
                params!["domain" => host],
                |_| blocked_domain.is_none(),
            )
            .add_if(
                !opts.allowed_ports.is_empty(),
                "port",
                params!["ports" => join(&opts.allowed_ports)],
                |_| port.is_some_and(|p| opts.allowed_ports.contains(&p)),
            )
            .add_if(
                !opts.blocked_ports.is_empty(),
                "portBlacklist",
                params!["port" => port.map(|p| p.to_string()).unwrap_or_default()],
                |_| port.is_none_or(|p| !opts.blocked_ports.contains(&p)),
            )
            .add_if(
                opts.path_starts_with.is_some(),
                "pathStartsWith",
                params!["startsWith" => opts.path_starts_with.as_deref().unwrap_or_default()],
                |_| opts.path_starts_with.as_deref().is_none_or(|p| path.starts_with(p)),
            )
            .add_if(
                opts.path_ends_with.is_some(),
                "pathEndsWith",
                params!["endsWith" => opts.path_ends_with.as_deref().unwrap_or_default()],
                |_| opts.path_ends_with.as_deref().is_none_or(|p| path.ends_with(p)),
            )
            .add_if(opts.must_have_query, "hasQuery", params![], |url| {
                url.query().is_some_and(|q| !q.is_empty())
            })
            .add_if(opts.must_not_have_query, "noQuery", params![], |url| {
                url.query().is_none()
            })
            .add_if(opts.must_have_fragment, "hasFragment", params![], |url| {
                url.fragment().is_some_and(|f| !f.is_empty())
            })
            .add_if(opts.must_not_have_fragment, "noFragment", params![], |url| {
                url.fragment().is_none()
            })
            .add_if(
                opts.block_localhost || !opts.allow_localhost,
                "localhost",
                params![],
                |_| !localhost,
            )
            .check(&parsed, &reporter)?;

        Ok(Some(value))
    }
}
