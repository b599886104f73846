// IP address validator

use super::prepare;
use crate::messages::Reporter;
use crate::{
    Casing, Input, MessageOverrides, OptionsError, RuleChain, TextPipe, Transform, TrimMode,
    ValidationContext, ValidationResult, Validator,
};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Accepted address families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    V4,
    V6,
    #[default]
    Any,
}

/// An address with an optional prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Network {
    addr: IpAddr,
    prefix: Option<u8>,
}

impl Network {
    fn parse(value: &str) -> Option<Self> {
        match value.split_once('/') {
            Some((addr, prefix)) => {
                let addr: IpAddr = addr.parse().ok()?;
                if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let prefix: u8 = prefix.parse().ok()?;
                let max = if addr.is_ipv4() { 32 } else { 128 };
                (prefix <= max).then_some(Self {
                    addr,
                    prefix: Some(prefix),
                })
            }
            None => value.parse().ok().map(|addr| Self { addr, prefix: None }),
        }
    }

    /// Exact address equality, or membership when this is a CIDR block.
    fn contains(&self, addr: IpAddr) -> bool {
        match (self.prefix, self.addr, addr) {
            (None, net, addr) => net == addr,
            (Some(prefix), IpAddr::V4(net), IpAddr::V4(addr)) => {
                let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
                u32::from(net) & mask == u32::from(addr) & mask
            }
            (Some(prefix), IpAddr::V6(net), IpAddr::V6(addr)) => {
                let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
                u128::from(net) & mask == u128::from(addr) & mask
            }
            _ => false,
        }
    }
}

fn is_private(addr: IpAddr) -> bool {
    match addr {
        IpAddr::V4(v4) => v4.is_private() || v4.is_link_local() || is_shared_v4(v4),
        IpAddr::V6(v6) => is_unique_local_v6(v6) || is_link_local_v6(v6),
    }
}

/// 100.64.0.0/10 carrier-grade NAT.
fn is_shared_v4(addr: Ipv4Addr) -> bool {
    let [a, b, ..] = addr.octets();
    a == 100 && (b & 0b1100_0000) == 0b0100_0000
}

/// fc00::/7
fn is_unique_local_v6(addr: Ipv6Addr) -> bool {
    (addr.segments()[0] & 0xfe00) == 0xfc00
}

/// fe80::/10
fn is_link_local_v6(addr: Ipv6Addr) -> bool {
    (addr.segments()[0] & 0xffc0) == 0xfe80
}

fn parse_list(option: &'static str, entries: &[String]) -> Result<Vec<Network>, OptionsError> {
    entries
        .iter()
        .map(|entry| {
            Network::parse(entry.trim()).ok_or_else(|| OptionsError::InvalidValue {
                option,
                value: entry.clone(),
            })
        })
        .collect()
}

/// Options of [`IpValidator`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IpOptions {
    pub required: bool,
    pub version: IpVersion,
    /// Accept `address/prefix` notation
    pub allow_cidr: bool,
    pub allow_private: bool,
    pub allow_loopback: bool,
    /// When set, only these addresses or blocks are accepted
    pub whitelist: Vec<String>,
    pub blacklist: Vec<String>,
    #[serde(skip)]
    pub transform: Option<Transform>,
    pub messages: MessageOverrides,
}

impl Default for IpOptions {
    fn default() -> Self {
        Self {
            required: true,
            version: IpVersion::Any,
            allow_cidr: false,
            allow_private: true,
            allow_loopback: true,
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            transform: None,
            messages: MessageOverrides::default(),
        }
    }
}

impl IpOptions {
    setters! {
        required: bool,
        version: IpVersion,
        allow_cidr: bool,
        allow_private: bool,
        allow_loopback: bool,
        whitelist: Vec<String>,
        blacklist: Vec<String>,
        transform: Transform,
        messages: MessageOverrides,
    }
}

/// IPv4/IPv6 address validator. The output is trimmed and lower-cased.
#[derive(Debug, Clone)]
pub struct IpValidator {
    options: IpOptions,
    whitelist: Vec<Network>,
    blacklist: Vec<Network>,
}

impl IpValidator {
    pub fn try_new(options: IpOptions) -> Result<Self, OptionsError> {
        let whitelist = parse_list("whitelist", &options.whitelist)?;
        let blacklist = parse_list("blacklist", &options.blacklist)?;
        Ok(Self {
            options,
            whitelist,
            blacklist,
        })
    }

    /// Build the validator; list entries that do not parse are logged and ignored.
    pub fn new(options: IpOptions) -> Self {
        let keep = |option: &'static str, entries: &[String]| -> Vec<Network> {
            entries
                .iter()
                .filter_map(|entry| {
                    let network = Network::parse(entry.trim());
                    if network.is_none() {
                        vetted_log::error!(
                            target: "vetted::validation",
                            "Ignoring ip option {}: {:?}",
                            option,
                            entry
                        );
                    }
                    network
                })
                .collect()
        };
        let whitelist = keep("whitelist", &options.whitelist);
        let blacklist = keep("blacklist", &options.blacklist);
        Self {
            options,
            whitelist,
            blacklist,
        }
    }

    pub fn options(&self) -> &IpOptions {
        &self.options
    }
}

impl Default for IpValidator {
    fn default() -> Self {
        Self::new(IpOptions::default())
    }
}

impl Validator for IpValidator {
    type Output = String;

    fn scope(&self) -> &'static str {
        "ip"
    }

    fn validate_with(&self, input: &Input, ctx: &ValidationContext) -> ValidationResult<String> {
        let opts = &self.options;
        let reporter = Reporter::new(self.scope(), ctx, &opts.messages);
        let pipe = TextPipe::new(TrimMode::Trim, Casing::Lower).transform(opts.transform.as_ref());

        let Some(value) = prepare(pipe, input, opts.required, &reporter)? else {
            return Ok(None);
        };

        let Some(network) = Network::parse(&value) else {
            let code = match opts.version {
                IpVersion::V4 => "ipv4",
                IpVersion::V6 => "ipv6",
                IpVersion::Any => "invalid",
            };
            return Err(reporter.error(code, params![]));
        };
        let addr = network.addr;

        RuleChain::<Network>::new()
            .add_if(opts.version == IpVersion::V4, "ipv4", params![], |n| {
                n.addr.is_ipv4()
            })
            .add_if(opts.version == IpVersion::V6, "ipv6", params![], |n| {
                n.addr.is_ipv6()
            })
            .add("cidr", |n| opts.allow_cidr || n.prefix.is_none())
            .add_if(!self.whitelist.is_empty(), "notInWhitelist", params![], |_| {
                self.whitelist.iter().any(|net| net.contains(addr))
            })
            .add_if(!self.blacklist.is_empty(), "blacklisted", params![], |_| {
                !self.blacklist.iter().any(|net| net.contains(addr))
            })
            .add_if(!opts.allow_private, "private", params![], |_| !is_private(addr))
            .add_if(!opts.allow_loopback, "loopback", params![], |_| {
                !addr.is_loopback()
            })
            .check(&network, &reporter)?;

        Ok(Some(value))
    }
}
