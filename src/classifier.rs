//! Rule line classification.
//!
//! Turns a raw text line into a [`ClassifiedRule`]: either by preserving an
//! explicit `CATEGORY,value[,modifier]` prefix, or by inferring the category
//! from the shape of the bare value. Inference runs through a fixed, ordered
//! table of predicate rules so every shape check is independently testable
//! and the result is deterministic for identical input.

use ipnet::{Ipv4Net, Ipv6Net};
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Line prefixes treated as comments across the common list formats.
pub const COMMENT_PREFIXES: &[char] = &['#', '!', '/', ';', '['];

/// Rule categories understood by routing clients.
///
/// Declaration order is the output order: files group categories in exactly
/// this sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleCategory {
    Domain,
    DomainKeyword,
    DomainSuffix,
    IpAsn,
    IpCidr,
    IpCidr6,
    ProcessName,
}

impl RuleCategory {
    /// All categories in output order.
    pub const ALL: [RuleCategory; 7] = [
        RuleCategory::Domain,
        RuleCategory::DomainKeyword,
        RuleCategory::DomainSuffix,
        RuleCategory::IpAsn,
        RuleCategory::IpCidr,
        RuleCategory::IpCidr6,
        RuleCategory::ProcessName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Domain => "DOMAIN",
            RuleCategory::DomainKeyword => "DOMAIN-KEYWORD",
            RuleCategory::DomainSuffix => "DOMAIN-SUFFIX",
            RuleCategory::IpAsn => "IP-ASN",
            RuleCategory::IpCidr => "IP-CIDR",
            RuleCategory::IpCidr6 => "IP-CIDR6",
            RuleCategory::ProcessName => "PROCESS-NAME",
        }
    }

    /// Parse an explicit category token, e.g. `"DOMAIN-SUFFIX"`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "DOMAIN" => Some(RuleCategory::Domain),
            "DOMAIN-KEYWORD" => Some(RuleCategory::DomainKeyword),
            "DOMAIN-SUFFIX" => Some(RuleCategory::DomainSuffix),
            "IP-ASN" => Some(RuleCategory::IpAsn),
            "IP-CIDR" => Some(RuleCategory::IpCidr),
            "IP-CIDR6" => Some(RuleCategory::IpCidr6),
            "PROCESS-NAME" => Some(RuleCategory::ProcessName),
            _ => None,
        }
    }

    /// Categories whose values must look like a host or address
    /// (contain `.` or `:`).
    fn requires_host_shape(&self) -> bool {
        matches!(
            self,
            RuleCategory::Domain
                | RuleCategory::DomainSuffix
                | RuleCategory::IpCidr
                | RuleCategory::IpCidr6
        )
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single classified rule: `(category, value, optional modifier)`.
///
/// The derived ordering (category, then value, then modifier) is what the
/// writer relies on for grouped, alphabetically sorted output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassifiedRule {
    pub category: RuleCategory,
    pub value: String,
    pub modifier: Option<String>,
}

impl ClassifiedRule {
    pub fn new(category: RuleCategory, value: impl Into<String>) -> Self {
        Self {
            category,
            value: value.into(),
            modifier: None,
        }
    }

    pub fn with_modifier(
        category: RuleCategory,
        value: impl Into<String>,
        modifier: impl Into<String>,
    ) -> Self {
        Self {
            category,
            value: value.into(),
            modifier: Some(modifier.into()),
        }
    }
}

impl fmt::Display for ClassifiedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.modifier {
            Some(m) => write!(f, "{},{},{}", self.category, self.value, m),
            None => write!(f, "{},{}", self.category, self.value),
        }
    }
}

/// One entry of the inference table: a shape check that yields the rule
/// value when the line matches.
struct Inference {
    category: RuleCategory,
    extract: fn(&str) -> Option<String>,
}

/// Ordered inference table. CIDR shapes run before bare addresses so that
/// `10.0.0.0/8` never falls through to the address check, and both run
/// before the domain checks so dotted IPs are never misfiled as domains.
const INFERENCES: &[Inference] = &[
    Inference {
        category: RuleCategory::IpCidr,
        extract: ipv4_cidr,
    },
    Inference {
        category: RuleCategory::IpCidr6,
        extract: ipv6_cidr,
    },
    Inference {
        category: RuleCategory::IpCidr,
        extract: ipv4_addr,
    },
    Inference {
        category: RuleCategory::IpCidr6,
        extract: ipv6_addr,
    },
    Inference {
        category: RuleCategory::DomainSuffix,
        extract: wildcard_suffix,
    },
    Inference {
        category: RuleCategory::Domain,
        extract: bare_domain,
    },
];

fn ipv4_cidr(s: &str) -> Option<String> {
    s.parse::<Ipv4Net>().ok().map(|_| s.to_string())
}

fn ipv6_cidr(s: &str) -> Option<String> {
    s.parse::<Ipv6Net>().ok().map(|_| s.to_string())
}

fn ipv4_addr(s: &str) -> Option<String> {
    s.parse::<Ipv4Addr>().ok().map(|_| s.to_string())
}

fn ipv6_addr(s: &str) -> Option<String> {
    s.parse::<Ipv6Addr>().ok().map(|_| s.to_string())
}

/// Leading-wildcard suffix conventions: `*.t.me`, `+.t.me`, `.t.me`.
/// The wildcard marker is stripped; the remainder is the suffix value.
fn wildcard_suffix(s: &str) -> Option<String> {
    let stripped = s
        .strip_prefix("*.")
        .or_else(|| s.strip_prefix("+."))
        .or_else(|| s.strip_prefix('.'))?;
    if stripped.is_empty() || stripped.contains(['*', '+']) {
        return None;
    }
    Some(stripped.to_string())
}

/// Bare domain-like token: contains a dot, no wildcard markers, no path
/// separator, no whitespace. Kept deliberately loose; this is the
/// nearest-category fallback for ambiguous dotted tokens.
fn bare_domain(s: &str) -> Option<String> {
    if s.contains('.')
        && !s.contains(['*', '+', '/'])
        && !s.starts_with('.')
        && !s.contains(char::is_whitespace)
    {
        Some(s.to_string())
    } else {
        None
    }
}

/// A token that reads like a `CATEGORY,` marker (upper-case letters and
/// dashes) but is not one of the categories this tool emits.
fn looks_like_category_token(token: &str) -> bool {
    token.len() >= 2
        && token.chars().any(|c| c.is_ascii_uppercase())
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
}

/// Classify a raw line. Returns `None` for empty lines, comments, and lines
/// that match no category shape.
pub fn classify(raw: &str) -> Option<ClassifiedRule> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIXES) {
        return None;
    }

    // Explicit category prefix always wins over pattern inference.
    if let Some((token, rest)) = line.split_once(',') {
        if let Some(category) = RuleCategory::from_token(token) {
            return parse_prefixed(category, rest);
        }
        // An unrecognized marker like `URL-REGEX,` is a category this tool
        // does not emit, not an ambiguous bare value.
        if looks_like_category_token(token) {
            return None;
        }
    }

    infer(line)
}

/// Extract value and modifier from the remainder of an explicitly prefixed
/// line. Everything after the second comma is kept verbatim as the modifier.
fn parse_prefixed(category: RuleCategory, rest: &str) -> Option<ClassifiedRule> {
    let (value, modifier) = match rest.split_once(',') {
        Some((v, m)) => (v.trim(), Some(m.trim())),
        None => (rest.trim(), None),
    };

    if value.is_empty() {
        return None;
    }
    if category.requires_host_shape() && !value.contains(['.', ':']) {
        return None;
    }

    Some(ClassifiedRule {
        category,
        value: value.to_string(),
        modifier: modifier.filter(|m| !m.is_empty()).map(str::to_string),
    })
}

fn infer(line: &str) -> Option<ClassifiedRule> {
    for rule in INFERENCES {
        if let Some(value) = (rule.extract)(line) {
            return Some(ClassifiedRule::new(rule.category, value));
        }
    }
    None
}

/// Outcome of classifying a batch of lines.
#[derive(Debug, Default)]
pub struct Classified {
    pub rules: Vec<ClassifiedRule>,
    pub rejected: usize,
}

/// Classify a batch of already-extracted rule lines, counting rejects.
/// Rejected lines are filtered, not logged individually; the caller logs
/// the summary count.
pub fn classify_lines<I, S>(lines: I) -> Classified
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Classified::default();
    for line in lines {
        match classify(line.as_ref()) {
            Some(rule) => out.rules.push(rule),
            None => out.rejected += 1,
        }
    }
    out
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn ipv4_cidr_string_strategy() -> impl Strategy<Value = String> {
        (0u8..=255, 0u8..=255, 0u8..=255, 0u8..=255, 0u8..=32)
            .prop_map(|(a, b, c, d, prefix)| format!("{}.{}.{}.{}/{}", a, b, c, d, prefix))
    }

    fn domain_string_strategy() -> impl Strategy<Value = String> {
        ("[a-z][a-z0-9-]{0,10}", "[a-z]{2,6}").prop_map(|(label, tld)| format!("{}.{}", label, tld))
    }

    proptest! {
        /// Any IPv4 CIDR shape lands in IP-CIDR.
        #[test]
        fn prop_ipv4_cidr_classified(cidr in ipv4_cidr_string_strategy()) {
            let rule = classify(&cidr).unwrap();
            prop_assert_eq!(rule.category, RuleCategory::IpCidr);
            prop_assert_eq!(rule.value, cidr);
        }

        /// Any generated domain lands in DOMAIN, and with a wildcard prefix
        /// in DOMAIN-SUFFIX.
        #[test]
        fn prop_domains_classified(domain in domain_string_strategy()) {
            let bare = classify(&domain).unwrap();
            prop_assert_eq!(bare.category, RuleCategory::Domain);

            let wild = classify(&format!("*.{}", domain)).unwrap();
            prop_assert_eq!(wild.category, RuleCategory::DomainSuffix);
            prop_assert_eq!(wild.value, domain);
        }

        /// Classification never panics on arbitrary input.
        #[test]
        fn prop_classify_no_panic(line in ".{0,200}") {
            let _ = classify(&line);
        }

        /// Classification is deterministic.
        #[test]
        fn prop_classify_deterministic(line in ".{0,100}") {
            prop_assert_eq!(classify(&line), classify(&line));
        }
    }
}
