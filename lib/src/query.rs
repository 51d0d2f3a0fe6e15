use std::borrow::Cow;

use crate::data::WHOIS_QUIRKS;

/// How a matching quirk changes the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// Put the text in front of the domain.
    Prefix(Cow<'static, str>),
    /// Put the text after the domain.
    Append(Cow<'static, str>),
}

impl Rewrite {
    pub const fn prefix(text: &'static str) -> Self {
        Rewrite::Prefix(Cow::Borrowed(text))
    }

    pub const fn append(text: &'static str) -> Self {
        Rewrite::Append(Cow::Borrowed(text))
    }

    fn apply(&self, domain: &str) -> String {
        match self {
            Rewrite::Prefix(text) => format!("{}{}", text, domain),
            Rewrite::Append(text) => format!("{}{}", domain, text),
        }
    }
}

/// A server-specific request rule.
///
/// The rule applies when the target server equals `server` (ignoring ASCII
/// case) and, if `domain_suffix` is set, the domain ends with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryQuirk {
    pub server: Cow<'static, str>,
    pub domain_suffix: Option<Cow<'static, str>>,
    pub rewrite: Rewrite,
}

impl QueryQuirk {
    pub const fn new(server: &'static str, domain_suffix: Option<&'static str>, rewrite: Rewrite) -> Self {
        QueryQuirk {
            server: Cow::Borrowed(server),
            domain_suffix: match domain_suffix {
                Some(suffix) => Some(Cow::Borrowed(suffix)),
                None => None,
            },
            rewrite,
        }
    }

    pub fn matches(&self, domain: &str, server: &str) -> bool {
        if !server.eq_ignore_ascii_case(&self.server) {
            return false;
        }

        match &self.domain_suffix {
            Some(suffix) => ends_with_ignore_case(domain, suffix),
            None => true,
        }
    }
}

/// Builds request lines, one per (domain, server) pair.
#[derive(Debug, Clone)]
pub struct QueryFormatter {
    quirks: Vec<QueryQuirk>,
}

impl Default for QueryFormatter {
    fn default() -> Self {
        QueryFormatter { quirks: WHOIS_QUIRKS.to_vec() }
    }
}

impl QueryFormatter {
    /// Adds a rule after the existing ones, so built-in rules keep priority.
    pub fn with_quirk(mut self, quirk: QueryQuirk) -> Self {
        self.quirks.push(quirk);
        self
    }

    /// Returns the line to send to `server`, without the trailing CRLF.
    pub fn format_request(&self, domain: &str, server: &str) -> String {
        match self.quirks.iter().find(|quirk| quirk.matches(domain, server)) {
            Some(quirk) => quirk.rewrite.apply(domain),
            None => domain.to_owned(),
        }
    }
}

pub(crate) fn ends_with_ignore_case(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.is_char_boundary(s.len() - suffix.len())
        && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
