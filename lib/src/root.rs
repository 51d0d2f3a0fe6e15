use std::borrow::Cow;

use crate::data::WHOIS_WHERE;
use crate::query::ends_with_ignore_case;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RootServer {
    suffix: Cow<'static, str>,
    server: Cow<'static, str>,
}

/// Suffix → server overrides consulted before asking IANA.
///
/// Entries are kept sorted longest suffix first so that the most specific
/// entry always wins regardless of insertion order.
#[derive(Debug, Clone)]
pub struct RootServers {
    entries: Vec<RootServer>,
}

impl Default for RootServers {
    fn default() -> Self {
        let mut servers = RootServers { entries: Vec::new() };
        for entry in WHOIS_WHERE {
            servers.insert(entry.suffix, entry.server);
        }
        servers
    }
}

impl RootServers {
    /// Adds an entry, replacing any existing entry with the same suffix.
    pub fn insert(&mut self, suffix: impl Into<Cow<'static, str>>, server: impl Into<Cow<'static, str>>) {
        let suffix = suffix.into();
        let server = server.into();

        self.entries.retain(|entry| !entry.suffix.eq_ignore_ascii_case(&suffix));
        // Stable position: after every longer suffix, before every shorter one.
        let pos = self
            .entries
            .iter()
            .position(|entry| entry.suffix.len() < suffix.len())
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, RootServer { suffix, server });
    }

    /// Returns the server of the longest matching suffix, if any.
    pub fn lookup(&self, domain: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| ends_with_ignore_case(domain, &entry.suffix))
            .map(|entry| entry.server.as_ref())
    }
}
