use crate::query::{QueryQuirk, Rewrite};

pub const IANAHOST: &str = "whois.iana.org";
pub const VNICHOST: &str = "whois.verisign-grs.com";
pub const DENICHOST: &str = "whois.denic.de";
pub const DENICHOST_ALIAS: &str = "de.whois-servers.net";
pub const JPRSHOST: &str = "whois.jprs.jp";

pub const DEFAULT_PORT: u16 = 43;

pub struct WhoisServer {
    pub suffix: &'static str,
    pub server: &'static str,
}

/// Servers that IANA does not point to correctly. Matched against the
/// domain as typed, before any network call.
pub static WHOIS_WHERE: &[WhoisServer] = &[
    WhoisServer { suffix: ".ac.uk", server: "whois.ja.net" },
    WhoisServer { suffix: ".ps", server: "whois.pnina.ps" },
    WhoisServer { suffix: ".buzz", server: "whois.nic.buzz" },
    WhoisServer { suffix: ".moe", server: "whois.nic.moe" },

    /* IANA has no answer for a direct registration like example.com */
    WhoisServer { suffix: "example.com", server: VNICHOST },
];

/// Request rewrites, in priority order. The first matching entry wins.
pub static WHOIS_QUIRKS: &[QueryQuirk] = &[
    /* Suppress Japanese output */
    QueryQuirk::new(JPRSHOST, None, Rewrite::append("/e")),

    /* Domain-name lookup in ACE form */
    QueryQuirk::new(DENICHOST, Some(".de"), Rewrite::prefix("-T dn,ace ")),
    QueryQuirk::new(DENICHOST_ALIAS, Some(".de"), Rewrite::prefix("-T dn,ace ")),

    /* Exact match instead of a prefix search */
    QueryQuirk::new(VNICHOST, None, Rewrite::prefix("=")),
];
