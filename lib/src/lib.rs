//! WHOIS (RFC 3912) lookups that follow referrals.
//!
//! The first server comes from a small override table or from IANA. Every
//! response is scanned for a pointer to a more specific server, which is
//! queried in turn until no new server shows up.
//!
//! ```no_run
//! let responses = whois_chain::resolve_raw("example.org", None, true, false)?;
//! for response in &responses {
//!     println!("{}", response);
//! }
//! # Ok::<(), whois_chain::error::Error>(())
//! ```

pub mod data;
pub mod error;
pub mod query;
pub mod referral;
pub mod root;
pub mod transport;
pub mod utils;

use std::borrow::Cow;
use std::collections::VecDeque;

use log::debug;

use crate::data::{DEFAULT_PORT, IANAHOST, VNICHOST};
use crate::error::{Error, Result};
use crate::query::{QueryFormatter, QueryQuirk};
use crate::referral::{extract_whois_server, select_record};
use crate::root::RootServers;
use crate::transport::{decode_response, ResponseEncoding, TcpTransport, Transport, DEFAULT_ENCODINGS};
use crate::utils::Domain;

/// Options for a single resolution.
#[derive(Debug, Clone)]
pub struct Lookup {
    server: Option<String>,
    never_cut: bool,
    rfc3490: bool,
}

impl Default for Lookup {
    fn default() -> Self {
        Lookup {
            server: None,
            never_cut: false,
            rfc3490: true,
        }
    }
}

impl Lookup {
    pub fn new() -> Self {
        Lookup::default()
    }

    /// Start at `server` instead of locating the root server.
    pub fn server(mut self, server: impl Into<String>) -> Self {
        self.server = Some(server.into());
        self
    }

    /// Keep full verisign responses in the chain instead of the selected record.
    pub fn never_cut(mut self, never_cut: bool) -> Self {
        self.never_cut = never_cut;
        self
    }

    /// Send the ACE form of the domain. On by default.
    pub fn rfc3490(mut self, rfc3490: bool) -> Self {
        self.rfc3490 = rfc3490;
        self
    }

    fn explicit_server(&self) -> Option<&str> {
        self.server.as_deref().filter(|server| !server.is_empty())
    }
}

/// Responses collected along a referral chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhoisChain {
    /// Newest first: the last server queried comes at index 0.
    pub responses: Vec<String>,
    /// Servers in the order they were queried.
    pub servers: Vec<String>,
}

/// What one server said, as kept in the chain and as scanned for referrals.
struct Reply {
    kept: String,
    scanned: String,
}

/// Finds the authoritative WHOIS server for a domain and chases referrals.
#[derive(Debug, Clone)]
pub struct Resolver<T = TcpTransport> {
    roots: RootServers,
    formatter: QueryFormatter,
    transport: T,
    encodings: Vec<ResponseEncoding>,
    iana_server: String,
    port: u16,
}

impl Default for Resolver<TcpTransport> {
    fn default() -> Self {
        Resolver {
            roots: RootServers::default(),
            formatter: QueryFormatter::default(),
            transport: TcpTransport::new(),
            encodings: DEFAULT_ENCODINGS.to_vec(),
            iana_server: IANAHOST.to_owned(),
            port: DEFAULT_PORT,
        }
    }
}

impl Resolver<TcpTransport> {
    pub fn new() -> Self {
        Resolver::default()
    }
}

impl<T: Transport> Resolver<T> {
    pub fn with_transport<U: Transport>(self, transport: U) -> Resolver<U> {
        Resolver {
            roots: self.roots,
            formatter: self.formatter,
            transport,
            encodings: self.encodings,
            iana_server: self.iana_server,
            port: self.port,
        }
    }

    pub fn with_root_server(
        mut self,
        suffix: impl Into<Cow<'static, str>>,
        server: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.roots.insert(suffix, server);
        self
    }

    pub fn with_quirk(mut self, quirk: QueryQuirk) -> Self {
        self.formatter = self.formatter.with_quirk(quirk);
        self
    }

    pub fn with_encodings(mut self, encodings: &[ResponseEncoding]) -> Self {
        self.encodings = encodings.to_vec();
        self
    }

    pub fn with_iana_server(mut self, server: impl Into<String>) -> Self {
        self.iana_server = server.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `request` as is to `server` and decodes the answer.
    pub fn whois_request(&self, request: &str, server: &str) -> Result<String> {
        let bytes = self.transport.query(server, self.port, request)?;
        decode_response(&bytes, server, &self.encodings)
    }

    /// Finds the server to ask first about `domain`.
    ///
    /// # Errors
    ///
    /// `Error::NoAuthority` when IANA does not name a server for the domain.
    pub fn locate_root(&self, domain: &str) -> Result<String> {
        let domain = Domain::new(domain)?;
        self.root_server(&domain, true)
    }

    fn root_server(&self, domain: &Domain, rfc3490: bool) -> Result<String> {
        if let Some(server) = self.roots.lookup(domain.raw()) {
            debug!("Using override {} for {}", server, domain.raw());
            return Ok(server.to_owned());
        }

        let query = domain.wire(rfc3490)?;
        debug!("Asking {} for the root server of {}", self.iana_server, query);
        let response = self.whois_request(query, &self.iana_server)?;
        let visited: &[&str] = &[];

        extract_whois_server(&response, visited)
            .map(str::to_owned)
            .ok_or_else(|| Error::NoAuthority { domain: domain.raw().to_owned() })
    }

    /// Queries servers for `domain`, following referrals until none is left.
    ///
    /// Nothing collected so far is returned if a server fails.
    pub fn resolve(&self, domain: &str, lookup: &Lookup) -> Result<WhoisChain> {
        let domain = Domain::new(domain)?;
        let wire = domain.wire(lookup.rfc3490)?;

        let mut server = match lookup.explicit_server() {
            Some(server) => server.to_owned(),
            None => self.root_server(&domain, lookup.rfc3490)?,
        };

        let mut responses = VecDeque::new();
        let mut servers: Vec<String> = Vec::new();

        loop {
            let request = self.formatter.format_request(wire, &server);
            debug!("Querying {} with {:?}", server, request);

            let response = self.whois_request(&request, &server)?;
            let reply = self.select(response, wire, &server, lookup.never_cut);
            responses.push_front(reply.kept);
            servers.push(server);

            match extract_whois_server(&reply.scanned, &servers) {
                Some(next) => {
                    debug!("Following referral to {}", next);
                    server = next.to_owned();
                }
                None => break,
            }
        }

        Ok(WhoisChain {
            responses: responses.into(),
            servers,
        })
    }

    /// Verisign may answer with several records. Referrals are always taken
    /// from the record for `domain`; the chain gets that record too unless
    /// `never_cut` asks for the full response.
    fn select(&self, response: String, domain: &str, server: &str, never_cut: bool) -> Reply {
        let record = if server.eq_ignore_ascii_case(VNICHOST) {
            let record = select_record(&response, domain).map(str::to_owned);
            if record.is_none() {
                debug!("No record for {} in response from {}, keeping all of it", domain, server);
            }
            record
        } else {
            None
        };

        match record {
            Some(record) if never_cut => Reply { kept: response, scanned: record },
            Some(record) => Reply { kept: record.clone(), scanned: record },
            None => Reply { kept: response.clone(), scanned: response },
        }
    }
}

/// Resolves `domain` with the default tables over TCP and returns the
/// responses, newest first.
///
/// An empty `server` is the same as `None`.
pub fn resolve_raw(domain: &str, server: Option<&str>, rfc3490: bool, never_cut: bool) -> Result<Vec<String>> {
    let mut lookup = Lookup::new().rfc3490(rfc3490).never_cut(never_cut);
    if let Some(server) = server {
        lookup = lookup.server(server);
    }

    Resolver::new().resolve(domain, &lookup).map(|chain| chain.responses)
}

/// Returns the first server to query for `domain`.
pub fn locate_root(domain: &str) -> Result<String> {
    Resolver::new().locate_root(domain)
}
