pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid domain")]
    InvalidDomain,

    #[error("Cannot encode {domain} to ASCII: {reason}")]
    Encoding {
        domain: String,
        reason: String,
    },

    #[error("No root WHOIS server found for {domain}")]
    NoAuthority {
        domain: String,
    },

    #[error("Could not decode whois response from {server}")]
    Decode {
        server: String,
    },

    #[error("Connection to {server} failed: {source}")]
    Transport {
        server: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn transport(server: &str, source: std::io::Error) -> Self {
        Error::Transport { server: server.to_owned(), source }
    }
}
