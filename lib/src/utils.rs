use idna::domain_to_ascii;
use once_cell::unsync::OnceCell;

use crate::error::{Error, Result};

const MAX_LABEL_LEN: usize = 63;

/// Converts a domain to its ASCII-Compatible Encoding (RFC 3490).
///
/// Domains that are already pure ASCII only have their label lengths
/// checked and are otherwise returned untouched, so normalizing twice is a
/// no-op. Anything else goes through IDNA.
///
/// # Errors
///
/// Returns `Error::InvalidDomain` for an empty domain and `Error::Encoding`
/// when a label cannot be represented.
///
/// # Examples
///
/// ```
/// use whois_chain::utils::normalize_domain;
///
/// assert_eq!(normalize_domain("münchen.de").unwrap(), "xn--mnchen-3ya.de");
/// assert_eq!(normalize_domain("example.com").unwrap(), "example.com");
/// ```
pub fn normalize_domain(domain: &str) -> Result<String> {
    if domain.trim().is_empty() {
        return Err(Error::InvalidDomain);
    }

    if domain.is_ascii() {
        check_labels(domain)?;
        return Ok(domain.to_owned());
    }

    let ace = domain_to_ascii(domain).map_err(|e| Error::Encoding {
        domain: domain.to_owned(),
        reason: format!("{:?}", e),
    })?;
    check_labels(&ace)?;
    Ok(ace)
}

fn check_labels(domain: &str) -> Result<()> {
    // A single trailing dot marks an absolute name and is allowed.
    let relative = domain.strip_suffix('.').unwrap_or(domain);

    for label in relative.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(Error::Encoding {
                domain: domain.to_owned(),
                reason: format!("label {:?} is empty or longer than {} octets", label, MAX_LABEL_LEN),
            });
        }
    }

    Ok(())
}

/// The domain being looked up.
///
/// Keeps the form the user typed and computes the ACE form on first use.
#[derive(Debug, Clone)]
pub struct Domain {
    raw: String,
    ace: OnceCell<String>,
}

impl Domain {
    pub fn new(domain: &str) -> Result<Self> {
        if domain.trim().is_empty() {
            return Err(Error::InvalidDomain);
        }

        Ok(Domain {
            raw: domain.to_owned(),
            ace: OnceCell::new(),
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn ace(&self) -> Result<&str> {
        self.ace
            .get_or_try_init(|| normalize_domain(&self.raw))
            .map(String::as_str)
    }

    /// The form used on the wire: ACE when `rfc3490` is set, raw otherwise.
    pub fn wire(&self, rfc3490: bool) -> Result<&str> {
        if rfc3490 {
            self.ace()
        } else {
            Ok(self.raw())
        }
    }
}
