use once_cell::sync::Lazy;
use regex::Regex;

static RE_REFERRAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:refer|whois server|referral url|registrar whois):\s*(\S+\.\S+)").unwrap()
});

static RE_BLANK_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n(?:[ \t]*\r?\n)+").unwrap());

/// Finds the first referral in `response` that points to a server not in
/// `visited`. Server names are compared ignoring ASCII case.
///
/// Referrals given as URLs (`https://...`) are skipped: they are not WHOIS
/// servers.
///
/// # Examples
///
/// ```
/// use whois_chain::referral::extract_whois_server;
///
/// let response = "Registrar WHOIS Server: whois.example-registrar.com\n";
/// let visited: &[&str] = &[];
/// assert_eq!(extract_whois_server(response, visited), Some("whois.example-registrar.com"));
/// ```
pub fn extract_whois_server<'a, S: AsRef<str>>(response: &'a str, visited: &[S]) -> Option<&'a str> {
    response
        .lines()
        .flat_map(|line| RE_REFERRAL.captures_iter(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|server| !server.contains("://") && !visited.iter().any(|v| v.as_ref().eq_ignore_ascii_case(server)))
}

/// Picks the record describing `domain` out of a response holding several
/// records separated by blank lines.
///
/// Returns `None` when no record has a `Domain Name: <DOMAIN>` line.
pub fn select_record<'a>(response: &'a str, domain: &str) -> Option<&'a str> {
    let wanted = format!("Domain Name: {}", domain.to_uppercase());

    RE_BLANK_LINE
        .split(response)
        .find(|record| record.lines().any(|line| line.trim() == wanted))
}
