use once_cell::sync::Lazy;
use regex::Regex;

static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9+.\-]*://").expect("scheme pattern is valid"));

/// Reduce a website (or an email address) to the bare domain label used as
/// classifier evidence: scheme, any mailbox part, `www.`, path/query and one
/// known TLD suffix are removed.
pub fn extract_domain(website: &str, tld_suffixes: &[String]) -> String {
    let lowered = website.trim().to_lowercase();
    let mut domain: &str = &lowered;

    if let Some(m) = SCHEME.find(domain) {
        domain = &domain[m.end()..];
    }
    if let Some(at) = domain.find('@') {
        domain = &domain[at + 1..];
    }
    if let Some(rest) = domain.strip_prefix("www.") {
        domain = rest;
    }
    if let Some(end) = domain.find(['/', '?', '#']) {
        domain = &domain[..end];
    }
    for suffix in tld_suffixes {
        let suffix = suffix.to_lowercase();
        if let Some(stripped) = domain.strip_suffix(suffix.as_str()) {
            domain = stripped;
            break;
        }
    }

    domain.to_string()
}
