//! Domain input validation and normalization.
//!
//! The pipeline only ever sees bare hostnames. Clients validate before
//! issuing any HTTP request; the orchestrator re-checks for emptiness as
//! a last guard before collaborator calls.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AuditError, Result};

/// Bare hostname: one or more dot-separated labels, with a final label
/// of at least two alphabetic characters.
static DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}$")
        .expect("domain pattern compiles")
});

/// Lowercase the input and strip scheme and path noise.
///
/// `https://Patagonia.com/shop` normalizes to `patagonia.com`.
pub fn normalize_domain(input: &str) -> String {
    let mut host = input.trim().to_ascii_lowercase();
    for scheme in ["https://", "http://"] {
        if let Some(rest) = host.strip_prefix(scheme) {
            host = rest.to_string();
            break;
        }
    }
    if let Some(slash) = host.find('/') {
        host.truncate(slash);
    }
    host
}

/// Validate a user-supplied domain, returning the normalized hostname.
pub fn validate_domain(input: &str) -> Result<String> {
    let host = normalize_domain(input);
    if host.is_empty() {
        return Err(AuditError::InvalidDomain {
            reason: "domain is empty".into(),
        });
    }
    if !DOMAIN_RE.is_match(&host) {
        return Err(AuditError::InvalidDomain {
            reason: format!("`{host}` is not a valid hostname"),
        });
    }
    Ok(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_domain() {
        assert_eq!(validate_domain("patagonia.com").unwrap(), "patagonia.com");
    }

    #[test]
    fn accepts_multi_label_host() {
        assert_eq!(
            validate_domain("zambia.steers.africa").unwrap(),
            "zambia.steers.africa"
        );
    }

    #[test]
    fn strips_scheme_and_path() {
        assert_eq!(
            validate_domain("https://Patagonia.com/shop/jackets").unwrap(),
            "patagonia.com"
        );
        assert_eq!(validate_domain("http://acme.io").unwrap(), "acme.io");
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            validate_domain("   "),
            Err(AuditError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn rejects_free_text() {
        assert!(validate_domain("not a domain").is_err());
    }

    #[test]
    fn rejects_missing_dot() {
        assert!(validate_domain("patagonia").is_err());
    }

    #[test]
    fn rejects_short_or_numeric_tld() {
        assert!(validate_domain("brand.c").is_err());
        assert!(validate_domain("brand.123").is_err());
    }
}
