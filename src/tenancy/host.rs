//! Host string helpers for tenant lookup.

/// Split `host[:port]` into the bare host and the port, if any.
///
/// Bracketed IPv6 literals keep their brackets; a bare IPv6 literal without
/// brackets is returned unchanged since its colons are not a port.
pub fn split_port(host: &str) -> (&str, Option<&str>) {
    if let Some(rest) = host.strip_prefix('[') {
        return match rest.find(']') {
            Some(end) => {
                let bare = &host[..end + 2];
                let port = host[end + 2..].strip_prefix(':').filter(|p| !p.is_empty());
                (bare, port)
            }
            None => (host, None),
        };
    }

    match host.rsplit_once(':') {
        Some((bare, port))
            if !bare.contains(':') && !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) =>
        {
            (bare, Some(port))
        }
        _ => (host, None),
    }
}

pub fn strip_port(host: &str) -> &str {
    split_port(host).0
}

/// Lowercase and trim a host value taken from a header
pub fn normalize(host: &str) -> Option<String> {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// Whether the bare host looks like a developer machine
pub fn is_local(bare_host: &str, local_hosts: &[String]) -> bool {
    local_hosts.iter().any(|local| bare_host.contains(local.as_str()))
}

/// First DNS label of a local host, e.g. `acme` for `acme.localhost`.
///
/// Returns `None` when the host is the local host itself (`localhost`,
/// `127.0.0.1`) and so carries no tenant label.
pub fn tenant_label<'a>(bare_host: &'a str, local_hosts: &[String]) -> Option<&'a str> {
    let (label, rest) = bare_host.split_once('.')?;
    if label.is_empty() || rest.is_empty() {
        return None;
    }
    if local_hosts.iter().any(|local| bare_host.starts_with(local.as_str())) {
        return None;
    }
    Some(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locals() -> Vec<String> {
        vec!["localhost".to_string(), "127.0.0.1".to_string()]
    }

    #[test]
    fn splits_port_from_host() {
        assert_eq!(split_port("acme.localhost:3000"), ("acme.localhost", Some("3000")));
        assert_eq!(split_port("coop.example.ng"), ("coop.example.ng", None));
        assert_eq!(split_port("[::1]:8080"), ("[::1]", Some("8080")));
        assert_eq!(split_port("[::1]"), ("[::1]", None));
        assert_eq!(split_port("::1"), ("::1", None));
        assert_eq!(split_port("host:abc"), ("host:abc", None));
    }

    #[test]
    fn normalizes_case_and_trailing_dot() {
        assert_eq!(normalize(" Acme.Example.NG. ").as_deref(), Some("acme.example.ng"));
        assert_eq!(normalize("   "), None);
    }

    #[test]
    fn detects_local_hosts() {
        assert!(is_local("acme.localhost", &locals()));
        assert!(is_local("127.0.0.1", &locals()));
        assert!(!is_local("acme.example.ng", &locals()));
    }

    #[test]
    fn extracts_tenant_label_from_local_subdomain() {
        assert_eq!(tenant_label("acme.localhost", &locals()), Some("acme"));
        assert_eq!(tenant_label("localhost", &locals()), None);
        assert_eq!(tenant_label("127.0.0.1", &locals()), None);
        assert_eq!(tenant_label("localhost.acme", &locals()), None);
    }
}
