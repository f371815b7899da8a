//! Production origin/host allow-list.

use url::Url;

use crate::config::schema::SecurityConfig;

/// Decides whether a request's `Origin`/`Host` headers name an allowed
/// domain. Outside production every request passes.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    production: bool,
    allowed_hosts: Vec<String>,
}

impl OriginPolicy {
    pub fn from_config(config: &SecurityConfig) -> Self {
        let mut allowed_hosts = Vec::new();

        if let Some(site_url) = &config.site_url {
            if let Some(host) = Url::parse(site_url).ok().and_then(|u| u.host_str().map(str::to_owned)) {
                allowed_hosts.push(host);
            }
        }
        if let Some(domain) = &config.allowed_domain {
            allowed_hosts.push(domain.clone());
        }
        if !config.production_domain.is_empty() {
            allowed_hosts.push(config.production_domain.clone());
        }

        Self {
            production: config.environment.is_production(),
            allowed_hosts,
        }
    }

    /// Check the `Origin` and `Host` header values of a request. Either one
    /// naming an allowed host is enough.
    pub fn permits(&self, origin: Option<&str>, host: Option<&str>) -> bool {
        if !self.production {
            return true;
        }

        if let Some(origin) = origin {
            if let Some(origin_host) = origin_header_host(origin) {
                if self.host_allowed(&origin_host) {
                    return true;
                }
            }
        }

        if let Some(host) = host {
            if self.host_allowed(&strip_port(host)) {
                return true;
            }
        }

        false
    }

    /// Exact match or dot-boundary suffix match, so `app.calira.com` passes
    /// for `calira.com` while `evil-calira.com.attacker.net` does not.
    fn host_allowed(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.allowed_hosts.iter().any(|allowed| {
            let allowed = allowed.to_ascii_lowercase();
            host == allowed || host.ends_with(&format!(".{allowed}"))
        })
    }
}

/// Reduce an `Origin` header value to its host, if it parses as a URL.
fn origin_header_host(origin: &str) -> Option<String> {
    Url::parse(origin)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
}

/// Strip a port from a `Host` header value. Bracketed IPv6 literals keep
/// their brackets stripped as well.
fn strip_port(host: &str) -> String {
    if let Some(rest) = host.strip_prefix('[') {
        if let Some((addr, _)) = rest.split_once(']') {
            return addr.to_string();
        }
    }
    match host.rsplit_once(':') {
        Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name.to_string(),
        _ => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::Environment;

    fn production_policy() -> OriginPolicy {
        let config = SecurityConfig {
            environment: Environment::Production,
            site_url: Some("https://app.calira.com".to_string()),
            allowed_domain: Some("staging.calira.dev".to_string()),
            production_domain: "calira.com".to_string(),
            rate_limit: Default::default(),
        };
        OriginPolicy::from_config(&config)
    }

    #[test]
    fn test_development_always_passes() {
        let policy = OriginPolicy::from_config(&SecurityConfig::default());
        assert!(policy.permits(Some("https://anywhere.example"), None));
        assert!(policy.permits(None, None));
    }

    #[test]
    fn test_production_rejects_unknown_origin_and_host() {
        let policy = production_policy();
        assert!(!policy.permits(Some("https://attacker.net"), Some("attacker.net")));
        assert!(!policy.permits(None, None));
    }

    #[test]
    fn test_origin_match_allows() {
        let policy = production_policy();
        assert!(policy.permits(Some("https://calira.com"), None));
        assert!(policy.permits(Some("https://app.calira.com/board"), None));
        assert!(policy.permits(Some("https://staging.calira.dev"), None));
    }

    #[test]
    fn test_host_match_allows_with_port() {
        let policy = production_policy();
        assert!(policy.permits(None, Some("calira.com:443")));
        assert!(policy.permits(None, Some("app.calira.com")));
    }

    #[test]
    fn test_substring_tricks_are_rejected() {
        let policy = production_policy();
        // Contains "calira.com" as a substring but is not a subdomain of it.
        assert!(!policy.permits(Some("https://evil-calira.com.attacker.net"), None));
        assert!(!policy.permits(None, Some("evil-calira.com.attacker.net")));
        assert!(!policy.permits(None, Some("notcalira.com")));
    }

    #[test]
    fn test_case_insensitive_host_compare() {
        let policy = production_policy();
        assert!(policy.permits(None, Some("Calira.COM")));
        assert!(policy.permits(None, Some("APP.calira.com")));
    }
}
