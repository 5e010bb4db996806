//! Domain classification: which zone to query and which record name to manage.

/// Shape of a configured domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainKind {
    /// Zone apex, e.g. `example.com`.
    Root,
    /// One label below the apex, e.g. `vpn.example.com`.
    Subdomain,
    /// `*.example.com`.
    Wildcard,
}

/// Result of classifying a domain string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub domain: String,
    pub kind: DomainKind,
    /// Key passed to the zone lookup.
    pub zone_query: String,
    /// Name used when creating a record for this domain.
    pub record_name: String,
}

impl Classification {
    /// Record names treated as this domain's record. `None` stands for a null name.
    pub fn acceptable_names(&self) -> Vec<Option<&str>> {
        match self.kind {
            DomainKind::Root => vec![Some(""), Some("@"), None],
            DomainKind::Subdomain | DomainKind::Wildcard => vec![Some(self.record_name.as_str())],
        }
    }

    /// Whether a record with `name` belongs to this domain.
    pub fn accepts(&self, name: Option<&str>) -> bool {
        self.acceptable_names().contains(&name)
    }
}

/// Classify a domain by its leading `*.` and label count. Never fails.
pub fn classify(domain: &str) -> Classification {
    let domain = domain.trim();

    if let Some(base) = domain.strip_prefix("*.") {
        return Classification {
            domain: domain.to_string(),
            kind: DomainKind::Wildcard,
            zone_query: base.to_string(),
            record_name: "*".to_string(),
        };
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let (kind, record_name) = if labels.len() > 2 {
        (DomainKind::Subdomain, labels[0].to_string())
    } else {
        (DomainKind::Root, String::new())
    };

    Classification {
        domain: domain.to_string(),
        kind,
        zone_query: domain.to_string(),
        record_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_domain() {
        for domain in ["example.com", "tnode.ch", "localhost"] {
            let c = classify(domain);
            assert_eq!(c.kind, DomainKind::Root);
            assert_eq!(c.record_name, "");
            assert_eq!(c.zone_query, domain);
            let names = c.acceptable_names();
            assert!(names.contains(&Some("")));
            assert!(names.contains(&Some("@")));
            assert!(names.contains(&None));
        }
    }

    #[test]
    fn test_subdomain() {
        let c = classify("vpn.example.com");
        assert_eq!(c.kind, DomainKind::Subdomain);
        assert_eq!(c.record_name, "vpn");
        assert_eq!(c.zone_query, "vpn.example.com");
        assert_eq!(c.acceptable_names(), vec![Some("vpn")]);
    }

    #[test]
    fn test_deep_subdomain_uses_first_label() {
        let c = classify("a.b.example.com");
        assert_eq!(c.kind, DomainKind::Subdomain);
        assert_eq!(c.record_name, "a");
        assert_eq!(c.zone_query, "a.b.example.com");
    }

    #[test]
    fn test_wildcard() {
        let c = classify("*.example.com");
        assert_eq!(c.kind, DomainKind::Wildcard);
        assert_eq!(c.zone_query, "example.com");
        assert_eq!(c.record_name, "*");
        assert_eq!(c.acceptable_names(), vec![Some("*")]);
    }

    #[test]
    fn test_wildcard_on_subdomain() {
        let c = classify("*.lab.example.com");
        assert_eq!(c.kind, DomainKind::Wildcard);
        assert_eq!(c.zone_query, "lab.example.com");
        assert_eq!(c.record_name, "*");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let c = classify("  sub.example.com \n");
        assert_eq!(c.domain, "sub.example.com");
        assert_eq!(c.record_name, "sub");
    }

    #[test]
    fn test_accepts() {
        let root = classify("example.com");
        assert!(root.accepts(None));
        assert!(root.accepts(Some("")));
        assert!(root.accepts(Some("@")));
        assert!(!root.accepts(Some("www")));

        let sub = classify("www.example.com");
        assert!(sub.accepts(Some("www")));
        assert!(!sub.accepts(Some("")));
        assert!(!sub.accepts(None));

        let wildcard = classify("*.example.com");
        assert!(wildcard.accepts(Some("*")));
        assert!(!wildcard.accepts(Some("www")));
    }
}
