//! Targets and the work items submitted to the queue

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::Error;

/// A validated `host:port` address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    host: String,
    port: u16,
}

impl Target {
    /// Create a target from its parts
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Host part, brackets included for IPv6 literals
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port part
    pub fn port(&self) -> u16 {
        self.port
    }

    /// URL requested for this target (always the root path over plain HTTP)
    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains("://") {
            return Err(Error::config(format!(
                "target '{s}' must be host:port without a scheme"
            )));
        }

        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::config(format!("target '{s}' is missing a port")))?;

        if host.is_empty() {
            return Err(Error::config(format!("target '{s}' has an empty host")));
        }
        if host.chars().any(char::is_whitespace) || host.contains('/') {
            return Err(Error::config(format!("target '{s}' has an invalid host")));
        }
        if host.starts_with('[') {
            if !host.ends_with(']') || host.len() < 3 {
                return Err(Error::config(format!(
                    "target '{s}' has a malformed IPv6 host"
                )));
            }
        } else if host.contains(':') {
            return Err(Error::config(format!(
                "target '{s}' must bracket IPv6 hosts, e.g. [::1]:9000"
            )));
        }

        let port = port
            .parse::<u16>()
            .map_err(|_| Error::config(format!("target '{s}' has an invalid port")))?;

        Ok(Self::new(host, port))
    }
}

/// One unit of work: a single GET against the target
///
/// Items carry no identity beyond their target; the target itself is shared
/// so cloning an item never copies the host string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    target: Arc<Target>,
}

impl WorkItem {
    /// Create a work item for the given target
    pub fn new(target: Arc<Target>) -> Self {
        Self { target }
    }

    /// Target this item is addressed to
    pub fn target(&self) -> &Target {
        &self.target
    }
}

/// Produces a fixed number of identical work items
#[derive(Debug, Clone)]
pub struct WorkSource {
    target: Arc<Target>,
    remaining: usize,
}

impl WorkSource {
    /// Create a source yielding `total` items for `target`
    pub fn new(target: Target, total: usize) -> Self {
        Self {
            target: Arc::new(target),
            remaining: total,
        }
    }
}

impl Iterator for WorkSource {
    type Item = WorkItem;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(WorkItem::new(Arc::clone(&self.target)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for WorkSource {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parse() {
        let target: Target = "localhost:9000".parse().unwrap();
        assert_eq!(target.host(), "localhost");
        assert_eq!(target.port(), 9000);
        assert_eq!(target.to_string(), "localhost:9000");
        assert_eq!(target.url(), "http://localhost:9000/");
    }

    #[test]
    fn test_target_parse_ipv6() {
        let target: Target = "[::1]:8080".parse().unwrap();
        assert_eq!(target.host(), "[::1]");
        assert_eq!(target.url(), "http://[::1]:8080/");
    }

    #[test]
    fn test_target_parse_rejects_malformed() {
        for bad in [
            "localhost",
            ":9000",
            "localhost:",
            "localhost:99999",
            "localhost:abc",
            "http://localhost:9000",
            "::1:9000",
            "[::1:9000",
            "local host:80",
        ] {
            assert!(bad.parse::<Target>().is_err(), "accepted {bad}");
        }
    }

    #[test]
    fn test_source_yields_identical_items() {
        let target = Target::new("localhost", 9000);
        let source = WorkSource::new(target.clone(), 5);
        assert_eq!(source.len(), 5);

        let items: Vec<_> = source.collect();
        assert_eq!(items.len(), 5);
        assert!(items.iter().all(|item| item.target() == &target));
    }

    #[test]
    fn test_source_empty() {
        let mut source = WorkSource::new(Target::new("localhost", 9000), 0);
        assert_eq!(source.len(), 0);
        assert!(source.next().is_none());
    }
}
