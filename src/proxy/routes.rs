/*!
 * Proxy Route Table
 * Static prefix-based dispatch rules, longest match wins
 */

/// One upstream dispatch rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRoute {
    /// Literal path prefix; empty string matches everything
    pub prefix: String,
    /// Remove the matched prefix before forwarding
    pub strip_prefix: bool,
    pub upstream_host: String,
    pub upstream_port: u16,
}

impl ProxyRoute {
    /// A prefix matches exactly, or at a `/` boundary; `/mc-sidecar` does
    /// not match `/mc-sidecar-other`
    fn matches(&self, path: &str) -> bool {
        if self.prefix.is_empty() {
            return true;
        }
        path == self.prefix
            || (path.len() > self.prefix.len()
                && path.starts_with(&self.prefix)
                && path.as_bytes()[self.prefix.len()] == b'/')
    }

    /// Path (with query) to request from the upstream
    pub fn upstream_path(&self, path: &str, query: Option<&str>) -> String {
        let forwarded = if self.strip_prefix {
            let stripped = &path[self.prefix.len()..];
            if stripped.is_empty() {
                "/"
            } else {
                stripped
            }
        } else {
            path
        };
        match query {
            Some(q) => format!("{forwarded}?{q}"),
            None => forwarded.to_string(),
        }
    }

    /// Full upstream URL for a client path
    pub fn upstream_url(&self, path: &str, query: Option<&str>) -> String {
        format!(
            "http://{}:{}{}",
            self.upstream_host,
            self.upstream_port,
            self.upstream_path(path, query)
        )
    }
}

/// Static routing table, not mutated at runtime
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<ProxyRoute>,
}

impl RouteTable {
    /// Build a table; routes are ordered most-specific (longest prefix) first
    pub fn new(mut routes: Vec<ProxyRoute>) -> Self {
        routes.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { routes }
    }

    /// Most specific route matching `path`
    pub fn matching(&self, path: &str) -> Option<&ProxyRoute> {
        self.routes.iter().find(|r| r.matches(path))
    }
}
