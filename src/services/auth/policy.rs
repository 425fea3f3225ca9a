//! Route gate: an ordered (method, path) → requirement table, first match wins,
//! everything unmatched is denied.

use axum::http::Method;

use crate::services::auth::identity::Identity;

/// Outcome of the route gate. A denial is an ordinary value, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    /// Route needs an authority and the request carries no identity (401).
    Unauthenticated,
    /// Identity lacks the authority, or no rule matches at all (403).
    AuthorityDenied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authority(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    /// `/prefix/**`: the prefix itself and everything below it.
    Subtree(String),
}

impl PathPattern {
    /// `"/auth/**"` becomes a subtree, anything else is matched literally.
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => Self::Subtree(prefix.to_string()),
            None => Self::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Subtree(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteRule {
    method: Method,
    pattern: PathPattern,
    requirement: Requirement,
}

impl RouteRule {
    fn matches(&self, method: &Method, path: &str) -> bool {
        &self.method == method && self.pattern.matches(path)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The gateway's published table.
    ///
    /// | POST   | /auth/**       | public   |
    /// | GET    | /method/get    | READ     |
    /// | POST   | /method/post   | CREATE   |
    /// | DELETE | /method/delete | DELETE   |
    /// | PUT    | /method/put    | UPDATE   |
    /// | *      | anything else  | denied   |
    pub fn gateway() -> Self {
        Self::new()
            .permit(Method::POST, "/auth/**")
            .require(Method::GET, "/method/get", "READ")
            .require(Method::POST, "/method/post", "CREATE")
            .require(Method::DELETE, "/method/delete", "DELETE")
            .require(Method::PUT, "/method/put", "UPDATE")
    }

    pub fn permit(self, method: Method, pattern: &str) -> Self {
        self.push(method, pattern, Requirement::Public)
    }

    pub fn require(self, method: Method, pattern: &str, authority: &str) -> Self {
        self.push(
            method,
            pattern,
            Requirement::Authority(authority.to_string()),
        )
    }

    fn push(mut self, method: Method, pattern: &str, requirement: Requirement) -> Self {
        self.rules.push(RouteRule {
            method,
            pattern: PathPattern::parse(pattern),
            requirement,
        });
        self
    }

    /// First matching rule's requirement, if any.
    pub fn requirement_for(&self, method: &Method, path: &str) -> Option<&Requirement> {
        if has_dot_segment(path) {
            return None;
        }
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.requirement)
    }

    pub fn decide(&self, method: &Method, path: &str, identity: Option<&Identity>) -> Decision {
        match (self.requirement_for(method, path), identity) {
            (None, _) => Decision::AuthorityDenied,
            (Some(Requirement::Public), _) => Decision::Permit,
            (Some(Requirement::Authority(_)), None) => Decision::Unauthenticated,
            (Some(Requirement::Authority(required)), Some(identity)) => {
                if identity.has_authority(required) {
                    Decision::Permit
                } else {
                    Decision::AuthorityDenied
                }
            }
        }
    }
}

// `/auth/../method/get` must not ride on the public `/auth/**` rule.
fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment == "." || segment == "..")
}
