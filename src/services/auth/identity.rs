use std::collections::BTreeSet;

/// An authenticated subject and the authorities granted to it.
///
/// Lives only as long as the request that carried the token. Authorities are
/// kept sorted so the encoded claim is stable for the same input set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    subject: String,
    authorities: BTreeSet<String>,
}

impl Identity {
    pub fn new<I, S>(subject: impl Into<String>, authorities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            authorities: authorities.into_iter().map(Into::into).collect(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn authorities(&self) -> &BTreeSet<String> {
        &self.authorities
    }

    /// Exact, case-sensitive membership. No hierarchy between authorities.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_match_is_exact_and_case_sensitive() {
        let identity = Identity::new("alice", ["READ", "ROLE_USER"]);

        assert!(identity.has_authority("READ"));
        assert!(!identity.has_authority("read"));
        assert!(!identity.has_authority("REA"));
        assert!(!identity.has_authority("ROLE_ADMIN"));
    }

    #[test]
    fn duplicate_authorities_collapse() {
        let identity = Identity::new("bob", ["READ", "READ", "CREATE"]);
        assert_eq!(identity.authorities().len(), 2);
    }
}
