/*
 * Responsibility
 * - ロール (ADMIN/USER/INVITED/DEVELOPER) と権限 (CREATE/READ/...) の対応表
 * - トークンに載せる authorities (ROLE_<NAME> + 権限名) の組み立て
 */
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    Create,
    Read,
    Update,
    Delete,
    Refactor,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Refactor => "REFACTOR",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    User,
    Invited,
    Developer,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Invited => "INVITED",
            Self::Developer => "DEVELOPER",
        }
    }

    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Self::Admin => &[Create, Read, Update, Delete],
            Self::User | Self::Invited => &[Read],
            Self::Developer => &[Create, Read, Update, Delete, Refactor],
        }
    }

    pub fn authority(&self) -> String {
        format!("ROLE_{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Role names are matched exactly, as stored.
impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            "INVITED" => Ok(Self::Invited),
            "DEVELOPER" => Ok(Self::Developer),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// `ROLE_<NAME>` for every role plus the union of their permissions.
pub fn granted_authorities<'a>(roles: impl IntoIterator<Item = &'a Role>) -> BTreeSet<String> {
    let mut authorities = BTreeSet::new();
    for role in roles {
        authorities.insert(role.authority());
        authorities.extend(role.permissions().iter().map(|p| p.as_str().to_string()));
    }
    authorities
}
