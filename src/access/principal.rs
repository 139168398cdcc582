//! Principal and permission model.
//!
//! The session store supplies `{ role: string } | null`; these types mirror
//! that shape. Unknown role strings fold to [`Role::Unauthenticated`], which
//! is denied rather than redirected when a principal object is present.

use std::collections::HashSet;

use serde::Deserialize;

/// Roles recognized by the access gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum Role {
    Admin,
    Manager,
    Worker,
    /// Catch-all for missing or unrecognized role strings.
    Unauthenticated,
}

impl Role {
    /// Parse a role string from the session store.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            "worker" => Role::Worker,
            _ => Role::Unauthenticated,
        }
    }

    /// Privileged roles bypass fine-grained permission checks.
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Worker => "worker",
            Role::Unauthenticated => "unauthenticated",
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::parse(&raw)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated actor as supplied by the session store.
///
/// Exactly one role per principal. Absence of a principal is modeled at the
/// call site (`Option<&Principal>`), never as a sentinel role value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Principal {
    pub role: Role,
}

impl Principal {
    pub fn new(role: Role) -> Self {
        Self { role }
    }
}

/// Capability tokens a navigation target demands.
///
/// Order-irrelevant and duplicate-free. An empty requirement admits any
/// present principal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionRequirement(HashSet<String>);

impl PermissionRequirement {
    /// Requirement that admits any present principal.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when at least one required token appears in `granted`.
    #[must_use]
    pub fn intersects(&self, granted: &HashSet<String>) -> bool {
        self.0.iter().any(|token| granted.contains(token))
    }
}

impl FromIterator<String> for PermissionRequirement {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for PermissionRequirement {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}
