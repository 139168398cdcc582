//! Gate decision types.
//!
//! Decisions are values, not errors. A denial is an ordinary outcome of
//! evaluation and carries no channel for the caller to "handle" it away;
//! callers branch on the variant and render, redirect, or block.

/// Outcome of evaluating a protected navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Navigation proceeds.
    Allow,
    /// No principal present; route to the login path.
    RedirectUnauthenticated,
    /// Principal present but not permitted; block with a visible denial.
    DenyForbidden,
}

impl AccessDecision {
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, AccessDecision::RedirectUnauthenticated)
    }

    #[must_use]
    pub fn is_deny(&self) -> bool {
        matches!(self, AccessDecision::DenyForbidden)
    }

    /// Stable label for logs and metrics.
    pub fn status_str(&self) -> &'static str {
        match self {
            AccessDecision::Allow => "allow",
            AccessDecision::RedirectUnauthenticated => "redirect_unauthenticated",
            AccessDecision::DenyForbidden => "deny_forbidden",
        }
    }
}

impl std::fmt::Display for AccessDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_str())
    }
}

/// Outcome of evaluating a public-only destination such as the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicDecision {
    /// Anonymous visitor; the public page renders.
    Allow,
    /// Already authenticated; route to the landing path instead.
    RedirectAuthenticated,
}

impl PublicDecision {
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, PublicDecision::Allow)
    }

    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self, PublicDecision::RedirectAuthenticated)
    }

    pub fn status_str(&self) -> &'static str {
        match self {
            PublicDecision::Allow => "allow",
            PublicDecision::RedirectAuthenticated => "redirect_authenticated",
        }
    }
}

impl std::fmt::Display for PublicDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_str())
    }
}
