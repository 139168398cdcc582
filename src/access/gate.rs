//! Route gates.
//!
//! # Responsibilities
//! - Decide allow/redirect/deny for protected navigation targets
//! - Decide allow/redirect for public-only destinations
//! - Expose the configured redirect target for each redirecting decision
//!
//! # Design Decisions
//! - Evaluation is pure: same principal and requirement, same decision, and
//!   nothing about the gate or its inputs is mutated
//! - Gates never fetch the principal; the caller reads the session store and
//!   passes `Option<&Principal>` in
//! - The worker grant set is injected at construction, so deployments can
//!   widen or narrow it without touching evaluation

use std::collections::HashSet;

use crate::access::decision::{AccessDecision, PublicDecision};
use crate::access::principal::{PermissionRequirement, Principal, Role};
use crate::config::AccessConfig;

/// Gate for protected navigation targets.
///
/// Cheap to clone and safe to share; evaluation takes `&self`.
#[derive(Debug, Clone)]
pub struct AccessGate {
    worker_permissions: HashSet<String>,
    login_path: String,
}

impl AccessGate {
    pub fn new<I, S>(worker_permissions: I, login_path: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            worker_permissions: worker_permissions.into_iter().map(Into::into).collect(),
            login_path: login_path.into(),
        }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(config.worker_permissions.iter().cloned(), config.login_path.clone())
    }

    /// Decide whether `principal` may enter a target demanding `required`.
    ///
    /// The decision order is fixed: a missing principal redirects before any
    /// permission logic runs, an empty requirement admits whoever is present,
    /// privileged roles bypass the grant check, and workers pass on any
    /// overlap between the requirement and their grant set.
    #[must_use]
    pub fn evaluate(
        &self,
        principal: Option<&Principal>,
        required: &PermissionRequirement,
    ) -> AccessDecision {
        let Some(principal) = principal else {
            return AccessDecision::RedirectUnauthenticated;
        };

        if required.is_empty() {
            return AccessDecision::Allow;
        }

        match principal.role {
            role if role.is_privileged() => AccessDecision::Allow,
            Role::Worker if required.intersects(&self.worker_permissions) => {
                AccessDecision::Allow
            }
            _ => AccessDecision::DenyForbidden,
        }
    }

    /// Redirect target for a decision, when one applies.
    pub fn redirect_target(&self, decision: AccessDecision) -> Option<&str> {
        match decision {
            AccessDecision::RedirectUnauthenticated => Some(&self.login_path),
            AccessDecision::Allow | AccessDecision::DenyForbidden => None,
        }
    }

    /// Tokens currently granted to the worker role.
    pub fn worker_permissions(&self) -> &HashSet<String> {
        &self.worker_permissions
    }
}

/// Gate for public-only destinations.
///
/// The inverse of [`AccessGate`]: a present principal is sent to the landing
/// path, an anonymous visitor passes through.
#[derive(Debug, Clone)]
pub struct PublicGate {
    landing_path: String,
}

impl PublicGate {
    pub fn new(landing_path: impl Into<String>) -> Self {
        Self { landing_path: landing_path.into() }
    }

    pub fn from_config(config: &AccessConfig) -> Self {
        Self::new(config.landing_path.clone())
    }

    #[must_use]
    pub fn evaluate(&self, principal: Option<&Principal>) -> PublicDecision {
        if principal.is_some() {
            PublicDecision::RedirectAuthenticated
        } else {
            PublicDecision::Allow
        }
    }

    pub fn redirect_target(&self, decision: PublicDecision) -> Option<&str> {
        match decision {
            PublicDecision::RedirectAuthenticated => Some(&self.landing_path),
            PublicDecision::Allow => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> AccessGate {
        AccessGate::from_config(&AccessConfig::default())
    }

    fn worker() -> Principal {
        Principal::new(Role::Worker)
    }

    #[test]
    fn missing_principal_always_redirects() {
        let gate = gate();
        assert!(gate.evaluate(None, &PermissionRequirement::none()).is_redirect());
        assert!(gate
            .evaluate(None, &PermissionRequirement::from_tokens(["read:workorders"]))
            .is_redirect());
    }

    #[test]
    fn empty_requirement_admits_any_present_principal() {
        let gate = gate();
        for role in [Role::Admin, Role::Manager, Role::Worker, Role::Unauthenticated] {
            let principal = Principal::new(role);
            assert!(gate.evaluate(Some(&principal), &PermissionRequirement::none()).is_allow());
        }
    }

    #[test]
    fn privileged_roles_bypass_the_grant_check() {
        let gate = gate();
        let required = PermissionRequirement::from_tokens(["permission:that:nobody:has"]);
        for role in [Role::Admin, Role::Manager] {
            let principal = Principal::new(role);
            assert!(gate.evaluate(Some(&principal), &required).is_allow());
        }
    }

    #[test]
    fn worker_passes_on_any_overlap() {
        let gate = gate();
        let principal = worker();

        let overlap =
            PermissionRequirement::from_tokens(["delete:everything", "read:buildings"]);
        assert!(gate.evaluate(Some(&principal), &overlap).is_allow());

        let disjoint = PermissionRequirement::from_tokens(["delete:everything"]);
        assert!(gate.evaluate(Some(&principal), &disjoint).is_deny());
    }

    #[test]
    fn unrecognized_role_is_denied_not_redirected() {
        let gate = gate();
        let principal = Principal::new(Role::parse("contractor"));
        let required = PermissionRequirement::from_tokens(["read:workorders"]);
        assert_eq!(gate.evaluate(Some(&principal), &required), AccessDecision::DenyForbidden);
    }

    #[test]
    fn grant_set_is_injected_not_hardwired() {
        let gate = AccessGate::new(["approve:invoices"], "/login");
        let principal = worker();

        let custom = PermissionRequirement::from_tokens(["approve:invoices"]);
        assert!(gate.evaluate(Some(&principal), &custom).is_allow());

        let stock = PermissionRequirement::from_tokens(["read:workorders"]);
        assert!(gate.evaluate(Some(&principal), &stock).is_deny());
    }

    #[test]
    fn evaluation_is_repeatable() {
        let gate = gate();
        let principal = worker();
        let required = PermissionRequirement::from_tokens(["view:dashboard:worker"]);
        let first = gate.evaluate(Some(&principal), &required);
        let second = gate.evaluate(Some(&principal), &required);
        assert_eq!(first, second);
        assert!(first.is_allow());
    }

    #[test]
    fn redirect_targets_follow_the_decision() {
        let gate = gate();
        assert_eq!(gate.redirect_target(AccessDecision::RedirectUnauthenticated), Some("/login"));
        assert_eq!(gate.redirect_target(AccessDecision::Allow), None);
        assert_eq!(gate.redirect_target(AccessDecision::DenyForbidden), None);
    }

    #[test]
    fn public_gate_inverts_the_presence_check() {
        let gate = PublicGate::from_config(&AccessConfig::default());

        let decision = gate.evaluate(None);
        assert!(decision.is_allow());
        assert_eq!(gate.redirect_target(decision), None);

        let principal = worker();
        let decision = gate.evaluate(Some(&principal));
        assert!(decision.is_redirect());
        assert_eq!(gate.redirect_target(decision), Some("/dashboard"));
    }
}
