//! Access control subsystem.
//!
//! # Data Flow
//! ```text
//! Protected navigation:
//!     session store supplies Option<Principal>
//!         → AccessGate::evaluate (against the target's requirement)
//!         → AccessDecision { Allow | RedirectUnauthenticated | DenyForbidden }
//!         → caller renders, redirects, or blocks
//!
//! Public-only destination (login):
//!     session store supplies Option<Principal>
//!         → PublicGate::evaluate
//!         → PublicDecision { Allow | RedirectAuthenticated }
//! ```
//!
//! # Design Decisions
//! - Evaluation is synchronous and pure; gates never touch the session store
//! - A present principal with no recognized role is denied, not redirected,
//!   so a corrupt session cannot loop through the login page
//! - Worker grants are injected configuration, not compiled-in policy

pub mod decision;
pub mod gate;
pub mod principal;

pub use decision::{AccessDecision, PublicDecision};
pub use gate::{AccessGate, PublicGate};
pub use principal::{PermissionRequirement, Principal, Role};
