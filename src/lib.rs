//! Access gating and datastore reachability for the building-management
//! backend.
//!
//! Two halves, one trust story: the [`access`] gates decide whether a
//! principal may enter a navigation target, and the [`probe`] confirms the
//! backing datastore is reachable before the process serves anyone at all.

pub mod access;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod probe;

pub use access::{AccessDecision, AccessGate, PublicDecision, PublicGate};
pub use config::GatekeeperConfig;
pub use lifecycle::Shutdown;
pub use probe::{ProbeEndpoint, ProbeOutcome, TcpSessionFactory};
