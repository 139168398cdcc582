//! Connectivity probe subsystem.
//!
//! # Data Flow
//! ```text
//! config (uri, service, budgets)
//!     → endpoint.rs (parse once at startup; immutable per attempt)
//!     → resolve.rs (SRV or direct member discovery, own clock)
//!     → session.rs (factory establishes a session within budgets)
//!     → runner.rs (attempt state machine + until-success loop)
//!     → outcome.rs (classified result)
//!     → diagnostics.rs (guidance + one-shot report)
//! ```
//!
//! # Design Decisions
//! - The datastore driver is an external collaborator behind SessionFactory;
//!   the built-in TCP factory proves reachability, nothing more
//! - Every attempt owns its session handle and releases it on all exit paths
//! - Classified failures, not raw errors, drive retry and operator guidance

pub mod diagnostics;
pub mod endpoint;
pub mod outcome;
pub mod resolve;
pub mod runner;
pub mod session;

pub use endpoint::{Member, ProbeEndpoint, ResolutionStrategy, TimeoutBudgets};
pub use outcome::{ProbeError, ProbeFailure, ProbeOutcome, ProbeSuccess, TimeoutPhase};
pub use resolve::{ResolvedMember, ResolvedTarget};
pub use runner::{probe, probe_until_success, RetryPolicy};
pub use session::{ProbeSession, SessionFactory, TcpSessionFactory};
