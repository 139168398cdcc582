//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger → root token cancelled → child tokens observe → tasks wind down
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!     second signal → immediate exit
//! ```
//!
//! # Design Decisions
//! - Cancellation is cooperative: tasks race their token at suspension
//!   points instead of being aborted
//! - An abandoned probe attempt still releases its session via drop

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
