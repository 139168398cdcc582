//! Session establishment seam.
//!
//! # Responsibilities
//! - Define the narrow interface the datastore driver sits behind
//! - Enforce the connect and server-selection budgets while picking a member
//! - Bound session I/O with the socket budget
//! - Release the session's handle on every exit path, drop included
//!
//! # Design Decisions
//! - The driver is an external collaborator: the crate ships a socket-level
//!   factory that proves reachability, and a real driver slots in behind
//!   [`SessionFactory`] without touching the retry loop
//! - Dialing works on the addresses resolution produced; a hostname never
//!   enters the connect budget
//! - Selection tries members in resolution order and keeps the first that
//!   accepts; the last per-member failure is what surfaces when none do

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::probe::endpoint::{Member, TimeoutBudgets};
use crate::probe::outcome::{classify_io_error, ErrorClassifier, ProbeFailure, TimeoutPhase};
use crate::probe::resolve::{ResolvedMember, ResolvedTarget};

/// An established session against one member.
///
/// Implementations must release their transport when dropped; [`close`] is
/// the graceful path and is bounded by the socket budget.
///
/// [`close`]: ProbeSession::close
#[async_trait]
pub trait ProbeSession: Send {
    /// Member this session is bound to.
    fn member(&self) -> &Member;

    /// Enumerate reachable members as the confirmation artifact. Proves the
    /// session is good for more than the initial handshake.
    async fn inventory(&mut self) -> Result<Vec<String>, ProbeFailure>;

    /// Graceful close. Best-effort; the drop path covers whatever this
    /// leaves behind.
    async fn close(&mut self);
}

/// Establishes sessions against a resolved target.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn connect(&self, target: &ResolvedTarget) -> Result<Box<dyn ProbeSession>, ProbeFailure>;
}

/// Socket-level factory: a session is an open TCP stream to the first member
/// that accepts within budget.
pub struct TcpSessionFactory {
    budgets: TimeoutBudgets,
    classifier: ErrorClassifier,
}

impl TcpSessionFactory {
    pub fn new(budgets: TimeoutBudgets) -> Self {
        Self { budgets, classifier: classify_io_error }
    }

    /// Override failure classification for deployments where the dial errors
    /// carry more signal than the default mapping assumes.
    pub fn with_classifier(mut self, classifier: ErrorClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Dial one member within the connect budget, trying its resolved
    /// addresses in order.
    async fn dial(&self, candidate: &ResolvedMember) -> Result<TcpStream, ProbeFailure> {
        let attempt = async {
            let mut last = None;
            for addr in &candidate.addrs {
                match TcpStream::connect(*addr).await {
                    Ok(stream) => return Ok(stream),
                    Err(e) => last = Some(e),
                }
            }
            Err(last)
        };
        match timeout(self.budgets.connect, attempt).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(Some(e))) => Err((self.classifier)(&e, &self.budgets)),
            Ok(Err(None)) => Err(ProbeFailure::Unclassified {
                detail: format!("{} has no resolved addresses", candidate.member),
            }),
            Err(_) => Err(ProbeFailure::timeout(TimeoutPhase::Connect, self.budgets.connect)),
        }
    }
}

#[async_trait]
impl SessionFactory for TcpSessionFactory {
    async fn connect(&self, target: &ResolvedTarget) -> Result<Box<dyn ProbeSession>, ProbeFailure> {
        let selection = async {
            let mut last = None;
            for candidate in &target.members {
                match self.dial(candidate).await {
                    Ok(stream) => {
                        tracing::debug!(member = %candidate.member, "member accepted the session");
                        return Ok((candidate.member.clone(), stream));
                    }
                    Err(failure) => {
                        tracing::warn!(
                            member = %candidate.member,
                            error = %failure,
                            "member did not accept the session"
                        );
                        last = Some(failure);
                    }
                }
            }
            Err(last.unwrap_or_else(|| ProbeFailure::Unclassified {
                detail: "resolution produced no members".to_string(),
            }))
        };

        let (member, stream) = match timeout(self.budgets.server_selection, selection).await {
            Ok(Ok(selected)) => selected,
            Ok(Err(failure)) => return Err(failure),
            Err(_) => {
                return Err(ProbeFailure::timeout(
                    TimeoutPhase::ServerSelection,
                    self.budgets.server_selection,
                ))
            }
        };

        Ok(Box::new(TcpProbeSession {
            member,
            stream: Some(stream),
            peers: target.members.clone(),
            budgets: self.budgets,
        }))
    }
}

/// Socket-level session. Holds the selected stream and sweeps the remaining
/// members for the inventory.
struct TcpProbeSession {
    member: Member,
    stream: Option<TcpStream>,
    peers: Vec<ResolvedMember>,
    budgets: TimeoutBudgets,
}

#[async_trait]
impl ProbeSession for TcpProbeSession {
    fn member(&self) -> &Member {
        &self.member
    }

    async fn inventory(&mut self) -> Result<Vec<String>, ProbeFailure> {
        // The held stream must still be usable before the sweep counts.
        if let Some(stream) = &self.stream {
            timeout(self.budgets.socket, stream.writable())
                .await
                .map_err(|_| ProbeFailure::timeout(TimeoutPhase::Socket, self.budgets.socket))?
                .map_err(|e| ProbeFailure::Unclassified {
                    detail: format!("session unusable: {e}"),
                })?;
        }

        let mut reachable = vec![self.member.to_string()];
        for peer in &self.peers {
            if peer.member == self.member {
                continue;
            }
            let sweep = async {
                let mut last = None;
                for addr in &peer.addrs {
                    match TcpStream::connect(*addr).await {
                        Ok(stream) => {
                            drop(stream);
                            return true;
                        }
                        Err(e) => last = Some(e),
                    }
                }
                if let Some(e) = last {
                    tracing::debug!(member = %peer.member, error = %e, "peer unreachable during sweep");
                }
                false
            };
            match timeout(self.budgets.connect, sweep).await {
                Ok(true) => reachable.push(peer.member.to_string()),
                Ok(false) => {}
                Err(_) => {
                    tracing::debug!(member = %peer.member, "peer sweep timed out");
                }
            }
        }
        Ok(reachable)
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            match timeout(self.budgets.socket, stream.shutdown()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(member = %self.member, error = %e, "socket shutdown failed");
                }
                Err(_) => {
                    tracing::debug!(member = %self.member, "socket shutdown timed out");
                }
            }
        }
    }
}
