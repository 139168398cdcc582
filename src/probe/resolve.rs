//! Service location discovery.
//!
//! # Responsibilities
//! - SRV discovery (`_<service>._tcp.<host>`) for `+srv` endpoints, with a
//!   direct fallback when the SRV lookup yields nothing
//! - A-record resolution for named hosts on the direct path
//! - Skip lookups entirely for pre-resolved (IP literal) hosts
//!
//! Resolution runs before any timeout budget starts; DNS is on its own
//! clock. Members leave here carrying the socket addresses they resolved
//! to, so the connect phase never consults a name server.

use std::net::{IpAddr, SocketAddr};

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use tokio::net::lookup_host;

use crate::probe::endpoint::{Member, ProbeEndpoint, ResolutionStrategy};
use crate::probe::outcome::ProbeFailure;

/// One discovered member and the addresses its host resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedMember {
    /// Host:port as named in the URI or the SRV record, for display and
    /// selection logs.
    pub member: Member,
    /// Addresses the connect phase dials. Never empty for members inside a
    /// [`ResolvedTarget`].
    pub addrs: Vec<SocketAddr>,
}

impl ResolvedMember {
    pub fn new(member: Member, addrs: Vec<SocketAddr>) -> Self {
        Self { member, addrs }
    }
}

/// Members discovered for one attempt, in connection order.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    pub members: Vec<ResolvedMember>,
    /// True when SRV discovery failed and the attempt fell back to the URI
    /// host directly.
    pub srv_fell_back: bool,
}

impl ResolvedTarget {
    /// Target built from IP-literal members. Entries whose host is a name
    /// rather than a literal are dropped; [`resolve`] is the path that
    /// handles names.
    pub fn pre_resolved(members: Vec<Member>) -> Self {
        let members = members
            .into_iter()
            .filter_map(|member| {
                let ip = member.host.parse::<IpAddr>().ok()?;
                let addr = SocketAddr::new(ip, member.port);
                Some(ResolvedMember::new(member, vec![addr]))
            })
            .collect();
        Self { members, srv_fell_back: false }
    }
}

/// System resolver configuration when readable, public defaults otherwise.
pub fn resolver() -> TokioAsyncResolver {
    match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::warn!(error = %e, "system resolver unavailable, using public resolver defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        }
    }
}

/// Resolve the endpoint's members per its strategy.
pub async fn resolve(endpoint: &ProbeEndpoint) -> Result<ResolvedTarget, ProbeFailure> {
    match endpoint.strategy {
        ResolutionStrategy::SrvLookup => resolve_srv(endpoint).await,
        ResolutionStrategy::DirectConnectionString => resolve_direct(endpoint).await,
    }
}

async fn resolve_srv(endpoint: &ProbeEndpoint) -> Result<ResolvedTarget, ProbeFailure> {
    let query = endpoint.srv_query_name();
    let srv_error = match resolver().srv_lookup(query.clone()).await {
        Ok(records) => {
            let targets: Vec<Member> = records
                .iter()
                .map(|srv| {
                    let target = srv.target().to_utf8();
                    Member::new(target.trim_end_matches('.'), srv.port())
                })
                .collect();
            if targets.is_empty() {
                "lookup returned no records".to_string()
            } else {
                let (members, last_error) = resolve_members(&targets).await;
                if members.is_empty() {
                    last_error.unwrap_or_else(|| "no SRV target resolved".to_string())
                } else {
                    tracing::info!(query = %query, members = members.len(), "SRV discovery succeeded");
                    return Ok(ResolvedTarget { members, srv_fell_back: false });
                }
            }
        }
        Err(e) => e.to_string(),
    };

    // The URI hostname may still resolve as a plain A record.
    let member = &endpoint.hosts[0];
    tracing::warn!(
        query = %query,
        error = %srv_error,
        host = %member.host,
        "SRV discovery failed, falling back to direct resolution"
    );
    match member_addrs(member).await {
        Ok(addrs) if !addrs.is_empty() => Ok(ResolvedTarget {
            members: vec![ResolvedMember::new(member.clone(), addrs)],
            srv_fell_back: true,
        }),
        Ok(_) => Err(ProbeFailure::DnsResolution {
            host: member.host.clone(),
            detail: format!("SRV {query}: {srv_error}; host resolved to no addresses"),
        }),
        Err(e) => Err(ProbeFailure::DnsResolution {
            host: member.host.clone(),
            detail: format!("SRV {query}: {srv_error}; A lookup: {e}"),
        }),
    }
}

/// Direct path: resolve every member, keeping the ones that yield
/// addresses. Connect-phase selection decides among the survivors.
async fn resolve_direct(endpoint: &ProbeEndpoint) -> Result<ResolvedTarget, ProbeFailure> {
    let (members, last_error) = resolve_members(&endpoint.hosts).await;
    if members.is_empty() {
        let hosts =
            endpoint.hosts.iter().map(|m| m.host.clone()).collect::<Vec<_>>().join(",");
        return Err(ProbeFailure::DnsResolution {
            host: hosts,
            detail: last_error.unwrap_or_else(|| "no hosts to resolve".to_string()),
        });
    }
    Ok(ResolvedTarget { members, srv_fell_back: false })
}

/// Addresses for one member: the literal itself, or a name lookup.
async fn member_addrs(member: &Member) -> std::io::Result<Vec<SocketAddr>> {
    if let Ok(ip) = member.host.parse::<IpAddr>() {
        return Ok(vec![SocketAddr::new(ip, member.port)]);
    }
    Ok(lookup_host((member.host.as_str(), member.port)).await?.collect())
}

/// Resolve each member, dropping entries without addresses. The last failure
/// detail feeds the error message when nothing survives.
async fn resolve_members(members: &[Member]) -> (Vec<ResolvedMember>, Option<String>) {
    let mut resolved = Vec::new();
    let mut last_error = None;

    for member in members {
        match member_addrs(member).await {
            Ok(addrs) if !addrs.is_empty() => {
                resolved.push(ResolvedMember::new(member.clone(), addrs));
            }
            Ok(_) => {
                tracing::debug!(host = %member.host, "host resolved to no addresses");
                last_error = Some(format!("{} resolved to no addresses", member.host));
            }
            Err(e) => {
                tracing::debug!(host = %member.host, error = %e, "failed to resolve member host");
                last_error = Some(format!("{}: {}", member.host, e));
            }
        }
    }

    (resolved, last_error)
}
