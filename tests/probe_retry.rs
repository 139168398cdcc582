//! Retry-loop behavior against a scripted session factory.
//!
//! The factory here stands in for the datastore driver: each test scripts a
//! sequence of connect/inventory outcomes and then asserts on attempt
//! counts, wall-clock timing, and that no session handle is left open.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use gatekeeper::probe::endpoint::{Member, ProbeEndpoint, TimeoutBudgets};
use gatekeeper::probe::outcome::{ProbeError, ProbeFailure, ProbeOutcome, TimeoutPhase};
use gatekeeper::probe::resolve::ResolvedTarget;
use gatekeeper::probe::session::{ProbeSession, SessionFactory};
use gatekeeper::probe::{probe, probe_until_success, RetryPolicy};

/// One scripted connect outcome.
enum Step {
    /// Connect fails with this failure.
    Refuse(ProbeFailure),
    /// Connect succeeds; the session's inventory call returns this.
    Establish(Result<Vec<String>, ProbeFailure>),
}

struct ScriptedFactory {
    plan: Mutex<VecDeque<Step>>,
    connects: AtomicU32,
    open_sessions: Arc<AtomicI32>,
}

impl ScriptedFactory {
    fn new(plan: Vec<Step>) -> Self {
        Self {
            plan: Mutex::new(plan.into()),
            connects: AtomicU32::new(0),
            open_sessions: Arc::new(AtomicI32::new(0)),
        }
    }

    fn connects(&self) -> u32 {
        self.connects.load(Ordering::SeqCst)
    }

    fn open_sessions(&self) -> i32 {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    async fn connect(
        &self,
        _target: &ResolvedTarget,
    ) -> Result<Box<dyn ProbeSession>, ProbeFailure> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let step = self.plan.lock().unwrap().pop_front();
        match step {
            Some(Step::Refuse(failure)) => Err(failure),
            Some(Step::Establish(inventory)) => {
                self.open_sessions.fetch_add(1, Ordering::SeqCst);
                Ok(Box::new(ScriptedSession {
                    member: Member::new("127.0.0.1", 27017),
                    inventory: Some(inventory),
                    open_sessions: Arc::clone(&self.open_sessions),
                    released: false,
                }))
            }
            None => Err(ProbeFailure::Unclassified { detail: "script exhausted".to_string() }),
        }
    }
}

struct ScriptedSession {
    member: Member,
    inventory: Option<Result<Vec<String>, ProbeFailure>>,
    open_sessions: Arc<AtomicI32>,
    released: bool,
}

impl ScriptedSession {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.open_sessions.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl ProbeSession for ScriptedSession {
    fn member(&self) -> &Member {
        &self.member
    }

    async fn inventory(&mut self) -> Result<Vec<String>, ProbeFailure> {
        self.inventory.take().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn close(&mut self) {
        self.release();
    }
}

impl Drop for ScriptedSession {
    fn drop(&mut self) {
        self.release();
    }
}

fn endpoint() -> ProbeEndpoint {
    // An IP literal host keeps resolution off the network entirely.
    ProbeEndpoint::parse("mongodb://127.0.0.1:27017/app", "mongodb", TimeoutBudgets::default())
        .unwrap()
}

fn connect_timeout() -> ProbeFailure {
    ProbeFailure::timeout(TimeoutPhase::Connect, Duration::from_secs(10))
}

fn rejection() -> ProbeFailure {
    ProbeFailure::AuthRejected { detail: "bad credentials".to_string() }
}

#[tokio::test]
async fn two_failures_then_success_takes_exactly_two_delays() {
    let factory = ScriptedFactory::new(vec![
        Step::Refuse(connect_timeout()),
        Step::Refuse(connect_timeout()),
        Step::Establish(Ok(vec!["127.0.0.1:27017".to_string()])),
    ]);
    let policy = RetryPolicy {
        delay: Duration::from_millis(200),
        permanent_failure_limit: 3,
    };
    let cancel = CancellationToken::new();

    let started = Instant::now();
    let success = probe_until_success(&endpoint(), &factory, policy, &cancel).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(factory.connects(), 3);
    assert_eq!(success.resources, vec!["127.0.0.1:27017"]);
    // Two full delays elapsed, and only two.
    assert!(elapsed >= Duration::from_millis(400), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1500), "elapsed {elapsed:?}");
    assert_eq!(factory.open_sessions(), 0);
}

#[tokio::test]
async fn cancellation_during_the_delay_stops_the_loop() {
    let factory = ScriptedFactory::new(vec![
        Step::Refuse(connect_timeout()),
        Step::Refuse(connect_timeout()),
    ]);
    let policy = RetryPolicy {
        delay: Duration::from_millis(500),
        permanent_failure_limit: 3,
    };
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let err = probe_until_success(&endpoint(), &factory, policy, &cancel).await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, ProbeError::Cancelled));
    // The first attempt ran, the second never started.
    assert_eq!(factory.connects(), 1);
    assert!(elapsed < Duration::from_millis(500), "elapsed {elapsed:?}");
    assert_eq!(factory.open_sessions(), 0);
}

#[tokio::test]
async fn already_cancelled_token_returns_before_any_attempt() {
    let factory = ScriptedFactory::new(vec![Step::Establish(Ok(Vec::new()))]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = probe_until_success(&endpoint(), &factory, RetryPolicy::default(), &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Cancelled));
    assert_eq!(factory.connects(), 0);
}

#[tokio::test]
async fn rejected_credentials_exhaust_the_attempt_cap() {
    let factory = ScriptedFactory::new(vec![
        Step::Refuse(rejection()),
        Step::Refuse(rejection()),
        Step::Refuse(rejection()),
    ]);
    let policy = RetryPolicy {
        delay: Duration::from_millis(50),
        permanent_failure_limit: 3,
    };
    let cancel = CancellationToken::new();

    let err = probe_until_success(&endpoint(), &factory, policy, &cancel).await.unwrap_err();

    match err {
        ProbeError::GaveUp { attempts, last } => {
            assert_eq!(attempts, 3);
            assert!(matches!(last, ProbeFailure::AuthRejected { .. }));
        }
        other => panic!("expected GaveUp, got {other:?}"),
    }
    assert_eq!(factory.connects(), 3);
}

#[tokio::test]
async fn transient_failures_do_not_count_against_the_cap() {
    // Rejections interleaved with timeouts: only the rejections accumulate.
    let factory = ScriptedFactory::new(vec![
        Step::Refuse(rejection()),
        Step::Refuse(connect_timeout()),
        Step::Refuse(rejection()),
        Step::Refuse(connect_timeout()),
        Step::Establish(Ok(Vec::new())),
    ]);
    let policy = RetryPolicy {
        delay: Duration::from_millis(20),
        permanent_failure_limit: 3,
    };
    let cancel = CancellationToken::new();

    let success = probe_until_success(&endpoint(), &factory, policy, &cancel).await;
    assert!(success.is_ok());
    assert_eq!(factory.connects(), 5);
}

#[tokio::test]
async fn session_is_released_when_inventory_fails() {
    let factory = ScriptedFactory::new(vec![Step::Establish(Err(ProbeFailure::timeout(
        TimeoutPhase::Socket,
        Duration::from_secs(10),
    )))]);

    let outcome = probe(&endpoint(), &factory).await;

    assert!(matches!(outcome, ProbeOutcome::Failure(ProbeFailure::Timeout { .. })));
    assert_eq!(factory.open_sessions(), 0);
}

#[tokio::test]
async fn successful_attempt_reports_member_and_elapsed() {
    let factory = ScriptedFactory::new(vec![Step::Establish(Ok(vec![
        "127.0.0.1:27017".to_string(),
        "127.0.0.1:27018".to_string(),
    ]))]);

    let outcome = probe(&endpoint(), &factory).await;

    match outcome {
        ProbeOutcome::Success(success) => {
            assert_eq!(success.member, "127.0.0.1:27017");
            assert_eq!(success.resources.len(), 2);
            assert!(success.elapsed < Duration::from_secs(1));
        }
        ProbeOutcome::Failure(failure) => panic!("expected success, got {failure}"),
    }
    assert_eq!(factory.open_sessions(), 0);
}
