//! # Outbound Ports
//!
//! Traits for what the validator needs from the world: the hosting chain
//! (time, code inspection, read-only calls) and an audit sink for committed
//! registry mutations.

use crate::domain::events::AuditEvent;
use parking_lot::RwLock;
use shared_types::Address;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Failure of an external read-only call.
///
/// The called code is untrusted; every variant collapses to an ordinary
/// verification failure in the engine, never a fault.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum EnvironmentError {
    /// The call reverted or the target rejected it.
    #[error("Call reverted")]
    CallReverted,

    /// The environment refused the call outright.
    #[error("Call unavailable: {0}")]
    Unavailable(String),
}

/// Hosting-chain environment - outbound port.
///
/// All methods are read-only with respect to this module's state; a
/// `static_call` target may be adversarial and must be assumed to call back
/// in.
pub trait ChainEnvironment: Send + Sync {
    /// Current network time, unix seconds.
    fn timestamp(&self) -> u64;

    /// Whether the identity exposes observable code on this network.
    fn has_code(&self, identity: &Address) -> bool;

    /// Issue a side-effect-free call to `target` with raw `calldata`.
    fn static_call(&self, target: &Address, calldata: &[u8]) -> Result<Vec<u8>, EnvironmentError>;
}

/// Audit sink - outbound port.
///
/// Receives one event per committed registry mutation, in commit order.
pub trait AuditSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: AuditEvent);
}

/// Sink that drops every event (for callers that rely on tracing only).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _event: AuditEvent) {}
}

/// Sink that buffers events for test assertions.
#[derive(Debug, Default)]
pub struct BufferedAuditSink {
    events: RwLock<Vec<AuditEvent>>,
}

impl BufferedAuditSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.read().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl AuditSink for BufferedAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.write().push(event);
    }
}

impl<S: AuditSink> AuditSink for std::sync::Arc<S> {
    fn record(&self, event: AuditEvent) {
        self.as_ref().record(event);
    }
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock chain environment for testing.
///
/// Code presence, canned call responses, and probe-triggered
/// materialization are all configurable; calls with no canned response
/// revert.
#[derive(Debug, Default)]
pub struct MockChainEnvironment {
    now: u64,
    code: RwLock<HashSet<Address>>,
    responses: RwLock<HashMap<(Address, Vec<u8>), Vec<u8>>>,
    deploy_on_probe: RwLock<HashMap<Address, Address>>,
    call_log: RwLock<Vec<Address>>,
    fail_all_calls: bool,
}

impl MockChainEnvironment {
    /// Environment pinned at the given network time.
    pub fn new(now: u64) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Move network time.
    pub fn set_timestamp(&mut self, now: u64) {
        self.now = now;
    }

    /// Mark an identity as having observable code.
    pub fn set_code(&mut self, identity: Address) {
        self.code.write().insert(identity);
    }

    /// Can a canned returndata for an exact `(target, calldata)` pair.
    pub fn set_call_response(&mut self, target: Address, calldata: Vec<u8>, response: Vec<u8>) {
        self.responses.write().insert((target, calldata), response);
    }

    /// Configure a deployer so that probing it materializes `deployed`.
    ///
    /// Models the richer execution context in which a counterfactual
    /// identity shows code after the probe.
    pub fn set_deploy_on_probe(&mut self, deployer: Address, deployed: Address) {
        self.deploy_on_probe.write().insert(deployer, deployed);
    }

    /// Make every call fail, canned or not.
    pub fn set_fail_all_calls(&mut self, fail: bool) {
        self.fail_all_calls = fail;
    }

    /// Number of calls issued to `target` so far.
    pub fn calls_to(&self, target: &Address) -> usize {
        self.call_log.read().iter().filter(|a| *a == target).count()
    }
}

impl ChainEnvironment for MockChainEnvironment {
    fn timestamp(&self) -> u64 {
        self.now
    }

    fn has_code(&self, identity: &Address) -> bool {
        self.code.read().contains(identity)
    }

    fn static_call(&self, target: &Address, calldata: &[u8]) -> Result<Vec<u8>, EnvironmentError> {
        self.call_log.write().push(*target);

        if self.fail_all_calls {
            return Err(EnvironmentError::CallReverted);
        }

        if let Some(deployed) = self.deploy_on_probe.read().get(target) {
            self.code.write().insert(*deployed);
        }

        self.responses
            .read()
            .get(&(*target, calldata.to_vec()))
            .cloned()
            .ok_or(EnvironmentError::CallReverted)
    }
}
