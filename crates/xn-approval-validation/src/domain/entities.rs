//! # Domain Entities
//!
//! Core records and transient values for approval validation.

use serde::{Deserialize, Serialize};
use shared_types::{is_wildcard_scope, Address, Hash, Scope, U256};

/// Persistent per-child record.
///
/// Keyed by the child identity in [`super::registry::AccountRegistry`];
/// there is exactly one record per installed child.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildAccountState {
    /// Identity whose signature authorizes this child's operations.
    pub parent: Address,
    /// Replay counter; an envelope is accepted only when its nonce equals
    /// this value exactly, and a successful validation advances it by one.
    pub nonce: U256,
    /// Scope restriction. Zero accepts any envelope scope.
    pub allowed_scope: Scope,
}

impl ChildAccountState {
    /// Whether an envelope scope satisfies this record's restriction.
    pub fn accepts_scope(&self, scope: &Scope) -> bool {
        is_wildcard_scope(&self.allowed_scope) || &self.allowed_scope == scope
    }
}

/// Transient approval envelope, submitted once per operation.
///
/// Decoded from the fixed-order wire format in [`super::codec`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApprovalEnvelope {
    /// Must equal the child's stored nonce.
    pub approval_nonce: U256,
    /// Unix-seconds deadline; validation at exactly this time still passes.
    pub valid_until: u64,
    /// Root of the cross-network leaf tree the parent signed over.
    pub merkle_root: Hash,
    /// Ordered sibling hashes proving this network's leaf under the root.
    pub merkle_proof: Vec<Hash>,
    /// Parent signature over the approval hash; interpreted by the
    /// three-way signature dispatch.
    pub parent_signature: Vec<u8>,
    /// Scope tag the parent granted.
    pub scope: Scope,
}

/// One pending operation as presented to the validation entry point.
#[derive(Clone, Debug)]
pub struct OperationDescriptor {
    /// Child identity performing the operation; keys the registry lookup.
    pub sender: Address,
    /// Raw approval envelope bytes (pre-decode).
    pub approval_data: Vec<u8>,
}

/// Successful validation result: the window in which the operation is valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWindow {
    /// Start of validity (always 0).
    pub valid_after: u64,
    /// End of validity, from the envelope (or `u64::MAX` on the
    /// estimation bypass).
    pub valid_until: u64,
}

impl ValidationWindow {
    /// Window ending at the given deadline.
    pub fn until(valid_until: u64) -> Self {
        Self {
            valid_after: 0,
            valid_until,
        }
    }

    /// Maximal window returned by the gas-estimation bypass.
    pub fn unbounded() -> Self {
        Self::until(u64::MAX)
    }
}
