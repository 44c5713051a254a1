//! # Domain Errors
//!
//! Rejection taxonomy for approval validation. Every variant is a terminal,
//! atomic rejection of one validation call; nothing is retried internally.

use shared_types::{DecodeError, U256};
use thiserror::Error;

/// Approval validation error types.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ValidationError {
    /// No registry record exists for the child.
    #[error("Child account not initialized")]
    NotInitialized,

    /// Install called while a record already exists.
    #[error("Child account already initialized")]
    AlreadyInitialized,

    /// Install called with a null parent identity.
    #[error("Invalid parent identity (zero address)")]
    InvalidParent,

    /// Approval nonce does not match the stored counter.
    /// Covers both stale replays and premature future nonces.
    #[error("Invalid approval nonce: expected {expected}, got {got}")]
    InvalidNonce {
        /// Counter currently stored for the child.
        expected: U256,
        /// Nonce carried by the envelope.
        got: U256,
    },

    /// Network time is past the envelope's deadline.
    #[error("Approval expired: valid_until={valid_until}, now={now}")]
    ExpiredApproval {
        /// Deadline carried by the envelope.
        valid_until: u64,
        /// Network time at validation.
        now: u64,
    },

    /// Envelope scope does not match the installed restriction.
    #[error("Scope mismatch")]
    ScopeMismatch,

    /// Leaf is not provably a member of the claimed Merkle root.
    #[error("Invalid Merkle proof")]
    InvalidMerkleProof,

    /// Approval-hash signature does not resolve to the registered parent.
    /// External-call failures during verification collapse into this.
    #[error("Invalid parent signature")]
    InvalidSignature,

    /// Envelope or install payload failed to decode.
    #[error("Malformed payload: {0}")]
    Decode(#[from] DecodeError),
}
