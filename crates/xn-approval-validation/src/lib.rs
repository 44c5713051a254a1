//! # XN Approval Validation
//!
//! Cross-network operation approvals with a single parent signature.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! A parent identity signs one Merkle root that commits to one leaf per
//! execution network. Each network's validator independently checks that
//! its own pending operation is a member of that root and that the parent
//! signed the root, so one signature authorizes one operation on every
//! network in the tree.
//!
//! ## Validation pipeline
//!
//! | Step | Check | Rejection |
//! |------|-------|-----------|
//! | 1 | child record installed | `NotInitialized` |
//! | 2 | gas-estimation marker | (bypass: immediate success) |
//! | 3 | envelope decode | `Decode` |
//! | 4 | approval nonce == stored nonce | `InvalidNonce` |
//! | 5 | not past `valid_until` | `ExpiredApproval` |
//! | 6 | scope restriction | `ScopeMismatch` |
//! | 7 | leaf under `merkle_root` | `InvalidMerkleProof` |
//! | 8 | parent signed the approval hash | `InvalidSignature` |
//! | 9 | commit: nonce += 1, audit event | — |
//!
//! The nonce commit is strictly last; a rejected call leaves the registry
//! untouched.
//!
//! ## Module Structure
//!
//! ```text
//! xn-approval-validation/
//! ├── domain/          # records, envelope, errors, wire codec, registry
//! ├── algorithms/      # hashing, Merkle membership, signature dispatch
//! ├── ports/           # ApprovalValidationApi, ChainEnvironment, AuditSink
//! ├── config.rs        # per-network validator configuration
//! └── service.rs       # the validation engine
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-exports
pub use algorithms::{
    compute_approval_hash, compute_leaf_hash, keccak256, verify_membership, verify_signature,
    SIG_MAGIC_ACCEPT, SIG_MAGIC_REJECT,
};
pub use config::ValidatorConfig;
pub use domain::{
    carries_estimation_marker, estimation_marker, ApprovalEnvelope, AccountRegistry, AuditEvent,
    ChildAccountState, InstallPayload, OperationDescriptor, ValidationError, ValidationWindow,
};
pub use ports::{
    ApprovalValidationApi, AuditSink, BufferedAuditSink, ChainEnvironment, EnvironmentError,
    MockChainEnvironment, NullAuditSink,
};
pub use service::ApprovalValidationService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
