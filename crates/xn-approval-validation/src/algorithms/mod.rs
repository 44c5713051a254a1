//! # Algorithms
//!
//! Pure cryptographic building blocks: hashing, Merkle membership, and the
//! three-way signature dispatch. Only the dispatch touches the outside
//! world, and only through the [`crate::ports::ChainEnvironment`] port.

pub mod hashing;
pub mod merkle;
pub mod signature;

pub use hashing::{
    compute_approval_hash, compute_leaf_hash, keccak256, keccak256_concat, APPROVAL_DOMAIN,
    LEAF_DOMAIN,
};
pub use merkle::{combine_sorted, verify_membership};
pub use signature::{
    address_from_pubkey, counterfactual_magic, parse_counterfactual_wrapper,
    personal_message_hash, verify_signature, wrap_counterfactual, CounterfactualWrapper,
    SIG_MAGIC_ACCEPT, SIG_MAGIC_REJECT,
};
