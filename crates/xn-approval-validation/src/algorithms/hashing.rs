//! # Approval Hashing
//!
//! Domain-separated Keccak-256 derivations for the per-network leaf and the
//! cross-network approval hash. Both are pure and bit-for-bit reproducible
//! off-chain, so external tooling can build trees and proofs this validator
//! will accept.

use sha3::{Digest, Keccak256};
use shared_types::{Address, ChainId, Hash, Scope, U256};

/// Domain tag for per-network leaves.
pub const LEAF_DOMAIN: &[u8] = b"XN_APPROVAL_LEAF_V1";

/// Domain tag for the approval hash the parent signs.
pub const APPROVAL_DOMAIN: &[u8] = b"XN_APPROVAL_ROOT_V1";

/// Keccak-256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Keccak-256 over the concatenation of several inputs.
pub fn keccak256_concat(inputs: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for input in inputs {
        hasher.update(input);
    }
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Derive the leaf binding one pending operation on one network.
///
/// `keccak256(LEAF_DOMAIN || chain_id:u64be || child || entry_point || op_hash)`.
/// The operation hash follows the network's own convention and is opaque
/// here.
pub fn compute_leaf_hash(
    chain_id: ChainId,
    child: &Address,
    entry_point: &Address,
    op_hash: &Hash,
) -> Hash {
    keccak256_concat(&[
        LEAF_DOMAIN,
        &chain_id.to_be_bytes(),
        child,
        entry_point,
        op_hash,
    ])
}

/// Derive the approval hash the parent actually signs.
///
/// `keccak256(APPROVAL_DOMAIN || child || root || nonce:32be || valid_until:u64be || scope)`.
/// Depends only on the Merkle root, never on an individual leaf, so one
/// signature covers every leaf under the root.
pub fn compute_approval_hash(
    child: &Address,
    merkle_root: &Hash,
    approval_nonce: U256,
    valid_until: u64,
    scope: &Scope,
) -> Hash {
    let mut nonce_bytes = [0u8; 32];
    approval_nonce.to_big_endian(&mut nonce_bytes);
    keccak256_concat(&[
        APPROVAL_DOMAIN,
        child,
        merkle_root,
        &nonce_bytes,
        &valid_until.to_be_bytes(),
        scope,
    ])
}
