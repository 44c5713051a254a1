//! # Test Fixtures
//!
//! Stand-ins for the off-chain tooling that real deployments run: building
//! the cross-network approval tree, extracting proofs, and signing the
//! approval hash with the parent key. Everything here must reproduce the
//! validator's own derivations bit-for-bit.

use k256::ecdsa::SigningKey;
use shared_types::{Address, Hash, Scope, U256};
use xn_approval_validation::algorithms::{
    combine_sorted, compute_approval_hash, personal_message_hash,
    signature::address_from_pubkey,
};
use xn_approval_validation::domain::{
    codec::{encode_envelope, encode_install_payload},
    ApprovalEnvelope, InstallPayload,
};

/// Cross-network approval tree built with the validator's sorted-pair rule.
///
/// A level with an odd node count promotes its last node unchanged, so the
/// proof for that node simply skips the level.
pub struct ApprovalTree {
    leaves: Vec<Hash>,
}

impl ApprovalTree {
    /// Build from one leaf per network, in any order.
    pub fn new(leaves: Vec<Hash>) -> Self {
        assert!(!leaves.is_empty(), "tree needs at least one leaf");
        Self { leaves }
    }

    /// The root the parent signs over.
    pub fn root(&self) -> Hash {
        let mut level = self.leaves.clone();
        while level.len() > 1 {
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for chunk in level.chunks(2) {
                match chunk {
                    [a, b] => next.push(combine_sorted(a, b)),
                    [a] => next.push(*a),
                    _ => unreachable!(),
                }
            }
            level = next;
        }
        level[0]
    }

    /// Sibling path for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Vec<Hash> {
        assert!(index < self.leaves.len(), "leaf index out of range");
        let mut proof = Vec::new();
        let mut level = self.leaves.clone();
        let mut idx = index;
        while level.len() > 1 {
            let sibling = if idx % 2 == 0 { idx + 1 } else { idx - 1 };
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            let mut next = Vec::with_capacity(level.len().div_ceil(2));
            for chunk in level.chunks(2) {
                match chunk {
                    [a, b] => next.push(combine_sorted(a, b)),
                    [a] => next.push(*a),
                    _ => unreachable!(),
                }
            }
            level = next;
            idx /= 2;
        }
        proof
    }
}

/// Deterministic parent keypair for fixtures.
pub fn parent_key(seed: u8) -> SigningKey {
    SigningKey::from_bytes((&[seed; 32]).into()).unwrap()
}

/// Identity of a fixture key.
pub fn key_address(key: &SigningKey) -> Address {
    address_from_pubkey(key.verifying_key())
}

/// Sign a 32-byte digest the way an externally-owned parent does
/// (EIP-191 prefix, 65-byte `r || s || v`).
pub fn sign_digest(key: &SigningKey, digest: &Hash) -> Vec<u8> {
    let prefixed = personal_message_hash(digest);
    let (sig, recid) = key.sign_prehash_recoverable(&prefixed).unwrap();
    let mut out = sig.to_bytes().to_vec();
    out.push(recid.to_byte());
    out
}

/// Sign the approval hash and wrap everything into wire-format envelope
/// bytes for one network's submission.
#[allow(clippy::too_many_arguments)]
pub fn signed_envelope(
    key: &SigningKey,
    child: &Address,
    root: &Hash,
    proof: Vec<Hash>,
    nonce: u64,
    valid_until: u64,
    scope: Scope,
) -> Vec<u8> {
    let approval_hash =
        compute_approval_hash(child, root, U256::from(nonce), valid_until, &scope);
    encode_envelope(&ApprovalEnvelope {
        approval_nonce: U256::from(nonce),
        valid_until,
        merkle_root: *root,
        merkle_proof: proof,
        parent_signature: sign_digest(key, &approval_hash),
        scope,
    })
}

/// Wire-format install payload.
pub fn install_payload(parent: Address, initial_nonce: u64, scope: Scope) -> Vec<u8> {
    encode_install_payload(&InstallPayload {
        parent,
        initial_nonce: U256::from(initial_nonce),
        scope,
    })
}

/// Random 32-byte value (operation hashes, scopes).
pub fn random_hash() -> Hash {
    rand::random()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xn_approval_validation::algorithms::verify_membership;

    #[test]
    fn test_tree_proofs_verify_for_every_leaf() {
        for n in 1..=9 {
            let leaves: Vec<Hash> = (0..n).map(|_| random_hash()).collect();
            let tree = ApprovalTree::new(leaves.clone());
            let root = tree.root();
            for (i, leaf) in leaves.iter().enumerate() {
                assert!(
                    verify_membership(&root, leaf, &tree.proof(i)),
                    "proof failed for leaf {i} of {n}"
                );
            }
        }
    }

    #[test]
    fn test_single_leaf_tree_root_is_leaf() {
        let leaf = random_hash();
        let tree = ApprovalTree::new(vec![leaf]);
        assert_eq!(tree.root(), leaf);
        assert!(tree.proof(0).is_empty());
    }
}
