//! # Merkle Membership Verification
//!
//! Recomputes a claimed root bottom-up from a leaf and an ordered sibling
//! list. The combine rule hashes each pair in ascending numeric order, so
//! proofs carry no left/right positions and verification is insensitive to
//! sibling side.
//!
//! # Algorithm
//!
//! 1. Start with the leaf as the running hash
//! 2. For each sibling in proof order: running = keccak256(min || max)
//! 3. Compare the final running hash to the claimed root
//!
//! # Time Complexity: O(log n)
//! # Space Complexity: O(1)

use super::hashing::keccak256_concat;
use shared_types::Hash;

/// Verify that `leaf` is a member of the tree committed to by `root`.
///
/// Membership failure is a normal outcome, not an error: returns `false`
/// on any mismatch. An empty proof is valid exactly when `leaf == root`
/// (single-leaf tree).
pub fn verify_membership(root: &Hash, leaf: &Hash, proof: &[Hash]) -> bool {
    if proof.is_empty() {
        return leaf == root;
    }

    let mut current = *leaf;
    for sibling in proof {
        current = combine_sorted(&current, sibling);
    }

    current == *root
}

/// Hash an unordered pair of nodes in canonical ascending order.
pub fn combine_sorted(a: &Hash, b: &Hash) -> Hash {
    if a <= b {
        keccak256_concat(&[a, b])
    } else {
        keccak256_concat(&[b, a])
    }
}
