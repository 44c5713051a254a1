//! # Approval Flow Integration Tests
//!
//! End-to-end flows across independent per-network validator instances:
//! one parent signature over a shared root, consumed exactly once per
//! network.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::fixtures::{
        install_payload, key_address, parent_key, random_hash, signed_envelope, ApprovalTree,
    };
    use shared_types::{Address, Hash, U256, ZERO_SCOPE};
    use xn_approval_validation::{
        compute_leaf_hash, ApprovalValidationApi, ApprovalValidationService, AuditEvent,
        BufferedAuditSink, MockChainEnvironment, OperationDescriptor, ValidationError,
        ValidationWindow, ValidatorConfig,
    };

    const CHILD: Address = [0xC1; 20];
    const ENTRY: Address = [0xEE; 20];

    type Service = ApprovalValidationService<MockChainEnvironment, Arc<BufferedAuditSink>>;

    /// One network's validator with an installed child and shared audit
    /// buffer.
    fn network(chain_id: u64, now: u64) -> (Service, Arc<BufferedAuditSink>) {
        let audit = Arc::new(BufferedAuditSink::new());
        let service = ApprovalValidationService::new(
            ValidatorConfig::new(chain_id, ENTRY),
            MockChainEnvironment::new(now),
            Arc::clone(&audit),
        );
        let parent = key_address(&parent_key(0x42));
        service
            .install(CHILD, &install_payload(parent, 0, ZERO_SCOPE))
            .unwrap();
        (service, audit)
    }

    fn descriptor(approval_data: Vec<u8>) -> OperationDescriptor {
        OperationDescriptor {
            sender: CHILD,
            approval_data,
        }
    }

    fn leaf_for(chain_id: u64, op_hash: &Hash) -> Hash {
        compute_leaf_hash(chain_id, &CHILD, &ENTRY, op_hash)
    }

    #[test]
    fn test_cross_network_sharing() {
        crate::init_tracing();
        let key = parent_key(0x42);
        let (service_a, _) = network(1, 100);
        let (service_b, _) = network(2, 100);

        // One leaf per network under one root; one signature.
        let op_a = random_hash();
        let op_b = random_hash();
        let tree = ApprovalTree::new(vec![leaf_for(1, &op_a), leaf_for(2, &op_b)]);
        let root = tree.root();

        let env_a = signed_envelope(&key, &CHILD, &root, tree.proof(0), 0, 1_000, ZERO_SCOPE);
        let env_b = signed_envelope(&key, &CHILD, &root, tree.proof(1), 0, 1_000, ZERO_SCOPE);

        // Each network validates its own submission exactly once.
        assert_eq!(
            service_a.validate(&descriptor(env_a.clone()), &op_a).unwrap(),
            ValidationWindow::until(1_000)
        );
        assert_eq!(
            service_b.validate(&descriptor(env_b.clone()), &op_b).unwrap(),
            ValidationWindow::until(1_000)
        );

        // Replays fail independently on each network.
        assert!(matches!(
            service_a.validate(&descriptor(env_a), &op_a),
            Err(ValidationError::InvalidNonce { .. })
        ));
        assert!(matches!(
            service_b.validate(&descriptor(env_b), &op_b),
            Err(ValidationError::InvalidNonce { .. })
        ));
    }

    #[test]
    fn test_proofs_do_not_cross_networks() {
        let key = parent_key(0x42);
        let (service_a, _) = network(1, 100);

        let op_a = random_hash();
        let op_b = random_hash();
        let tree = ApprovalTree::new(vec![leaf_for(1, &op_a), leaf_for(2, &op_b)]);
        let root = tree.root();

        // Network B's proof submitted on network A.
        let crossed = signed_envelope(&key, &CHILD, &root, tree.proof(1), 0, 1_000, ZERO_SCOPE);
        assert_eq!(
            service_a.validate(&descriptor(crossed), &op_a),
            Err(ValidationError::InvalidMerkleProof)
        );
    }

    #[test]
    fn test_nonce_monotonicity_over_sequence() {
        let key = parent_key(0x42);
        let (service, audit) = network(1, 50);

        for n in 0..3u64 {
            let op = random_hash();
            let leaf = leaf_for(1, &op);
            let raw = signed_envelope(&key, &CHILD, &leaf, vec![], n, 1_000, ZERO_SCOPE);
            service.validate(&descriptor(raw), &op).unwrap();
        }
        assert_eq!(service.get_nonce(&CHILD), U256::from(3));

        // install + three consumed nonces, in commit order
        let consumed: Vec<_> = audit
            .events()
            .into_iter()
            .filter_map(|e| match e {
                AuditEvent::NonceConsumed { nonce, .. } => Some(nonce),
                _ => None,
            })
            .collect();
        assert_eq!(
            consumed,
            vec![U256::from(0), U256::from(1), U256::from(2)]
        );
    }

    #[test]
    fn test_stale_and_future_nonces_rejected() {
        let key = parent_key(0x42);
        let (service, _) = network(1, 50);
        let op = random_hash();
        let leaf = leaf_for(1, &op);

        let future = signed_envelope(&key, &CHILD, &leaf, vec![], 2, 1_000, ZERO_SCOPE);
        assert!(matches!(
            service.validate(&descriptor(future), &op),
            Err(ValidationError::InvalidNonce { .. })
        ));

        // Consume nonce 0, then resubmit it.
        let current = signed_envelope(&key, &CHILD, &leaf, vec![], 0, 1_000, ZERO_SCOPE);
        service.validate(&descriptor(current), &op).unwrap();
        let stale = signed_envelope(&key, &CHILD, &leaf, vec![], 0, 1_000, ZERO_SCOPE);
        assert!(matches!(
            service.validate(&descriptor(stale), &op),
            Err(ValidationError::InvalidNonce { .. })
        ));
    }

    #[test]
    fn test_proof_tamper_sensitivity() {
        let key = parent_key(0x42);
        let (service, _) = network(1, 50);

        let ops: Vec<Hash> = (0..4).map(|_| random_hash()).collect();
        // Network 1 owns leaf 0; the rest belong to other networks.
        let mut leaves = vec![leaf_for(1, &ops[0])];
        for op in &ops[1..] {
            leaves.push(leaf_for(9, op));
        }
        let tree = ApprovalTree::new(leaves);
        let root = tree.root();

        for position in 0..tree.proof(0).len() {
            let mut proof = tree.proof(0);
            proof[position] = random_hash();
            let raw = signed_envelope(&key, &CHILD, &root, proof, 0, 1_000, ZERO_SCOPE);
            assert_eq!(
                service.validate(&descriptor(raw), &ops[0]),
                Err(ValidationError::InvalidMerkleProof),
                "tampered sibling {position} verified"
            );
        }

        // The untampered proof still passes.
        let raw = signed_envelope(&key, &CHILD, &root, tree.proof(0), 0, 1_000, ZERO_SCOPE);
        assert!(service.validate(&descriptor(raw), &ops[0]).is_ok());
    }

    #[test]
    fn test_concrete_single_leaf_scenario() {
        // Install C with parent P, nonce 0, scope 0; network 1; root = leaf;
        // sign (C, root, 0, t+3600, 0); empty proof; expect success then
        // InvalidNonce on the identical resubmission.
        let now = 1_700_000_000;
        let key = parent_key(0x42);
        let (service, _) = network(1, now);

        let op = random_hash();
        let leaf = leaf_for(1, &op);
        let raw = signed_envelope(&key, &CHILD, &leaf, vec![], 0, now + 3_600, ZERO_SCOPE);

        let window = service.validate(&descriptor(raw.clone()), &op).unwrap();
        assert_eq!(window.valid_after, 0);
        assert_eq!(window.valid_until, now + 3_600);
        assert_eq!(service.get_nonce(&CHILD), U256::one());

        assert!(matches!(
            service.validate(&descriptor(raw), &op),
            Err(ValidationError::InvalidNonce { .. })
        ));
    }

    #[test]
    fn test_scope_restriction_across_networks() {
        let key = parent_key(0x42);
        let scope = [0x51u8; 32];

        let audit = Arc::new(BufferedAuditSink::new());
        let service = ApprovalValidationService::new(
            ValidatorConfig::new(1, ENTRY),
            MockChainEnvironment::new(0),
            audit,
        );
        let parent = key_address(&key);
        service
            .install(CHILD, &install_payload(parent, 0, scope))
            .unwrap();

        let op = random_hash();
        let leaf = leaf_for(1, &op);

        let mismatched = signed_envelope(&key, &CHILD, &leaf, vec![], 0, 1_000, [0x52u8; 32]);
        assert_eq!(
            service.validate(&descriptor(mismatched), &op),
            Err(ValidationError::ScopeMismatch)
        );

        let matching = signed_envelope(&key, &CHILD, &leaf, vec![], 0, 1_000, scope);
        assert!(service.validate(&descriptor(matching), &op).is_ok());
    }

    #[test]
    fn test_signature_binds_scope_and_deadline() {
        let key = parent_key(0x42);
        let (service, _) = network(1, 0);
        let op = random_hash();
        let leaf = leaf_for(1, &op);

        // Take a valid envelope and stretch its deadline: the signature no
        // longer covers the bytes being validated.
        let raw = signed_envelope(&key, &CHILD, &leaf, vec![], 0, 1_000, ZERO_SCOPE);
        let mut stretched = raw.clone();
        stretched[32..40].copy_from_slice(&5_000u64.to_be_bytes());
        assert_eq!(
            service.validate(&descriptor(stretched), &op),
            Err(ValidationError::InvalidSignature)
        );
    }
}
