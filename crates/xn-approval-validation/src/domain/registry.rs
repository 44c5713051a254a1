//! # Account Registry
//!
//! Keyed map from child identity to [`ChildAccountState`]. The only
//! mutations are install, uninstall, and the post-validation nonce commit;
//! everything else is read-only.

use super::entities::ChildAccountState;
use super::errors::ValidationError;
use parking_lot::RwLock;
use shared_types::{is_zero_address, Address, Scope, U256};
use std::collections::HashMap;

/// Per-child persistent state, one record per installed child.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    records: RwLock<HashMap<Address, ChildAccountState>>,
}

impl AccountRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record for `caller`.
    ///
    /// Fails with `AlreadyInitialized` if a record exists and with
    /// `InvalidParent` on a zero parent.
    pub fn install(
        &self,
        caller: Address,
        parent: Address,
        initial_nonce: U256,
        scope: Scope,
    ) -> Result<(), ValidationError> {
        if is_zero_address(&parent) {
            return Err(ValidationError::InvalidParent);
        }
        let mut records = self.records.write();
        if records.contains_key(&caller) {
            return Err(ValidationError::AlreadyInitialized);
        }
        records.insert(
            caller,
            ChildAccountState {
                parent,
                nonce: initial_nonce,
                allowed_scope: scope,
            },
        );
        Ok(())
    }

    /// Delete `caller`'s record. Idempotent: deleting an absent record is a
    /// no-op. Returns whether a record was actually removed.
    pub fn uninstall(&self, caller: Address) -> bool {
        self.records.write().remove(&caller).is_some()
    }

    /// Whether a record exists for `identity`.
    pub fn is_installed(&self, identity: &Address) -> bool {
        self.records.read().contains_key(identity)
    }

    /// Copy of the record for `identity`, if any.
    pub fn get(&self, identity: &Address) -> Option<ChildAccountState> {
        self.records.read().get(identity).copied()
    }

    /// Commit a successful validation: advance the nonce by one.
    ///
    /// Re-checks the stored counter under the write lock, so a call that
    /// re-entered during verification cannot consume the same nonce twice;
    /// the loser observes `InvalidNonce`.
    pub fn consume_nonce(&self, child: &Address, expected: U256) -> Result<(), ValidationError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(child)
            .ok_or(ValidationError::NotInitialized)?;
        if record.nonce != expected {
            return Err(ValidationError::InvalidNonce {
                expected: record.nonce,
                got: expected,
            });
        }
        record.nonce = expected + U256::one();
        Ok(())
    }
}
