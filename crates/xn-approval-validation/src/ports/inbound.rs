//! # Inbound Ports
//!
//! API trait defining what the approval-validation subsystem can do for the
//! network's operation-processing runtime.

use crate::domain::{OperationDescriptor, ValidationError, ValidationWindow};
use shared_types::{Address, Hash, Scope, U256};

/// Approval validation API - inbound port.
///
/// Lifecycle and validation callers are identified by `caller`/`sender`;
/// the record key is always the caller's own identity, so only a child can
/// install or uninstall its own record.
pub trait ApprovalValidationApi: Send + Sync {
    /// Install a record for `caller` from a wire payload decoding to
    /// `(parent, initial_nonce, scope)`.
    fn install(&self, caller: Address, data: &[u8]) -> Result<(), ValidationError>;

    /// Remove `caller`'s record. The payload is ignored; the reset is full
    /// and idempotent.
    fn uninstall(&self, caller: Address, data: &[u8]);

    /// Whether a record exists for `identity`.
    fn is_installed(&self, identity: &Address) -> bool;

    /// Registered parent, or the zero address when absent.
    fn get_parent(&self, identity: &Address) -> Address;

    /// Current replay counter, or zero when absent.
    fn get_nonce(&self, identity: &Address) -> U256;

    /// Installed scope restriction, or zero when absent.
    fn get_scope(&self, identity: &Address) -> Scope;

    /// Validate one pending operation against its approval envelope.
    ///
    /// On success the child's nonce advances by exactly one and the
    /// returned window bounds the operation's validity. Any rejection
    /// leaves the registry untouched.
    fn validate(
        &self,
        descriptor: &OperationDescriptor,
        op_hash: &Hash,
    ) -> Result<ValidationWindow, ValidationError>;

    /// Standalone standard-signature query for off-chain verifiers.
    ///
    /// Resolves `context_identity`'s registered parent and checks
    /// `signature` over `message_hash` against it. Total: returns the
    /// 4-byte accept magic or the reject value, never an error.
    fn check_signature(
        &self,
        context_identity: &Address,
        message_hash: &Hash,
        signature: &[u8],
    ) -> [u8; 4];
}
