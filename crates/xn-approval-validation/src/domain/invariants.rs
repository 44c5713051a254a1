//! # Domain Invariants
//!
//! Pure predicates enforced by the validation engine. Each returns the
//! rejection it guards against so the engine stays a flat early-return
//! sequence.

use super::entities::ChildAccountState;
use super::errors::ValidationError;
use shared_types::{Scope, U256};

/// Invariant: the envelope nonce equals the stored counter exactly.
///
/// No gaps, no reuse, no future values.
pub fn invariant_nonce_match(stored: U256, submitted: U256) -> Result<(), ValidationError> {
    if stored != submitted {
        return Err(ValidationError::InvalidNonce {
            expected: stored,
            got: submitted,
        });
    }
    Ok(())
}

/// Invariant: the approval deadline has not passed.
///
/// Validation at exactly `valid_until` still passes.
pub fn invariant_not_expired(now: u64, valid_until: u64) -> Result<(), ValidationError> {
    if now > valid_until {
        return Err(ValidationError::ExpiredApproval { valid_until, now });
    }
    Ok(())
}

/// Invariant: the envelope scope satisfies the installed restriction.
pub fn invariant_scope_allowed(
    record: &ChildAccountState,
    scope: &Scope,
) -> Result<(), ValidationError> {
    if !record.accepts_scope(scope) {
        return Err(ValidationError::ScopeMismatch);
    }
    Ok(())
}
