//! # Audit Events
//!
//! Payloads emitted on every registry mutation. Consumed through the
//! [`crate::ports::AuditSink`] outbound port; the service also mirrors each
//! event onto `tracing`.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Scope, U256};

/// One registry mutation, in commit order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditEvent {
    /// A child record was created.
    Installed {
        /// Child identity keying the record.
        child: Address,
        /// Authorizing parent.
        parent: Address,
        /// Starting replay counter.
        initial_nonce: U256,
        /// Scope restriction (zero = wildcard).
        scope: Scope,
    },
    /// A child record was deleted.
    Uninstalled {
        /// Child identity whose record was reset.
        child: Address,
    },
    /// A validation committed and consumed a nonce.
    NonceConsumed {
        /// Child whose counter advanced.
        child: Address,
        /// The nonce value that was consumed.
        nonce: U256,
    },
}
