//! # Validator Configuration
//!
//! Per-network identity of one validator instance. The chain id and entry
//! point are baked into every leaf this validator recomputes, so two
//! instances with different configs accept disjoint leaf sets under the
//! same root.

use serde::{Deserialize, Serialize};
use shared_types::{Address, ChainId};

/// Validator configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Identifier of the network this instance runs on.
    pub chain_id: ChainId,

    /// Identity of the operation entry point whose calls this validator
    /// serves; bound into every leaf.
    pub entry_point: Address,
}

impl ValidatorConfig {
    /// Create a config for a specific network and entry point.
    pub fn new(chain_id: ChainId, entry_point: Address) -> Self {
        Self {
            chain_id,
            entry_point,
        }
    }

    /// Create a config for testing (chain 1, fixed entry point).
    pub fn for_testing() -> Self {
        Self {
            chain_id: 1,
            entry_point: [0xEE; 20],
        }
    }
}
