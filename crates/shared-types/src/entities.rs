//! # Primitive Entities
//!
//! Fixed-size byte types used across the workspace.

pub use primitive_types::U256;

/// 32-byte Keccak-256 digest.
pub type Hash = [u8; 32];

/// 20-byte account identity (Ethereum-style address).
pub type Address = [u8; 20];

/// 32-byte opaque scope tag. All-zero means "no restriction".
pub type Scope = [u8; 32];

/// Numeric identifier of an execution network.
pub type ChainId = u64;

/// The all-zero address, used as the "absent" sentinel in query responses.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// The all-zero scope (wildcard).
pub const ZERO_SCOPE: Scope = [0u8; 32];

/// Render the first 4 bytes of a hash or address as `0x`-prefixed hex.
///
/// Log-friendly abbreviation; never use for comparisons.
pub fn short_hex(bytes: &[u8]) -> String {
    let n = bytes.len().min(4);
    format!("0x{}", hex::encode(&bytes[..n]))
}

/// Check whether an address is the zero sentinel.
pub fn is_zero_address(addr: &Address) -> bool {
    addr == &ZERO_ADDRESS
}

/// Check whether a scope tag is the wildcard.
pub fn is_wildcard_scope(scope: &Scope) -> bool {
    scope == &ZERO_SCOPE
}
