//! # Signature Dispatch
//!
//! Resolves a parent signature against an expected signer identity using one
//! of three strategies, picked by a payload sniff (is the signature
//! counterfactually wrapped?) and a runtime predicate (does the identity
//! expose code?):
//!
//! 1. **Wrapped counterfactual** — trailing magic tag; probe the referenced
//!    deployer read-only, then verify via the callback if the identity
//!    materialized, otherwise fail closed.
//! 2. **Deployed identity** — read-only standard-signature-check call; the
//!    expected magic in the returndata is the only success.
//! 3. **Direct key** — EIP-191 prefixed Keccak recovery with EIP-2 low-S
//!    and scalar-range enforcement.
//!
//! The whole dispatch is a total function: malformed encodings, reverting
//! external calls, and failed recovery all collapse to `false`.

use super::hashing::{keccak256, keccak256_concat};
use crate::ports::outbound::ChainEnvironment;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use shared_types::{Address, Hash};
use subtle::Choice;
use zeroize::Zeroize;

/// Magic acceptance value for the standard signature-check convention,
/// both in callback returndata and in [`crate::service`]'s query response.
pub const SIG_MAGIC_ACCEPT: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// Rejection value returned by the standalone signature query.
pub const SIG_MAGIC_REJECT: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

/// Tag hashed into the trailing counterfactual-wrapper magic.
const COUNTERFACTUAL_TAG: &[u8] = b"XN_COUNTERFACTUAL_SIG_V1";

/// EIP-191 personal-message prefix for 32-byte payloads.
const PERSONAL_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// secp256k1 curve order n.
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (EIP-2 malleability bound).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// The 32-byte magic that marks a counterfactually wrapped signature.
pub fn counterfactual_magic() -> Hash {
    keccak256(COUNTERFACTUAL_TAG)
}

/// Verify `signature` over `message_hash` against `signer`.
///
/// Total: never errors, never panics; every failure mode is `false`.
pub fn verify_signature<E: ChainEnvironment + ?Sized>(
    env: &E,
    signer: &Address,
    message_hash: &Hash,
    signature: &[u8],
) -> bool {
    if let Some(wrapper) = parse_counterfactual_wrapper(signature) {
        // Once the identity is live the wrapper is advisory.
        if env.has_code(signer) {
            return verify_deployed(env, signer, message_hash, wrapper.inner_signature);
        }
        // Side-effect-free probe; the deployer cannot actually persist a
        // deployment from this context, so failure here is the norm.
        let _ = env.static_call(&wrapper.deployer, wrapper.deploy_data);
        if env.has_code(signer) {
            return verify_deployed(env, signer, message_hash, wrapper.inner_signature);
        }
        return false;
    }

    if env.has_code(signer) {
        return verify_deployed(env, signer, message_hash, signature);
    }

    verify_direct_key(signer, message_hash, signature)
}

/// Deployed-identity strategy: read-only standard-signature-check call.
///
/// Calldata is `magic || message_hash || signature`; the call succeeds only
/// when the returndata begins with the same magic. Call failure is `false`,
/// never an error.
pub fn verify_deployed<E: ChainEnvironment + ?Sized>(
    env: &E,
    signer: &Address,
    message_hash: &Hash,
    signature: &[u8],
) -> bool {
    let mut calldata = Vec::with_capacity(4 + 32 + signature.len());
    calldata.extend_from_slice(&SIG_MAGIC_ACCEPT);
    calldata.extend_from_slice(message_hash);
    calldata.extend_from_slice(signature);

    match env.static_call(signer, &calldata) {
        Ok(ret) => ret.len() >= 4 && ret[..4] == SIG_MAGIC_ACCEPT,
        Err(_) => false,
    }
}

/// Direct-key strategy: EIP-191 prefixed hash, recovery, address compare.
///
/// Expects the 65-byte `r || s || v` encoding; anything else is `false`.
pub fn verify_direct_key(signer: &Address, message_hash: &Hash, signature: &[u8]) -> bool {
    if signature.len() != 65 {
        return false;
    }

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature[..32]);
    s.copy_from_slice(&signature[32..64]);

    if !is_valid_scalar(&r) || !is_valid_scalar(&s) {
        return false;
    }
    // EIP-2: the upper-half S encoding of the same signature is rejected.
    if !is_low_s(&s) {
        return false;
    }

    let Some(recovery_id) = parse_recovery_id(signature[64]) else {
        return false;
    };

    let prefixed = keccak256_concat(&[PERSONAL_PREFIX, message_hash]);

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&r);
    sig_bytes[32..].copy_from_slice(&s);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let Ok(sig) = parsed else {
        return false;
    };

    let Ok(recovered) = VerifyingKey::recover_from_prehash(&prefixed, &sig, recovery_id) else {
        return false;
    };

    &address_from_pubkey(&recovered) == signer
}

/// Derive the 20-byte identity from a public key: last 20 bytes of the
/// Keccak-256 of the uncompressed point without the 0x04 prefix.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let point = public_key.to_encoded_point(false);
    let hash = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Compute the EIP-191 prefixed digest that the direct-key path recovers
/// against. Exposed so signing fixtures match the validator exactly.
pub fn personal_message_hash(message_hash: &Hash) -> Hash {
    keccak256_concat(&[PERSONAL_PREFIX, message_hash])
}

/// Counterfactual wrapper:
/// `deployer:20 || deploy_data_len:u16 || deploy_data || inner_len:u16 || inner_sig || magic:32`.
pub struct CounterfactualWrapper<'a> {
    /// Reference invoked as a side-effect-free probe.
    pub deployer: Address,
    /// Invocation payload for the probe.
    pub deploy_data: &'a [u8],
    /// The original signature carried inside the wrapper.
    pub inner_signature: &'a [u8],
}

/// Sniff and parse the counterfactual wrapper.
///
/// Returns `None` unless the trailing magic is present and the layout is
/// exact; an ill-formed wrapper behind a valid magic is also `None`, which
/// the dispatch fails closed.
pub fn parse_counterfactual_wrapper(signature: &[u8]) -> Option<CounterfactualWrapper<'_>> {
    if signature.len() < 32 || signature[signature.len() - 32..] != counterfactual_magic() {
        return None;
    }
    let body = &signature[..signature.len() - 32];

    if body.len() < 22 {
        return None;
    }
    let mut deployer = [0u8; 20];
    deployer.copy_from_slice(&body[..20]);
    let deploy_data_len = u16::from_be_bytes([body[20], body[21]]) as usize;

    let data_start: usize = 22;
    let data_end = data_start.checked_add(deploy_data_len)?;
    if body.len() < data_end + 2 {
        return None;
    }
    let deploy_data = &body[data_start..data_end];
    let inner_len = u16::from_be_bytes([body[data_end], body[data_end + 1]]) as usize;

    let inner_start = data_end + 2;
    let inner_end = inner_start.checked_add(inner_len)?;
    if body.len() != inner_end {
        return None;
    }
    let inner_signature = &body[inner_start..inner_end];

    Some(CounterfactualWrapper {
        deployer,
        deploy_data,
        inner_signature,
    })
}

/// Wrap an inner signature for a counterfactual signer (tooling/tests).
pub fn wrap_counterfactual(deployer: &Address, deploy_data: &[u8], inner_signature: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(20 + 2 + deploy_data.len() + 2 + inner_signature.len() + 32);
    out.extend_from_slice(deployer);
    out.extend_from_slice(&(deploy_data.len() as u16).to_be_bytes());
    out.extend_from_slice(deploy_data);
    out.extend_from_slice(&(inner_signature.len() as u16).to_be_bytes());
    out.extend_from_slice(inner_signature);
    out.extend_from_slice(&counterfactual_magic());
    out
}

/// Parse a recovery id from the `v` byte (0, 1, 27, or 28).
fn parse_recovery_id(v: u8) -> Option<RecoveryId> {
    let normalized = match v {
        0 | 1 => v,
        27 | 28 => v - 27,
        _ => return None,
    };
    RecoveryId::from_byte(normalized)
}

/// Constant-time check that `s` is strictly below the half order (EIP-2).
fn is_low_s(s: &[u8; 32]) -> bool {
    lt_bytes(s, &SECP256K1_HALF_ORDER).into()
}

/// Constant-time check that a scalar is in `[1, n-1]`.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut nonzero = Choice::from(0u8);
    for byte in scalar {
        nonzero |= Choice::from((*byte != 0) as u8);
    }
    let below_order = lt_bytes(scalar, &SECP256K1_ORDER);
    (nonzero & below_order).into()
}

/// Constant-time big-endian `a < b` without early returns.
fn lt_bytes(a: &[u8; 32], b: &[u8; 32]) -> Choice {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);
    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((a[i] < b[i]) as u8);
        let byte_greater = Choice::from((a[i] > b[i]) as u8);
        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }
    less
}
