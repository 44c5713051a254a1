//! # Wire Codec
//!
//! Fixed-order, big-endian encodings for the approval envelope and the
//! install payload, plus the gas-estimation marker probe.
//!
//! ## Envelope layout
//!
//! ```text
//! [ 0..32)      approval_nonce    U256 BE
//! [32..40)      valid_until       u64 BE (unix seconds)
//! [40..72)      merkle_root       <- ROOT_OFFSET (estimation marker window)
//! [72..74)      proof_len         u16 BE (sibling count)
//! [74..74+32n)  merkle_proof      n x 32 bytes
//! [.. +2)       sig_len           u16 BE
//! [.. +sig_len) parent_signature
//! [.. +32)      scope             final 32 bytes
//! ```
//!
//! Field order is a frozen wire contract: the estimation marker is probed at
//! the raw `merkle_root` byte range *before* decoding, so reordering any
//! field ahead of it is a breaking change.

use super::entities::ApprovalEnvelope;
use crate::algorithms::keccak256;
use shared_types::{
    encoding::{put_u16, put_u256, put_u64},
    Address, ByteReader, DecodeError, Hash, Scope, U256,
};

/// Byte offset of `merkle_root` within the raw envelope.
pub const ROOT_OFFSET: usize = 40;

/// Upper bound on proof length (depth 64 covers any realistic tree).
const MAX_PROOF_LEN: usize = 64;

/// Upper bound on signature length.
const MAX_SIG_LEN: usize = 4096;

/// Tag hashed into the reserved gas-estimation marker.
const ESTIMATION_MARKER_TAG: &[u8] = b"XN_GAS_ESTIMATION_MARKER_V1";

/// The reserved 32-byte gas-estimation marker.
///
/// An honestly constructed envelope carries a real Merkle root at this
/// position; colliding with a keccak output of a fixed tag requires a
/// deliberate preimage, so the marker cannot arise by chance.
pub fn estimation_marker() -> Hash {
    keccak256(ESTIMATION_MARKER_TAG)
}

/// Probe the raw envelope bytes for the gas-estimation marker.
///
/// Inspects only the fixed `merkle_root` byte range; returns `false` for
/// payloads too short to contain it.
pub fn carries_estimation_marker(raw: &[u8]) -> bool {
    if raw.len() < ROOT_OFFSET + 32 {
        return false;
    }
    raw[ROOT_OFFSET..ROOT_OFFSET + 32] == estimation_marker()
}

/// Decode an approval envelope from its wire form.
///
/// Exact-length: trailing bytes are rejected, as is any truncation.
pub fn decode_envelope(raw: &[u8]) -> Result<ApprovalEnvelope, DecodeError> {
    let mut r = ByteReader::new(raw);
    let approval_nonce = r.read_u256()?;
    let valid_until = r.read_u64()?;
    let merkle_root = r.read_hash()?;

    let proof_len = r.read_u16()? as usize;
    if proof_len > MAX_PROOF_LEN {
        return Err(DecodeError::LengthOutOfRange {
            value: proof_len,
            max: MAX_PROOF_LEN,
        });
    }
    let mut merkle_proof = Vec::with_capacity(proof_len);
    for _ in 0..proof_len {
        merkle_proof.push(r.read_hash()?);
    }

    let sig_len = r.read_u16()? as usize;
    if sig_len > MAX_SIG_LEN {
        return Err(DecodeError::LengthOutOfRange {
            value: sig_len,
            max: MAX_SIG_LEN,
        });
    }
    let parent_signature = r.take(sig_len)?.to_vec();

    let scope: Scope = r.read_hash()?;
    r.finish()?;

    Ok(ApprovalEnvelope {
        approval_nonce,
        valid_until,
        merkle_root,
        merkle_proof,
        parent_signature,
        scope,
    })
}

/// Encode an approval envelope to its wire form.
///
/// Inverse of [`decode_envelope`]; used by off-chain tooling and tests.
pub fn encode_envelope(envelope: &ApprovalEnvelope) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        32 + 8 + 32 + 2 + envelope.merkle_proof.len() * 32 + 2 + envelope.parent_signature.len() + 32,
    );
    put_u256(&mut out, &envelope.approval_nonce);
    put_u64(&mut out, envelope.valid_until);
    out.extend_from_slice(&envelope.merkle_root);
    put_u16(&mut out, envelope.merkle_proof.len() as u16);
    for sibling in &envelope.merkle_proof {
        out.extend_from_slice(sibling);
    }
    put_u16(&mut out, envelope.parent_signature.len() as u16);
    out.extend_from_slice(&envelope.parent_signature);
    out.extend_from_slice(&envelope.scope);
    out
}

/// Decoded install payload: `(parent, initial_nonce, scope)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallPayload {
    /// Authorizing parent identity.
    pub parent: Address,
    /// Starting value of the replay counter.
    pub initial_nonce: U256,
    /// Scope restriction (zero = wildcard).
    pub scope: Scope,
}

/// Decode an install payload: `parent:20 || initial_nonce:32 || scope:32`.
pub fn decode_install_payload(raw: &[u8]) -> Result<InstallPayload, DecodeError> {
    let mut r = ByteReader::new(raw);
    let parent = r.read_address()?;
    let initial_nonce = r.read_u256()?;
    let scope = r.read_hash()?;
    r.finish()?;
    Ok(InstallPayload {
        parent,
        initial_nonce,
        scope,
    })
}

/// Encode an install payload (tooling/test helper).
pub fn encode_install_payload(payload: &InstallPayload) -> Vec<u8> {
    let mut out = Vec::with_capacity(84);
    out.extend_from_slice(&payload.parent);
    put_u256(&mut out, &payload.initial_nonce);
    out.extend_from_slice(&payload.scope);
    out
}
