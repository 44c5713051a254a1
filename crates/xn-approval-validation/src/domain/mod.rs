//! # Domain Layer
//!
//! Records, transient values, the wire codec, invariant predicates, and the
//! account registry. Pure except for the registry's keyed map.

pub mod codec;
pub mod entities;
pub mod errors;
pub mod events;
pub mod invariants;
pub mod registry;

pub use codec::{
    carries_estimation_marker, decode_envelope, decode_install_payload, encode_envelope,
    encode_install_payload, estimation_marker, InstallPayload, ROOT_OFFSET,
};
pub use entities::{ApprovalEnvelope, ChildAccountState, OperationDescriptor, ValidationWindow};
pub use errors::ValidationError;
pub use events::AuditEvent;
pub use invariants::{invariant_nonce_match, invariant_not_expired, invariant_scope_allowed};
pub use registry::AccountRegistry;
